//! Fixed-template PDF renderer with embedded verification code.
//!
//! Lays out a single A4 page: header block, line-item table, totals block
//! with the tax rate shown, and a footer legend pointing at the verification
//! URL. The QR image is written next to the PDF as a transient artifact,
//! embedded top-right, and removed again on every exit path.
//!
//! The renderer receives a fully validated aggregate and its persisted id;
//! it does not validate input and does not touch storage.

use crate::config::BillingConfig;
use crate::error::{Error, Result};
use crate::format::{format_amount, format_date};
use crate::model::{Invoice, InvoiceId};
use crate::payload::VerificationPayload;
use crate::qr;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point,
};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A4 page height in millimeters. X grows right, Y grows up in PDF space;
/// layout positions below are measured from the top edge.
const PAGE_HEIGHT_MM: f64 = 297.0;

/// A4 page width in millimeters.
const PAGE_WIDTH_MM: f64 = 210.0;

/// Rendered size of the embedded verification code, in millimeters.
const QR_SIZE_MM: f64 = 40.0;

/// Left edge of the embedded code; top-right region of the page.
const QR_LEFT_MM: f64 = 160.0;

/// Top edge of the embedded code.
const QR_TOP_MM: f64 = 10.0;

/// Item table column left edges and widths, in millimeters.
const TABLE_COLUMNS: [(f64, f64); 4] = [(10.0, 80.0), (90.0, 30.0), (120.0, 40.0), (160.0, 40.0)];

/// Item table row height in millimeters.
const ROW_HEIGHT_MM: f64 = 10.0;

/// Transient file removed when the guard drops, regardless of how the
/// rendering path exits.
struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    fn new(path: PathBuf) -> Self {
        TempArtifact { path }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("✓ Temp artifact removed: {}", self.path.display()),
            Err(e) => warn!("Temp artifact {} not removed: {}", self.path.display(), e),
        }
    }
}

/// Prefix an error with the invoice id without stacking display prefixes.
fn with_invoice_context(invoice_id: InvoiceId, e: Error) -> Error {
    let cause = match e {
        Error::DocumentError(msg) => msg,
        other => other.to_string(),
    };
    Error::DocumentError(format!("invoice {}: {}", invoice_id, cause))
}

/// Renderer for the fixed single-page invoice template.
///
/// # Example
///
/// ```no_run
/// use factura_kit::{BillingConfig, Customer, Invoice, LineItem, PdfRenderer};
///
/// # fn main() -> factura_kit::Result<()> {
/// let renderer = PdfRenderer::new(BillingConfig::default());
/// let invoice = Invoice::new(
///     Customer::new("Test User", "Test Street", "TEST12345"),
///     vec![LineItem::new("Producto Test", 2.0, 50.0)],
/// );
///
/// let pdf_path = renderer.render(&invoice, 1)?;
/// println!("rendered {}", pdf_path.display());
/// # Ok(())
/// # }
/// ```
pub struct PdfRenderer {
    config: BillingConfig,
}

impl PdfRenderer {
    /// Create a renderer with the given configuration.
    pub fn new(config: BillingConfig) -> Self {
        PdfRenderer { config }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Render the invoice to `factura_<id>.pdf` under the configured output
    /// directory and return the path.
    ///
    /// The verification payload is rebuilt from the aggregate on every call,
    /// so re-rendering a stored invoice reproduces the same payload values.
    /// Temp artifact names derive from the invoice id: concurrent renders of
    /// different invoices never collide.
    ///
    /// # Errors
    ///
    /// Any failure to produce the artifact (directory creation, QR
    /// encoding, PDF write) surfaces as `Error::DocumentError` carrying the
    /// invoice id and the underlying cause.
    pub fn render(&self, invoice: &Invoice, invoice_id: InvoiceId) -> Result<PathBuf> {
        let timer = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| with_invoice_context(invoice_id, e.into()))?;
        let pdf_path = self
            .config
            .output_dir
            .join(format!("factura_{}.pdf", invoice_id));

        let payload = VerificationPayload::build(invoice, invoice_id, &self.config);

        // Transient code image, id-keyed, removed once embedded
        let qr_path = self
            .config
            .output_dir
            .join(format!("qr_{}.png", invoice_id));
        let qr_image =
            qr::write_png(&payload, &qr_path).map_err(|e| with_invoice_context(invoice_id, e))?;
        let qr_cleanup = TempArtifact::new(qr_path);

        let (doc, page, layer) = PdfDocument::new(
            format!("Factura {}", invoice.number()),
            Mm(PAGE_WIDTH_MM as _),
            Mm(PAGE_HEIGHT_MM as _),
            "Layer 1",
        );
        let layer = doc.get_page(page).get_layer(layer);

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| with_invoice_context(invoice_id, Error::DocumentError(e.to_string())))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| with_invoice_context(invoice_id, Error::DocumentError(e.to_string())))?;

        self.draw_header(&layer, &font, invoice);
        let table_bottom = self.draw_items(&layer, &font, &font_bold, invoice);
        self.draw_totals(&layer, &font, invoice, table_bottom);
        self.draw_legend(&layer, &font, &payload);
        embed_code(&layer, &qr_cleanup.path, qr_image.width())
            .map_err(|e| with_invoice_context(invoice_id, e))?;

        let file = fs::File::create(&pdf_path)
            .map_err(|e| with_invoice_context(invoice_id, e.into()))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| with_invoice_context(invoice_id, Error::DocumentError(e.to_string())))?;

        info!(
            "✓ Invoice {} rendered to {} in {:?}",
            invoice_id,
            pdf_path.display(),
            timer.elapsed()
        );
        Ok(pdf_path)
    }

    fn draw_header(&self, layer: &PdfLayerReference, font: &IndirectFontRef, invoice: &Invoice) {
        let fecha = format_date(Some(invoice.date()), &self.config.date_format);
        let lines = [
            format!("Factura N°: {}", invoice.number()),
            format!("Fecha: {}", fecha),
            format!("Cliente: {}", invoice.customer().name()),
            format!("Identificación: {}", invoice.customer().tax_id()),
            format!("Dirección: {}", invoice.customer().address()),
        ];

        let mut top = 20.0;
        for line in &lines {
            text_at(layer, font, 12.0, 10.0, top, line);
            top += 8.0;
        }
    }

    /// Draw the item table; returns the table's bottom edge (mm from top).
    fn draw_items(
        &self,
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        font_bold: &IndirectFontRef,
        invoice: &Invoice,
    ) -> f64 {
        let table_top = 70.0;
        let headers = ["Descripción", "Cantidad", "Precio Unitario", "Subtotal"];

        layer.set_outline_thickness(0.5);
        for (&(x, w), header) in TABLE_COLUMNS.iter().zip(headers) {
            cell_border(layer, x, table_top, w, ROW_HEIGHT_MM);
            text_at(layer, font_bold, 12.0, x + 2.0, table_top + 7.0, header);
        }

        let mut top = table_top + ROW_HEIGHT_MM;
        for item in invoice.items() {
            let cells = [
                item.description().to_string(),
                trim_quantity(item.quantity()),
                format_amount(Some(item.unit_price()), &self.config.currency),
                format_amount(Some(item.subtotal()), &self.config.currency),
            ];
            for (&(x, w), cell) in TABLE_COLUMNS.iter().zip(&cells) {
                cell_border(layer, x, top, w, ROW_HEIGHT_MM);
                text_at(layer, font, 12.0, x + 2.0, top + 7.0, cell);
            }
            top += ROW_HEIGHT_MM;
        }

        top
    }

    fn draw_totals(
        &self,
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        invoice: &Invoice,
        table_bottom: f64,
    ) {
        let total = invoice.total();
        let tax = total * self.config.tax_rate;
        let total_with_tax = total + tax;
        let rate_pct = (self.config.tax_rate * 100.0).round() as i64;

        let lines = [
            format!(
                "Total (sin IVA): {}",
                format_amount(Some(total), &self.config.currency)
            ),
            format!(
                "IVA ({}%): {}",
                rate_pct,
                format_amount(Some(tax), &self.config.currency)
            ),
            format!(
                "Total (con IVA): {}",
                format_amount(Some(total_with_tax), &self.config.currency)
            ),
        ];

        let mut top = table_bottom + 10.0;
        for line in &lines {
            text_at(layer, font, 12.0, 10.0, top, line);
            top += 8.0;
        }
    }

    fn draw_legend(
        &self,
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        payload: &VerificationPayload,
    ) {
        let legend = format!("Documento verificable en {}", payload.verificacion);
        text_at(layer, font, 10.0, 10.0, 283.0, &legend);
    }
}

/// Place text at a position measured in millimeters from the top-left.
fn text_at(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    size: f64,
    x_mm: f64,
    top_mm: f64,
    text: &str,
) {
    layer.use_text(
        text,
        size as _,
        Mm(x_mm as _),
        Mm((PAGE_HEIGHT_MM - top_mm) as _),
        font,
    );
}

/// Stroke a rectangular cell border, position measured from the top-left.
fn cell_border(layer: &PdfLayerReference, x_mm: f64, top_mm: f64, w_mm: f64, h_mm: f64) {
    let y = PAGE_HEIGHT_MM - top_mm;
    let points = vec![
        (Point::new(Mm(x_mm as _), Mm(y as _)), false),
        (Point::new(Mm((x_mm + w_mm) as _), Mm(y as _)), false),
        (
            Point::new(Mm((x_mm + w_mm) as _), Mm((y - h_mm) as _)),
            false,
        ),
        (Point::new(Mm(x_mm as _), Mm((y - h_mm) as _)), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: true,
    });
}

/// Embed the written code image in the fixed top-right position.
fn embed_code(layer: &PdfLayerReference, qr_path: &Path, width_px: u32) -> Result<()> {
    let file = fs::File::open(qr_path)?;
    let decoder = printpdf::image_crate::codecs::png::PngDecoder::new(file)
        .map_err(|e| Error::DocumentError(format!("QR image decode: {}", e)))?;
    let image = Image::try_from(decoder)
        .map_err(|e| Error::DocumentError(format!("QR image embed: {}", e)))?;

    // Pick the DPI that maps the pixel width onto QR_SIZE_MM exactly
    let dpi = width_px as f64 * 25.4 / QR_SIZE_MM;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(QR_LEFT_MM as _)),
            translate_y: Some(Mm((PAGE_HEIGHT_MM - QR_TOP_MM - QR_SIZE_MM) as _)),
            dpi: Some(dpi as _),
            ..Default::default()
        },
    );
    Ok(())
}

/// Render a quantity without trailing `.0` noise for whole numbers.
fn trim_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        format!("{}", quantity)
    }
}
