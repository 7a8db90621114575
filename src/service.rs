//! High-level invoicing service for web applications.
//!
//! Wraps a storage handle, the renderer and a metrics sink behind one
//! cloneable facade. Everything is Arc-shared internally, so handing a
//! clone to each request handler is cheap.
//!
//! Each call is independent and stateless apart from the shared store: the
//! verification path reloads the aggregate and recomputes every figure on
//! every call, so responses always reflect the latest stored data.

use crate::config::BillingConfig;
use crate::error::{Error, Result};
use crate::format::{format_amount, format_date};
use crate::model::{Customer, Invoice, InvoiceId, LineItem};
use crate::observability::{InvoiceMetrics, NoOpMetrics};
use crate::payload::VerificationPayload;
use crate::render::PdfRenderer;
use crate::store::{InvoiceFilter, InvoiceStore};
use crate::validate::{validate_customer, validate_items};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Configuration for per-operation overrides on the read paths.
///
/// Failed reads are retried up to `retry_count` times with exponential
/// backoff. Only storage failures are retried: a NotFound answer is an
/// answer, and writes are never retried (a retry after a partial failure
/// could double-issue an invoice).
#[derive(Clone, Debug, Default)]
pub struct OperationConfig {
    /// Number of retry attempts (0 = no retry).
    pub retry_count: u32,
}

impl OperationConfig {
    /// Set retry count for this operation.
    pub fn with_retry(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }
}

/// Result of issuing an invoice: the storage id, the human-readable number
/// and the rendered document.
#[derive(Clone, Debug)]
pub struct IssuedInvoice {
    pub id: InvoiceId,
    pub number: String,
    pub pdf_path: PathBuf,
}

/// Customer block inside verification and search responses.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerRef {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "identificacion")]
    pub tax_id: String,
}

/// What a third party gets back when checking an invoice id.
///
/// Every figure is recomputed from the stored aggregate at call time;
/// nothing here is cached. The `hash` field repeats the digest the
/// scannable code embeds so external systems can cross-check bit-for-bit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerificationReport {
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "cliente")]
    pub customer: CustomerRef,
    /// Tax-exclusive total, formatted.
    pub total: String,
    /// Tax amount, formatted.
    #[serde(rename = "iva")]
    pub tax: String,
    /// Tax-inclusive total, formatted.
    #[serde(rename = "total_con_iva")]
    pub total_with_tax: String,
    /// Verification digest, identical to the one in the scannable code.
    pub hash: String,
}

/// One row of a search result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub id: InvoiceId,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "cliente")]
    pub customer: CustomerRef,
    pub total: String,
}

/// High-level invoicing service.
///
/// # Example
///
/// ```no_run
/// use factura_kit::{BillingConfig, Customer, Invoicing, LineItem};
/// use factura_kit::store::InMemoryStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = Invoicing::new(InMemoryStore::new(), BillingConfig::default())?;
///
///     let issued = service
///         .issue(
///             Customer::new("Test User", "Test Street", "TEST12345"),
///             vec![LineItem::new("Producto Test", 2.0, 50.0)],
///         )
///         .await?;
///
///     let report = service.verify(issued.id).await?;
///     assert_eq!(report.total, "100,00 EUR");
///
///     Ok(())
/// }
/// ```
pub struct Invoicing<S: InvoiceStore> {
    store: Arc<S>,
    renderer: Arc<PdfRenderer>,
    metrics: Arc<dyn InvoiceMetrics>,
}

impl<S: InvoiceStore> Clone for Invoicing<S> {
    fn clone(&self) -> Self {
        Invoicing {
            store: Arc::clone(&self.store),
            renderer: Arc::clone(&self.renderer),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<S: InvoiceStore> Invoicing<S> {
    /// Create a new service with the given store and configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is unusable.
    pub fn new(store: S, config: BillingConfig) -> Result<Self> {
        Self::with_metrics(store, config, Box::new(NoOpMetrics))
    }

    /// Create a new service with custom metrics.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is unusable.
    pub fn with_metrics(
        store: S,
        config: BillingConfig,
        metrics: Box<dyn InvoiceMetrics>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Invoicing {
            store: Arc::new(store),
            renderer: Arc::new(PdfRenderer::new(config)),
            metrics: Arc::from(metrics),
        })
    }

    pub fn config(&self) -> &BillingConfig {
        self.renderer.config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, persist and render a new invoice.
    ///
    /// The customer is reused if one with the same tax id is already stored
    /// (first match wins); otherwise the submitted one is created.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: customer or items rejected at the boundary
    /// - `Error::StorageError`: persistence failed
    /// - `Error::DocumentError`: the PDF could not be produced
    pub async fn issue(&self, customer: Customer, items: Vec<LineItem>) -> Result<IssuedInvoice> {
        let timer = Instant::now();

        let customer = validate_customer(&customer).map_err(|e| self.fail("issue", e))?;
        let items = validate_items(&items).map_err(|e| self.fail("issue", e))?;

        let customer = self
            .store
            .find_customer_by_tax_id(customer.tax_id())
            .await
            .map_err(|e| self.fail("issue", e))?
            .unwrap_or(customer);

        let invoice = Invoice::new(customer, items);
        let id = self
            .store
            .save(&invoice)
            .await
            .map_err(|e| self.fail("issue", e))?;
        let pdf_path = self
            .renderer
            .render(&invoice, id)
            .map_err(|e| self.fail("issue", e))?;

        self.metrics.record_issue(invoice.number(), timer.elapsed());
        info!(
            "✓ Invoice {} issued as id {} in {:?}",
            invoice.number(),
            id,
            timer.elapsed()
        );

        Ok(IssuedInvoice {
            id,
            number: invoice.number().to_string(),
            pdf_path,
        })
    }

    /// Re-render the stored invoice and return the document path.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: no invoice for this id
    /// - `Error::StorageError` / `Error::DocumentError`: load or render failed
    pub async fn render_pdf(&self, id: InvoiceId) -> Result<PathBuf> {
        self.render_pdf_with_config(id, OperationConfig::default())
            .await
    }

    /// Re-render with per-operation retry configuration.
    ///
    /// # Errors
    ///
    /// Same cases as [`Invoicing::render_pdf`]; storage failures are retried
    /// up to `config.retry_count` times first.
    pub async fn render_pdf_with_config(
        &self,
        id: InvoiceId,
        config: OperationConfig,
    ) -> Result<PathBuf> {
        let timer = Instant::now();

        let invoice = self.fetch_with_retry(id, "render", &config).await?;
        let pdf_path = self
            .renderer
            .render(&invoice, id)
            .map_err(|e| self.fail("render", e))?;

        self.metrics.record_render(id, timer.elapsed());
        Ok(pdf_path)
    }

    /// Recompute the verification figures from the currently stored state.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: no invoice for this id (including deleted ones)
    /// - `Error::StorageError`: the load failed
    pub async fn verify(&self, id: InvoiceId) -> Result<VerificationReport> {
        self.verify_with_config(id, OperationConfig::default()).await
    }

    /// Verify with per-operation retry configuration.
    ///
    /// # Errors
    ///
    /// Same cases as [`Invoicing::verify`]; storage failures are retried up
    /// to `config.retry_count` times first.
    pub async fn verify_with_config(
        &self,
        id: InvoiceId,
        config: OperationConfig,
    ) -> Result<VerificationReport> {
        let timer = Instant::now();
        let billing = self.config();

        let invoice = self.fetch_with_retry(id, "verify", &config).await?;

        let total = invoice.total();
        let tax = total * billing.tax_rate;
        let total_with_tax = total + tax;
        let date = format_date(Some(invoice.date()), &billing.date_format);
        let hash =
            crate::digest::verification_digest(invoice.number(), invoice.customer().tax_id(), &date);

        let report = VerificationReport {
            number: invoice.number().to_string(),
            date,
            customer: CustomerRef {
                name: invoice.customer().name().to_string(),
                tax_id: invoice.customer().tax_id().to_string(),
            },
            total: format_amount(Some(total), &billing.currency),
            tax: format_amount(Some(tax), &billing.currency),
            total_with_tax: format_amount(Some(total_with_tax), &billing.currency),
            hash,
        };

        self.metrics.record_verify(id, timer.elapsed());
        debug!("✓ Invoice {} verified in {:?}", id, timer.elapsed());
        Ok(report)
    }

    /// Build the verification payload for a stored invoice.
    ///
    /// This is exactly what the scannable code on the rendered document
    /// embeds; use it to compare against a decoded code.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: no invoice for this id
    /// - `Error::StorageError`: the load failed
    pub async fn payload(&self, id: InvoiceId) -> Result<VerificationPayload> {
        let invoice = self
            .fetch_with_retry(id, "payload", &OperationConfig::default())
            .await?;
        Ok(VerificationPayload::build(&invoice, id, self.config()))
    }

    /// Delete an invoice and its items.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: no invoice for this id
    /// - `Error::StorageError`: the delete failed
    pub async fn delete(&self, id: InvoiceId) -> Result<()> {
        let timer = Instant::now();

        let removed = self
            .store
            .delete(id)
            .await
            .map_err(|e| self.fail("delete", e))?;
        if !removed {
            return Err(self.fail("delete", not_found(id)));
        }

        self.metrics.record_delete(id, timer.elapsed());
        info!("✓ Invoice {} deleted", id);
        Ok(())
    }

    /// Search stored invoices and return display-ready summaries.
    ///
    /// # Errors
    ///
    /// Returns `Error::StorageError` if the search fails.
    pub async fn search(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceSummary>> {
        let billing = self.config();
        let results = self
            .store
            .search(filter)
            .await
            .map_err(|e| self.fail("search", e))?;

        Ok(results
            .into_iter()
            .map(|(id, invoice)| InvoiceSummary {
                id,
                number: invoice.number().to_string(),
                date: format_date(Some(invoice.date()), &billing.date_format),
                customer: CustomerRef {
                    name: invoice.customer().name().to_string(),
                    tax_id: invoice.customer().tax_id().to_string(),
                },
                total: format_amount(Some(invoice.total()), &billing.currency),
            })
            .collect())
    }

    /// Load an aggregate, retrying storage failures with exponential backoff.
    async fn fetch_with_retry(
        &self,
        id: InvoiceId,
        operation: &str,
        config: &OperationConfig,
    ) -> Result<Invoice> {
        let max_attempts = config.retry_count + 1;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.store.fetch(id).await {
                Ok(Some(invoice)) => return Ok(invoice),
                Ok(None) => return Err(self.fail(operation, not_found(id))),
                Err(e) if matches!(e, Error::StorageError(_)) && attempts < max_attempts => {
                    debug!(
                        "Storage fetch failed (attempt {}/{}), retrying...",
                        attempts, max_attempts
                    );
                    let delay =
                        tokio::time::Duration::from_millis(100 * 2_u64.pow(attempts - 1));
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(self.fail(operation, e)),
            }
        }
    }

    /// Record a failed operation and hand the error back.
    fn fail(&self, operation: &str, e: Error) -> Error {
        self.metrics.record_error(operation, &e.to_string());
        e
    }
}

fn not_found(id: InvoiceId) -> Error {
    Error::NotFound(format!("invoice {} not found", id))
}
