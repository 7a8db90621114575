//! Basic usage example of the invoicing toolkit.

use factura_kit::store::{InMemoryStore, InvoiceFilter};
use factura_kit::{BillingConfig, Customer, Invoicing, LineItem};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== factura-kit: Basic Usage ===\n");

    // 1. Configure the service - tax rate, verification URL, output directory
    let config = BillingConfig::default()
        .with_base_verification_url("https://factura.example/verificar/")
        .with_output_dir(std::env::temp_dir().join("factura-kit-demo"));

    // 2. Any InvoiceStore works; the in-memory store needs no setup
    let service = Invoicing::new(InMemoryStore::new(), config)?;

    // 3. Issue an invoice: validate, persist, render the PDF with its QR
    let issued = service
        .issue(
            Customer::new(
                "Empresa Contasimple S.L.",
                "Calle Contasimple 123, 28001 Madrid",
                "B87654321",
            ),
            vec![
                LineItem::new("Servicio de Contabilidad", 12.0, 150.0),
                LineItem::new("Asesoría Fiscal", 1.0, 500.0),
            ],
        )
        .await?;

    println!("Issued invoice {} (id {})", issued.number, issued.id);
    println!("PDF written to {}\n", issued.pdf_path.display());

    // 4. What a scanner decoding the QR would see
    let payload = service.payload(issued.id).await?;
    println!("QR payload: {}\n", payload.canonical_text()?);

    // 5. What the verification endpoint answers for that id
    let report = service.verify(issued.id).await?;
    println!("Verification response:");
    println!("  numero:         {}", report.number);
    println!("  cliente:        {}", report.customer.name);
    println!("  total:          {}", report.total);
    println!("  iva:            {}", report.tax);
    println!("  total con IVA:  {}", report.total_with_tax);
    println!("  hash:           {}\n", report.hash);

    // 6. Search the stored invoices
    let results = service
        .search(&InvoiceFilter::default().with_customer_name("contasimple"))
        .await?;
    println!("Search found {} invoice(s)", results.len());

    // 7. Delete - verification now answers NotFound
    service.delete(issued.id).await?;
    match service.verify(issued.id).await {
        Err(e) => println!("After delete, verify says: {}", e),
        Ok(_) => unreachable!("Deleted invoice should not verify"),
    }

    Ok(())
}
