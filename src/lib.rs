//! # factura-kit
//!
//! A storage-agnostic electronic invoicing toolkit for Rust.
//!
//! ## Features
//!
//! - **Tamper-Evident Documents:** Every rendered invoice embeds a QR code
//!   carrying a truncated one-way digest over the canonical invoice fields
//! - **Storage Agnostic:** Persist through any [`store::InvoiceStore`]
//!   implementation: SQLx, tokio-postgres, Diesel, or the bundled
//!   in-memory store for tests
//! - **Framework Independent:** Zero dependencies on web frameworks
//!   (Axum, Actix, Rocket, etc.)
//! - **Deterministic Verification:** The responder recomputes every figure
//!   from stored state on each call, so verification is never stale
//! - **Production Ready:** Built-in logging, metrics hooks, and error
//!   handling
//!
//! ## Quick Start
//!
//! ```no_run
//! use factura_kit::{BillingConfig, Customer, Invoicing, LineItem};
//! use factura_kit::store::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Configure (tax rate, verification URL, output directory)
//!     let config = BillingConfig::default()
//!         .with_base_verification_url("https://example.com/verificar/")
//!         .with_output_dir("/tmp/facturas");
//!
//!     // 2. Create the service with any store
//!     let service = Invoicing::new(InMemoryStore::new(), config)?;
//!
//!     // 3. Issue: validate, persist, render the PDF with embedded QR
//!     let issued = service
//!         .issue(
//!             Customer::new("Test User", "Test Street", "TEST12345"),
//!             vec![LineItem::new("Producto Test", 2.0, 50.0)],
//!         )
//!         .await?;
//!     println!("PDF at {}", issued.pdf_path.display());
//!
//!     // 4. Verify: what a scanner hitting the QR's URL gets back
//!     let report = service.verify(issued.id).await?;
//!     assert_eq!(report.total, "100,00 EUR");
//!
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate log;

pub mod config;
pub mod digest;
pub mod error;
pub mod format;
pub mod model;
pub mod observability;
pub mod payload;
pub mod qr;
pub mod render;
pub mod service;
pub mod store;
pub mod validate;

// Re-exports for convenience
pub use config::BillingConfig;
pub use error::{Error, Result};
pub use model::{Customer, Invoice, InvoiceId, LineItem};
pub use payload::VerificationPayload;
pub use render::PdfRenderer;
pub use service::{Invoicing, OperationConfig, VerificationReport};
pub use store::InvoiceStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
