//! Storage trait for invoice persistence.
//!
//! The `InvoiceStore` trait decouples the toolkit from any specific database.
//! Renderer and verification responder receive a store handle explicitly
//! (constructor or parameter injection, never process-wide state), so tests
//! substitute the in-memory implementation per case.
//!
//! # Implementing InvoiceStore
//!
//! Implement this trait for any backend: SQLx, tokio-postgres, Diesel, a
//! remote service, or the in-memory store in this module's `memory`
//! submodule. All fields needed for rendering and verification must be
//! eagerly loaded when `fetch` returns; the core never relies on
//! lazy-loading semantics.
//!
//! # Error Handling
//!
//! Missing records are data, not failures: `fetch` answers `Ok(None)` and
//! `delete` answers `Ok(false)` for unknown ids, and the service layer maps
//! those to `Error::NotFound`. Reserve `Err(Error::StorageError)` for the
//! backend actually failing.

use crate::error::{Error, Result};
use crate::model::{Customer, Invoice, InvoiceId};
use chrono::NaiveDate;

pub mod memory;

pub use memory::InMemoryStore;

/// Trait for invoice persistence implementations.
///
/// The invoice aggregate is the unit of persistence: items are saved and
/// deleted with their invoice (cascade), and the customer is created or
/// reused by tax id: first match wins, no merge semantics. Concurrent
/// saves racing on the same new tax id may leave a duplicate customer row
/// unless the backend enforces a uniqueness constraint; that race is
/// accepted.
#[allow(async_fn_in_trait)]
pub trait InvoiceStore: Send + Sync {
    /// Persist an invoice aggregate and return the assigned id.
    ///
    /// # Errors
    /// Returns `Err` if the backend fails to persist.
    async fn save(&self, invoice: &Invoice) -> Result<InvoiceId>;

    /// Load the full aggregate for an id.
    ///
    /// # Returns
    /// - `Ok(Some(invoice))` - Invoice found, eagerly loaded
    /// - `Ok(None)` - No record for this id (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the backend is unavailable or the read fails.
    async fn fetch(&self, id: InvoiceId) -> Result<Option<Invoice>>;

    /// Delete an invoice and its items.
    ///
    /// # Returns
    /// - `Ok(true)` - Invoice removed
    /// - `Ok(false)` - No record for this id
    ///
    /// # Errors
    /// Returns `Err` if the backend fails to delete.
    async fn delete(&self, id: InvoiceId) -> Result<bool>;

    /// Look up a customer by tax id (first match wins).
    ///
    /// # Errors
    /// Returns `Err` if the backend is unavailable or the read fails.
    async fn find_customer_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>>;

    /// Search invoices with optional filters.
    ///
    /// # Errors
    /// Returns `Err` if the backend is unavailable or the read fails.
    async fn search(&self, filter: &InvoiceFilter) -> Result<Vec<(InvoiceId, Invoice)>>;

    /// Count stored invoices (optional, for statistics).
    ///
    /// # Errors
    /// Returns `Err` if not implemented or if the backend operation fails.
    async fn count(&self) -> Result<u64> {
        Err(Error::NotImplemented("count not implemented".to_string()))
    }
}

/// Optional filters for invoice search.
///
/// Every field defaults to "no constraint"; set the ones you need.
///
/// # Example
///
/// ```
/// use factura_kit::store::InvoiceFilter;
///
/// let filter = InvoiceFilter::default()
///     .with_customer_name("acme")
///     .with_total_min(100.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InvoiceFilter {
    /// Case-insensitive substring match on the customer name.
    pub customer_name: Option<String>,

    /// Exact match on the customer tax id.
    pub customer_tax_id: Option<String>,

    /// Inclusive lower bound on the invoice date.
    pub date_from: Option<NaiveDate>,

    /// Inclusive upper bound on the invoice date.
    pub date_to: Option<NaiveDate>,

    /// Inclusive lower bound on the computed tax-exclusive total.
    pub total_min: Option<f64>,

    /// Inclusive upper bound on the computed tax-exclusive total.
    pub total_max: Option<f64>,
}

impl InvoiceFilter {
    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_customer_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.customer_tax_id = Some(tax_id.into());
        self
    }

    pub fn with_date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn with_date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn with_total_min(mut self, total: f64) -> Self {
        self.total_min = Some(total);
        self
    }

    pub fn with_total_max(mut self, total: f64) -> Self {
        self.total_max = Some(total);
        self
    }

    /// Whether an invoice satisfies every set constraint.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if let Some(name) = &self.customer_name {
            if !invoice
                .customer()
                .name()
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        if let Some(tax_id) = &self.customer_tax_id {
            if invoice.customer().tax_id() != tax_id {
                return false;
            }
        }
        let date = invoice.date().date_naive();
        if let Some(from) = self.date_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if date > to {
                return false;
            }
        }
        let total = invoice.total();
        if let Some(min) = self.total_min {
            if total < min {
                return false;
            }
        }
        if let Some(max) = self.total_max {
            if total > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, LineItem};

    fn invoice(name: &str, tax_id: &str, total: f64) -> Invoice {
        Invoice::new(
            Customer::new(name, "Calle 1", tax_id),
            vec![LineItem::new("Item", 1.0, total)],
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = InvoiceFilter::default();
        assert!(filter.matches(&invoice("Acme S.L.", "B87654321", 10.0)));
    }

    #[test]
    fn test_name_filter_case_insensitive_substring() {
        let filter = InvoiceFilter::default().with_customer_name("acme");
        assert!(filter.matches(&invoice("Acme S.L.", "B87654321", 10.0)));
        assert!(!filter.matches(&invoice("Otro Cliente", "B87654321", 10.0)));
    }

    #[test]
    fn test_tax_id_filter_exact() {
        let filter = InvoiceFilter::default().with_customer_tax_id("B87654321");
        assert!(filter.matches(&invoice("Acme", "B87654321", 10.0)));
        assert!(!filter.matches(&invoice("Acme", "B87654322", 10.0)));
    }

    #[test]
    fn test_total_bounds_inclusive() {
        let filter = InvoiceFilter::default()
            .with_total_min(10.0)
            .with_total_max(20.0);
        assert!(filter.matches(&invoice("A", "B87654321", 10.0)));
        assert!(filter.matches(&invoice("A", "B87654321", 20.0)));
        assert!(!filter.matches(&invoice("A", "B87654321", 9.99)));
        assert!(!filter.matches(&invoice("A", "B87654321", 20.01)));
    }

    #[test]
    fn test_date_bounds() {
        let today = chrono::Utc::now().date_naive();
        let filter = InvoiceFilter::default()
            .with_date_from(today)
            .with_date_to(today);
        assert!(filter.matches(&invoice("A", "B87654321", 10.0)));

        let filter = InvoiceFilter::default().with_date_from(today.succ_opt().expect("Date overflow"));
        assert!(!filter.matches(&invoice("A", "B87654321", 10.0)));
    }
}
