//! In-memory invoice store (default for tests and demos, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Ids come from an atomic counter, starting at 1 like a relational
//! autoincrement column.

use super::{InvoiceFilter, InvoiceStore};
use crate::error::Result;
use crate::model::{Customer, Invoice, InvoiceId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Thread-safe async in-memory invoice store.
///
/// Holds full aggregates, so `fetch` is always eager. Customers are indexed
/// by tax id with find-or-create semantics: the first stored customer for a
/// tax id wins, later saves reuse it. Deleting an invoice cascades to its
/// items (they live inside the aggregate) but keeps the customer row, the
/// same shape a relational schema with a foreign key would give.
///
/// # Example
///
/// ```no_run
/// use factura_kit::store::{InMemoryStore, InvoiceStore};
/// use factura_kit::{Customer, Invoice, LineItem};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let invoice = Invoice::new(
///         Customer::new("Test User", "Test Street", "TEST12345"),
///         vec![LineItem::new("Producto Test", 2.0, 50.0)],
///     );
///
///     let id = store.save(&invoice).await?;
///     assert!(store.fetch(id).await?.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryStore {
    invoices: Arc<DashMap<InvoiceId, Invoice>>,
    customers: Arc<DashMap<String, Customer>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        InMemoryStore {
            invoices: Arc::new(DashMap::new()),
            customers: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Current number of stored invoices.
    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    /// True if no invoices are stored.
    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Remove all invoices and customers.
    ///
    /// Useful for resetting state between test cases.
    pub fn clear(&self) {
        self.invoices.clear();
        self.customers.clear();
        warn!("⚠ InMemory CLEAR executed - all invoices dropped!");
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceStore for InMemoryStore {
    async fn save(&self, invoice: &Invoice) -> Result<InvoiceId> {
        // Find-or-create by tax id; first stored customer wins
        self.customers
            .entry(invoice.customer().tax_id().to_string())
            .or_insert_with(|| invoice.customer().clone());

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.invoices.insert(id, invoice.clone());

        debug!("✓ InMemory SAVE invoice {} ({})", id, invoice.number());
        Ok(id)
    }

    async fn fetch(&self, id: InvoiceId) -> Result<Option<Invoice>> {
        let found = self.invoices.get(&id).map(|entry| entry.value().clone());
        debug!(
            "✓ InMemory FETCH {} -> {}",
            id,
            if found.is_some() { "HIT" } else { "MISS" }
        );
        Ok(found)
    }

    async fn delete(&self, id: InvoiceId) -> Result<bool> {
        let removed = self.invoices.remove(&id).is_some();
        debug!(
            "✓ InMemory DELETE {} -> {}",
            id,
            if removed { "removed" } else { "missing" }
        );
        Ok(removed)
    }

    async fn find_customer_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>> {
        Ok(self
            .customers
            .get(tax_id)
            .map(|entry| entry.value().clone()))
    }

    async fn search(&self, filter: &InvoiceFilter) -> Result<Vec<(InvoiceId, Invoice)>> {
        let mut results: Vec<(InvoiceId, Invoice)> = self
            .invoices
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        // DashMap iteration order is arbitrary; present oldest first
        results.sort_by_key(|(id, _)| *id);

        debug!("✓ InMemory SEARCH -> {} invoices", results.len());
        Ok(results)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.invoices.len() as u64)
    }
}
