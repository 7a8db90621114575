//! Invoice aggregate: customer, line items and metadata.
//!
//! The aggregate is the unit of persistence. Stores hand out an opaque
//! [`InvoiceId`] on save; the human-readable invoice number is display data,
//! not a retrieval key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned by the storage layer on save.
///
/// This id, not the `FAC-...` number, keys retrieval, deletion and the
/// verification URL.
pub type InvoiceId = i64;

/// Coerce a missing or `null` numeric field to zero.
///
/// Legacy stored records may carry null quantities or prices; they are
/// normalized here, once, so total computation never has to guard again.
fn zero_if_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Invoice recipient. Immutable once attached to an invoice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    name: String,
    address: String,
    tax_id: String,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        tax_id: impl Into<String>,
    ) -> Self {
        Customer {
            name: name.into(),
            address: address.into(),
            tax_id: tax_id.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }
}

/// A single invoice line. Value data, immutable after construction.
///
/// Missing quantity or unit price is coerced to zero at the construction
/// boundary (see [`LineItem::from_parts`] and the serde path), so
/// [`LineItem::subtotal`] and [`Invoice::total`] never fail on legacy
/// records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    description: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    quantity: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Build a line item from possibly-missing numeric fields.
    ///
    /// The single normalization point: `None` quantity or price becomes 0
    /// here rather than at every summation site.
    pub fn from_parts(
        description: impl Into<String>,
        quantity: Option<f64>,
        unit_price: Option<f64>,
    ) -> Self {
        LineItem {
            description: description.into(),
            quantity: quantity.unwrap_or(0.0),
            unit_price: unit_price.unwrap_or(0.0),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// quantity × unit price.
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// The invoice aggregate: customer + ordered line items + metadata.
///
/// Item order is preserved for display; it carries no other meaning.
///
/// # Example
///
/// ```
/// use factura_kit::{Customer, Invoice, LineItem};
///
/// let customer = Customer::new("Test User", "Test Street", "TEST12345");
/// let invoice = Invoice::new(customer, vec![LineItem::new("Producto Test", 2.0, 50.0)]);
///
/// assert_eq!(invoice.total(), 100.0);
/// assert!(invoice.number().starts_with("FAC-"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    customer: Customer,
    items: Vec<LineItem>,
    date: DateTime<Utc>,
    number: String,
}

impl Invoice {
    /// Create a new invoice dated now with a freshly generated number.
    pub fn new(customer: Customer, items: Vec<LineItem>) -> Self {
        let date = Utc::now();
        let number = generate_invoice_number(&date);
        Invoice {
            customer,
            items,
            date,
            number,
        }
    }

    /// Rehydrate an invoice from stored fields.
    ///
    /// A `None` date defaults to now, a `None` number is generated, same
    /// defaults as [`Invoice::new`].
    pub fn from_parts(
        customer: Customer,
        items: Vec<LineItem>,
        date: Option<DateTime<Utc>>,
        number: Option<String>,
    ) -> Self {
        let date = date.unwrap_or_else(Utc::now);
        let number = number.unwrap_or_else(|| generate_invoice_number(&date));
        Invoice {
            customer,
            items,
            date,
            number,
        }
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn date(&self) -> &DateTime<Utc> {
        &self.date
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Tax-exclusive total: sum of line subtotals.
    ///
    /// An invoice with no items totals 0.
    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

/// Generate a unique human-readable invoice number.
///
/// Format: `FAC-<YYYYMMDD>-<6 uppercase hex chars>`. The suffix comes from a
/// v4 UUID; collisions are accepted as negligible and not checked.
pub fn generate_invoice_number(date: &DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("FAC-{}-{}", date.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_subtotal() {
        let item = LineItem::new("Test", 3.0, 10.0);
        assert_eq!(item.subtotal(), 30.0);
    }

    #[test]
    fn test_item_from_parts_coerces_missing_to_zero() {
        let item = LineItem::from_parts("Legacy", None, Some(12.5));
        assert_eq!(item.quantity(), 0.0);
        assert_eq!(item.subtotal(), 0.0);

        let item = LineItem::from_parts("Legacy", Some(3.0), None);
        assert_eq!(item.unit_price(), 0.0);
        assert_eq!(item.subtotal(), 0.0);
    }

    #[test]
    fn test_item_deserialize_null_price() {
        let item: LineItem =
            serde_json::from_str(r#"{"description":"X","quantity":2,"unit_price":null}"#)
                .expect("Failed to deserialize");
        assert_eq!(item.subtotal(), 0.0);

        let item: LineItem =
            serde_json::from_str(r#"{"description":"X"}"#).expect("Failed to deserialize");
        assert_eq!(item.quantity(), 0.0);
        assert_eq!(item.unit_price(), 0.0);
    }

    #[test]
    fn test_invoice_total() {
        let customer = Customer::new("A", "B", "C");
        let items = vec![LineItem::new("X", 2.0, 5.0), LineItem::new("Y", 1.0, 10.0)];
        let invoice = Invoice::new(customer, items);
        assert_eq!(invoice.total(), 20.0);
    }

    #[test]
    fn test_invoice_total_empty() {
        let invoice = Invoice::new(Customer::new("A", "B", "C"), vec![]);
        assert_eq!(invoice.total(), 0.0);
    }

    #[test]
    fn test_invoice_fractional_quantity() {
        let invoice = Invoice::new(
            Customer::new("A", "B", "C"),
            vec![LineItem::new("Horas", 1.5, 40.0)],
        );
        assert_eq!(invoice.total(), 60.0);
    }

    #[test]
    fn test_invoice_number_format() {
        let invoice = Invoice::new(
            Customer::new("Test", "Address", "ID123456"),
            vec![LineItem::new("Product", 1.0, 10.0)],
        );

        let number = invoice.number();
        assert!(number.starts_with("FAC-"));
        assert_eq!(number.len(), "FAC-".len() + 8 + 1 + 6);

        let date_part = &number[4..12];
        assert!(date_part.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(&number[12..13], "-");

        let suffix = &number[13..];
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_invoice_numbers_distinct() {
        let date = Utc::now();
        let a = generate_invoice_number(&date);
        let b = generate_invoice_number(&date);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_parts_preserves_stored_fields() {
        let date = "2024-03-01T10:00:00Z"
            .parse::<DateTime<Utc>>()
            .expect("Failed to parse date");
        let invoice = Invoice::from_parts(
            Customer::new("A", "B", "C"),
            vec![],
            Some(date),
            Some("FAC-20240301-ABC123".to_string()),
        );

        assert_eq!(invoice.date(), &date);
        assert_eq!(invoice.number(), "FAC-20240301-ABC123");
    }

    #[test]
    fn test_item_order_preserved() {
        let items = vec![
            LineItem::new("primero", 1.0, 1.0),
            LineItem::new("segundo", 1.0, 2.0),
            LineItem::new("tercero", 1.0, 3.0),
        ];
        let invoice = Invoice::new(Customer::new("A", "B", "C"), items);

        let descriptions: Vec<&str> = invoice.items().iter().map(LineItem::description).collect();
        assert_eq!(descriptions, vec!["primero", "segundo", "tercero"]);
    }
}
