//! Boundary validation and sanitization.
//!
//! The renderer and the verification responder assume validated aggregates;
//! this module is where that validation happens. Callers run it before
//! building an [`crate::Invoice`]. The zero-coercion inside
//! [`crate::LineItem`] only guards against legacy stored records, it never
//! replaces these checks.

use crate::error::{Error, Result};
use crate::model::{Customer, LineItem};

/// Minimum accepted tax-identifier length.
pub const MIN_TAX_ID_LEN: usize = 8;

/// Maximum length kept when sanitizing free-text fields.
pub const MAX_TEXT_LEN: usize = 255;

/// Strip markup-significant characters, trim, and cap length.
pub fn sanitize_text(input: &str) -> String {
    input
        .trim()
        .chars()
        .take(MAX_TEXT_LEN)
        .collect::<String>()
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Validate and sanitize customer data.
///
/// # Errors
///
/// Returns `Error::ValidationError` for an empty name, address or tax id,
/// or a tax id shorter than [`MIN_TAX_ID_LEN`].
pub fn validate_customer(customer: &Customer) -> Result<Customer> {
    if customer.name().trim().is_empty() {
        return Err(Error::ValidationError(
            "customer name is required".to_string(),
        ));
    }
    if customer.address().trim().is_empty() {
        return Err(Error::ValidationError(
            "customer address is required".to_string(),
        ));
    }
    let tax_id = customer.tax_id().trim();
    if tax_id.is_empty() {
        return Err(Error::ValidationError(
            "customer tax id is required".to_string(),
        ));
    }
    if tax_id.len() < MIN_TAX_ID_LEN {
        return Err(Error::ValidationError(format!(
            "customer tax id must have at least {} characters",
            MIN_TAX_ID_LEN
        )));
    }

    Ok(Customer::new(
        sanitize_text(customer.name()),
        sanitize_text(customer.address()),
        sanitize_text(customer.tax_id()),
    ))
}

/// Validate and sanitize invoice line items.
///
/// # Errors
///
/// Returns `Error::ValidationError` for an empty item list, an empty
/// description, a non-positive quantity or a negative unit price.
pub fn validate_items(items: &[LineItem]) -> Result<Vec<LineItem>> {
    if items.is_empty() {
        return Err(Error::ValidationError(
            "at least one item is required".to_string(),
        ));
    }

    let mut validated = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if item.description().trim().is_empty() {
            return Err(Error::ValidationError(format!(
                "item {}: description is required",
                i + 1
            )));
        }
        if !(item.quantity() > 0.0) {
            return Err(Error::ValidationError(format!(
                "item {}: quantity must be a positive number",
                i + 1
            )));
        }
        if !(item.unit_price() >= 0.0) {
            return Err(Error::ValidationError(format!(
                "item {}: unit price must be a non-negative number",
                i + 1
            )));
        }

        validated.push(LineItem::new(
            sanitize_text(item.description()),
            item.quantity(),
            item.unit_price(),
        ));
    }

    Ok(validated)
}
