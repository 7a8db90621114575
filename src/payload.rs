//! Verification payload embedded in the scannable code.
//!
//! Ephemeral by design: built fresh from the persisted aggregate on every
//! render or verification call, never cached, so any mutation of the stored
//! invoice changes the payload deterministically.

use crate::config::BillingConfig;
use crate::digest::verification_digest;
use crate::error::{Error, Result};
use crate::model::{Invoice, InvoiceId};
use serde::{Deserialize, Serialize};

/// The canonical field set a scanner decodes and the server recomputes.
///
/// Field order is the wire order: [`VerificationPayload::canonical_text`]
/// serializes the struct as-is, so two builds from identical stored state
/// produce identical text (and an identical code image).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationPayload {
    /// Issuer tax id.
    pub emisor_nif: String,
    /// Human-readable invoice number.
    pub numero: String,
    /// Invoice date, formatted with the configured date format.
    pub fecha: String,
    /// Tax-inclusive total, rounded to 2 decimals.
    pub total: f64,
    /// Truncated one-way digest over (number, tax id, date).
    pub hash: String,
    /// Absolute verification URL: base URL + invoice id.
    pub verificacion: String,
}

impl VerificationPayload {
    /// Build the payload for a persisted invoice.
    ///
    /// Reads only the aggregate and the config; no storage access, no
    /// caching.
    pub fn build(invoice: &Invoice, invoice_id: InvoiceId, config: &BillingConfig) -> Self {
        let fecha = invoice.date().format(&config.date_format).to_string();
        let total = invoice.total() * (1.0 + config.tax_rate);
        let total = (total * 100.0).round() / 100.0;
        let hash = verification_digest(invoice.number(), invoice.customer().tax_id(), &fecha);

        VerificationPayload {
            emisor_nif: invoice.customer().tax_id().to_string(),
            numero: invoice.number().to_string(),
            fecha,
            total,
            hash,
            verificacion: format!("{}{}", config.base_verification_url, invoice_id),
        }
    }

    /// Compact canonical JSON, stable key order.
    ///
    /// # Errors
    ///
    /// Returns `Error::DocumentError` if JSON serialization fails.
    pub fn canonical_text(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::DocumentError(format!("payload serialization: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, LineItem};

    fn sample_invoice() -> Invoice {
        Invoice::from_parts(
            Customer::new("Test User", "Test Street", "TEST12345"),
            vec![LineItem::new("Producto Test", 2.0, 50.0)],
            Some(
                "2024-03-01T10:00:00Z"
                    .parse()
                    .expect("Failed to parse date"),
            ),
            Some("FAC-20240301-ABC123".to_string()),
        )
    }

    #[test]
    fn test_payload_fields() {
        let config = BillingConfig::default();
        let payload = VerificationPayload::build(&sample_invoice(), 7, &config);

        assert_eq!(payload.emisor_nif, "TEST12345");
        assert_eq!(payload.numero, "FAC-20240301-ABC123");
        assert_eq!(payload.fecha, "2024-03-01");
        assert_eq!(payload.total, 121.0);
        assert_eq!(payload.hash.len(), 16);
        assert_eq!(payload.verificacion, "http://localhost:5000/verificar/7");
    }

    #[test]
    fn test_payload_deterministic() {
        let config = BillingConfig::default();
        let invoice = sample_invoice();

        let a = VerificationPayload::build(&invoice, 7, &config);
        let b = VerificationPayload::build(&invoice, 7, &config);
        assert_eq!(a, b);
        assert_eq!(
            a.canonical_text().expect("Failed to serialize"),
            b.canonical_text().expect("Failed to serialize")
        );
    }

    #[test]
    fn test_canonical_text_key_order() {
        let config = BillingConfig::default();
        let payload = VerificationPayload::build(&sample_invoice(), 7, &config);
        let text = payload.canonical_text().expect("Failed to serialize");

        let keys = ["emisor_nif", "numero", "fecha", "total", "hash", "verificacion"];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(&format!("\"{}\"", k)).expect("Key missing"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_canonical_text_round_trip() {
        let config = BillingConfig::default();
        let payload = VerificationPayload::build(&sample_invoice(), 42, &config);

        let text = payload.canonical_text().expect("Failed to serialize");
        let decoded: VerificationPayload =
            serde_json::from_str(&text).expect("Failed to deserialize");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_payload_changes_with_stored_state() {
        let config = BillingConfig::default();
        let invoice = sample_invoice();
        let edited = Invoice::from_parts(
            invoice.customer().clone(),
            vec![LineItem::new("Producto Test", 3.0, 50.0)],
            Some(*invoice.date()),
            Some(invoice.number().to_string()),
        );

        let a = VerificationPayload::build(&invoice, 7, &config);
        let b = VerificationPayload::build(&edited, 7, &config);
        assert_ne!(a.total, b.total);
    }

    #[test]
    fn test_verification_url_is_plain_concatenation() {
        let config =
            BillingConfig::default().with_base_verification_url("https://x.example/verificar/");
        let payload = VerificationPayload::build(&sample_invoice(), 99, &config);
        assert_eq!(payload.verificacion, "https://x.example/verificar/99");
    }
}
