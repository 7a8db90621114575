//! Billing configuration passed into renderer and service by value.
//!
//! Components receive a `BillingConfig` through their constructors. Nothing
//! in this crate reads configuration from process-wide state, so tests can
//! run each case against its own config and output directory.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Configuration for invoice rendering and verification.
///
/// # Example
///
/// ```
/// use factura_kit::BillingConfig;
///
/// let config = BillingConfig::default()
///     .with_tax_rate(0.21)
///     .with_base_verification_url("https://example.com/verificar/")
///     .with_output_dir("/tmp/facturas");
///
/// assert_eq!(config.currency, "EUR");
/// ```
#[derive(Clone, Debug)]
pub struct BillingConfig {
    /// VAT rate as a fraction (0.21 = 21%).
    pub tax_rate: f64,

    /// Base URL the invoice id is appended to for the verification link.
    ///
    /// Plain concatenation: no separator is added beyond what the base URL
    /// already ends with.
    pub base_verification_url: String,

    /// Directory finished PDFs (and transient QR images) are written to.
    pub output_dir: PathBuf,

    /// Three-letter currency code appended to formatted amounts.
    pub currency: String,

    /// strftime-style date format for display and the verification payload.
    pub date_format: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            tax_rate: 0.21,
            base_verification_url: "http://localhost:5000/verificar/".to_string(),
            output_dir: PathBuf::from("instance/facturas"),
            currency: "EUR".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl BillingConfig {
    /// Set the VAT rate (fraction, e.g. 0.21).
    pub fn with_tax_rate(mut self, rate: f64) -> Self {
        self.tax_rate = rate;
        self
    }

    /// Set the base verification URL.
    pub fn with_base_verification_url(mut self, url: impl Into<String>) -> Self {
        self.base_verification_url = url.into();
        self
    }

    /// Set the output directory for rendered documents.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the currency code suffix.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the date format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the tax rate is outside `[0, 1]` or
    /// the base verification URL is empty.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(Error::ConfigError(format!(
                "tax rate must be a fraction in [0, 1], got {}",
                self.tax_rate
            )));
        }
        if self.base_verification_url.is_empty() {
            return Err(Error::ConfigError(
                "base verification URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
