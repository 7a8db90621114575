//! Observability hooks for invoicing operations.
//!
//! The service records one event per operation (issue, render, verify,
//! delete) with its duration, plus failures with their error text.
//! Implement [`InvoiceMetrics`] to feed your monitoring system:
//!
//! ```ignore
//! use factura_kit::observability::InvoiceMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl InvoiceMetrics for PrometheusMetrics {
//!     fn record_render(&self, _invoice_id: i64, _duration: Duration) {
//!         // histogram!("invoice_render_seconds").record(duration);
//!     }
//!     // ... implement other methods
//! }
//!
//! // let service = Invoicing::with_metrics(store, config, Box::new(PrometheusMetrics));
//! ```
//!
//! Default behavior (if not overridden) logs via the `log` crate.

use crate::model::InvoiceId;
use std::time::Duration;

/// Trait for invoicing metrics collection.
pub trait InvoiceMetrics: Send + Sync {
    /// Record a successful issue (save + render).
    fn record_issue(&self, number: &str, duration: Duration) {
        debug!("Invoice ISSUE: {} took {:?}", number, duration);
    }

    /// Record a successful document render.
    fn record_render(&self, invoice_id: InvoiceId, duration: Duration) {
        debug!("Invoice RENDER: {} took {:?}", invoice_id, duration);
    }

    /// Record a successful verification.
    fn record_verify(&self, invoice_id: InvoiceId, duration: Duration) {
        debug!("Invoice VERIFY: {} took {:?}", invoice_id, duration);
    }

    /// Record a successful deletion.
    fn record_delete(&self, invoice_id: InvoiceId, duration: Duration) {
        debug!("Invoice DELETE: {} took {:?}", invoice_id, duration);
    }

    /// Record a failed operation.
    fn record_error(&self, operation: &str, error: &str) {
        warn!("Invoice ERROR in {}: {}", operation, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl InvoiceMetrics for NoOpMetrics {
    fn record_issue(&self, _number: &str, _duration: Duration) {}
    fn record_render(&self, _invoice_id: InvoiceId, _duration: Duration) {}
    fn record_verify(&self, _invoice_id: InvoiceId, _duration: Duration) {}
    fn record_delete(&self, _invoice_id: InvoiceId, _duration: Duration) {}
    fn record_error(&self, _operation: &str, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_issue("FAC-20240301-ABC123", Duration::from_secs(1));
        metrics.record_verify(1, Duration::from_secs(2));
        metrics.record_error("render", "boom");
    }

    #[test]
    fn test_custom_metrics_counts() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        #[derive(Clone)]
        struct CountingMetrics {
            verifies: Arc<AtomicUsize>,
        }

        impl InvoiceMetrics for CountingMetrics {
            fn record_verify(&self, _invoice_id: InvoiceId, _duration: Duration) {
                self.verifies.fetch_add(1, Ordering::SeqCst);
            }
        }

        let metrics = CountingMetrics {
            verifies: Arc::new(AtomicUsize::new(0)),
        };
        metrics.record_verify(1, Duration::from_millis(5));
        metrics.record_verify(2, Duration::from_millis(5));
        assert_eq!(metrics.verifies.load(Ordering::SeqCst), 2);
    }
}
