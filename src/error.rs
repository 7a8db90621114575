//! Error types for the invoicing toolkit.

use std::fmt;

/// Result type for invoicing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the invoicing toolkit.
///
/// All operations return `Result<T>` where `Result` is defined as `std::result::Result<T, Error>`.
/// Different error variants represent different failure modes:
#[derive(Debug, Clone)]
pub enum Error {
    /// Input data rejected at the boundary.
    ///
    /// This is raised before an invoice aggregate is built:
    /// - Empty customer name, address or tax id
    /// - Tax id shorter than the minimum length policy
    /// - Empty item list, non-positive quantity, negative unit price
    ///
    /// **Recovery:** Fix the request payload and resubmit.
    ValidationError(String),

    /// Document generation failed (rendering, QR encoding, file I/O).
    ///
    /// Common causes:
    /// - Output directory not writable
    /// - Verification payload exceeds QR capacity
    /// - PDF serialization failure
    ///
    /// The message carries the invoice id and the underlying cause so the
    /// caller can report or retry.
    DocumentError(String),

    /// No stored invoice exists for the given id.
    ///
    /// Not a storage failure: the store answered, the record is absent.
    /// Returned by verify/render/delete for unknown or already-deleted ids.
    NotFound(String),

    /// Persistence layer failure (database, etc).
    ///
    /// Common causes:
    /// - Connection lost
    /// - Constraint violation
    /// - Query timeout
    ///
    /// **Recovery:** Retry after connection recovery.
    StorageError(String),

    /// Configuration error during crate initialization.
    ///
    /// Common causes:
    /// - Empty base verification URL
    /// - Tax rate outside [0, 1]
    ///
    /// **Recovery:** Fix configuration and restart.
    ConfigError(String),

    /// Feature not implemented by this store.
    ///
    /// Returned by optional `InvoiceStore` methods a backend chose not to
    /// support.
    NotImplemented(String),

    /// Generic error with custom message.
    ///
    /// Used for errors that don't fit into other variants.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::DocumentError(msg) => write!(f, "Document generation failed: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::DocumentError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ValidationError("Test".to_string());
        assert_eq!(err.to_string(), "Validation error: Test");
    }

    #[test]
    fn test_document_error_display() {
        let err = Error::DocumentError("invoice 7: disk full".to_string());
        assert_eq!(
            err.to_string(),
            "Document generation failed: invoice 7: disk full"
        );
    }

    #[test]
    fn test_error_from_string() {
        let err: Error = "test error".into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::DocumentError(_)));
    }
}
