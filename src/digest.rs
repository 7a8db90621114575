//! Verification digest for tamper evidence.
//!
//! The digest is a truncated one-way SHA-256 fingerprint over canonical
//! invoice fields. It is NOT a MAC: anyone who knows the formula can
//! recompute it. Its value is that the server recomputes it from stored
//! state and compares against what the scannable code embeds; any edit to
//! number, tax id or date changes it.

use sha2::{Digest, Sha256};

/// Field delimiter in the digest preimage.
const DELIMITER: char = '|';

/// Number of hex characters kept from the full SHA-256 digest.
const DIGEST_LEN: usize = 16;

/// Compute the verification digest over the canonical invoice fields.
///
/// Concatenates `number|tax_id|date` and returns the first 16 hex characters
/// of the SHA-256 digest. Deterministic (no randomness, no salt) and
/// infallible for any string inputs.
///
/// # Example
///
/// ```
/// use factura_kit::digest::verification_digest;
///
/// let a = verification_digest("FAC-20240301-ABC123", "B12345678", "2024-03-01");
/// let b = verification_digest("FAC-20240301-ABC123", "B12345678", "2024-03-01");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 16);
/// ```
pub fn verification_digest(number: &str, tax_id: &str, date: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(number.as_bytes());
    hasher.update([DELIMITER as u8]);
    hasher.update(tax_id.as_bytes());
    hasher.update([DELIMITER as u8]);
    hasher.update(date.as_bytes());

    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(DIGEST_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let a = verification_digest("FAC-20240301-ABC123", "B12345678", "2024-03-01");
        let b = verification_digest("FAC-20240301-ABC123", "B12345678", "2024-03-01");
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_is_lowercase_hex_prefix() {
        let digest = verification_digest("n", "t", "d");
        assert_eq!(digest.len(), DIGEST_LEN);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn test_digest_changes_with_each_input() {
        let base = verification_digest("FAC-20240301-ABC123", "B12345678", "2024-03-01");
        assert_ne!(
            base,
            verification_digest("FAC-20240301-ABC124", "B12345678", "2024-03-01")
        );
        assert_ne!(
            base,
            verification_digest("FAC-20240301-ABC123", "B12345679", "2024-03-01")
        );
        assert_ne!(
            base,
            verification_digest("FAC-20240301-ABC123", "B12345678", "2024-03-02")
        );
    }

    #[test]
    fn test_digest_delimiter_prevents_field_bleed() {
        // "ab" + "c" must not collide with "a" + "bc"
        assert_ne!(
            verification_digest("ab", "c", "d"),
            verification_digest("a", "bc", "d")
        );
    }

    #[test]
    fn test_digest_empty_inputs() {
        let digest = verification_digest("", "", "");
        assert_eq!(digest.len(), DIGEST_LEN);
    }
}
