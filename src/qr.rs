//! Scannable-code encoder for verification payloads.
//!
//! Serializes the payload to its canonical JSON text and encodes that text
//! as a QR matrix at default error-correction and density. There is no size
//! negotiation: a payload past the code's capacity is an encoding failure
//! the caller gets back as a document-generation error.

use crate::error::{Error, Result};
use crate::payload::VerificationPayload;
use image::{GrayImage, Luma};
use qrcode::QrCode;
use std::path::Path;

/// Lower bound on rendered code size, in pixels per side.
///
/// Keeps small payloads scannable when the PDF scales the image down.
const MIN_CODE_PX: u32 = 256;

/// Encode a verification payload into a grayscale code image.
///
/// # Errors
///
/// Returns `Error::DocumentError` if the canonical text exceeds the code
/// capacity or cannot be serialized.
pub fn encode_payload(payload: &VerificationPayload) -> Result<GrayImage> {
    let text = payload.canonical_text()?;
    let code = QrCode::new(text.as_bytes())
        .map_err(|e| Error::DocumentError(format!("QR encoding: {}", e)))?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_CODE_PX, MIN_CODE_PX)
        .build();

    debug!(
        "✓ QR encoded {} payload bytes into {}x{} px",
        text.len(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Encode a payload and write the image as a PNG.
///
/// Returns the rendered image so the caller can size the embed from the
/// pixel dimensions. The file itself is a transient artifact the renderer
/// deletes after embedding.
///
/// # Errors
///
/// Returns `Error::DocumentError` on encoding or write failure.
pub fn write_png(payload: &VerificationPayload, path: &Path) -> Result<GrayImage> {
    let image = encode_payload(payload)?;
    image
        .save(path)
        .map_err(|e| Error::DocumentError(format!("QR image write {}: {}", path.display(), e)))?;

    debug!("✓ QR image written to {}", path.display());
    Ok(image)
}
