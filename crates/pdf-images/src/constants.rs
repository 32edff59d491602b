//! Shared constants for image-to-PDF export
//!
//! This module centralizes magic numbers used when sizing pages and
//! re-encoding rotated images.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Pixel unit used for page sizes. One pixel is one point, so a page sized
/// in whole pixels has a whole-point MediaBox and no rounding gap.
pub const PIXELS_PER_INCH: f32 = 72.0;

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Points per pixel (1.0)
pub const POINTS_PER_PIXEL: f32 = POINTS_PER_INCH / PIXELS_PER_INCH;

/// Convert pixels to points
#[inline]
pub fn px_to_pt(px: f32) -> f32 {
    px * POINTS_PER_PIXEL
}

/// Convert points to pixels
#[inline]
pub fn pt_to_px(pt: f32) -> f32 {
    pt / POINTS_PER_PIXEL
}

// =============================================================================
// Encoding
// =============================================================================

/// JPEG quality used when a rotated image is re-encoded
pub const JPEG_QUALITY: u8 = 95;

/// Declared media types must start with this to be accepted for import
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Media type reported for files whose extension is not recognized
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

// =============================================================================
// Output
// =============================================================================

/// File name used when the user leaves the name blank
pub const DEFAULT_DOCUMENT_NAME: &str = "document";

/// Extension appended to every exported document
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Title written into the document metadata by default
pub const DEFAULT_DOCUMENT_TITLE: &str = "Images";
