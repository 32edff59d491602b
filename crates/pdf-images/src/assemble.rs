//! Page assembly: one zero-margin page per collection entry
//!
//! Entries are processed strictly in collection order. Each page is sized to
//! its own image after rotation, so a document can mix page sizes and
//! orientations freely.

use crate::collection::ImageEntry;
use crate::decode::load_image;
use crate::rotate::render_rotated;
use crate::types::*;
use image::DynamicImage;

/// Destination for assembled pages.
///
/// The first `add_page` call opens the document with that page's size; each
/// later call appends a page of its own size.
pub trait DocumentWriter {
    /// Append one page of exactly `geometry`, filled edge to edge by `image`.
    /// `pixels` is `image` already decoded.
    fn add_page(
        &mut self,
        geometry: PageGeometry,
        image: &EncodedImage,
        pixels: &DynamicImage,
    ) -> Result<()>;

    /// Number of pages added so far
    fn page_count(&self) -> usize;

    /// Serialize the finished document
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// Place every entry onto its own page of `writer`.
///
/// `on_page` is called with `(pages_done, total)` after each page is placed.
/// The first failing entry aborts the whole assembly; the caller should
/// discard the writer in that case.
pub fn assemble_pages<W, F>(
    entries: &[ImageEntry],
    writer: &mut W,
    mut on_page: F,
) -> Result<Vec<PageGeometry>>
where
    W: DocumentWriter,
    F: FnMut(usize, usize),
{
    let total = entries.len();
    let mut geometries = Vec::with_capacity(total);

    for (index, entry) in entries.iter().enumerate() {
        let decoded = load_image(&entry.source().bytes)?;
        let geometry = PageGeometry::for_image(decoded.width(), decoded.height(), entry.rotation());

        let placed = render_rotated(entry.source(), &decoded, entry.rotation())?;
        // A rotated page shows its re-encoded JPEG, not the lossless rotation
        let pixels = match entry.rotation() {
            Rotation::None => decoded,
            _ => load_image(&placed.bytes)?,
        };
        writer.add_page(geometry, &placed, &pixels)?;

        log::debug!(
            "Page {}/{}: {} {}x{} {} (rotation {})",
            index + 1,
            total,
            entry.name(),
            geometry.width,
            geometry.height,
            geometry.orientation.name(),
            entry.rotation().degrees()
        );

        geometries.push(geometry);
        on_page(index + 1, total);
    }

    Ok(geometries)
}
