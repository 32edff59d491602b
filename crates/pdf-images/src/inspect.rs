//! Reading page geometry back out of a finished document

use crate::constants::pt_to_px;
use crate::types::*;
use lopdf::{Dictionary, Document, Object};
use std::path::Path;

/// Page sizes of a PDF, in pixel units and page order
pub fn page_geometries(bytes: &[u8]) -> Result<Vec<PageGeometry>> {
    let doc = Document::load_mem(bytes)?;

    doc.get_pages()
        .values()
        .map(|&page_id| -> Result<PageGeometry> {
            let page = doc.get_dictionary(page_id)?;
            let (width_pt, height_pt) = media_box_size(&doc, page)?;
            Ok(PageGeometry::new(
                pt_to_px(width_pt).round() as u32,
                pt_to_px(height_pt).round() as u32,
            ))
        })
        .collect()
}

/// Load a PDF from disk and report its page sizes
pub async fn inspect_pdf(path: impl AsRef<Path>) -> Result<Vec<PageGeometry>> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    tokio::task::spawn_blocking(move || page_geometries(&bytes)).await?
}

/// MediaBox width and height, following `Parent` links for inherited boxes
fn media_box_size(doc: &Document, page: &Dictionary) -> Result<(f32, f32)> {
    let mut current = page;
    loop {
        if let Ok(media_box) = current.get(b"MediaBox") {
            let media_box = match media_box {
                Object::Reference(id) => doc.get_object(*id)?,
                other => other,
            };
            let values = media_box
                .as_array()?
                .iter()
                .map(|v| v.as_float())
                .collect::<std::result::Result<Vec<f32>, _>>()?;
            if let [x0, y0, x1, y1] = values[..] {
                return Ok(((x1 - x0).abs(), (y1 - y0).abs()));
            }
            return Err(ImageError::Pdf(format!("Malformed MediaBox: {values:?}")));
        }

        match current.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => current = doc.get_dictionary(parent_id)?,
            Err(_) => return Err(ImageError::Pdf("Page has no MediaBox".to_string())),
        }
    }
}
