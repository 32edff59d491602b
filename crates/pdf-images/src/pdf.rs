use crate::assemble::DocumentWriter;
use crate::constants::{PIXELS_PER_INCH, px_to_pt};
use crate::types::{EncodedImage, PageGeometry, Result};
use image::DynamicImage;
use printpdf::{
    Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, RawImage, RawImageData, RawImageFormat, Rect,
    XObjectTransform,
};
use std::path::Path;

/// [`DocumentWriter`] backed by `printpdf`
pub struct PrintPdfWriter {
    doc: PdfDocument,
}

impl PrintPdfWriter {
    pub fn new(title: &str) -> Self {
        Self {
            doc: PdfDocument::new(title),
        }
    }
}

impl DocumentWriter for PrintPdfWriter {
    fn add_page(
        &mut self,
        geometry: PageGeometry,
        _image: &EncodedImage,
        pixels: &DynamicImage,
    ) -> Result<()> {
        let image_id = self.doc.add_image(&raw_image(pixels));

        let page_width_pt = px_to_pt(geometry.width as f32);
        let page_height_pt = px_to_pt(geometry.height as f32);

        // At PIXELS_PER_INCH one image pixel covers one page pixel; the scale
        // only matters if the image and page sizes ever disagree.
        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(geometry.width as f32 / pixels.width() as f32),
                scale_y: Some(geometry.height as f32 / pixels.height() as f32),
                dpi: Some(PIXELS_PER_INCH),
                ..Default::default()
            },
        }];

        self.doc.pages.push(PdfPage {
            media_box: page_rect(page_width_pt, page_height_pt),
            trim_box: page_rect(page_width_pt, page_height_pt),
            crop_box: page_rect(page_width_pt, page_height_pt),
            ops,
        });

        Ok(())
    }

    fn page_count(&self) -> usize {
        self.doc.pages.len()
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut warnings = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("PDF writer reported {} warnings", warnings.len());
        }
        Ok(bytes)
    }
}

fn page_rect(width_pt: f32, height_pt: f32) -> Rect {
    Rect {
        x: Pt(0.0),
        y: Pt(0.0),
        width: Pt(width_pt),
        height: Pt(height_pt),
    }
}

fn raw_image(image: &DynamicImage) -> RawImage {
    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        RawImage {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
            data_format: RawImageFormat::RGBA8,
            pixels: RawImageData::U8(rgba.into_raw()),
            tag: Vec::new(),
        }
    } else {
        let rgb = image.to_rgb8();
        RawImage {
            width: rgb.width() as usize,
            height: rgb.height() as usize,
            data_format: RawImageFormat::RGB8,
            pixels: RawImageData::U8(rgb.into_raw()),
            tag: Vec::new(),
        }
    }
}

/// Write the finished document to disk
pub async fn save_document(bytes: Vec<u8>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    fn floats(objects: &[Object]) -> Vec<f32> {
        objects.iter().map(|o| o.as_float().unwrap()).collect()
    }

    /// (MediaBox, `cm` matrix) of every page
    fn page_boxes_and_matrices(bytes: &[u8]) -> Vec<(Vec<f32>, Vec<f32>)> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let page = doc.get_dictionary(page_id).unwrap();
                let media_box = floats(page.get(b"MediaBox").unwrap().as_array().unwrap());

                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                let cm = content
                    .operations
                    .iter()
                    .find(|op| op.operator == "cm")
                    .map(|op| floats(&op.operands))
                    .unwrap();
                (media_box, cm)
            })
            .collect()
    }

    #[test]
    fn test_image_exactly_covers_page() {
        let sizes = [(100, 50), (7, 7), (33, 65), (1, 1)];
        let mut writer = PrintPdfWriter::new("test");

        for (width, height) in sizes {
            let pixels = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 2, 3])));
            let encoded = EncodedImage::new(Vec::<u8>::new(), image::ImageFormat::Png, width, height);
            writer
                .add_page(PageGeometry::new(width, height), &encoded, &pixels)
                .unwrap();
        }
        assert_eq!(writer.page_count(), sizes.len());

        let pages = page_boxes_and_matrices(&writer.finish().unwrap());
        assert_eq!(pages.len(), sizes.len());

        for ((media_box, cm), (width, height)) in pages.iter().zip(sizes) {
            let (width, height) = (px_to_pt(width as f32), px_to_pt(height as f32));
            assert_eq!(media_box, &vec![0.0, 0.0, width, height]);
            // Drawn at the origin, scaled to exactly the MediaBox
            assert_eq!(cm, &vec![width, 0.0, 0.0, height, 0.0, 0.0]);
        }
    }
}
