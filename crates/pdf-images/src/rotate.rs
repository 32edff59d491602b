//! Physically rotating image pixels for export
//!
//! Rotation is restricted to quarter turns, so every output pixel is an
//! exact copy of one source pixel: the result matches drawing the source
//! centred on a canvas rotated clockwise about its midpoint, with the canvas
//! dimensions swapped for 90 and 270 degrees.

use crate::constants::JPEG_QUALITY;
use crate::types::*;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};
use std::io::Cursor;

/// Rotate the pixels of `image` clockwise by `rotation`
pub fn rotate_pixels(image: &DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => image.clone(),
        Rotation::Clockwise90 => image.rotate90(),
        Rotation::Clockwise180 => image.rotate180(),
        Rotation::Clockwise270 => image.rotate270(),
    }
}

/// Produce the encoded image to place on the page for `rotation`.
///
/// Without rotation the original bytes are returned untouched. Otherwise
/// `decoded` (the decoded form of `source`) is rotated and re-encoded as
/// JPEG at [`JPEG_QUALITY`].
pub fn render_rotated(
    source: &EncodedImage,
    decoded: &DynamicImage,
    rotation: Rotation,
) -> Result<EncodedImage> {
    if rotation == Rotation::None {
        return Ok(source.clone());
    }

    let rotated = rotate_pixels(decoded, rotation);
    let (width, height) = (rotated.width(), rotated.height());
    let bytes = encode_jpeg(&rotated, JPEG_QUALITY)?;

    Ok(EncodedImage::new(bytes, image::ImageFormat::Jpeg, width, height))
}

/// Encode as baseline JPEG. Transparent pixels are composited onto black,
/// since JPEG carries no alpha channel.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = flatten_onto_black(image);
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;

    Ok(buffer.into_inner())
}

fn flatten_onto_black(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    /// 3×2 image: red top-left, green top-right, blue everywhere else
    fn marker_image() -> DynamicImage {
        let mut img = RgbImage::from_pixel(3, 2, BLUE);
        img.put_pixel(0, 0, RED);
        img.put_pixel(2, 0, GREEN);
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_rotate_90_moves_top_left_to_top_right() {
        let rotated = rotate_pixels(&marker_image(), Rotation::Clockwise90).to_rgb8();
        assert_eq!(rotated.dimensions(), (2, 3));
        assert_eq!(*rotated.get_pixel(1, 0), RED);
        assert_eq!(*rotated.get_pixel(1, 2), GREEN);
    }

    #[test]
    fn test_rotate_180_keeps_dimensions() {
        let rotated = rotate_pixels(&marker_image(), Rotation::Clockwise180).to_rgb8();
        assert_eq!(rotated.dimensions(), (3, 2));
        assert_eq!(*rotated.get_pixel(2, 1), RED);
        assert_eq!(*rotated.get_pixel(0, 1), GREEN);
    }

    #[test]
    fn test_rotate_270_moves_top_left_to_bottom_left() {
        let rotated = rotate_pixels(&marker_image(), Rotation::Clockwise270).to_rgb8();
        assert_eq!(rotated.dimensions(), (2, 3));
        assert_eq!(*rotated.get_pixel(0, 2), RED);
        assert_eq!(*rotated.get_pixel(0, 0), GREEN);
    }

    #[test]
    fn test_no_rotation_returns_original_bytes() {
        let source = EncodedImage::new(vec![1u8, 2, 3], image::ImageFormat::Png, 3, 2);
        let rendered = render_rotated(&source, &marker_image(), Rotation::None).unwrap();
        assert_eq!(&*rendered.bytes, &[1, 2, 3]);
        assert_eq!(rendered.format, image::ImageFormat::Png);
    }

    #[test]
    fn test_rotation_reencodes_as_jpeg_with_swapped_size() {
        let source = EncodedImage::new(Vec::<u8>::new(), image::ImageFormat::Png, 3, 2);
        let rendered = render_rotated(&source, &marker_image(), Rotation::Clockwise270).unwrap();
        assert_eq!(rendered.format, image::ImageFormat::Jpeg);
        assert_eq!((rendered.width, rendered.height), (2, 3));
        assert_eq!(&rendered.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_transparent_pixels_become_black() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 0]));
        let flat = flatten_onto_black(&DynamicImage::ImageRgba8(img));
        assert_eq!(*flat.get_pixel(0, 0), Rgb([0, 0, 0]));
    }
}
