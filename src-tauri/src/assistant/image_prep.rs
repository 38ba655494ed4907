//! Upload preparation for product photos.
//!
//! Photos are validated and downscaled to max 1024px on the longest edge
//! before being sent to the classification endpoint, keeping upload sizes
//! predictable regardless of the source camera.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use tracing::info;

use crate::error::ShopMateError;

/// Maximum dimension (width or height) for uploaded photos.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// Minimum dimension for useful classification (too small = poor inference).
pub const MIN_IMAGE_DIMENSION: u32 = 200;

/// Prepare a product photo for upload: load, validate, resize, re-encode.
///
/// Returns JPEG bytes ready for the multipart `file` field.
///
/// # Errors
/// - Bytes cannot be decoded as an image
/// - Image smaller than 200px on its shortest side
pub fn prepare_upload(image_bytes: &[u8]) -> Result<Vec<u8>, ShopMateError> {
    let img = image::load_from_memory(image_bytes).map_err(|e| {
        ShopMateError::Image(format!(
            "Failed to load image: {}. Ensure it's a valid JPEG/PNG/WebP.",
            e
        ))
    })?;

    let (width, height) = (img.width(), img.height());
    info!("Loaded product photo: {}x{}", width, height);

    let min_side = width.min(height);
    if min_side < MIN_IMAGE_DIMENSION {
        return Err(ShopMateError::Image(format!(
            "Image too small for reliable classification: {}x{}. Minimum dimension is {}px.",
            width, height, MIN_IMAGE_DIMENSION
        )));
    }

    let resized = resize_if_needed(img, MAX_IMAGE_DIMENSION);
    info!("Resized to: {}x{}", resized.width(), resized.height());

    encode_to_jpeg(&resized)
}

/// Resize image if either dimension exceeds max, maintaining aspect ratio.
fn resize_if_needed(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if width <= max_dimension && height <= max_dimension {
        return img;
    }

    let scale = max_dimension as f32 / width.max(height) as f32;
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Encode DynamicImage to JPEG bytes.
fn encode_to_jpeg(img: &DynamicImage) -> Result<Vec<u8>, ShopMateError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| ShopMateError::Image(format!("Failed to encode image to JPEG: {}", e)))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn rejects_too_small_images() {
        let result = prepare_upload(&png_bytes(50, 50));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too small"));
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let result = prepare_upload(b"not an image");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to load"));
    }

    #[test]
    fn small_images_are_not_resized() {
        let img = DynamicImage::new_rgb8(500, 300);
        let resized = resize_if_needed(img, 1024);
        assert_eq!(resized.width(), 500);
        assert_eq!(resized.height(), 300);
    }

    #[test]
    fn wide_images_are_scaled_down() {
        let img = DynamicImage::new_rgb8(2000, 1000);
        let resized = resize_if_needed(img, 1024);
        assert_eq!(resized.width(), 1024);
        assert_eq!(resized.height(), 512);
    }

    #[test]
    fn tall_images_are_scaled_down() {
        let img = DynamicImage::new_rgb8(1000, 2000);
        let resized = resize_if_needed(img, 1024);
        assert_eq!(resized.width(), 512);
        assert_eq!(resized.height(), 1024);
    }

    #[test]
    fn output_is_jpeg() {
        let result = prepare_upload(&png_bytes(300, 300)).unwrap();
        // JPEG magic bytes
        assert!(result.len() > 2);
        assert_eq!(result[0], 0xFF);
        assert_eq!(result[1], 0xD8);
    }
}
