use image::{DynamicImage, GenericImageView, imageops::FilterType};

use crate::ExtractError;

/// One sampled pixel, `[r, g, b]`.
pub type Rgb8 = [u8; 3];

/// Longest side, in pixels, that images are reduced to before clustering.
///
/// Trades accuracy for speed: a 4000×3000 photo becomes 256×192, i.e. ~49k
/// samples instead of 12M. Nearest-neighbour filtering is used so every sample
/// is still a color that appears in the original image.
pub const DEFAULT_MAX_DIMENSION: u32 = 256;

/// Decode raw image bytes (JPEG, PNG and every other format enabled in the
/// `image` crate). Multi-frame formats yield their first frame.
pub fn decode_image(input: &[u8]) -> Result<DynamicImage, ExtractError> {
    if input.is_empty() {
        return Err(ExtractError::Decode("input is empty".to_string()));
    }
    let img = image::load_from_memory(input)?;
    tracing::debug!(width = img.width(), height = img.height(), "decoded image");
    Ok(img)
}

/// Flatten an image into RGB samples, dropping alpha.
///
/// When `max_dimension` is set and the longest side exceeds it, the image is
/// first resized (nearest-neighbour, aspect ratio kept) so the longest side
/// equals `max_dimension`.
pub fn sample_image(
    img: &DynamicImage,
    max_dimension: Option<u32>,
) -> Result<Vec<Rgb8>, ExtractError> {
    let (orig_w, orig_h) = img.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(ExtractError::InsufficientData(format!(
            "image has zero-sized dimensions {orig_w}x{orig_h}"
        )));
    }

    let rgb8 = match max_dimension {
        Some(max) if orig_w.max(orig_h) > max => {
            let (w, h) = downscaled_size(orig_w, orig_h, max);
            tracing::debug!(from_w = orig_w, from_h = orig_h, w, h, "downscaling before sampling");
            image::imageops::resize(&img.to_rgb8(), w, h, FilterType::Nearest)
        }
        _ => img.to_rgb8(),
    };

    Ok(rgb8.pixels().map(|p| p.0).collect())
}

/// [`decode_image`] followed by [`sample_image`].
pub fn sample_bytes(input: &[u8], max_dimension: Option<u32>) -> Result<Vec<Rgb8>, ExtractError> {
    let img = decode_image(input)?;
    sample_image(&img, max_dimension)
}

fn downscaled_size(orig_w: u32, orig_h: u32, max: u32) -> (u32, u32) {
    let max_side = orig_w.max(orig_h) as f32;
    let ratio = max.max(1) as f32 / max_side;
    let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
    let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
    (w, h)
}
