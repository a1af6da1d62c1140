use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;

use crate::error::PipelineError;

pub const TARGET_WIDTH: u32 = 800;
pub const TARGET_HEIGHT: u32 = 600;
pub const JPEG_QUALITY: u8 = 90;

/// Decodes the input as JPEG, scales it to 800x600 and re-encodes it as
/// JPEG at quality 90. Dimensions are forced; the aspect ratio of the
/// input is intentionally not preserved.
pub fn resize_image(image_data: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let input = image::load_from_memory_with_format(image_data, ImageFormat::Jpeg)
        .map_err(|source| PipelineError::Decode { source })?;

    let resized = input.resize_exact(TARGET_WIDTH, TARGET_HEIGHT, FilterType::Lanczos3);

    let mut resized_data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut resized_data, JPEG_QUALITY);
    resized
        .write_with_encoder(encoder)
        .map_err(|source| PipelineError::Encode { source })?;

    Ok(resized_data)
}
