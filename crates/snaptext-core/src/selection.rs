use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};
use snaptext_types::{ImageCandidate, PreviewInfo};

use crate::error::{CameraError, SelectionError};
use crate::events::Ticket;

pub const CAMERA_CAPTURE_NAME: &str = "camera-capture.jpg";
pub const CAMERA_CAPTURE_TYPE: &str = "image/jpeg";

/// The image currently held by the session
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub image: Arc<ImageCandidate>,
    /// Ticket of the preview render started for this selection
    pub ticket: Ticket,
}

/// True when the declared type is `image/<something>`, parameters ignored
pub fn is_image_media_type(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((top, sub)) => top.eq_ignore_ascii_case("image") && !sub.trim().is_empty(),
        None => false,
    }
}

pub fn validate(candidate: &ImageCandidate, max_bytes: u64) -> Result<(), SelectionError> {
    if !is_image_media_type(&candidate.media_type) {
        return Err(SelectionError::UnsupportedType {
            media_type: candidate.media_type.clone(),
        });
    }

    let size = candidate.size();
    if size > max_bytes {
        return Err(SelectionError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Read just enough of the payload to describe it in the preview pane
pub fn inspect_preview(candidate: &ImageCandidate) -> PreviewInfo {
    let dimensions = ImageReader::new(Cursor::new(candidate.bytes.as_slice()))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());

    PreviewInfo {
        name: candidate.name.clone(),
        media_type: candidate.media_type.clone(),
        size: candidate.size(),
        dimensions,
    }
}

/// Encode a frozen camera frame as the JPEG payload fed back into selection
pub fn encode_still(still: &RgbaImage, quality: u8) -> Result<ImageCandidate, CameraError> {
    let rgb = DynamicImage::ImageRgba8(still.clone()).to_rgb8();
    let mut buffer = Vec::new();

    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CameraError::Encode(e.to_string()))?;

    Ok(ImageCandidate::new(
        CAMERA_CAPTURE_NAME,
        CAMERA_CAPTURE_TYPE,
        buffer,
    ))
}
