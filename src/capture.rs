//! Still-frame capture: RGB frame to a PNG data URL.

use image::codecs::png::PngEncoder;
use image::RgbImage;

use crate::types::{CameraError, Frame};

/// Encode a live frame as a `data:image/png;base64,` URL.
///
/// The raster is sized to the frame's reported dimensions and PNG is
/// lossless, so the payload decodes back to the exact captured frame.
/// Fails with [`CameraError::NoActiveFrame`] when the frame has no area,
/// which is how a capture against a dead preview shows up.
pub fn encode_data_url(frame: &Frame) -> Result<String, CameraError> {
    if !frame.has_area() {
        return Err(CameraError::NoActiveFrame);
    }

    let expected = frame.width as usize * frame.height as usize * frame.bytes_per_pixel();
    if frame.data.len() != expected {
        return Err(CameraError::EncodeFailed(format!(
            "frame buffer is {} bytes, expected {}",
            frame.data.len(),
            expected
        )));
    }

    let img = RgbImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or_else(
        || CameraError::EncodeFailed("frame buffer did not fit its dimensions".to_string()),
    )?;

    let mut png: Vec<u8> = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut png))
        .map_err(|e| CameraError::EncodeFailed(e.to_string()))?;

    let b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &png);
    Ok(format!("data:image/png;base64,{}", b64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameFormat;
    use image::GenericImageView;
    use std::time::Instant;

    fn frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for i in 0..(width * height) {
            data.extend_from_slice(&[(i % 256) as u8, 0x42, 0x99]);
        }
        Frame {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    fn decode(url: &str) -> image::DynamicImage {
        let b64 = url
            .strip_prefix("data:image/png;base64,")
            .expect("payload should be a PNG data URL");
        let bytes =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, b64).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_encode_round_trips_dimensions_and_pixels() {
        let url = encode_data_url(&frame(4, 3)).unwrap();
        let img = decode(&url);
        assert_eq!(img.dimensions(), (4, 3));
        // PNG is lossless: spot-check a pixel
        let px = img.to_rgb8().get_pixel(1, 0).0;
        assert_eq!(px, [1, 0x42, 0x99]);
    }

    #[test]
    fn test_zero_area_frame_is_no_active_frame() {
        let result = encode_data_url(&frame(0, 480));
        assert!(matches!(result, Err(CameraError::NoActiveFrame)));
    }

    #[test]
    fn test_truncated_buffer_is_encode_failure() {
        let mut f = frame(2, 2);
        f.data.truncate(5);
        let result = encode_data_url(&f);
        assert!(matches!(result, Err(CameraError::EncodeFailed(_))));
    }
}
