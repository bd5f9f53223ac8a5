//! nokhwa-based production backend.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::{query, Camera};
use std::time::Instant;

use super::{VideoBackend, VideoStream};
use crate::types::{CameraError, Frame, FrameFormat, Resolution, StreamSettings, VideoDevice};

/// Production backend over nokhwa (AVFoundation / V4L2 / MSMF).
///
/// Device ids are stringified nokhwa camera indices; they stay opaque to
/// callers and are only valid against the enumeration they came from.
#[derive(Debug, Default)]
pub struct NokhwaBackend;

impl NokhwaBackend {
    pub fn new() -> Self {
        Self
    }
}

impl VideoBackend for NokhwaBackend {
    fn enumerate(&self) -> Result<Vec<VideoDevice>, CameraError> {
        // nokhwa only reports video capture devices, so no kind filter is
        // needed here.
        let devices =
            query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;

        Ok(devices
            .into_iter()
            .map(|d| VideoDevice {
                id: d.index().as_index().unwrap_or(0).to_string(),
                label: d.human_name(),
            })
            .collect())
    }

    fn open(
        &self,
        device_id: Option<&str>,
        settings: &StreamSettings,
    ) -> Result<Box<dyn VideoStream>, CameraError> {
        let index = match device_id {
            None => CameraIndex::Index(0),
            Some(id) => {
                let parsed: u32 = id
                    .parse()
                    .map_err(|_| CameraError::DeviceUnavailable(id.to_string()))?;
                let known = self.enumerate()?;
                if !known.iter().any(|d| d.id == id) {
                    return Err(CameraError::DeviceUnavailable(id.to_string()));
                }
                CameraIndex::Index(parsed)
            }
        };

        let mut camera = open_camera_with_fallback(&index, settings)?;

        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        Ok(Box::new(NokhwaStream { camera }))
    }
}

struct NokhwaStream {
    camera: Camera,
}

impl VideoStream for NokhwaStream {
    fn resolution(&self) -> Resolution {
        let res = self.camera.resolution();
        Resolution {
            width: res.width(),
            height: res.height(),
        }
    }

    fn next_frame(&mut self) -> Result<Frame, CameraError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        // decode_image handles the camera's native format (MJPEG, YUYV,
        // NV12, ...) and converts to RGB.
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;
        let resolution = buffer.resolution();

        Ok(Frame {
            data: decoded.into_raw(),
            width: resolution.width(),
            height: resolution.height(),
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        })
    }

    fn stop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &StreamSettings,
) -> Result<Camera, CameraError> {
    // Format strategies in order of preference:
    // 1. Closest match with NV12 (native on macOS)
    // 2. Closest match with MJPEG (widely supported)
    // 3. Highest resolution available (let the camera decide the format)
    let requested_resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::NV12,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    let e = last_error.unwrap();
    let msg = e.to_string().to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::DeviceUnavailable(match index {
            CameraIndex::Index(i) => i.to_string(),
            CameraIndex::String(s) => s.clone(),
        }))
    }
}
