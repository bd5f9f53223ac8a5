//! Video backend abstraction.
//!
//! The component talks to the platform through [`VideoBackend`], which
//! provides device enumeration and stream opening. The production
//! implementation is [`NokhwaBackend`]; tests substitute scripted fakes.

mod native;

pub use native::NokhwaBackend;

use crate::types::{CameraError, Frame, Resolution, StreamSettings, VideoDevice};

/// An open live video stream.
///
/// Created on and driven from the frame pump thread; `next_frame` blocks
/// until the platform delivers a frame (or fails).
pub trait VideoStream {
    /// Actual resolution the stream settled on.
    fn resolution(&self) -> Resolution;

    /// Read the next frame, decoded to RGB.
    fn next_frame(&mut self) -> Result<Frame, CameraError>;

    /// Stop the underlying platform stream. Called once before the pump
    /// thread exits; hardware is not freed until this runs.
    fn stop(&mut self);
}

/// Platform-agnostic video input backend.
///
/// `open` is invoked on the pump thread, so implementations must be
/// shareable across threads even when the streams they produce are not.
pub trait VideoBackend: Send + Sync {
    /// Enumerate currently connected video input devices, in host order.
    fn enumerate(&self) -> Result<Vec<VideoDevice>, CameraError>;

    /// Open a live stream.
    ///
    /// `device_id: None` opens the platform default device. `Some(id)`
    /// requires an exact match and fails with
    /// [`CameraError::DeviceUnavailable`] when no such device can be opened.
    fn open(
        &self,
        device_id: Option<&str>,
        settings: &StreamSettings,
    ) -> Result<Box<dyn VideoStream>, CameraError>;
}
