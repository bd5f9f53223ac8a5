//! camsnap: camera selection, live terminal preview, and still capture.
//!
//! The heart of the crate is [`CameraCapture`]: mount it with
//! [`CameraCapture::initialize`], switch devices with
//! [`CameraCapture::select_device`], snapshot the live feed with
//! [`CameraCapture::capture`] (emitting a PNG data URL to registered
//! listeners), and tear down with [`CameraCapture::dispose`]. The `camsnap`
//! binary hosts the component in a terminal preview.

pub mod backend;
pub mod capture;
pub mod cli;
pub mod component;
pub mod config;
pub mod device;
pub mod event_loop;
pub mod events;
pub mod preview;
pub mod render;
pub mod stream;
pub mod term;
pub mod types;

pub use backend::{NokhwaBackend, VideoBackend, VideoStream};
pub use component::{CameraCapture, ComponentState};
pub use events::ImageCaptured;
pub use preview::PreviewView;
pub use stream::{StreamManager, StreamState};
pub use types::{
    ButtonTheme, CameraError, Frame, PreviewOptions, Resolution, StreamSettings, VideoDevice,
};
