//! Core types and data structures.

use std::fmt;
use std::time::Instant;

/// A selectable video input device, as reported by the backend.
///
/// `id` is an opaque identifier valid for one enumeration; `label` is the
/// human-readable name and may be empty when the platform withholds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDevice {
    pub id: String,
    pub label: String,
}

impl VideoDevice {
    /// Display name, substituting a placeholder for unlabeled devices.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            "Unnamed Camera"
        } else {
            &self.label
        }
    }
}

impl fmt::Display for VideoDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.display_label())
    }
}

/// Stream resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Low resolution (320x240)
    pub const LOW: Resolution = Resolution {
        width: 320,
        height: 240,
    };

    /// Medium resolution (640x480) - balanced, recommended
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// High resolution (1280x720)
    pub const HIGH: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::MEDIUM
    }
}

/// Pixel format of a live frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// RGB format (3 bytes per pixel)
    Rgb,
}

/// One frame of the live feed.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: FrameFormat,
    /// Timestamp when the frame was published
    pub timestamp: Instant,
}

impl Frame {
    /// Number of bytes per pixel (3 for RGB).
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            FrameFormat::Rgb => 3,
        }
    }

    /// Whether this frame has non-zero reported dimensions.
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Settings requested when opening a stream.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Requested resolution (actual may vary)
    pub resolution: Resolution,
    /// Target FPS (actual may vary)
    pub fps: u32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            fps: 30,
        }
    }
}

/// Visual presentation options carried by the component.
///
/// `width`/`height` size the preview area (terminal cells in the bundled
/// front end); the button theme is plain data for embedders that draw their
/// own controls. None of these affect behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Preview area width
    pub width: u16,
    /// Preview area height
    pub height: u16,
    /// Capture control theme
    pub button: ButtonTheme,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 64,
            height: 18,
            button: ButtonTheme::default(),
        }
    }
}

/// Theme for the capture control, exposed to embedders as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonTheme {
    pub background: String,
    pub color: String,
    pub padding: String,
    pub border: String,
    pub border_radius: String,
    pub font_size: String,
}

impl Default for ButtonTheme {
    fn default() -> Self {
        Self {
            background: "#008CBA".to_string(),
            color: "white".to_string(),
            padding: "10px 20px".to_string(),
            border: "none".to_string(),
            border_radius: "5px".to_string(),
            font_size: "16px".to_string(),
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug)]
pub enum CameraError {
    /// Failed to query the device inventory
    QueryFailed(String),
    /// Camera access denied by the platform
    PermissionDenied,
    /// No device matching the requested id could be opened
    DeviceUnavailable(String),
    /// Failed to start or read the video stream
    StreamFailed(String),
    /// Capture attempted without a usable live frame
    NoActiveFrame,
    /// Failed to encode the captured frame
    EncodeFailed(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::QueryFailed(msg) => write!(f, "Failed to query cameras: {}", msg),
            CameraError::PermissionDenied => {
                write!(
                    f,
                    "Camera access denied. On macOS, grant access in System Settings > Privacy & Security > Camera"
                )
            }
            CameraError::DeviceUnavailable(id) => {
                write!(
                    f,
                    "Camera '{}' is unavailable (disconnected, busy, or not found). Run 'list-devices' to see available cameras",
                    id
                )
            }
            CameraError::StreamFailed(msg) => write!(f, "Failed to start camera stream: {}", msg),
            CameraError::NoActiveFrame => write!(f, "No active video frame to capture"),
            CameraError::EncodeFailed(msg) => write!(f, "Failed to encode captured image: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
