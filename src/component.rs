//! The `CameraCapture` component: lifecycle, selection, and capture.

use std::sync::Arc;

use crate::backend::VideoBackend;
use crate::capture;
use crate::device::list_devices;
use crate::events::{CaptureListeners, ImageCaptured};
use crate::preview::{PreviewRenderer, PreviewView};
use crate::stream::StreamManager;
use crate::types::{PreviewOptions, StreamSettings, VideoDevice};

/// User-visible state of one component instance.
///
/// Mutated only by the component itself in response to lifecycle events and
/// user actions.
#[derive(Debug, Clone, Default)]
pub struct ComponentState {
    /// Id of the device the selector points at
    pub selected_device_id: Option<String>,
    /// True only while the initial acquisition sequence runs
    pub is_loading: bool,
    /// Inline error text; set on acquisition failure, cleared on the next
    /// successful initialize
    pub error_message: Option<String>,
    /// Whether the capture control is usable
    pub capture_enabled: bool,
}

/// Camera selection, live preview, and still capture in one component.
///
/// ```no_run
/// use std::sync::Arc;
/// use camsnap::{CameraCapture, NokhwaBackend, PreviewOptions};
///
/// let mut cam = CameraCapture::new(Arc::new(NokhwaBackend::new()), PreviewOptions::default());
/// cam.on_image_captured(Box::new(|event| {
///     println!("{} bytes of data URL", event.image_data_url.len());
/// }));
/// cam.initialize();
/// if let Some(url) = cam.capture() {
///     println!("captured: {}...", &url[..32]);
/// }
/// cam.dispose();
/// ```
pub struct CameraCapture {
    backend: Arc<dyn VideoBackend>,
    stream: StreamManager,
    preview: PreviewRenderer,
    listeners: CaptureListeners,
    devices: Vec<VideoDevice>,
    state: ComponentState,
    options: PreviewOptions,
}

impl CameraCapture {
    pub fn new(backend: Arc<dyn VideoBackend>, options: PreviewOptions) -> Self {
        Self {
            stream: StreamManager::new(Arc::clone(&backend), StreamSettings::default()),
            backend,
            preview: PreviewRenderer::new(),
            listeners: CaptureListeners::new(),
            devices: Vec::new(),
            state: ComponentState::default(),
            options,
        }
    }

    /// Override the default stream settings before the first acquisition.
    pub fn with_settings(backend: Arc<dyn VideoBackend>, options: PreviewOptions, settings: StreamSettings) -> Self {
        Self {
            stream: StreamManager::new(Arc::clone(&backend), settings),
            backend,
            preview: PreviewRenderer::new(),
            listeners: CaptureListeners::new(),
            devices: Vec::new(),
            state: ComponentState::default(),
            options,
        }
    }

    /// Mount: acquire the default stream, then populate the device list,
    /// then enable capture.
    ///
    /// On failure the error lands in [`ComponentState::error_message`] and
    /// capture stays disabled; the loading flag clears either way. Errors
    /// are surfaced through state rather than returned, so embedders read
    /// one channel.
    pub fn initialize(&mut self) {
        self.state.is_loading = true;
        self.state.error_message = None;

        match self.stream.acquire(None) {
            Ok(()) => {
                self.devices = list_devices(&*self.backend);
                if self.state.selected_device_id.is_none() {
                    self.state.selected_device_id = self.devices.first().map(|d| d.id.clone());
                }
                self.state.capture_enabled = true;
            }
            Err(e) => {
                log::warn!("Initial stream acquisition failed: {}", e);
                self.state.error_message = Some(format!("Error accessing camera: {}", e));
                self.state.capture_enabled = false;
            }
        }

        self.state.is_loading = false;
    }

    /// Switch to another device from the selector.
    ///
    /// The old stream is released before the new one opens. On failure the
    /// error channel is set and the selector state is left untouched.
    pub fn select_device(&mut self, device_id: &str) {
        match self.stream.acquire(Some(device_id)) {
            Ok(()) => {
                self.state.selected_device_id = Some(device_id.to_string());
            }
            Err(e) => {
                log::warn!("Switch to device '{}' failed: {}", device_id, e);
                self.state.error_message = Some(format!("Error accessing camera: {}", e));
            }
        }
    }

    /// Snapshot the current frame, emit `imagecaptured`, and return to the
    /// live view.
    ///
    /// Returns the emitted data URL, or `None` when no usable frame exists
    /// (capture disabled, no stream, or a zero-area frame) — deliberately a
    /// silent no-op, not an error. The stream itself is never paused.
    pub fn capture(&mut self) -> Option<String> {
        if !self.state.capture_enabled || !self.stream.is_active() {
            return None;
        }
        let frame = self.stream.latest_frame()?;

        let url = match capture::encode_data_url(&frame) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("Capture skipped: {}", e);
                return None;
            }
        };

        // Show the still, notify, then immediately swap back to live so the
        // next view after a capture is the feed again.
        self.preview.freeze(frame);
        self.listeners.emit(&ImageCaptured {
            image_data_url: url.clone(),
        });
        self.preview.reset();

        Some(url)
    }

    /// Unmount: release the stream and disable capture. Idempotent.
    pub fn dispose(&mut self) {
        self.stream.release();
        self.preview.reset();
        self.state.capture_enabled = false;
    }

    /// Register an `imagecaptured` listener.
    pub fn on_image_captured(&mut self, listener: Box<dyn FnMut(&ImageCaptured)>) {
        self.listeners.add(listener);
    }

    /// What the preview surface should display right now.
    pub fn view(&self) -> PreviewView {
        self.preview.view(&self.stream)
    }

    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Devices discovered during the last initialize, host order.
    pub fn devices(&self) -> &[VideoDevice] {
        &self.devices
    }

    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    /// Last acquisition error, if the component is in an error state.
    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message.as_deref()
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.dispose();
    }
}
