//! Capture event notification.

/// Payload of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCaptured {
    /// `data:image/png;base64,` encoding of the captured frame
    pub image_data_url: String,
}

/// Registry of `imagecaptured` listeners.
///
/// Listeners fire synchronously, in registration order, once per successful
/// capture. The component never retains the payload after emission.
#[derive(Default)]
pub struct CaptureListeners {
    listeners: Vec<Box<dyn FnMut(&ImageCaptured)>>,
}

impl CaptureListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Box<dyn FnMut(&ImageCaptured)>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: &ImageCaptured) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for CaptureListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
