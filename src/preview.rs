//! Preview state: live feed or frozen still, never both.

use crate::stream::StreamManager;
use crate::types::Frame;

/// What the preview surface should show right now.
#[derive(Debug, Clone)]
pub enum PreviewView {
    /// Latest frame of the live feed
    Live(Frame),
    /// A captured still, shown until [`PreviewRenderer::reset`]
    Still(Frame),
    /// No stream and no still (loading or error state)
    Empty,
}

impl PreviewView {
    pub fn is_live(&self) -> bool {
        matches!(self, PreviewView::Live(_))
    }
}

/// Decides between the live feed and a frozen still.
///
/// Frame delivery itself is driven by the stream's pump thread; this type
/// only selects which of the two sources is visible.
#[derive(Debug, Default)]
pub struct PreviewRenderer {
    frozen: Option<Frame>,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view: the frozen still if one is held, else the latest live
    /// frame, else empty.
    pub fn view(&self, stream: &StreamManager) -> PreviewView {
        if let Some(still) = &self.frozen {
            return PreviewView::Still(still.clone());
        }
        match stream.latest_frame() {
            Some(frame) => PreviewView::Live(frame),
            None => PreviewView::Empty,
        }
    }

    /// Swap the display to a captured still.
    pub fn freeze(&mut self, frame: Frame) {
        self.frozen = Some(frame);
    }

    /// Swap back to the live feed.
    pub fn reset(&mut self) {
        self.frozen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{VideoBackend, VideoStream};
    use crate::types::{CameraError, FrameFormat, StreamSettings, VideoDevice};
    use std::sync::Arc;
    use std::time::Instant;

    struct NeverOpens;

    impl VideoBackend for NeverOpens {
        fn enumerate(&self) -> Result<Vec<VideoDevice>, CameraError> {
            Ok(vec![])
        }

        fn open(
            &self,
            _device_id: Option<&str>,
            _settings: &StreamSettings,
        ) -> Result<Box<dyn VideoStream>, CameraError> {
            Err(CameraError::DeviceUnavailable("none".to_string()))
        }
    }

    fn idle_manager() -> StreamManager {
        StreamManager::new(Arc::new(NeverOpens), StreamSettings::default())
    }

    fn still_frame() -> Frame {
        Frame {
            data: vec![1, 2, 3],
            width: 1,
            height: 1,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_empty_without_stream_or_still() {
        let renderer = PreviewRenderer::new();
        let manager = idle_manager();
        assert!(matches!(renderer.view(&manager), PreviewView::Empty));
    }

    #[test]
    fn test_frozen_still_wins_until_reset() {
        let mut renderer = PreviewRenderer::new();
        let manager = idle_manager();

        renderer.freeze(still_frame());
        assert!(matches!(renderer.view(&manager), PreviewView::Still(_)));
        assert!(!renderer.view(&manager).is_live());

        renderer.reset();
        assert!(matches!(renderer.view(&manager), PreviewView::Empty));
    }

    #[test]
    fn test_reset_without_freeze_is_harmless() {
        let mut renderer = PreviewRenderer::new();
        renderer.reset();
        let manager = idle_manager();
        assert!(matches!(renderer.view(&manager), PreviewView::Empty));
    }
}
