//! Stream acquisition and release.
//!
//! The [`StreamManager`] owns at most one [`StreamHandle`] at a time. Each
//! handle wraps a background pump thread that opens the backend stream,
//! reports the settled resolution back over a handshake channel, and then
//! continuously publishes the latest frame into a shared buffer until told
//! to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::backend::VideoBackend;
use crate::types::{CameraError, Frame, Resolution, StreamSettings};

/// Lifecycle of the managed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No stream held and none in flight
    Idle,
    /// First acquisition in flight
    Acquiring,
    /// Stream open, frames flowing
    Active,
    /// Device change in flight: old stream released, new one opening
    Switching,
    /// Stream just released, transitions back to Idle
    Released,
}

/// An exclusively-owned open camera feed.
///
/// Owns the pump thread and the shared latest-frame buffer. Releasing stops
/// the pump (which stops the backend stream before exiting) and joins the
/// thread, so camera hardware is freed deterministically.
pub struct StreamHandle {
    frame_buffer: Arc<Mutex<Option<Frame>>>,
    stop_signal: Arc<AtomicBool>,
    pump: Option<JoinHandle<()>>,
    resolution: Resolution,
    generation: u64,
}

impl StreamHandle {
    /// Latest frame published by the pump, if any has arrived yet.
    pub fn latest_frame(&self) -> Option<Frame> {
        let buffer = self.frame_buffer.lock().ok()?;
        buffer.clone()
    }

    /// Resolution the stream settled on.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Stop the pump and wait for it to free the hardware.
    ///
    /// Idempotent: calling again after release is a no-op.
    pub fn release(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.pump.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("resolution", &self.resolution)
            .field("generation", &self.generation)
            .field("running", &self.pump.as_ref().is_some_and(|h| !h.is_finished()))
            .finish()
    }
}

/// Owns the single active stream for one component instance.
///
/// All mutation goes through `&mut self`, so acquisitions serialize
/// naturally; the generation token additionally guards against a
/// late-settling acquisition installing itself over a newer request.
pub struct StreamManager {
    backend: Arc<dyn VideoBackend>,
    settings: StreamSettings,
    handle: Option<StreamHandle>,
    state: StreamState,
    generation: u64,
}

impl StreamManager {
    pub fn new(backend: Arc<dyn VideoBackend>, settings: StreamSettings) -> Self {
        Self {
            backend,
            settings,
            handle: None,
            state: StreamState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == StreamState::Active
    }

    /// Latest frame of the active stream, if one has been published.
    pub fn latest_frame(&self) -> Option<Frame> {
        self.handle.as_ref().and_then(|h| h.latest_frame())
    }

    /// Resolution of the active stream.
    pub fn resolution(&self) -> Option<Resolution> {
        self.handle.as_ref().map(|h| h.resolution())
    }

    /// Open a stream, releasing any previously held one first.
    ///
    /// `device_id: None` requests the platform default device; `Some(id)`
    /// requires an exact match. Blocks until the pump thread reports
    /// success or failure. On failure the manager returns to `Idle` with no
    /// handle held.
    pub fn acquire(&mut self, device_id: Option<&str>) -> Result<(), CameraError> {
        // Release-before-acquire: never hold two hardware locks.
        if self.handle.is_some() {
            self.state = StreamState::Switching;
            self.release_handle();
        }
        self.state = StreamState::Acquiring;

        self.generation += 1;
        let generation = self.generation;

        let frame_buffer: Arc<Mutex<Option<Frame>>> = Arc::new(Mutex::new(None));
        let stop_signal = Arc::new(AtomicBool::new(false));
        let (info_tx, info_rx) = mpsc::channel::<Result<Resolution, CameraError>>();

        let backend = Arc::clone(&self.backend);
        let settings = self.settings.clone();
        let device = device_id.map(str::to_string);
        let buffer = Arc::clone(&frame_buffer);
        let stop = Arc::clone(&stop_signal);

        let pump = thread::spawn(move || {
            run_pump(backend, device, settings, buffer, stop, info_tx);
        });

        // Wait for the pump to report how the open went.
        let settled = match info_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(CameraError::StreamFailed(
                "Frame pump terminated unexpectedly".to_string(),
            )),
        };

        match settled {
            Ok(resolution) => {
                let mut new_handle = StreamHandle {
                    frame_buffer,
                    stop_signal,
                    pump: Some(pump),
                    resolution,
                    generation,
                };
                if generation != self.generation {
                    // A newer request superseded this one while it was in
                    // flight; release the late arrival instead of
                    // installing it.
                    log::warn!("Discarding stale stream acquisition (generation {})", generation);
                    new_handle.release();
                    return Err(CameraError::StreamFailed(
                        "Acquisition superseded by a newer request".to_string(),
                    ));
                }
                log::debug!(
                    "Stream active at {}x{} (generation {})",
                    resolution.width,
                    resolution.height,
                    generation
                );
                self.handle = Some(new_handle);
                self.state = StreamState::Active;
                Ok(())
            }
            Err(e) => {
                stop_signal.store(true, Ordering::SeqCst);
                let _ = pump.join();
                self.state = StreamState::Idle;
                Err(e)
            }
        }
    }

    /// Release the active stream, if any. Idempotent.
    pub fn release(&mut self) {
        if self.handle.is_some() {
            self.state = StreamState::Released;
            self.release_handle();
        }
        self.state = StreamState::Idle;
    }

    fn release_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            log::debug!("Stream released (generation {})", handle.generation);
        }
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        self.release();
    }
}

/// Pump loop: open the stream, handshake, then publish frames until stopped.
fn run_pump(
    backend: Arc<dyn VideoBackend>,
    device_id: Option<String>,
    settings: StreamSettings,
    buffer: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    info_tx: Sender<Result<Resolution, CameraError>>,
) {
    // The stream is opened on this thread because some platform handles are
    // not Send.
    let mut stream = match backend.open(device_id.as_deref(), &settings) {
        Ok(s) => s,
        Err(e) => {
            let _ = info_tx.send(Err(e));
            return;
        }
    };

    let _ = info_tx.send(Ok(stream.resolution()));

    while !stop.load(Ordering::Relaxed) {
        // Failed reads are skipped; the next delivery refreshes the buffer.
        if let Ok(frame) = stream.next_frame() {
            if let Ok(mut buf) = buffer.lock() {
                *buf = Some(frame);
            }
        }

        // Small sleep so the stop signal is observed promptly.
        thread::sleep(Duration::from_millis(1));
    }

    stream.stop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::VideoStream;
    use crate::types::{FrameFormat, VideoDevice};
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    /// Fake stream that counts how many instances are live at once.
    struct CountedStream {
        resolution: Resolution,
        active: Arc<AtomicUsize>,
    }

    impl VideoStream for CountedStream {
        fn resolution(&self) -> Resolution {
            self.resolution
        }

        fn next_frame(&mut self) -> Result<Frame, CameraError> {
            Ok(Frame {
                data: vec![7; (self.resolution.width * self.resolution.height * 3) as usize],
                width: self.resolution.width,
                height: self.resolution.height,
                format: FrameFormat::Rgb,
                timestamp: Instant::now(),
            })
        }

        fn stop(&mut self) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    struct CountingBackend {
        devices: Vec<VideoDevice>,
        active: Arc<AtomicUsize>,
        max_active: Arc<AtomicUsize>,
    }

    impl CountingBackend {
        fn new(devices: Vec<VideoDevice>) -> Self {
            Self {
                devices,
                active: Arc::new(AtomicUsize::new(0)),
                max_active: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl VideoBackend for CountingBackend {
        fn enumerate(&self) -> Result<Vec<VideoDevice>, CameraError> {
            Ok(self.devices.clone())
        }

        fn open(
            &self,
            device_id: Option<&str>,
            settings: &StreamSettings,
        ) -> Result<Box<dyn VideoStream>, CameraError> {
            if let Some(id) = device_id {
                if !self.devices.iter().any(|d| d.id == id) {
                    return Err(CameraError::DeviceUnavailable(id.to_string()));
                }
            }
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            Ok(Box::new(CountedStream {
                resolution: settings.resolution,
                active: Arc::clone(&self.active),
            }))
        }
    }

    fn two_devices() -> Vec<VideoDevice> {
        vec![
            VideoDevice {
                id: "0".to_string(),
                label: "Built-in".to_string(),
            },
            VideoDevice {
                id: "1".to_string(),
                label: "External".to_string(),
            },
        ]
    }

    #[test]
    fn test_acquire_default_becomes_active() {
        let backend = Arc::new(CountingBackend::new(two_devices()));
        let mut manager = StreamManager::new(backend.clone(), StreamSettings::default());

        assert_eq!(manager.state(), StreamState::Idle);
        manager.acquire(None).unwrap();
        assert_eq!(manager.state(), StreamState::Active);
        assert_eq!(manager.resolution(), Some(Resolution::MEDIUM));

        manager.release();
        assert_eq!(manager.state(), StreamState::Idle);
        assert_eq!(backend.active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_acquire_unknown_device_fails_and_stays_idle() {
        let backend = Arc::new(CountingBackend::new(two_devices()));
        let mut manager = StreamManager::new(backend.clone(), StreamSettings::default());

        let result = manager.acquire(Some("9"));
        assert!(matches!(result, Err(CameraError::DeviceUnavailable(_))));
        assert_eq!(manager.state(), StreamState::Idle);
        assert!(manager.latest_frame().is_none());
    }

    #[test]
    fn test_switch_never_overlaps_hardware_locks() {
        let backend = Arc::new(CountingBackend::new(two_devices()));
        let mut manager = StreamManager::new(backend.clone(), StreamSettings::default());

        manager.acquire(None).unwrap();
        manager.acquire(Some("1")).unwrap();
        assert_eq!(manager.state(), StreamState::Active);

        // Release of the old stream must complete before the new open.
        assert_eq!(backend.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(backend.active.load(Ordering::SeqCst), 1);

        manager.release();
        assert_eq!(backend.active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let backend = Arc::new(CountingBackend::new(two_devices()));
        let mut manager = StreamManager::new(backend.clone(), StreamSettings::default());

        manager.release();
        assert_eq!(manager.state(), StreamState::Idle);

        manager.acquire(None).unwrap();
        manager.release();
        manager.release();
        assert_eq!(manager.state(), StreamState::Idle);
        assert_eq!(backend.active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_frames_arrive_after_acquire() {
        let backend = Arc::new(CountingBackend::new(two_devices()));
        let mut manager = StreamManager::new(backend, StreamSettings::default());
        manager.acquire(None).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut frame = manager.latest_frame();
        while frame.is_none() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
            frame = manager.latest_frame();
        }

        let frame = frame.expect("pump should publish a frame");
        assert_eq!(frame.width, 640);
        assert_eq!(frame.height, 480);
    }
}
