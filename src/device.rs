//! Best-effort device enumeration.

use crate::backend::VideoBackend;
use crate::types::VideoDevice;

/// List available video input devices.
///
/// Enumeration is best-effort: a backend failure degrades to an empty list
/// rather than an error, so a selector can always be populated. This is
/// deliberately asymmetric with stream acquisition, which does surface
/// failures. Labels may be empty when the platform withholds them.
pub fn list_devices(backend: &dyn VideoBackend) -> Vec<VideoDevice> {
    match backend.enumerate() {
        Ok(devices) => devices,
        Err(e) => {
            log::warn!("Device enumeration failed, continuing with empty list: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::VideoStream;
    use crate::types::{CameraError, StreamSettings};

    struct FailingBackend;

    impl VideoBackend for FailingBackend {
        fn enumerate(&self) -> Result<Vec<VideoDevice>, CameraError> {
            Err(CameraError::QueryFailed("backend exploded".to_string()))
        }

        fn open(
            &self,
            _device_id: Option<&str>,
            _settings: &StreamSettings,
        ) -> Result<Box<dyn VideoStream>, CameraError> {
            Err(CameraError::DeviceUnavailable("none".to_string()))
        }
    }

    struct ListingBackend(Vec<VideoDevice>);

    impl VideoBackend for ListingBackend {
        fn enumerate(&self) -> Result<Vec<VideoDevice>, CameraError> {
            Ok(self.0.clone())
        }

        fn open(
            &self,
            _device_id: Option<&str>,
            _settings: &StreamSettings,
        ) -> Result<Box<dyn VideoStream>, CameraError> {
            Err(CameraError::DeviceUnavailable("none".to_string()))
        }
    }

    #[test]
    fn test_enumeration_failure_degrades_to_empty_list() {
        let devices = list_devices(&FailingBackend);
        assert!(devices.is_empty());
    }

    #[test]
    fn test_devices_returned_in_backend_order() {
        let backend = ListingBackend(vec![
            VideoDevice {
                id: "1".to_string(),
                label: "External".to_string(),
            },
            VideoDevice {
                id: "0".to_string(),
                label: "Built-in".to_string(),
            },
        ]);
        let devices = list_devices(&backend);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, "1");
        assert_eq!(devices[1].id, "0");
    }
}
