// src/hal/tests.rs
//! Unit tests for HAL components

#[cfg(test)]
mod tests {
    use crate::hal::{
        DeviceListener, FirmwareVersion, HubEvent, Pose, Quaternion, Vector3, VibrationType,
    };
    use parking_lot::Mutex;

    #[derive(Default)]
    struct KindRecorder {
        seen: Mutex<Vec<&'static str>>,
    }

    impl DeviceListener for KindRecorder {
        fn on_pose(&self, _timestamp: u64, _pose: Pose) {
            self.seen.lock().push("pose");
        }
        fn on_orientation(&self, _timestamp: u64, _o: Quaternion, _g: Vector3, _a: Vector3) {
            self.seen.lock().push("orientation");
        }
        fn on_rssi(&self, _timestamp: u64, _rssi: i32) {
            self.seen.lock().push("rssi");
        }
    }

    #[test]
    fn test_pose_round_trip_through_u8() {
        for pose in Pose::ALL {
            assert_eq!(Pose::from_u8(pose.as_u8()), Some(pose));
        }
        assert_eq!(Pose::from_u8(42), None);
        assert_eq!(Pose::default(), Pose::Rest);
    }

    #[test]
    fn test_pose_names() {
        assert_eq!(Pose::FingersSpread.to_string(), "fingers_spread");
        assert_eq!(Pose::WaveIn.name(), "wave_in");
    }

    #[test]
    fn test_firmware_display_drops_hardware_revision() {
        assert_eq!(FirmwareVersion([1, 5, 1970, 2]).to_string(), "1.5.1970");
    }

    #[test]
    fn test_default_dispatch_routes_by_kind() {
        let recorder = KindRecorder::default();
        let events = vec![
            HubEvent::Paired { timestamp: 1 },
            HubEvent::Pose { timestamp: 2, pose: Pose::Fist },
            HubEvent::Orientation {
                timestamp: 3,
                orientation: Quaternion::IDENTITY,
                gyroscope: Vector3::default(),
                acceleration: Vector3::default(),
            },
            HubEvent::Rssi { timestamp: 4, rssi: -40 },
        ];
        for event in &events {
            recorder.on_event(event);
        }

        assert_eq!(*recorder.seen.lock(), vec!["pose", "orientation", "rssi"]);
        assert_eq!(events[3].timestamp(), 4);
        assert_eq!(events[0].kind(), "paired");
    }

    #[test]
    fn test_vibration_type_serialization() {
        let json = serde_json::to_string(&VibrationType::Medium).expect("Failed to serialize");
        assert_eq!(json, "\"medium\"");
        let back: VibrationType = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(back, VibrationType::Medium);
    }

    #[test]
    fn test_quaternion_arrays() {
        assert_eq!(Quaternion::IDENTITY.to_array(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(Vector3::new(1.0, 2.0, 3.0).to_array(), [1.0, 2.0, 3.0]);
    }
}
