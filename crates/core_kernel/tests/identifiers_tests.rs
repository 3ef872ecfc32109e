//! Unit tests for the identifiers module
//!
//! Covers host-assigned numeric ids and system-minted UUID ids.

use core_kernel::{EventId, FormId, PageId};
use uuid::Uuid;

mod host_id_tests {
    use super::*;

    #[test]
    fn test_value_round_trips_through_u64() {
        let id = FormId::new(1234);
        assert_eq!(id.value(), 1234);
        assert_eq!(u64::from(id), 1234);
        assert_eq!(FormId::from(1234u64), id);
    }

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(FormId::new(7).to_string(), "7");
        assert_eq!(PageId::new(99).to_string(), "99");
    }

    #[test]
    fn test_from_str_rejects_non_numeric() {
        assert!("abc".parse::<FormId>().is_err());
        assert!("-3".parse::<FormId>().is_err());
        assert!("".parse::<PageId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&FormId::new(5)).unwrap();
        assert_eq!(json, "5");

        let parsed: Vec<FormId> = serde_json::from_str("[3, 1, 2]").unwrap();
        assert_eq!(parsed, vec![FormId::new(3), FormId::new(1), FormId::new(2)]);
    }

    #[test]
    fn test_ordering_follows_numeric_value() {
        let mut ids = vec![FormId::new(10), FormId::new(2), FormId::new(33)];
        ids.sort();
        assert_eq!(ids, vec![FormId::new(2), FormId::new(10), FormId::new(33)]);
    }
}

mod event_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = EventId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = EventId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_prefix_and_display() {
        assert_eq!(EventId::prefix(), "EVT");
        assert!(EventId::new().to_string().starts_with("EVT-"));
    }

    #[test]
    fn test_from_str_with_and_without_prefix() {
        let original = EventId::new();
        let with_prefix: EventId = original.to_string().parse().unwrap();
        let without_prefix: EventId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, with_prefix);
        assert_eq!(original, without_prefix);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("EVT-not-a-uuid".parse::<EventId>().is_err());
    }
}
