// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Window Configuration
//!
//! Window shapes arrive from configuration files, so the serialized form
//! must never smuggle in a zero count or stride.

use cim_event_streams::{StreamError, WindowSpec};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    /// Property: every valid shape survives a JSON round trip
    #[test]
    fn prop_valid_shapes_round_trip(count in 1usize..1_000, stride in 1usize..1_000) {
        let spec = WindowSpec::new(count, stride).expect("non-zero shape");
        let encoded = serde_json::to_value(spec).expect("window serializes");

        prop_assert_eq!(&encoded, &json!({ "count": count, "stride": stride }));

        let decoded: WindowSpec = serde_json::from_value(encoded).expect("window deserializes");
        prop_assert_eq!(decoded, spec);
    }

    /// Property: a zero in either field is rejected on the way in
    #[test]
    fn prop_zero_shapes_rejected(other in 0usize..1_000, zero_count in any::<bool>()) {
        let (count, stride) = if zero_count { (0, other) } else { (other, 0) };

        prop_assert_eq!(
            WindowSpec::new(count, stride),
            Err(StreamError::InvalidWindow { count, stride })
        );

        let decoded = serde_json::from_value::<WindowSpec>(json!({ "count": count, "stride": stride }));
        prop_assert!(decoded.is_err());
    }
}
