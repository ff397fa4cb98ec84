// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event - A payload stamped with its origin time
//!
//! An `Event<T>` is one occurrence flowing through the stream graph:
//!
//! ```text
//! Event<T> ≅ (T, Timestamp)
//! ```
//!
//! The timestamp is assigned once, when a payload is freshly published into
//! a node. Operators that forward an existing occurrence (`filter`, `merge`,
//! `flatten`, `switch`, `debounce`) pass the same `Event` along, so its origin
//! time survives. Operators that synthesise a new payload (`map`, `zip`,
//! `buffer`, ...) publish a new `Event` stamped with the publishing node's
//! clock.
//!
//! Events never leave the crate: subscribers only ever see payloads.

use super::Timestamp;

/// A payload together with the time it entered the graph
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Event<T> {
    payload: T,
    time: Timestamp,
}

impl<T> Event<T> {
    pub(crate) fn new(payload: T, time: Timestamp) -> Self {
        Self { payload, time }
    }

    pub(crate) fn payload(&self) -> &T {
        &self.payload
    }

    pub(crate) fn time(&self) -> Timestamp {
        self.time
    }
}
