// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream node configuration

use std::sync::Arc;

use super::clock::{Clock, SystemClock};

/// Configuration for a root stream node
///
/// Derived streams inherit the clock of their source and extend its label
/// with the operator name (`"orders.filter.map"`).
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Name reported in the `stream` field of tracing events
    pub label: String,
    /// Source of origin timestamps
    pub clock: Arc<dyn Clock>,
}

impl StreamConfig {
    /// Create a configuration with the given label and the system clock
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            label: "stream".to_string(),
            clock: Arc::new(SystemClock),
        }
    }
}
