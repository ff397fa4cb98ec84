// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for stream construction
//!
//! Operators themselves are total: once a stream graph is built, publishing
//! never fails. Errors only arise while validating the parameters used to
//! build it, or while installing the tracing subscriber.

use thiserror::Error;

/// Errors that can occur while configuring streams
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A buffer window needs a non-zero element count and a non-zero stride
    #[error("Invalid buffer window: count {count}, stride {stride}")]
    InvalidWindow {
        /// Requested number of elements per window
        count: usize,
        /// Requested number of arrivals between window starts
        stride: usize,
    },

    /// Tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

/// Result type for stream configuration
pub type StreamResult<T> = Result<T, StreamError>;
