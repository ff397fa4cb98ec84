// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tracing setup
//!
//! Stream nodes log through `tracing`. Applications that do not install
//! their own subscriber can call [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;

use crate::errors::{StreamError, StreamResult};

/// Install a global fmt subscriber filtered by `directives`
///
/// `directives` uses `EnvFilter` syntax, e.g. `"cim_event_streams=trace"`.
/// Fails if the directives do not parse or a global subscriber is already
/// installed.
pub fn init_tracing(directives: &str) -> StreamResult<()> {
    let filter =
        EnvFilter::try_new(directives).map_err(|e| StreamError::Telemetry(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| StreamError::Telemetry(e.to_string()))
}
