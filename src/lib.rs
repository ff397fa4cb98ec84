// Copyright (c) 2025 - Cowboy AI, Inc.
//! Functional-reactive event streams for the Composable Information Machine
//!
//! This crate provides a synchronous combinator engine over discrete,
//! timestamped events: sources publish, operators derive new streams
//! (filtering, transformation, flattening, merging, pairing, windowing,
//! accumulation, rate-limiting), and consumers subscribe to what reaches them.
//! Delivery order is preserved and the subscription graph never keeps an
//! unreferenced stream alive.
//!
//! See [`frp`] for the model and the operator catalogue.

pub mod errors;
pub mod frp;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{StreamError, StreamResult};
pub use frp::{Channel, EventStream, StreamConfig, Subscription, WindowSpec};
