// Copyright (c) 2025 - Cowboy AI, Inc.
//! Functional Reactive Programming (FRP) Event Streams
//!
//! This module provides a push-based, synchronous combinator engine over
//! discrete streams of events. Sources publish payloads; operators derive new
//! streams from existing ones; consumers subscribe to the payloads that reach
//! them.
//!
//! # Core Concepts
//!
//! ## EventStream<T> (Discrete-Time)
//!
//! A node in the combinator graph. Each occurrence carries a payload and the
//! time it entered the graph.
//!
//! ```text
//! Time: ────────────────────────────→
//! Value:      ●       ●   ●       ●
//! ```
//!
//! ## Behavior<T> (Continuous-Time)
//!
//! A value that exists at all points in time. `EventStream::hold` turns a
//! stream into a behavior that can be sampled at any moment.
//!
//! ```text
//! Time: ────────────────────────────→
//! Value:  ≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈
//! ```
//!
//! # Execution Model
//!
//! There is no scheduler. `publish` runs every downstream handler inline, on
//! the caller's thread, before it returns; a `map` inside a `flat_map` inside
//! a `switch_map` all execute within the single call stack of the original
//! publish.
//!
//! # Operators
//!
//! | Kind | Operators |
//! |---|---|
//! | structural | `filter`, `filter_timed`, `map`, `map_timed`, `flatten`, `flat_map` |
//! | dynamic source | `switch`, `switch_map`, `merge` |
//! | pairing | `combine_latest`, `zip` (and 3..5-ary forms) |
//! | windowing / aggregation | `buffer`, `accumulate`, `difference`, `debounce`, `hold` |
//!
//! # Example
//!
//! ```rust
//! use cim_event_streams::frp::{Channel, EventStream};
//! use std::sync::{Arc, Mutex};
//!
//! let clicks = Channel::new();
//! let stream = EventStream::new(&clicks);
//! let doubled = stream.filter(|x: &i32| x % 2 == 1).map(|x| x * 2);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! let _sub = doubled.subscribe(move |x| sink.lock().unwrap().push(*x));
//!
//! for i in 0..5 {
//!     clicks.publish(&i);
//! }
//! assert_eq!(*seen.lock().unwrap(), vec![2, 6]);
//! ```

pub mod behavior;
pub mod channel;
pub mod clock;
pub mod combinators;
pub mod config;
pub(crate) mod event;
mod operators;
pub mod state;
pub mod stream;

pub use behavior::Behavior;
pub use channel::{Channel, Subscription, SubscriptionId};
pub use clock::{Clock, ManualClock, SystemClock};
pub use combinators::*;
pub use config::StreamConfig;
pub use state::WindowSpec;
pub use stream::EventStream;

/// Time at which an event entered the graph
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Values that can travel through a stream
///
/// Payloads are cloned when a node forwards or snapshots them and may be
/// delivered on whichever thread publishes.
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Payload for T {}
