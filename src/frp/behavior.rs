// Copyright (c) 2025 - Cowboy AI, Inc.
//! Behavior - Sampled Values
//!
//! Where an [`EventStream`](super::EventStream) is a sequence of discrete
//! occurrences, a `Behavior<T>` always has a current value that can be read
//! at any moment with [`Behavior::sample`].
//!
//! ```text
//! Behavior<T> ≅ () → T      (read on demand, never pushed)
//! ```
//!
//! `EventStream::hold` turns occurrences into a behavior whose value is the
//! latest payload seen:
//!
//! ```rust
//! use cim_event_streams::frp::{Channel, EventStream};
//!
//! let readings = Channel::new();
//! let stream = EventStream::new(&readings);
//! let temperature = stream.hold(20);
//!
//! assert_eq!(temperature.sample(), 20);
//! readings.publish(&23);
//! assert_eq!(temperature.sample(), 23);
//! ```

use std::fmt;
use std::sync::Arc;

/// A value that can be read at any time
///
/// Clones share one sampler, and with it whatever the sampler keeps alive.
pub struct Behavior<T> {
    sampler: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Clone for Behavior<T> {
    fn clone(&self) -> Self {
        Self {
            sampler: Arc::clone(&self.sampler),
        }
    }
}

impl<T> fmt::Debug for Behavior<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("value", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> Behavior<T> {
    /// Behavior that always samples to `value`
    pub fn constant(value: T) -> Self {
        Self {
            sampler: Arc::new(move || value.clone()),
        }
    }
}

impl<T: 'static> Behavior<T> {
    /// Behavior backed by an arbitrary sampling function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            sampler: Arc::new(f),
        }
    }

    /// Current value
    pub fn sample(&self) -> T {
        (self.sampler)()
    }

    /// Apply `f` to every sample
    pub fn map<U, F>(&self, f: F) -> Behavior<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let sampler = Arc::clone(&self.sampler);
        Behavior {
            sampler: Arc::new(move || f(sampler())),
        }
    }

    /// Combine two behaviors sample by sample
    pub fn apply2<U, V, F>(&self, other: &Behavior<U>, f: F) -> Behavior<V>
    where
        U: 'static,
        V: 'static,
        F: Fn(T, U) -> V + Send + Sync + 'static,
    {
        let left = Arc::clone(&self.sampler);
        let right = Arc::clone(&other.sampler);
        Behavior {
            sampler: Arc::new(move || f(left(), right())),
        }
    }
}
