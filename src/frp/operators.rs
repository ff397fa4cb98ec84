// Copyright (c) 2025 - Cowboy AI, Inc.
//! Single-source operators
//!
//! Every operator allocates exactly one derived [`EventStream`], subscribes
//! to its source(s) while building it, and republishes derived events from
//! inside the source's publish call. Per-operator state lives in one of the
//! machines from [`super::state`], locked only while it is updated; the lock
//! is always released before anything is published downstream.
//!
//! Forwarding operators (`filter`, `debounce`, `flatten`, `switch`) pass the
//! original event along with its origin timestamp. Operators that build a new
//! payload publish it with a fresh timestamp.

use chrono::Duration;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

use super::behavior::Behavior;
use super::channel::Subscription;
use super::event::Event;
use super::state::{
    AccumulateState, BufferState, DebounceState, DifferenceState, SwitchState, WindowSpec,
};
use super::stream::EventStream;
use super::{Payload, Timestamp};

impl<T: Payload> EventStream<T> {
    /// Keep the events that satisfy `predicate`, given payload and origin time
    ///
    /// Forwarded events keep their origin timestamp.
    pub fn filter_timed<F>(&self, predicate: F) -> EventStream<T>
    where
        F: Fn(&T, Timestamp) -> bool + Send + Sync + 'static,
    {
        self.filtered("filter", predicate)
    }

    /// Keep the payloads that satisfy `predicate`
    ///
    /// Forwarded events keep their origin timestamp.
    pub fn filter<F>(&self, predicate: F) -> EventStream<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filtered("filter", move |payload, _| predicate(payload))
    }

    fn filtered<F>(&self, operator: &str, predicate: F) -> EventStream<T>
    where
        F: Fn(&T, Timestamp) -> bool + Send + Sync + 'static,
    {
        self.forward(operator, move |output, event: &Event<T>| {
            if predicate(event.payload(), event.time()) {
                output.publish_event(event);
            }
        })
    }

    /// Transform every payload, given its origin time
    ///
    /// The result is a new event, stamped when it is published.
    pub fn map_timed<U, F>(&self, transform: F) -> EventStream<U>
    where
        U: Payload,
        F: Fn(&T, Timestamp) -> U + Send + Sync + 'static,
    {
        self.forward("map", move |output, event: &Event<T>| {
            output.publish(transform(event.payload(), event.time()));
        })
    }

    /// Transform every payload
    pub fn map<U, F>(&self, transform: F) -> EventStream<U>
    where
        U: Payload,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.map_timed(move |payload, _| transform(payload))
    }

    /// Map each payload to a stream and forward all of them
    ///
    /// Equivalent to `self.map(transform).flatten()`.
    pub fn flat_map<U, F>(&self, transform: F) -> EventStream<U>
    where
        U: Payload,
        F: Fn(&T) -> EventStream<U> + Send + Sync + 'static,
    {
        self.map(transform).flatten()
    }

    /// Map each payload to a stream and forward only the latest one
    ///
    /// Equivalent to `self.map(transform).switch()`.
    pub fn switch_map<U, F>(&self, transform: F) -> EventStream<U>
    where
        U: Payload,
        F: Fn(&T) -> EventStream<U> + Send + Sync + 'static,
    {
        self.map(transform).switch()
    }

    /// Sliding, tumbling or gapped windows of payloads
    ///
    /// Publishes a `window.count()`-element snapshot every `window.stride()`
    /// arrivals once the first window has filled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cim_event_streams::frp::{Channel, EventStream, WindowSpec};
    ///
    /// # fn main() -> cim_event_streams::StreamResult<()> {
    /// let channel = Channel::<u32>::new();
    /// let stream = EventStream::new(&channel);
    /// let pairs = stream.buffer(WindowSpec::new(2, 1)?);
    /// # let _ = pairs;
    /// # Ok(())
    /// # }
    /// ```
    pub fn buffer(&self, window: WindowSpec) -> EventStream<Vec<T>> {
        let state = Mutex::new(BufferState::new(window));
        self.forward("buffer", move |output, event| {
            let full = state.lock().push(event.payload().clone());
            if let Some(window) = full {
                output.publish(window);
            }
        })
    }

    /// Running fold of the payloads
    ///
    /// Publishes `combine(result, payload)` for every arrival. With
    /// `emit_seed`, `seed` is published first: when the first consumer
    /// subscribes, or right before the first folded result if that comes
    /// sooner.
    pub fn accumulate<A, F>(&self, seed: A, emit_seed: bool, combine: F) -> EventStream<A>
    where
        A: Payload,
        F: Fn(&A, &T) -> A + Send + Sync + 'static,
    {
        let state = Arc::new(Mutex::new(AccumulateState::new(seed, emit_seed)));

        let folding = Arc::clone(&state);
        let output = self.forward("accumulate", move |output, event| {
            let (seed, result) = {
                let mut state = folding.lock();
                (state.take_seed(), state.step(event.payload(), &combine))
            };
            if let Some(seed) = seed {
                output.publish(seed);
            }
            output.publish(result);
        });

        if emit_seed {
            let target = output.downgrade();
            output.on_first_subscriber(move || {
                let seed = state.lock().take_seed();
                if let (Some(seed), Some(output)) = (seed, target.upgrade()) {
                    output.publish(seed);
                }
            });
        }

        output
    }

    /// Combine each payload with the one before it
    ///
    /// Publishes `combine(current, previous)`; the first arrival only primes
    /// the operator.
    pub fn difference<U, F>(&self, combine: F) -> EventStream<U>
    where
        U: Payload,
        F: Fn(&T, &T) -> U + Send + Sync + 'static,
    {
        let state = Mutex::new(DifferenceState::default());
        self.forward("difference", move |output, event| {
            let current = event.payload();
            let previous = state.lock().advance(current.clone());
            if let Some(previous) = previous {
                output.publish(combine(current, &previous));
            }
        })
    }

    /// Drop events that follow their predecessor by less than `tolerance`
    ///
    /// Timing is read from origin timestamps, so everything between the
    /// point of origin and this operator must forward events unchanged for
    /// the gaps to be meaningful.
    pub fn debounce(&self, tolerance: Duration) -> EventStream<T> {
        let gate = Mutex::new(DebounceState::new(tolerance));
        self.filtered("debounce", move |_, time| {
            let admitted = gate.lock().admit(time);
            if !admitted {
                trace!("debounce dropped event");
            }
            admitted
        })
    }

    /// Continuous view of the latest payload, `initial` until the first one
    pub fn hold(&self, initial: T) -> Behavior<T> {
        let latest = Arc::new(Mutex::new(initial));
        let sink = Arc::clone(&latest);
        let subscription = self.subscribe(move |payload| *sink.lock() = payload.clone());
        let held = (self.clone(), subscription);

        Behavior::from_fn(move || {
            let (_stream, _subscription) = &held;
            latest.lock().clone()
        })
    }
}

impl<T: Payload> EventStream<EventStream<T>> {
    /// Forward the events of every inner stream that arrives
    ///
    /// Inner streams are never unsubscribed; each keeps forwarding for as
    /// long as the flattened stream exists.
    pub fn flatten(&self) -> EventStream<T> {
        self.forward("flatten", |output, event| {
            let inner = event.payload();
            inner.link(output, |output, event| output.publish_event(event));
        })
    }

    /// Forward the events of the most recent inner stream only
    ///
    /// When a new inner stream arrives the previous inner subscription is
    /// cancelled before the new one is made.
    pub fn switch(&self) -> EventStream<T> {
        let state: Mutex<SwitchState<Subscription, EventStream<T>>> =
            Mutex::new(SwitchState::default());
        self.forward("switch", move |output, event| {
            let previous = state.lock().release();
            if let Some((subscription, _inner)) = previous {
                trace!(subscription = %subscription.id(), "switching away from inner stream");
                subscription.cancel();
            }

            let inner = event.payload().clone();
            let target = output.downgrade();
            let subscription = inner.subscribe_with_time(move |event| {
                if let Some(output) = target.upgrade() {
                    output.publish_event(event);
                }
            });
            state.lock().install(subscription, inner);
        })
    }
}
