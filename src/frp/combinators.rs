// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-Source Combinators
//!
//! This module provides the operators that read from more than one stream.
//!
//! # Available Combinators
//!
//! - `merge` / [`merge_all`] / [`MergeStreams::merge`] - interleave streams
//!   of one payload type in publish order
//! - `combine_latest` / [`combine_latest3`] .. [`combine_latest5`] - latest
//!   value of every branch, re-emitted on each arrival once all have one
//! - `zip` / [`zip3`] .. [`zip5`] - lock-step tuples, each value used once
//!
//! N-ary forms nest the binary operator and flatten the nested tuple with a
//! `map`, so they share its semantics exactly.
//!
//! # Examples
//!
//! ```rust
//! use cim_event_streams::frp::{Channel, EventStream};
//! use std::sync::{Arc, Mutex};
//!
//! let prices = Channel::new();
//! let volumes = Channel::new();
//! let price = EventStream::new(&prices);
//! let volume = EventStream::new(&volumes);
//! let quotes = price.combine_latest(&volume);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! let _sub = quotes.subscribe(move |q| sink.lock().unwrap().push(*q));
//!
//! prices.publish(&10);
//! volumes.publish(&3);
//! prices.publish(&11);
//! assert_eq!(*seen.lock().unwrap(), vec![(10, 3), (11, 3)]);
//! ```

use parking_lot::Mutex;
use std::sync::Arc;

use super::config::StreamConfig;
use super::state::{CombineLatestState, ZipState};
use super::stream::EventStream;
use super::Payload;

impl<T: Payload> EventStream<T> {
    /// Interleave this stream with `other`
    ///
    /// Same as `merge_all([self, other])`.
    pub fn merge(&self, other: &EventStream<T>) -> EventStream<T> {
        merge_all([self, other])
    }

    /// Pair the latest payload of each side, once both have produced one
    pub fn combine_latest<U: Payload>(&self, other: &EventStream<U>) -> EventStream<(T, U)> {
        self.pairwise(
            other,
            "combine_latest",
            CombineLatestState::default(),
            CombineLatestState::on_left,
            CombineLatestState::on_right,
        )
    }

    /// Pair payloads in lock-step, consuming both on every pair
    pub fn zip<U: Payload>(&self, other: &EventStream<U>) -> EventStream<(T, U)> {
        self.pairwise(
            other,
            "zip",
            ZipState::default(),
            ZipState::on_left,
            ZipState::on_right,
        )
    }

    fn pairwise<U, S>(
        &self,
        other: &EventStream<U>,
        operator: &str,
        state: S,
        on_left: fn(&mut S, T) -> Option<(T, U)>,
        on_right: fn(&mut S, U) -> Option<(T, U)>,
    ) -> EventStream<(T, U)>
    where
        U: Payload,
        S: Send + 'static,
    {
        let output = self.derive(operator);
        let state = Arc::new(Mutex::new(state));

        let left = Arc::clone(&state);
        self.link(&output, move |output, event| {
            let paired = on_left(&mut *left.lock(), event.payload().clone());
            if let Some(pair) = paired {
                output.publish(pair);
            }
        });

        other.link(&output, move |output, event| {
            let paired = on_right(&mut *state.lock(), event.payload().clone());
            if let Some(pair) = paired {
                output.publish(pair);
            }
        });

        output
    }
}

/// Interleave any number of streams, preserving publish order
///
/// Events are forwarded unchanged. An empty collection yields a stream that
/// never publishes.
pub fn merge_all<'a, T, I>(streams: I) -> EventStream<T>
where
    T: Payload,
    I: IntoIterator<Item = &'a EventStream<T>>,
{
    let streams: Vec<&EventStream<T>> = streams.into_iter().collect();
    let output = match streams.first() {
        Some(first) => first.derive("merge"),
        None => EventStream::detached(StreamConfig::new("merge")),
    };

    for stream in streams {
        stream.link(&output, |output, event| output.publish_event(event));
    }

    output
}

/// Collection form of `merge`
pub trait MergeStreams<T> {
    /// Interleave every stream in the collection
    fn merge(&self) -> EventStream<T>;
}

impl<T: Payload> MergeStreams<T> for [EventStream<T>] {
    fn merge(&self) -> EventStream<T> {
        merge_all(self)
    }
}

/// `combine_latest` over three streams
pub fn combine_latest3<A, B, C>(
    a: &EventStream<A>,
    b: &EventStream<B>,
    c: &EventStream<C>,
) -> EventStream<(A, B, C)>
where
    A: Payload,
    B: Payload,
    C: Payload,
{
    a.combine_latest(b)
        .combine_latest(c)
        .map(|((a, b), c)| (a.clone(), b.clone(), c.clone()))
}

/// `combine_latest` over four streams
pub fn combine_latest4<A, B, C, D>(
    a: &EventStream<A>,
    b: &EventStream<B>,
    c: &EventStream<C>,
    d: &EventStream<D>,
) -> EventStream<(A, B, C, D)>
where
    A: Payload,
    B: Payload,
    C: Payload,
    D: Payload,
{
    combine_latest3(a, b, c)
        .combine_latest(d)
        .map(|((a, b, c), d)| (a.clone(), b.clone(), c.clone(), d.clone()))
}

/// `combine_latest` over five streams
pub fn combine_latest5<A, B, C, D, E>(
    a: &EventStream<A>,
    b: &EventStream<B>,
    c: &EventStream<C>,
    d: &EventStream<D>,
    e: &EventStream<E>,
) -> EventStream<(A, B, C, D, E)>
where
    A: Payload,
    B: Payload,
    C: Payload,
    D: Payload,
    E: Payload,
{
    combine_latest4(a, b, c, d)
        .combine_latest(e)
        .map(|((a, b, c, d), e)| (a.clone(), b.clone(), c.clone(), d.clone(), e.clone()))
}

/// `zip` over three streams
pub fn zip3<A, B, C>(
    a: &EventStream<A>,
    b: &EventStream<B>,
    c: &EventStream<C>,
) -> EventStream<(A, B, C)>
where
    A: Payload,
    B: Payload,
    C: Payload,
{
    a.zip(b)
        .zip(c)
        .map(|((a, b), c)| (a.clone(), b.clone(), c.clone()))
}

/// `zip` over four streams
pub fn zip4<A, B, C, D>(
    a: &EventStream<A>,
    b: &EventStream<B>,
    c: &EventStream<C>,
    d: &EventStream<D>,
) -> EventStream<(A, B, C, D)>
where
    A: Payload,
    B: Payload,
    C: Payload,
    D: Payload,
{
    zip3(a, b, c)
        .zip(d)
        .map(|((a, b, c), d)| (a.clone(), b.clone(), c.clone(), d.clone()))
}

/// `zip` over five streams
pub fn zip5<A, B, C, D, E>(
    a: &EventStream<A>,
    b: &EventStream<B>,
    c: &EventStream<C>,
    d: &EventStream<D>,
    e: &EventStream<E>,
) -> EventStream<(A, B, C, D, E)>
where
    A: Payload,
    B: Payload,
    C: Payload,
    D: Payload,
    E: Payload,
{
    zip4(a, b, c, d)
        .zip(e)
        .map(|((a, b, c, d), e)| (a.clone(), b.clone(), c.clone(), d.clone(), e.clone()))
}
