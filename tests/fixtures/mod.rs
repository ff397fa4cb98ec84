// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared test fixtures for stream tests

#![allow(dead_code)]

use cim_event_streams::frp::{Channel, EventStream, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every payload a stream delivers, in order
pub struct Recorder<T> {
    seen: Arc<Mutex<Vec<T>>>,
    subscription: Subscription,
}

impl<T: Clone + Send + Sync + 'static> Recorder<T> {
    /// Subscribe to `stream` and start recording
    pub fn attach(stream: &EventStream<T>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = stream.subscribe(move |value: &T| sink.lock().push(value.clone()));
        Self { seen, subscription }
    }

    /// Everything recorded so far
    pub fn values(&self) -> Vec<T> {
        self.seen.lock().clone()
    }

    /// Number of recorded payloads
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Forget what was recorded so far
    pub fn clear(&self) {
        self.seen.lock().clear();
    }

    /// The underlying subscription
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

/// A channel together with a root stream wrapping it
pub fn source<T: Clone + Send + Sync + 'static>() -> (Channel<T>, EventStream<T>) {
    let channel = Channel::new();
    let stream = EventStream::new(&channel);
    (channel, stream)
}

/// `n` independent channel/stream pairs
pub fn sources<T: Clone + Send + Sync + 'static>(n: usize) -> (Vec<Channel<T>>, Vec<EventStream<T>>) {
    (0..n).map(|_| source()).unzip()
}
