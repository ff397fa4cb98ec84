// Copyright (c) 2025 - Cowboy AI, Inc.
//! EventStream - A node in the combinator graph
//!
//! An `EventStream<T>` wraps a private [`Channel`] of timestamped events and
//! keeps alive the links to the upstream nodes it was derived from.
//!
//! # Ownership
//!
//! ```text
//!   source ◄══════ derived ◄══════ derived
//!     │  strong ▲     │  strong ▲
//!     └───────┘ weak  └───────┘ weak
//!      (handler)       (handler)
//! ```
//!
//! - A derived node owns its upstream subscriptions and a strong reference
//!   to each upstream node, so chains of temporaries such as
//!   `a.map(f).filter(g)` stay wired for as long as the last node lives.
//! - The forwarding handler registered on the upstream channel only holds a
//!   weak reference to the derived node. Once every handle to the derived
//!   node is gone the handler turns into a no-op, the node's subscriptions
//!   are dropped and cancelled, and the upstream nodes are released in turn.
//! - Subscriptions handed to consumers do not keep a node alive. Cancelling
//!   one after its node is gone does nothing.
//!
//! Cloning an `EventStream` yields another handle to the *same* node; see
//! [`EventStream::ptr_eq`].

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use super::channel::{Channel, Subscription};
use super::clock::Clock;
use super::config::StreamConfig;
use super::event::Event;
use super::Payload;

type Hook = Box<dyn FnOnce() + Send>;

struct StreamNode<T> {
    label: String,
    clock: Arc<dyn Clock>,
    channel: Channel<Event<T>>,
    subscriptions: Mutex<HashSet<Subscription>>,
    sources: Mutex<Vec<Arc<dyn Any + Send + Sync>>>,
    first_subscriber_hook: Mutex<Option<Hook>>,
}

impl<T> Drop for StreamNode<T> {
    fn drop(&mut self) {
        trace!(stream = %self.label, "stream node released");
    }
}

/// A stream of discrete payloads
pub struct EventStream<T> {
    node: Arc<StreamNode<T>>,
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("label", &self.node.label)
            .field("subscribers", &self.node.channel.subscriber_count())
            .field("upstream", &self.node.subscriptions.lock().len())
            .finish()
    }
}

/// Non-owning handle to a stream node
pub(crate) struct WeakStream<T> {
    node: Weak<StreamNode<T>>,
}

impl<T> Clone for WeakStream<T> {
    fn clone(&self) -> Self {
        Self {
            node: Weak::clone(&self.node),
        }
    }
}

impl<T> WeakStream<T> {
    pub(crate) fn upgrade(&self) -> Option<EventStream<T>> {
        self.node.upgrade().map(|node| EventStream { node })
    }
}

impl<T> EventStream<T> {
    /// Whether `a` and `b` are handles to the same node
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.node, &b.node)
    }

    /// Label used in tracing output
    pub fn label(&self) -> &str {
        &self.node.label
    }

    /// Number of handlers currently registered on this node, operators included
    pub fn subscriber_count(&self) -> usize {
        self.node.channel.subscriber_count()
    }

    pub(crate) fn downgrade(&self) -> WeakStream<T> {
        WeakStream {
            node: Arc::downgrade(&self.node),
        }
    }
}

impl<T: Payload> EventStream<T> {
    /// Wrap an external channel using the default configuration
    pub fn new(source: &Channel<T>) -> Self {
        Self::with_config(source, StreamConfig::default())
    }

    /// Wrap an external channel
    ///
    /// Every payload published on `source` is re-published on this stream
    /// with a fresh timestamp from `config.clock`. The subscription to
    /// `source` lives as long as the stream does.
    pub fn with_config(source: &Channel<T>, config: StreamConfig) -> Self {
        let stream = Self::detached(config);
        let this = stream.downgrade();
        let subscription = source.subscribe(move |payload: &T| match this.upgrade() {
            Some(stream) => stream.publish(payload.clone()),
            None => trace!("stream released, dropping payload"),
        });
        stream.retain(subscription);
        stream
    }

    /// A node with no upstream; only operators publish into it
    pub(crate) fn detached(config: StreamConfig) -> Self {
        Self {
            node: Arc::new(StreamNode {
                label: config.label,
                clock: config.clock,
                channel: Channel::new(),
                subscriptions: Mutex::new(HashSet::new()),
                sources: Mutex::new(Vec::new()),
                first_subscriber_hook: Mutex::new(None),
            }),
        }
    }

    /// Register `handler` for every payload published from now on
    ///
    /// The handler runs synchronously, in publish order. The returned
    /// subscription does not keep the stream alive; hold on to the stream for
    /// as long as events should flow.
    #[must_use = "dropping the subscription cancels it"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let subscription = self
            .node
            .channel
            .subscribe(move |event: &Event<T>| handler(event.payload()));

        let hook = self.node.first_subscriber_hook.lock().take();
        if let Some(hook) = hook {
            hook();
        }

        subscription
    }

    /// Register `handler` with access to origin timestamps
    pub(crate) fn subscribe_with_time<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Event<T>) + Send + Sync + 'static,
    {
        self.node.channel.subscribe(handler)
    }

    /// Forward an existing event, keeping its origin time
    pub(crate) fn publish_event(&self, event: &Event<T>) {
        trace!(stream = %self.node.label, "publish");
        self.node.channel.publish(event);
    }

    /// Publish a freshly originated payload, stamped now
    pub(crate) fn publish(&self, payload: T) {
        let event = Event::new(payload, self.node.clock.now());
        self.publish_event(&event);
    }

    /// Keep `subscription` alive for this node's lifetime
    pub(crate) fn retain(&self, subscription: Subscription) {
        self.node.subscriptions.lock().insert(subscription);
    }

    /// Keep `source` alive for this node's lifetime
    pub(crate) fn depend_on<S: Payload>(&self, source: &EventStream<S>) {
        let node: Arc<dyn Any + Send + Sync> = source.node.clone();
        self.node.sources.lock().push(node);
    }

    /// Run `hook` once, when the first consumer subscribes
    pub(crate) fn on_first_subscriber<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.node.first_subscriber_hook.lock() = Some(Box::new(hook));
    }

    /// Empty node for `operator`, inheriting this node's clock
    pub(crate) fn derive<U: Payload>(&self, operator: &str) -> EventStream<U> {
        let label = format!("{}.{}", self.node.label, operator);
        debug!(stream = %label, operator, "derived stream created");
        EventStream::detached(StreamConfig {
            label,
            clock: Arc::clone(&self.node.clock),
        })
    }

    /// Link this node to `output` as one of its sources
    ///
    /// `on_event` runs for every upstream event while `output` is alive.
    pub(crate) fn link<U, F>(&self, output: &EventStream<U>, on_event: F)
    where
        U: Payload,
        F: Fn(&EventStream<U>, &Event<T>) + Send + Sync + 'static,
    {
        let target = output.downgrade();
        let subscription = self.subscribe_with_time(move |event| match target.upgrade() {
            Some(output) => on_event(&output, event),
            None => trace!("downstream released, dropping event"),
        });
        output.depend_on(self);
        output.retain(subscription);
    }

    /// Derive a single-source stream driven by `on_event`
    pub(crate) fn forward<U, F>(&self, operator: &str, on_event: F) -> EventStream<U>
    where
        U: Payload,
        F: Fn(&EventStream<U>, &Event<T>) + Send + Sync + 'static,
    {
        let output = self.derive(operator);
        self.link(&output, on_event);
        output
    }
}
