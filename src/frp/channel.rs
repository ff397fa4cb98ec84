// Copyright (c) 2025 - Cowboy AI, Inc.
//! Channel - Synchronous Ordered Publish/Subscribe
//!
//! A `Channel<T>` is the primitive every stream node is built on. It keeps an
//! ordered list of handler registrations and, on `publish`, invokes each of
//! them inline on the caller's thread before returning.
//!
//! # Delivery Rules
//!
//! ```text
//! publish(v) ──► handler₁(v) ──► handler₂(v) ──► … ──► return
//! ```
//!
//! - Handlers run in registration order.
//! - A handler registered while a publish is running first sees the *next*
//!   publish.
//! - A registration cancelled while a publish is running is skipped for the
//!   remainder of that publish. Handlers that already ran are unaffected.
//! - No lock is held while handlers run, so handlers may freely subscribe,
//!   cancel, or publish elsewhere.
//!
//! # Subscriptions
//!
//! `subscribe` returns a [`Subscription`]. Clones of a subscription share one
//! registration: calling `cancel` on any clone, or dropping the last clone,
//! removes the handler. Cancelling is idempotent and is a no-op once the
//! channel itself is gone.

use parking_lot::Mutex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;
use uuid::Uuid;

/// Identity of one handler registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registration<T> {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
    handler: Handler<T>,
}

impl<T> Clone for Registration<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: Arc::clone(&self.active),
            handler: Arc::clone(&self.handler),
        }
    }
}

struct Registry<T> {
    registrations: Mutex<Vec<Registration<T>>>,
}

/// Type-erased removal hook so a `Subscription` need not know `T`
trait Detach: Send + Sync {
    fn detach(&self, id: SubscriptionId);
}

impl<T> Detach for Registry<T> {
    fn detach(&self, id: SubscriptionId) {
        let removed = {
            let mut registrations = self.registrations.lock();
            registrations
                .iter()
                .position(|r| r.id == id)
                .map(|index| registrations.remove(index))
        };
        // the handler (and whatever it captured) is dropped here, outside the lock
        drop(removed);
    }
}

/// Synchronous, ordered, typed publish/subscribe channel
///
/// Cloning a `Channel` yields another handle to the same handler list.
pub struct Channel<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("type", &std::any::type_name::<T>())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Channel<T> {
    /// Create a channel with no subscribers
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                registrations: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Number of live registrations
    pub fn subscriber_count(&self) -> usize {
        self.registry.registrations.lock().len()
    }

    /// Invoke every currently registered handler with `value`, in order
    pub fn publish(&self, value: &T) {
        let snapshot: Vec<Registration<T>> = self.registry.registrations.lock().clone();
        for registration in snapshot {
            if registration.active.load(Ordering::Acquire) {
                (registration.handler)(value);
            }
        }
    }
}

impl<T: 'static> Channel<T> {
    /// Register `handler` to run on every future publish
    #[must_use = "dropping the subscription cancels it"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let active = Arc::new(AtomicBool::new(true));

        self.registry.registrations.lock().push(Registration {
            id,
            active: Arc::clone(&active),
            handler: Arc::new(handler),
        });

        let registry = Arc::downgrade(&self.registry);
        let registry: Weak<dyn Detach> = registry;
        Subscription {
            inner: Arc::new(SubscriptionInner {
                id,
                active,
                registry,
            }),
        }
    }
}

struct SubscriptionInner {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
    registry: Weak<dyn Detach>,
}

impl SubscriptionInner {
    fn cancel(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            trace!(subscription = %self.id, "subscription cancelled");
            if let Some(registry) = self.registry.upgrade() {
                registry.detach(self.id);
            }
        }
    }
}

impl Drop for SubscriptionInner {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Handle to one handler registration on one channel
///
/// Equality and hashing follow the registration identity, so handles can be
/// kept in a `HashSet`.
#[derive(Clone)]
#[must_use = "dropping the subscription cancels it"]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    /// Identity of the underlying registration
    pub fn id(&self) -> SubscriptionId {
        self.inner.id
    }

    /// Whether the handler is still registered
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Remove the handler; further calls do nothing
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Subscription {}

impl Hash for Subscription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.inner.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn recording(channel: &Channel<i32>) -> (Arc<Mutex<Vec<i32>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = channel.subscribe(move |v| sink.lock().push(*v));
        (seen, sub)
    }

    #[test]
    fn test_publish_reaches_subscribers_in_order() {
        let channel = Channel::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = channel.subscribe(move |v: &i32| first.lock().push(("a", *v)));
        let second = Arc::clone(&order);
        let _b = channel.subscribe(move |v: &i32| second.lock().push(("b", *v)));

        channel.publish(&1);
        channel.publish(&2);

        assert_eq!(*order.lock(), vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]);
    }

    #[test]
    fn test_cancel_stops_delivery() {
        let channel = Channel::new();
        let (seen, sub) = recording(&channel);

        channel.publish(&1);
        sub.cancel();
        channel.publish(&2);

        assert_eq!(*seen.lock(), vec![1]);
        assert!(!sub.is_active());
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let channel = Channel::<i32>::new();
        let (_seen, sub) = recording(&channel);

        sub.cancel();
        sub.cancel();
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_of_last_clone_cancels() {
        let channel = Channel::new();
        let (seen, sub) = recording(&channel);
        let clone = sub.clone();

        drop(sub);
        channel.publish(&1);
        assert_eq!(*seen.lock(), vec![1]);

        drop(clone);
        channel.publish(&2);
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn test_cancel_after_channel_dropped_is_noop() {
        let channel = Channel::<i32>::new();
        let (_seen, sub) = recording(&channel);

        drop(channel);
        sub.cancel();
        assert!(!sub.is_active());
    }

    #[test]
    fn test_subscriptions_hash_by_identity() {
        let channel = Channel::<i32>::new();
        let (_a, sub_a) = recording(&channel);
        let (_b, sub_b) = recording(&channel);

        let mut set = HashSet::new();
        set.insert(sub_a.clone());
        set.insert(sub_a.clone());
        set.insert(sub_b.clone());

        assert_eq!(set.len(), 2);
        assert_ne!(sub_a, sub_b);
    }

    #[test]
    fn test_subscription_detaches_from_typed_channel() {
        let channel = Channel::<String>::new();
        let first = channel.subscribe(|_| {});
        let second = channel.subscribe(|_| {});
        assert_eq!(channel.subscriber_count(), 2);

        first.cancel();
        assert_eq!(channel.subscriber_count(), 1);
        drop(second);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_cancel_during_publish_skips_later_handler() {
        let channel = Channel::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let victim_slot = Arc::clone(&slot);
        let _canceller = channel.subscribe(move |_: &i32| {
            if let Some(victim) = victim_slot.lock().as_ref() {
                victim.cancel();
            }
        });
        let (seen, victim) = recording(&channel);
        *slot.lock() = Some(victim.clone());

        channel.publish(&1);

        assert!(seen.lock().is_empty());
        assert!(!victim.is_active());
        assert_eq!(channel.subscriber_count(), 1);
    }

    #[test]
    fn test_subscribe_during_publish_sees_next_publish() {
        let channel: Channel<i32> = Channel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let held = Arc::new(Mutex::new(Vec::new()));

        let inner_channel = channel.clone();
        let sink = Arc::clone(&seen);
        let keep = Arc::clone(&held);
        let _outer = channel.subscribe(move |v| {
            if *v == 1 {
                let sink = Arc::clone(&sink);
                keep.lock().push(inner_channel.subscribe(move |v| sink.lock().push(*v)));
            }
        });

        channel.publish(&1);
        assert!(seen.lock().is_empty());
        channel.publish(&2);
        assert_eq!(*seen.lock(), vec![2]);

        held.lock().clear();
    }
}
