// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operator State Machines
//!
//! Each stateful operator keeps its private state in one of the small
//! machines below. They are Mealy machines: every input both updates the
//! state and decides the output.
//!
//! ```text
//! (State, Input) → (State, Option<Output>)
//! ```
//!
//! None of them know about subscriptions or channels, so the windowing,
//! pairing and timing rules can be tested on their own. The operator wiring
//! in `operators.rs` and `combinators.rs` owns one instance per derived
//! stream, behind a mutex that is never held while publishing.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Timestamp;
use crate::errors::{StreamError, StreamResult};

/// Shape of the windows produced by `buffer`
///
/// `count` elements per window, a new window every `stride` arrivals:
///
/// ```text
/// stride < count   overlapping   [0 1 2 3] [2 3 4 5] ...
/// stride = count   contiguous    [0 1 2 3] [4 5 6 7] ...
/// stride > count   gapped        [0 1 2] · [4 5 6] · ...
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowShape")]
pub struct WindowSpec {
    count: usize,
    stride: usize,
}

#[derive(Deserialize)]
struct WindowShape {
    count: usize,
    stride: usize,
}

impl TryFrom<WindowShape> for WindowSpec {
    type Error = StreamError;

    fn try_from(shape: WindowShape) -> StreamResult<Self> {
        Self::new(shape.count, shape.stride)
    }
}

impl WindowSpec {
    /// Validate a window shape; both values must be non-zero
    pub fn new(count: usize, stride: usize) -> StreamResult<Self> {
        if count == 0 || stride == 0 {
            return Err(StreamError::InvalidWindow { count, stride });
        }
        Ok(Self { count, stride })
    }

    /// Contiguous windows of `count` elements
    pub fn tumbling(count: usize) -> StreamResult<Self> {
        Self::new(count, count)
    }

    /// Elements per window
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arrivals between consecutive window starts
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Arrivals discarded between gapped windows
    pub fn skip(&self) -> usize {
        self.stride.saturating_sub(self.count)
    }
}

/// Rolling window for `buffer`
#[derive(Debug, Clone)]
pub struct BufferState<T> {
    window: WindowSpec,
    pending: VecDeque<T>,
    skipping: usize,
}

impl<T: Clone> BufferState<T> {
    /// Empty buffer for `window`
    pub fn new(window: WindowSpec) -> Self {
        Self {
            window,
            pending: VecDeque::with_capacity(window.count()),
            skipping: 0,
        }
    }

    /// Feed one arrival; returns a full window when one completes
    pub fn push(&mut self, item: T) -> Option<Vec<T>> {
        if self.skipping > 0 {
            self.skipping -= 1;
            return None;
        }

        self.pending.push_back(item);
        if self.pending.len() < self.window.count() {
            return None;
        }

        let snapshot: Vec<T> = self.pending.iter().cloned().collect();
        let consumed = self.window.stride().min(self.pending.len());
        self.pending.drain(..consumed);
        self.skipping = self.window.skip();
        Some(snapshot)
    }

    /// Arrivals held for the next window
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Latest value per branch for `combine_latest`
#[derive(Debug, Clone)]
pub struct CombineLatestState<A, B> {
    left: Option<A>,
    right: Option<B>,
}

impl<A, B> Default for CombineLatestState<A, B> {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
        }
    }
}

impl<A: Clone, B: Clone> CombineLatestState<A, B> {
    /// Record a left arrival; emits once both sides have a value
    pub fn on_left(&mut self, value: A) -> Option<(A, B)> {
        self.left = Some(value);
        self.latest()
    }

    /// Record a right arrival; emits once both sides have a value
    pub fn on_right(&mut self, value: B) -> Option<(A, B)> {
        self.right = Some(value);
        self.latest()
    }

    fn latest(&self) -> Option<(A, B)> {
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => Some((left.clone(), right.clone())),
            _ => None,
        }
    }
}

/// One unconsumed value per branch for `zip`
///
/// A second arrival on a branch before its partner arrives replaces the
/// first; values are paired, never queued.
#[derive(Debug, Clone)]
pub struct ZipState<A, B> {
    left: Option<A>,
    right: Option<B>,
}

impl<A, B> Default for ZipState<A, B> {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
        }
    }
}

impl<A, B> ZipState<A, B> {
    /// Fill the left slot; emits and clears both slots when paired
    pub fn on_left(&mut self, value: A) -> Option<(A, B)> {
        self.left = Some(value);
        self.pair()
    }

    /// Fill the right slot; emits and clears both slots when paired
    pub fn on_right(&mut self, value: B) -> Option<(A, B)> {
        self.right = Some(value);
        self.pair()
    }

    fn pair(&mut self) -> Option<(A, B)> {
        if self.left.is_some() && self.right.is_some() {
            self.left.take().zip(self.right.take())
        } else {
            None
        }
    }
}

/// Running result for `accumulate`
#[derive(Debug, Clone)]
pub struct AccumulateState<A> {
    result: A,
    seed_pending: bool,
}

impl<A: Clone> AccumulateState<A> {
    /// Start from `seed`; `emit_seed` marks the seed as owed to the output
    pub fn new(seed: A, emit_seed: bool) -> Self {
        Self {
            result: seed,
            seed_pending: emit_seed,
        }
    }

    /// The seed, the first time it is asked for before any arrival
    pub fn take_seed(&mut self) -> Option<A> {
        if std::mem::take(&mut self.seed_pending) {
            Some(self.result.clone())
        } else {
            None
        }
    }

    /// Fold one arrival into the result and return the new result
    pub fn step<T, F>(&mut self, payload: &T, combine: F) -> A
    where
        F: FnOnce(&A, &T) -> A,
    {
        self.result = combine(&self.result, payload);
        self.result.clone()
    }

    /// Current result
    pub fn result(&self) -> &A {
        &self.result
    }
}

/// Previous arrival for `difference`
#[derive(Debug, Clone)]
pub struct DifferenceState<T> {
    previous: Option<T>,
}

impl<T> Default for DifferenceState<T> {
    fn default() -> Self {
        Self { previous: None }
    }
}

impl<T> DifferenceState<T> {
    /// Store `current` and hand back the value it replaces
    pub fn advance(&mut self, current: T) -> Option<T> {
        self.previous.replace(current)
    }
}

/// Time gate for `debounce`
#[derive(Debug, Clone)]
pub struct DebounceState {
    tolerance: Duration,
    last_seen: Timestamp,
}

impl DebounceState {
    /// Gate that admits an event at least `tolerance` after the previous one
    pub fn new(tolerance: Duration) -> Self {
        Self {
            tolerance,
            last_seen: Timestamp::MIN_UTC,
        }
    }

    /// Whether an event originated at `time` passes
    ///
    /// Every event, admitted or not, becomes the reference for the next one.
    pub fn admit(&mut self, time: Timestamp) -> bool {
        let delta = time.signed_duration_since(self.last_seen);
        self.last_seen = time;
        delta >= self.tolerance
    }
}

/// Current inner subscription for `switch`
///
/// `A` is whatever must stay alive alongside the subscription, typically the
/// inner stream itself.
#[derive(Debug)]
pub struct SwitchState<S, A> {
    current: Option<(S, A)>,
}

impl<S, A> Default for SwitchState<S, A> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<S, A> SwitchState<S, A> {
    /// Detach the live inner source, if any
    pub fn release(&mut self) -> Option<(S, A)> {
        self.current.take()
    }

    /// Make `subscription` the live inner source
    pub fn install(&mut self, subscription: S, anchor: A) {
        self.current = Some((subscription, anchor));
    }

    /// Whether an inner source is live
    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }
}
