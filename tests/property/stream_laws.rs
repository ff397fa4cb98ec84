// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Stream Operators
//!
//! The reference for each operator is the equivalent iterator adapter:
//! `filter`, `map`, `scan`, `windows` and a hand-rolled strided window model
//! for `buffer`.

use crate::fixtures::{source, sources, Recorder};
use cim_event_streams::frp::{MergeStreams, WindowSpec};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Payload sequences small enough to keep arithmetic in range
fn payloads() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000i64..1_000, 0..64)
}

/// A publish schedule over `sources` channels: which channel fires each step
fn schedule(sources: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..sources, 0..64)
}

/// Window shapes covering sliding, tumbling and gapped buffers
fn window() -> impl Strategy<Value = (usize, usize)> {
    (1usize..8, 1usize..8)
}

/// Strided windows: one starting at every multiple of `stride` that fits
fn reference_windows(items: &[i64], count: usize, stride: usize) -> Vec<Vec<i64>> {
    (0..)
        .map(|k| k * stride)
        .take_while(|start| start + count <= items.len())
        .map(|start| items[start..start + count].to_vec())
        .collect()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: filter agrees with `Iterator::filter`
    #[test]
    fn prop_filter_matches_iterator(items in payloads(), modulus in 1i64..5) {
        let (channel, stream) = source::<i64>();
        let kept = stream.filter(move |x| x.rem_euclid(modulus) == 0);
        let recorder = Recorder::attach(&kept);

        for item in &items {
            channel.publish(item);
        }

        let expected: Vec<i64> = items
            .iter()
            .copied()
            .filter(|x| x.rem_euclid(modulus) == 0)
            .collect();
        prop_assert_eq!(recorder.values(), expected);
    }

    /// Property: map composition
    ///
    /// Mapping twice equals mapping once with the composed function.
    #[test]
    fn prop_map_composes(items in payloads()) {
        let (channel, stream) = source::<i64>();
        let twice = stream.map(|x| x + 3).map(|x| x * 2);
        let once = stream.map(|x| (x + 3) * 2);
        let left = Recorder::attach(&twice);
        let right = Recorder::attach(&once);

        for item in &items {
            channel.publish(item);
        }

        prop_assert_eq!(left.values(), right.values());
        prop_assert_eq!(left.len(), items.len());
    }

    /// Property: merge preserves the global publish order
    #[test]
    fn prop_merge_preserves_interleaving(order in schedule(4)) {
        let (channels, streams) = sources::<usize>(4);
        let merged = streams.merge();
        let recorder = Recorder::attach(&merged);

        for (step, &channel) in order.iter().enumerate() {
            channels[channel].publish(&step);
        }

        let expected: Vec<usize> = (0..order.len()).collect();
        prop_assert_eq!(recorder.values(), expected);
    }

    /// Property: buffer emits exactly the strided windows that fit
    #[test]
    fn prop_buffer_matches_reference((count, stride) in window(), items in payloads()) {
        let spec = WindowSpec::new(count, stride).expect("strategy yields non-zero windows");
        let (channel, stream) = source::<i64>();
        let buffered = stream.buffer(spec);
        let recorder = Recorder::attach(&buffered);

        for item in &items {
            channel.publish(item);
        }

        prop_assert_eq!(recorder.values(), reference_windows(&items, count, stride));
    }

    /// Property: accumulate agrees with `Iterator::scan`
    #[test]
    fn prop_accumulate_matches_scan(items in payloads(), seed in -50i64..50) {
        let (channel, stream) = source::<i64>();
        let sums = stream.accumulate(seed, false, |acc, x| acc + x);
        let recorder = Recorder::attach(&sums);

        for item in &items {
            channel.publish(item);
        }

        let expected: Vec<i64> = items
            .iter()
            .scan(seed, |acc, x| {
                *acc += x;
                Some(*acc)
            })
            .collect();
        prop_assert_eq!(recorder.values(), expected);
    }

    /// Property: the seed is emitted once, ahead of every folded result
    #[test]
    fn prop_accumulate_seed_emitted_once(items in payloads(), seed in -50i64..50) {
        let (channel, stream) = source::<i64>();
        let sums = stream.accumulate(seed, true, |acc, x| acc + x);
        let recorder = Recorder::attach(&sums);

        for item in &items {
            channel.publish(item);
        }

        let values = recorder.values();
        prop_assert_eq!(values.len(), items.len() + 1);
        prop_assert_eq!(values[0], seed);
    }

    /// Property: difference agrees with `slice::windows(2)`
    #[test]
    fn prop_difference_matches_windows(items in payloads()) {
        let (channel, stream) = source::<i64>();
        let deltas = stream.difference(|current, previous| current - previous);
        let recorder = Recorder::attach(&deltas);

        for item in &items {
            channel.publish(item);
        }

        let expected: Vec<i64> = items.windows(2).map(|pair| pair[1] - pair[0]).collect();
        prop_assert_eq!(recorder.values(), expected);
    }

    /// Property: zip pairs the n-th value of each side when publishes alternate
    #[test]
    fn prop_zip_pairs_alternating_publishes(items in payloads()) {
        let (left_channel, left) = source::<i64>();
        let (right_channel, right) = source::<i64>();
        let zipped = left.zip(&right);
        let recorder = Recorder::attach(&zipped);

        for item in &items {
            left_channel.publish(item);
            right_channel.publish(&-item);
        }

        let expected: Vec<(i64, i64)> = items.iter().map(|x| (*x, -x)).collect();
        prop_assert_eq!(recorder.values(), expected);
    }
}
