#![cfg(feature = "async")]
//! Integration tests for AsyncLazyIterator.
//!
//! Tests cover:
//! - Deferred execution of asynchronous sources
//! - Restartability of from_async
//! - Serialized pulls and ordering
//! - Early stop without further pulls
//! - One-shot streams
//! - Lifting synchronous pipelines

use lazyseq::sequence::{LazyIterator, SequenceError, range};
use lazyseq::stream::{from_async, from_stream};
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts pulls and tracks how many are in flight at once.
#[derive(Default)]
struct PullProbe {
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// A stream of `0..limit` whose every pull suspends once before resolving.
fn suspending_numbers(
    probe: Arc<PullProbe>,
    limit: usize,
) -> impl futures::Stream<Item = usize> {
    futures::stream::unfold(0, move |next| {
        let probe = Arc::clone(&probe);
        async move {
            if next == limit {
                return None;
            }
            probe.started.fetch_add(1, Ordering::SeqCst);
            let now = probe.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            probe.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            probe.in_flight.fetch_sub(1, Ordering::SeqCst);
            Some((next, next + 1))
        }
    })
}

// =============================================================================
// Deferred Execution
// =============================================================================

#[rstest]
#[tokio::test]
async fn factory_is_not_called_until_a_terminal_runs() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let pipeline = from_async(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        futures::stream::iter(vec![1, 2, 3])
    })
    .map(|value, _| value * 2);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.to_vec().await, vec![2, 4, 6]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Restartability
// =============================================================================

#[rstest]
#[tokio::test]
async fn from_async_restarts_for_every_terminal() {
    let probe = Arc::new(PullProbe::default());
    let shared = Arc::clone(&probe);
    let pipeline = from_async(move || suspending_numbers(Arc::clone(&shared), 5));

    assert_eq!(pipeline.to_vec().await, vec![0, 1, 2, 3, 4]);
    assert_eq!(pipeline.count().await, 5);
    assert_eq!(pipeline.last().await, Some(4));
    assert_eq!(pipeline.fold(0, |sum, value| sum + value).await, 10);
}

// =============================================================================
// Serialization and Ordering
// =============================================================================

#[rstest]
#[tokio::test]
async fn pulls_are_serialized_and_ordered() {
    let probe = Arc::new(PullProbe::default());
    let shared = Arc::clone(&probe);
    let pipeline = from_async(move || suspending_numbers(Arc::clone(&shared), 20))
        .filter(|value| value % 3 != 0)
        .map(|value, index| (index, value));

    let collected = pipeline.to_vec().await;

    assert_eq!(collected.first(), Some(&(0, 1)));
    assert!(collected.windows(2).all(|pair| pair[0].1 < pair[1].1));
    assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(probe.started.load(Ordering::SeqCst), 20);
}

#[rstest]
#[tokio::test]
async fn for_each_observes_elements_in_order() {
    let pipeline = from_async(|| futures::stream::iter(vec!['a', 'b', 'c']));
    let mut seen = String::new();
    pipeline.for_each(|letter| seen.push(letter)).await;
    assert_eq!(seen, "abc");
}

// =============================================================================
// Early Stop
// =============================================================================

#[rstest]
#[tokio::test]
async fn take_issues_no_pull_after_the_limit() {
    let probe = Arc::new(PullProbe::default());
    let shared = Arc::clone(&probe);
    let pipeline = from_async(move || suspending_numbers(Arc::clone(&shared), 1_000)).take(3);

    assert_eq!(pipeline.to_vec().await, vec![0, 1, 2]);
    assert_eq!(probe.started.load(Ordering::SeqCst), 3);
    assert_eq!(probe.in_flight.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn find_stops_pulling_at_the_match() {
    let probe = Arc::new(PullProbe::default());
    let shared = Arc::clone(&probe);
    let pipeline = from_async(move || suspending_numbers(Arc::clone(&shared), 1_000));

    assert_eq!(pipeline.find(|value| *value == 4).await, Some(4));
    assert_eq!(probe.started.load(Ordering::SeqCst), 5);
}

#[rstest]
#[tokio::test]
async fn first_stops_after_the_first_surviving_element() {
    let probe = Arc::new(PullProbe::default());
    let shared = Arc::clone(&probe);
    let pipeline = from_async(move || suspending_numbers(Arc::clone(&shared), 1_000)).skip(2);

    assert_eq!(pipeline.first().await, Some(2));
    assert_eq!(probe.started.load(Ordering::SeqCst), 3);
}

#[rstest]
#[tokio::test]
async fn any_and_all_short_circuit() {
    let pipeline = from_async(|| futures::stream::iter(0..));
    assert!(pipeline.any(|value| *value > 3).await);
    assert!(!pipeline.all(|value| *value < 3).await);
}

// =============================================================================
// One-shot Streams
// =============================================================================

#[rstest]
#[tokio::test]
async fn from_stream_reports_restart_failure() {
    let pipeline = from_stream(futures::stream::iter(vec![1, 2])).enumerate();

    assert_eq!(pipeline.to_vec().await, vec![(0, 1), (1, 2)]);
    assert_eq!(
        pipeline.try_traverse().err(),
        Some(SequenceError::AlreadyConsumed {
            operation: "from_stream"
        })
    );
}

// =============================================================================
// Errors
// =============================================================================

#[rstest]
#[tokio::test]
async fn try_to_vec_returns_the_first_error_and_stops() {
    let probe = Arc::new(PullProbe::default());
    let shared = Arc::clone(&probe);
    let pipeline = from_async(move || suspending_numbers(Arc::clone(&shared), 100))
        .map(|value, _| if value == 2 { Err(format!("bad {value}")) } else { Ok(value) });

    assert_eq!(pipeline.try_to_vec().await, Err(String::from("bad 2")));
    assert_eq!(probe.started.load(Ordering::SeqCst), 3);
}

// =============================================================================
// Lifting
// =============================================================================

#[rstest]
#[tokio::test]
async fn lifted_pipeline_matches_synchronous_result() {
    let synchronous = range(0, 10).filter(|n| n % 2 == 0);
    let expected = synchronous.to_vec();

    let lifted = synchronous.into_async();
    assert_eq!(lifted.to_vec().await, expected);
    assert_eq!(lifted.to_vec().await, expected);
}

#[rstest]
#[tokio::test]
async fn lifted_one_shot_source_keeps_restart_failure() {
    let lifted = LazyIterator::once(vec![1, 2, 3]).into_async();

    assert_eq!(lifted.count().await, 3);
    assert_eq!(
        lifted.try_traverse().err(),
        Some(SequenceError::AlreadyConsumed { operation: "once" })
    );
}
