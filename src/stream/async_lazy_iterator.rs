//! The chainable handle over an [`AsyncSequenceSource`].

use std::fmt;
use std::pin::pin;

use futures::{Stream, StreamExt};

use super::adapters::{AsyncEnumerate, AsyncFilter, AsyncMap, AsyncSkip, AsyncTake};
use super::source::{AsyncProducer, AsyncSequenceSource, OnceStream};
use crate::sequence::SequenceError;

/// A lazy, restartable asynchronous sequence.
///
/// The asynchronous counterpart of
/// [`LazyIterator`](crate::sequence::LazyIterator): combinators compose
/// sources without polling anything, and every terminal consumer is an
/// `async fn` that drives exactly one traversal.
///
/// # Suspension and Cancellation
///
/// Only the root stream suspends. The next pull is issued only after the
/// previous one resolved. When a consumer can answer early (`find`, `any`,
/// `all`, `first`, or a satisfied `take`) it stops polling and drops the
/// traversal; the pull that produced the deciding element has already
/// completed, so nothing in flight is interrupted.
///
/// # Panics
///
/// Terminal consumers panic if the root source is a one-shot stream that was
/// already traversed. Use [`try_traverse`](AsyncLazyIterator::try_traverse)
/// to get the [`SequenceError`] instead.
///
/// # Examples
///
/// ```rust
/// use lazyseq::stream::from_async;
/// use futures::executor::block_on;
///
/// let evens = from_async(|| futures::stream::iter(0..10))
///     .filter(|n| n % 2 == 0)
///     .map(|n, _| n * 10)
///     .take(3);
///
/// assert_eq!(block_on(evens.to_vec()), vec![0, 20, 40]);
/// assert_eq!(block_on(evens.count()), 3);
/// ```
#[derive(Clone)]
pub struct AsyncLazyIterator<S> {
    source: S,
}

impl<S> AsyncLazyIterator<S> {
    /// Wraps an existing asynchronous source.
    #[inline]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns a reference to the wrapped source.
    #[inline]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

impl<S> fmt::Debug for AsyncLazyIterator<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AsyncLazyIterator")
            .field("source", &std::any::type_name::<S>())
            .finish()
    }
}

/// Creates a restartable asynchronous sequence.
///
/// `factory` is called at the start of every traversal and must return a
/// fresh stream.
pub fn from_async<F, St>(factory: F) -> AsyncLazyIterator<AsyncProducer<F>>
where
    F: Fn() -> St,
    St: Stream,
{
    AsyncLazyIterator::new(AsyncProducer::new(factory))
}

/// Creates an asynchronous sequence over a one-shot stream.
///
/// Only the first traversal succeeds; later ones report
/// [`SequenceError::AlreadyConsumed`].
pub fn from_stream<St: Stream>(stream: St) -> AsyncLazyIterator<OnceStream<St>> {
    AsyncLazyIterator::new(OnceStream::new(stream))
}

// =============================================================================
// Combinators
// =============================================================================

impl<S: AsyncSequenceSource> AsyncLazyIterator<S> {
    /// Applies `function(value, index)` to every element.
    #[inline]
    pub fn map<F, U>(self, function: F) -> AsyncLazyIterator<AsyncMap<S, F>>
    where
        F: Fn(S::Item, usize) -> U,
    {
        AsyncLazyIterator::new(AsyncMap::new(self.source, function))
    }

    /// Keeps the elements for which `predicate` returns `true`.
    #[inline]
    pub fn filter<F>(self, predicate: F) -> AsyncLazyIterator<AsyncFilter<S, F>>
    where
        F: Fn(&S::Item) -> bool,
    {
        AsyncLazyIterator::new(AsyncFilter::new(self.source, predicate))
    }

    /// Yields at most `count` elements; no pull is issued after the last one.
    #[inline]
    pub fn take(self, count: usize) -> AsyncLazyIterator<AsyncTake<S>> {
        AsyncLazyIterator::new(AsyncTake::new(self.source, count))
    }

    /// Discards the first `count` elements.
    #[inline]
    pub fn skip(self, count: usize) -> AsyncLazyIterator<AsyncSkip<S>> {
        AsyncLazyIterator::new(AsyncSkip::new(self.source, count))
    }

    /// Pairs each element with its zero-based position.
    #[inline]
    pub fn enumerate(self) -> AsyncLazyIterator<AsyncEnumerate<S>> {
        AsyncLazyIterator::new(AsyncEnumerate::new(self.source))
    }
}

// =============================================================================
// Terminal Consumers
// =============================================================================

impl<S: AsyncSequenceSource> AsyncLazyIterator<S> {
    /// Starts a traversal, reporting a refused restart as an error.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::AlreadyConsumed`] if the root source is a
    /// one-shot stream that has already been traversed.
    pub fn try_traverse(&self) -> Result<S::Traversal, SequenceError> {
        tracing::trace!(source = std::any::type_name::<S>(), "starting async traversal");
        self.source.traverse().inspect_err(|error| {
            tracing::debug!(%error, "async traversal refused");
        })
    }

    fn start(&self) -> S::Traversal {
        match self.try_traverse() {
            Ok(traversal) => traversal,
            Err(error) => panic!("{error}"),
        }
    }

    /// Collects every element into a vector.
    pub async fn to_vec(&self) -> Vec<S::Item> {
        self.start().collect().await
    }

    /// Folds the elements left to right, starting from `initial`.
    pub async fn fold<B, F>(&self, initial: B, mut function: F) -> B
    where
        F: FnMut(B, S::Item) -> B,
    {
        let mut traversal = pin!(self.start());
        let mut accumulator = initial;
        while let Some(item) = traversal.next().await {
            accumulator = function(accumulator, item);
        }
        accumulator
    }

    /// Calls `function` on every element, in order.
    pub async fn for_each<F>(&self, mut function: F)
    where
        F: FnMut(S::Item),
    {
        let mut traversal = pin!(self.start());
        while let Some(item) = traversal.next().await {
            function(item);
        }
    }

    /// Returns the first element satisfying `predicate`.
    pub async fn find<P>(&self, mut predicate: P) -> Option<S::Item>
    where
        P: FnMut(&S::Item) -> bool,
    {
        let mut traversal = pin!(self.start());
        while let Some(item) = traversal.next().await {
            if predicate(&item) {
                return Some(item);
            }
        }
        None
    }

    /// Returns `true` as soon as an element satisfies `predicate`.
    pub async fn any<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&S::Item) -> bool,
    {
        self.find(predicate).await.is_some()
    }

    /// Returns `false` as soon as an element fails `predicate`.
    pub async fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&S::Item) -> bool,
    {
        self.find(|item| !predicate(item)).await.is_none()
    }

    /// Returns the first element, issuing at most one pull.
    pub async fn first(&self) -> Option<S::Item> {
        let mut traversal = pin!(self.start());
        traversal.next().await
    }

    /// Returns the final element. Requires full exhaustion.
    pub async fn last(&self) -> Option<S::Item> {
        self.fold(None, |_, item| Some(item)).await
    }

    /// Counts the elements. Requires full exhaustion.
    pub async fn count(&self) -> usize {
        self.fold(0, |count, _| count + 1).await
    }
}

impl<S, T, E> AsyncLazyIterator<S>
where
    S: AsyncSequenceSource<Item = Result<T, E>>,
{
    /// Collects the `Ok` values, stopping at the first `Err`.
    ///
    /// # Errors
    ///
    /// Returns the first `Err` element unchanged; no pull is issued after it.
    pub async fn try_to_vec(&self) -> Result<Vec<T>, E> {
        let mut traversal = pin!(self.start());
        let mut values = Vec::new();
        while let Some(item) = traversal.next().await {
            values.push(item?);
        }
        Ok(values)
    }
}
