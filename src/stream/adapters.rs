//! Asynchronous combinator sources and their streams.
//!
//! The adapters are synchronous: only the root stream ever returns
//! `Poll::Pending`. Each stream polls its inner stream again only after the
//! previous item has resolved, so pulls are serialized.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures::Stream;
use pin_project_lite::pin_project;

use super::source::AsyncSequenceSource;
use crate::sequence::SequenceError;

// =============================================================================
// Map
// =============================================================================

/// Source returned by [`AsyncLazyIterator::map`](super::AsyncLazyIterator::map).
pub struct AsyncMap<S, F> {
    source: S,
    function: Arc<F>,
}

impl<S, F> AsyncMap<S, F> {
    pub(crate) fn new(source: S, function: F) -> Self {
        Self {
            source,
            function: Arc::new(function),
        }
    }
}

impl<S: Clone, F> Clone for AsyncMap<S, F> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            function: Arc::clone(&self.function),
        }
    }
}

impl<S: fmt::Debug, F> fmt::Debug for AsyncMap<S, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AsyncMap")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<S, F, U> AsyncSequenceSource for AsyncMap<S, F>
where
    S: AsyncSequenceSource,
    F: Fn(S::Item, usize) -> U,
{
    type Item = U;
    type Traversal = MapStream<S::Traversal, F>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(MapStream {
            inner: self.source.traverse()?,
            function: Arc::clone(&self.function),
            index: 0,
        })
    }
}

pin_project! {
    /// Traversal of [`AsyncMap`].
    pub struct MapStream<St, F> {
        #[pin]
        inner: St,
        function: Arc<F>,
        index: usize,
    }
}

impl<St, F, U> Stream for MapStream<St, F>
where
    St: Stream,
    F: Fn(St::Item, usize) -> U,
{
    type Item = U;

    fn poll_next(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<U>> {
        let this = self.project();
        let Some(item) = ready!(this.inner.poll_next(context)) else {
            return Poll::Ready(None);
        };
        let index = *this.index;
        *this.index += 1;
        Poll::Ready(Some((this.function)(item, index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Source returned by [`AsyncLazyIterator::filter`](super::AsyncLazyIterator::filter).
pub struct AsyncFilter<S, F> {
    source: S,
    predicate: Arc<F>,
}

impl<S, F> AsyncFilter<S, F> {
    pub(crate) fn new(source: S, predicate: F) -> Self {
        Self {
            source,
            predicate: Arc::new(predicate),
        }
    }
}

impl<S: Clone, F> Clone for AsyncFilter<S, F> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: fmt::Debug, F> fmt::Debug for AsyncFilter<S, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AsyncFilter")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<S, F> AsyncSequenceSource for AsyncFilter<S, F>
where
    S: AsyncSequenceSource,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Traversal = FilterStream<S::Traversal, F>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(FilterStream {
            inner: self.source.traverse()?,
            predicate: Arc::clone(&self.predicate),
        })
    }
}

pin_project! {
    /// Traversal of [`AsyncFilter`].
    pub struct FilterStream<St, F> {
        #[pin]
        inner: St,
        predicate: Arc<F>,
    }
}

impl<St, F> Stream for FilterStream<St, F>
where
    St: Stream,
    F: Fn(&St::Item) -> bool,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<St::Item>> {
        let mut this = self.project();
        loop {
            let Some(item) = ready!(this.inner.as_mut().poll_next(context)) else {
                return Poll::Ready(None);
            };
            if (this.predicate)(&item) {
                return Poll::Ready(Some(item));
            }
        }
    }
}

// =============================================================================
// Take / Skip
// =============================================================================

/// Source returned by [`AsyncLazyIterator::take`](super::AsyncLazyIterator::take).
#[derive(Debug, Clone)]
pub struct AsyncTake<S> {
    source: S,
    limit: usize,
}

impl<S> AsyncTake<S> {
    pub(crate) const fn new(source: S, limit: usize) -> Self {
        Self { source, limit }
    }
}

impl<S: AsyncSequenceSource> AsyncSequenceSource for AsyncTake<S> {
    type Item = S::Item;
    type Traversal = TakeStream<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(TakeStream {
            inner: self.source.traverse()?,
            remaining: self.limit,
        })
    }
}

pin_project! {
    /// Traversal of [`AsyncTake`]. The inner stream is not polled again once
    /// the limit is reached.
    pub struct TakeStream<St> {
        #[pin]
        inner: St,
        remaining: usize,
    }
}

impl<St: Stream> Stream for TakeStream<St> {
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<St::Item>> {
        let this = self.project();
        if *this.remaining == 0 {
            return Poll::Ready(None);
        }
        let item = ready!(this.inner.poll_next(context));
        *this.remaining = if item.is_some() { *this.remaining - 1 } else { 0 };
        Poll::Ready(item)
    }
}

/// Source returned by [`AsyncLazyIterator::skip`](super::AsyncLazyIterator::skip).
#[derive(Debug, Clone)]
pub struct AsyncSkip<S> {
    source: S,
    count: usize,
}

impl<S> AsyncSkip<S> {
    pub(crate) const fn new(source: S, count: usize) -> Self {
        Self { source, count }
    }
}

impl<S: AsyncSequenceSource> AsyncSequenceSource for AsyncSkip<S> {
    type Item = S::Item;
    type Traversal = SkipStream<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(SkipStream {
            inner: self.source.traverse()?,
            pending: self.count,
        })
    }
}

pin_project! {
    /// Traversal of [`AsyncSkip`]. Progress through the skipped prefix
    /// survives suspension.
    pub struct SkipStream<St> {
        #[pin]
        inner: St,
        pending: usize,
    }
}

impl<St: Stream> Stream for SkipStream<St> {
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<St::Item>> {
        let mut this = self.project();
        while *this.pending > 0 {
            if ready!(this.inner.as_mut().poll_next(context)).is_none() {
                *this.pending = 0;
                return Poll::Ready(None);
            }
            *this.pending -= 1;
        }
        this.inner.poll_next(context)
    }
}

// =============================================================================
// Enumerate
// =============================================================================

/// Source returned by [`AsyncLazyIterator::enumerate`](super::AsyncLazyIterator::enumerate).
#[derive(Debug, Clone)]
pub struct AsyncEnumerate<S> {
    source: S,
}

impl<S> AsyncEnumerate<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: AsyncSequenceSource> AsyncSequenceSource for AsyncEnumerate<S> {
    type Item = (usize, S::Item);
    type Traversal = EnumerateStream<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(EnumerateStream {
            inner: self.source.traverse()?,
            index: 0,
        })
    }
}

pin_project! {
    /// Traversal of [`AsyncEnumerate`].
    pub struct EnumerateStream<St> {
        #[pin]
        inner: St,
        index: usize,
    }
}

impl<St: Stream> Stream for EnumerateStream<St> {
    type Item = (usize, St::Item);

    fn poll_next(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let Some(item) = ready!(this.inner.poll_next(context)) else {
            return Poll::Ready(None);
        };
        let index = *this.index;
        *this.index += 1;
        Poll::Ready(Some((index, item)))
    }
}
