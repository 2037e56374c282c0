//! Combinator sources and their traversals.
//!
//! Each adapter owns the source it wraps and shares its callback through an
//! `Arc`, so building one performs no work and every traversal gets its own
//! cursor over a fresh traversal of the wrapped source.

use std::fmt;
use std::sync::Arc;

use super::error::SequenceError;
use super::source::SequenceSource;

/// Implements `Clone` (wrapped source cloned, callback shared) and an opaque
/// `Debug` for an adapter holding `source` and `function` fields.
macro_rules! callback_adapter_impls {
    ($name:ident) => {
        impl<S: Clone, F> Clone for $name<S, F> {
            fn clone(&self) -> Self {
                Self {
                    source: self.source.clone(),
                    function: Arc::clone(&self.function),
                }
            }
        }

        impl<S: fmt::Debug, F> fmt::Debug for $name<S, F> {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter
                    .debug_struct(stringify!($name))
                    .field("source", &self.source)
                    .finish_non_exhaustive()
            }
        }

        impl<S, F> $name<S, F> {
            pub(crate) fn new(source: S, function: F) -> Self {
                Self {
                    source,
                    function: Arc::new(function),
                }
            }
        }
    };
}

/// Implements an opaque `Debug` for a traversal holding an `inner` cursor
/// next to a shared callback.
macro_rules! callback_traversal_debug {
    ($name:ident) => {
        impl<I: fmt::Debug, F> fmt::Debug for $name<I, F> {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter
                    .debug_struct(stringify!($name))
                    .field("inner", &self.inner)
                    .finish_non_exhaustive()
            }
        }
    };
}

// =============================================================================
// Map
// =============================================================================

/// Source returned by [`LazyIterator::map`](super::LazyIterator::map).
pub struct Map<S, F> {
    source: S,
    function: Arc<F>,
}

callback_adapter_impls!(Map);

impl<S, F, U> SequenceSource for Map<S, F>
where
    S: SequenceSource,
    F: Fn(S::Item, usize) -> U,
{
    type Item = U;
    type Traversal = MapTraversal<S::Traversal, F>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(MapTraversal {
            inner: self.source.traverse()?,
            function: Arc::clone(&self.function),
            index: 0,
        })
    }
}

/// Traversal of [`Map`]. The index restarts at zero for every traversal.
pub struct MapTraversal<I, F> {
    inner: I,
    function: Arc<F>,
    index: usize,
}

callback_traversal_debug!(MapTraversal);

impl<I, F, U> Iterator for MapTraversal<I, F>
where
    I: Iterator,
    F: Fn(I::Item, usize) -> U,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        let item = self.inner.next()?;
        let index = self.index;
        self.index += 1;
        Some((self.function)(item, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Source returned by [`LazyIterator::filter`](super::LazyIterator::filter).
pub struct Filter<S, F> {
    source: S,
    function: Arc<F>,
}

callback_adapter_impls!(Filter);

impl<S, F> SequenceSource for Filter<S, F>
where
    S: SequenceSource,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Traversal = FilterTraversal<S::Traversal, F>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(FilterTraversal {
            inner: self.source.traverse()?,
            predicate: Arc::clone(&self.function),
        })
    }
}

/// Traversal of [`Filter`].
pub struct FilterTraversal<I, F> {
    inner: I,
    predicate: Arc<F>,
}

callback_traversal_debug!(FilterTraversal);

impl<I, F> Iterator for FilterTraversal<I, F>
where
    I: Iterator,
    F: Fn(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        loop {
            let item = self.inner.next()?;
            if (self.predicate)(&item) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

// =============================================================================
// Take / Skip
// =============================================================================

/// Source returned by [`LazyIterator::take`](super::LazyIterator::take).
#[derive(Debug, Clone)]
pub struct Take<S> {
    source: S,
    limit: usize,
}

impl<S> Take<S> {
    pub(crate) const fn new(source: S, limit: usize) -> Self {
        Self { source, limit }
    }
}

impl<S: SequenceSource> SequenceSource for Take<S> {
    type Item = S::Item;
    type Traversal = TakeTraversal<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(TakeTraversal {
            inner: self.source.traverse()?,
            remaining: self.limit,
        })
    }
}

/// Traversal of [`Take`]. Never pulls upstream once the limit is reached.
#[derive(Debug)]
pub struct TakeTraversal<I> {
    inner: I,
    remaining: usize,
}

impl<I: Iterator> Iterator for TakeTraversal<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.inner.next();
        self.remaining = if item.is_some() { self.remaining - 1 } else { 0 };
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 {
            return (0, Some(0));
        }
        let (lower, upper) = self.inner.size_hint();
        let upper = upper.map_or(self.remaining, |upper| upper.min(self.remaining));
        (lower.min(self.remaining), Some(upper))
    }
}

/// Source returned by [`LazyIterator::skip`](super::LazyIterator::skip).
#[derive(Debug, Clone)]
pub struct Skip<S> {
    source: S,
    count: usize,
}

impl<S> Skip<S> {
    pub(crate) const fn new(source: S, count: usize) -> Self {
        Self { source, count }
    }
}

impl<S: SequenceSource> SequenceSource for Skip<S> {
    type Item = S::Item;
    type Traversal = SkipTraversal<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(SkipTraversal {
            inner: self.source.traverse()?,
            pending: self.count,
        })
    }
}

/// Traversal of [`Skip`]. The discarded prefix is pulled on the first `next`.
#[derive(Debug)]
pub struct SkipTraversal<I> {
    inner: I,
    pending: usize,
}

impl<I: Iterator> Iterator for SkipTraversal<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        while self.pending > 0 {
            self.pending -= 1;
            if self.inner.next().is_none() {
                self.pending = 0;
                return None;
            }
        }
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.inner.size_hint();
        (
            lower.saturating_sub(self.pending),
            upper.map(|upper| upper.saturating_sub(self.pending)),
        )
    }
}

// =============================================================================
// TakeWhile / SkipWhile
// =============================================================================

/// Source returned by [`LazyIterator::take_while`](super::LazyIterator::take_while).
pub struct TakeWhile<S, F> {
    source: S,
    function: Arc<F>,
}

callback_adapter_impls!(TakeWhile);

impl<S, F> SequenceSource for TakeWhile<S, F>
where
    S: SequenceSource,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Traversal = TakeWhileTraversal<S::Traversal, F>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(TakeWhileTraversal {
            inner: self.source.traverse()?,
            predicate: Arc::clone(&self.function),
            finished: false,
        })
    }
}

/// Traversal of [`TakeWhile`]. The first rejected element ends the traversal.
pub struct TakeWhileTraversal<I, F> {
    inner: I,
    predicate: Arc<F>,
    finished: bool,
}

callback_traversal_debug!(TakeWhileTraversal);

impl<I, F> Iterator for TakeWhileTraversal<I, F>
where
    I: Iterator,
    F: Fn(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.finished {
            return None;
        }
        match self.inner.next() {
            Some(item) if (self.predicate)(&item) => Some(item),
            _ => {
                self.finished = true;
                None
            }
        }
    }
}

/// Source returned by [`LazyIterator::skip_while`](super::LazyIterator::skip_while).
pub struct SkipWhile<S, F> {
    source: S,
    function: Arc<F>,
}

callback_adapter_impls!(SkipWhile);

impl<S, F> SequenceSource for SkipWhile<S, F>
where
    S: SequenceSource,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Traversal = SkipWhileTraversal<S::Traversal, F>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(SkipWhileTraversal {
            inner: self.source.traverse()?,
            predicate: Arc::clone(&self.function),
            skipping: true,
        })
    }
}

/// Traversal of [`SkipWhile`]. The predicate is not consulted after the
/// first accepted element.
pub struct SkipWhileTraversal<I, F> {
    inner: I,
    predicate: Arc<F>,
    skipping: bool,
}

callback_traversal_debug!(SkipWhileTraversal);

impl<I, F> Iterator for SkipWhileTraversal<I, F>
where
    I: Iterator,
    F: Fn(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if !self.skipping {
            return self.inner.next();
        }
        loop {
            let item = self.inner.next()?;
            if !(self.predicate)(&item) {
                self.skipping = false;
                return Some(item);
            }
        }
    }
}

// =============================================================================
// Inspect
// =============================================================================

/// Source returned by [`LazyIterator::inspect`](super::LazyIterator::inspect).
pub struct Inspect<S, F> {
    source: S,
    function: Arc<F>,
}

callback_adapter_impls!(Inspect);

impl<S, F> SequenceSource for Inspect<S, F>
where
    S: SequenceSource,
    F: Fn(&S::Item),
{
    type Item = S::Item;
    type Traversal = InspectTraversal<S::Traversal, F>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(InspectTraversal {
            inner: self.source.traverse()?,
            observer: Arc::clone(&self.function),
        })
    }
}

/// Traversal of [`Inspect`].
pub struct InspectTraversal<I, F> {
    inner: I,
    observer: Arc<F>,
}

callback_traversal_debug!(InspectTraversal);

impl<I, F> Iterator for InspectTraversal<I, F>
where
    I: Iterator,
    F: Fn(&I::Item),
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let item = self.inner.next()?;
        (self.observer)(&item);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Source returned by [`LazyIterator::chain`](super::LazyIterator::chain).
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub(crate) const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> SequenceSource for Chain<A, B>
where
    A: SequenceSource,
    B: SequenceSource<Item = A::Item>,
{
    type Item = A::Item;
    type Traversal = ChainTraversal<A::Traversal, B::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(ChainTraversal {
            first: Some(self.first.traverse()?),
            second: self.second.traverse()?,
        })
    }
}

/// Traversal of [`Chain`]. The first traversal is dropped once exhausted.
#[derive(Debug)]
pub struct ChainTraversal<A, B> {
    first: Option<A>,
    second: B,
}

impl<A, B> Iterator for ChainTraversal<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        if let Some(first) = &mut self.first {
            if let Some(item) = first.next() {
                return Some(item);
            }
            self.first = None;
        }
        self.second.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::source::Items;
    use std::cell::Cell;

    fn items(values: &[i32]) -> Items<i32> {
        Items::new(Arc::from(values))
    }

    #[test]
    fn test_take_does_not_pull_past_limit() {
        let pulls = Cell::new(0);
        let source = Take::new(
            Inspect::new(items(&[1, 2, 3, 4]), |_: &i32| pulls.set(pulls.get() + 1)),
            2,
        );
        let collected: Vec<_> = source.traverse().unwrap().collect();
        assert_eq!(collected, vec![1, 2]);
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn test_callback_traversals_debug_without_callback() {
        let map = Map::new(items(&[1]), |value: i32, _: usize| value);
        let rendered = format!("{:?}", map.traverse().unwrap());
        assert!(rendered.starts_with("MapTraversal { inner: "));
        assert!(rendered.ends_with(".. }"));

        let filter = Filter::new(items(&[1]), |_: &i32| true);
        assert!(format!("{:?}", filter.traverse().unwrap()).starts_with("FilterTraversal"));
    }

    #[test]
    fn test_take_size_hint_is_bounded() {
        let traversal = Take::new(items(&[1, 2, 3, 4]), 3).traverse().unwrap();
        assert_eq!(traversal.size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_skip_size_hint_subtracts_pending() {
        let traversal = Skip::new(items(&[1, 2, 3, 4]), 3).traverse().unwrap();
        assert_eq!(traversal.size_hint(), (1, Some(1)));
    }

    #[test]
    fn test_map_index_restarts_per_traversal() {
        let source = Map::new(items(&[5, 6]), |value: i32, index: usize| (index, value));
        let first: Vec<_> = source.traverse().unwrap().collect();
        let second: Vec<_> = source.traverse().unwrap().collect();
        assert_eq!(first, vec![(0, 5), (1, 6)]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_skip_while_stops_consulting_predicate() {
        let checks = Cell::new(0);
        let source = SkipWhile::new(items(&[1, 2, 5, 1, 2]), |value: &i32| {
            checks.set(checks.get() + 1);
            *value < 3
        });
        let collected: Vec<_> = source.traverse().unwrap().collect();
        assert_eq!(collected, vec![5, 1, 2]);
        assert_eq!(checks.get(), 3);
    }

    #[test]
    fn test_chain_concatenates_in_order() {
        let source = Chain::new(items(&[1, 2]), items(&[3]));
        assert_eq!(source.traverse().unwrap().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
