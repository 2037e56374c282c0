//! The chainable, restartable handle over a [`SequenceSource`].
//!
//! # Evaluation Model
//!
//! Combinators (`map`, `filter`, `take`, `skip`, ...) only compose sources.
//! Terminal consumers (`to_vec`, `fold`, `for_each`, `find`, `any`, `all`,
//! `first`, `last`, `count`, ...) are the only operations that start a
//! traversal, and each call starts exactly one.
//!
//! ```rust
//! use lazyseq::sequence::LazyIterator;
//! use std::cell::Cell;
//!
//! let calls = Cell::new(0);
//! let pipeline = LazyIterator::from_vec(vec![1, 2, 3, 4])
//!     .filter(|value| value % 2 == 0)
//!     .map(|value, _| {
//!         calls.set(calls.get() + 1);
//!         value * 10
//!     });
//!
//! // Nothing has run yet
//! assert_eq!(calls.get(), 0);
//!
//! // Every terminal call is an independent traversal
//! assert_eq!(pipeline.to_vec(), vec![20, 40]);
//! assert_eq!(pipeline.count(), 2);
//! assert_eq!(calls.get(), 4);
//! ```
//!
//! # Unbounded Sources
//!
//! `to_vec`, `collect`, `fold`, `for_each`, `last` and `count` pull until the
//! source is exhausted and never return on an unbounded pipeline. `all`
//! behaves the same way when no element fails the predicate. Bound infinite
//! sources with [`take`](LazyIterator::take) or use a short-circuiting
//! consumer (`find`, `any`, `first`, `nth`).

use std::fmt;

use super::adapters::{Chain, Filter, Inspect, Map, Skip, SkipWhile, Take, TakeWhile};
use super::constructors::{Chunk, Cycle, Enumerate, Flatten, Zip};
use super::error::SequenceError;
use super::source::{Empty, IntoSequence, Items, Once, Producer, SequenceSource};

/// A lazy, restartable sequence.
///
/// `LazyIterator<S>` wraps one [`SequenceSource`]. Combinators consume the
/// handle and return a new one that owns the old source; clone the handle
/// first to keep the original around. Terminal consumers borrow the handle,
/// so the same pipeline can be consumed repeatedly.
///
/// # Panics
///
/// Terminal consumers panic with the [`SequenceError`] message if the root
/// source refuses to start a traversal, which only happens when a one-shot
/// source ([`LazyIterator::once`]) is consumed a second time. Use
/// [`try_traverse`](LazyIterator::try_traverse) to observe that condition as
/// a `Result` instead.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::range;
///
/// let multiples = range(0, 1_000_000)
///     .filter(|n| n % 7 == 0 && n % 11 == 0)
///     .take(5);
///
/// assert_eq!(multiples.to_vec(), vec![0, 77, 154, 231, 308]);
/// assert_eq!(multiples.skip(1).to_vec(), vec![77, 154, 231, 308]);
/// ```
#[derive(Clone)]
pub struct LazyIterator<S> {
    source: S,
}

impl<S> LazyIterator<S> {
    /// Wraps an existing source.
    #[inline]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns a reference to the wrapped source.
    #[inline]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Unwraps the source.
    #[inline]
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S> fmt::Debug for LazyIterator<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LazyIterator")
            .field("source", &std::any::type_name::<S>())
            .finish()
    }
}

// =============================================================================
// Entry Points
// =============================================================================

impl<T: Clone> LazyIterator<Items<T>> {
    /// Creates a restartable sequence over the values of a vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::LazyIterator;
    ///
    /// let letters = LazyIterator::from_vec(vec!['a', 'b']);
    /// assert_eq!(letters.to_vec(), vec!['a', 'b']);
    /// assert_eq!(letters.to_vec(), vec!['a', 'b']);
    /// ```
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::new(Items::new(values.into()))
    }

    /// Creates a restartable sequence over a copy of `values`.
    pub fn from_slice(values: &[T]) -> Self {
        Self::new(Items::new(values.into()))
    }
}

impl<F, I> LazyIterator<Producer<F>>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    /// Creates a restartable sequence from a producer.
    ///
    /// `factory` runs once at the start of each traversal and must return a
    /// fresh iterable every time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::LazyIterator;
    ///
    /// let squares = LazyIterator::from_producer(|| (1..=3).map(|n| n * n));
    /// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
    /// assert_eq!(squares.last(), Some(9));
    /// ```
    pub fn from_producer(factory: F) -> Self {
        Self::new(Producer::new(factory))
    }
}

impl<I: Iterator> LazyIterator<Once<I>> {
    /// Creates a sequence over a one-shot external iterator.
    ///
    /// Only the first traversal succeeds; later traversals report
    /// [`SequenceError::AlreadyConsumed`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::{LazyIterator, SequenceError};
    ///
    /// let lines = LazyIterator::once("a\nb".lines());
    /// assert_eq!(lines.count(), 2);
    /// assert_eq!(
    ///     lines.try_traverse().unwrap_err(),
    ///     SequenceError::AlreadyConsumed { operation: "once" }
    /// );
    /// ```
    pub fn once<T>(iterable: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self::new(Once::new(iterable.into_iter()))
    }
}

impl<T> LazyIterator<Empty<T>> {
    /// Creates a sequence with no elements.
    pub const fn empty() -> Self {
        Self::new(Empty::new())
    }
}

// =============================================================================
// Combinators
// =============================================================================

impl<S: SequenceSource> LazyIterator<S> {
    /// Applies `function(value, index)` to every element.
    ///
    /// The index counts the elements seen by this stage and restarts at zero
    /// for every traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::LazyIterator;
    ///
    /// let labelled = LazyIterator::from_vec(vec!["a", "b"])
    ///     .map(|value, index| format!("{index}:{value}"));
    /// assert_eq!(labelled.to_vec(), vec!["0:a", "1:b"]);
    /// ```
    #[inline]
    pub fn map<F, U>(self, function: F) -> LazyIterator<Map<S, F>>
    where
        F: Fn(S::Item, usize) -> U,
    {
        LazyIterator::new(Map::new(self.source, function))
    }

    /// Keeps the elements for which `predicate` returns `true`.
    #[inline]
    pub fn filter<F>(self, predicate: F) -> LazyIterator<Filter<S, F>>
    where
        F: Fn(&S::Item) -> bool,
    {
        LazyIterator::new(Filter::new(self.source, predicate))
    }

    /// Yields at most `count` elements.
    ///
    /// Upstream is never pulled after the `count`-th element, which makes
    /// `take` the primary way to bound an infinite source. `take(0)` yields
    /// nothing and pulls nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::repeat;
    ///
    /// assert_eq!(repeat(0).take(3).count(), 3);
    /// assert!(repeat(0).take(0).to_vec().is_empty());
    /// ```
    #[inline]
    pub fn take(self, count: usize) -> LazyIterator<Take<S>> {
        LazyIterator::new(Take::new(self.source, count))
    }

    /// Discards the first `count` elements.
    #[inline]
    pub fn skip(self, count: usize) -> LazyIterator<Skip<S>> {
        LazyIterator::new(Skip::new(self.source, count))
    }

    /// Yields elements while `predicate` holds, then stops.
    #[inline]
    pub fn take_while<F>(self, predicate: F) -> LazyIterator<TakeWhile<S, F>>
    where
        F: Fn(&S::Item) -> bool,
    {
        LazyIterator::new(TakeWhile::new(self.source, predicate))
    }

    /// Discards elements while `predicate` holds, then yields the rest.
    #[inline]
    pub fn skip_while<F>(self, predicate: F) -> LazyIterator<SkipWhile<S, F>>
    where
        F: Fn(&S::Item) -> bool,
    {
        LazyIterator::new(SkipWhile::new(self.source, predicate))
    }

    /// Calls `observer` with a reference to each element as it passes.
    #[inline]
    pub fn inspect<F>(self, observer: F) -> LazyIterator<Inspect<S, F>>
    where
        F: Fn(&S::Item),
    {
        LazyIterator::new(Inspect::new(self.source, observer))
    }

    /// Pairs each element with its zero-based position.
    #[inline]
    pub fn enumerate(self) -> LazyIterator<Enumerate<S>> {
        LazyIterator::new(Enumerate::new(self.source))
    }

    /// Pairs elements with those of `other`, stopping at the shorter side.
    #[inline]
    pub fn zip<O: IntoSequence>(self, other: O) -> LazyIterator<Zip<S, O::Source>> {
        LazyIterator::new(Zip::new(self.source, other.into_sequence().source))
    }

    /// Appends the elements of `other`.
    #[inline]
    pub fn chain<O>(self, other: O) -> LazyIterator<Chain<S, O::Source>>
    where
        O: IntoSequence,
        O::Source: SequenceSource<Item = S::Item>,
    {
        LazyIterator::new(Chain::new(self.source, other.into_sequence().source))
    }

    /// Groups elements into vectors of `size`; a shorter tail group is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidArgument`] if `size` is zero.
    #[inline]
    pub fn chunk(self, size: usize) -> Result<LazyIterator<Chunk<S>>, SequenceError> {
        Chunk::new(self.source, size).map(LazyIterator::new)
    }

    /// Concatenates the inner iterables yielded by this sequence.
    #[inline]
    pub fn flatten(self) -> LazyIterator<Flatten<S>>
    where
        S::Item: IntoIterator,
    {
        LazyIterator::new(Flatten::new(self.source))
    }

    /// Maps every element to an iterable and concatenates the results.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::range;
    ///
    /// let pairs = range(1, 3).flat_map(|n| vec![n, -n]);
    /// assert_eq!(pairs.to_vec(), vec![1, -1, 2, -2]);
    /// ```
    #[inline]
    pub fn flat_map<F, I>(
        self,
        function: F,
    ) -> LazyIterator<Flatten<Map<S, impl Fn(S::Item, usize) -> I>>>
    where
        F: Fn(S::Item) -> I,
        I: IntoIterator,
    {
        self.map(move |item, _| function(item)).flatten()
    }

    /// Repeats this sequence forever by restarting its source.
    ///
    /// A round that yields no element ends the traversal, so cycling an empty
    /// sequence is empty rather than an endless loop.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::{LazyIterator, range};
    ///
    /// assert_eq!(range(0, 2).cycle().take(5).to_vec(), vec![0, 1, 0, 1, 0]);
    /// assert_eq!(LazyIterator::<lazyseq::sequence::Empty<u8>>::empty().cycle().count(), 0);
    /// ```
    #[inline]
    pub fn cycle(self) -> LazyIterator<Cycle<S>> {
        LazyIterator::new(Cycle::new(self.source))
    }

    /// Converts this sequence into an asynchronous one.
    #[cfg(feature = "async")]
    #[inline]
    pub fn into_async(self) -> crate::stream::AsyncLazyIterator<crate::stream::Lifted<S>> {
        crate::stream::AsyncLazyIterator::new(crate::stream::Lifted::new(self.source))
    }
}

// =============================================================================
// Terminal Consumers
// =============================================================================

impl<S: SequenceSource> LazyIterator<S> {
    /// Starts a traversal, reporting a refused restart as an error.
    ///
    /// Every other terminal consumer is built on this. The returned iterator
    /// is the traversal itself; it is independent from any other traversal
    /// of this sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::AlreadyConsumed`] if the root source is a
    /// one-shot source that has already been traversed.
    pub fn try_traverse(&self) -> Result<S::Traversal, SequenceError> {
        tracing::trace!(source = std::any::type_name::<S>(), "starting traversal");
        self.source.traverse().inspect_err(|error| {
            tracing::debug!(%error, "traversal refused");
        })
    }

    fn start(&self) -> S::Traversal {
        match self.try_traverse() {
            Ok(traversal) => traversal,
            Err(error) => panic!("{error}"),
        }
    }

    /// Collects every element into a vector.
    ///
    /// Never returns on an unbounded pipeline.
    ///
    /// # Panics
    ///
    /// Panics if a one-shot root source has already been consumed.
    pub fn to_vec(&self) -> Vec<S::Item> {
        self.start().collect()
    }

    /// Collects every element into any [`FromIterator`] container.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::LazyIterator;
    /// use std::collections::BTreeSet;
    ///
    /// let set: BTreeSet<_> = LazyIterator::from_vec(vec![3, 1, 3]).collect();
    /// assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn collect<C: FromIterator<S::Item>>(&self) -> C {
        self.start().collect()
    }

    /// Folds the elements left to right, starting from `initial`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::range;
    ///
    /// assert_eq!(range(1, 5).fold(0, |sum, n| sum + n), 10);
    /// ```
    pub fn fold<B, F>(&self, initial: B, function: F) -> B
    where
        F: FnMut(B, S::Item) -> B,
    {
        self.start().fold(initial, function)
    }

    /// Calls `function` on every element, in order.
    pub fn for_each<F>(&self, function: F)
    where
        F: FnMut(S::Item),
    {
        self.start().for_each(function);
    }

    /// Returns the first element satisfying `predicate`, stopping there.
    pub fn find<P>(&self, mut predicate: P) -> Option<S::Item>
    where
        P: FnMut(&S::Item) -> bool,
    {
        self.start().find(|item| predicate(item))
    }

    /// Returns `true` as soon as an element satisfies `predicate`.
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&S::Item) -> bool,
    {
        self.start().any(|item| predicate(&item))
    }

    /// Returns `false` as soon as an element fails `predicate`, `true` if
    /// none does.
    pub fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&S::Item) -> bool,
    {
        self.start().all(|item| predicate(&item))
    }

    /// Returns the first element, pulling at most one.
    pub fn first(&self) -> Option<S::Item> {
        self.start().next()
    }

    /// Returns the element at `index`, pulling at most `index + 1` elements.
    pub fn nth(&self, index: usize) -> Option<S::Item> {
        self.start().nth(index)
    }

    /// Returns the final element. Requires full exhaustion.
    pub fn last(&self) -> Option<S::Item> {
        self.start().last()
    }

    /// Counts the elements. Requires full exhaustion.
    pub fn count(&self) -> usize {
        self.start().count()
    }

    /// Folds with a fallible function, stopping at the first error.
    ///
    /// The error is returned exactly as produced by `function`.
    ///
    /// # Errors
    ///
    /// Returns the first `Err` produced by `function`.
    pub fn try_fold<B, E, F>(&self, initial: B, function: F) -> Result<B, E>
    where
        F: FnMut(B, S::Item) -> Result<B, E>,
    {
        self.start().try_fold(initial, function)
    }

    /// Calls a fallible `function` on every element, stopping at the first
    /// error.
    ///
    /// Effects of the calls that succeeded before the error are kept.
    ///
    /// # Errors
    ///
    /// Returns the first `Err` produced by `function`.
    pub fn try_for_each<E, F>(&self, function: F) -> Result<(), E>
    where
        F: FnMut(S::Item) -> Result<(), E>,
    {
        self.start().try_for_each(function)
    }
}

impl<S, T, E> LazyIterator<S>
where
    S: SequenceSource<Item = Result<T, E>>,
{
    /// Collects the `Ok` values, stopping at the first `Err`.
    ///
    /// Nothing is pulled after the first error.
    ///
    /// # Errors
    ///
    /// Returns the first `Err` element unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::sequence::LazyIterator;
    ///
    /// let parsed = LazyIterator::from_vec(vec!["1", "x", "3"])
    ///     .map(|text, _| text.parse::<i32>());
    /// assert!(parsed.try_to_vec().is_err());
    /// ```
    pub fn try_to_vec(&self) -> Result<Vec<T>, E> {
        self.start().collect()
    }
}

impl<S: SequenceSource> IntoIterator for LazyIterator<S> {
    type Item = S::Item;
    type IntoIter = S::Traversal;

    /// # Panics
    ///
    /// Panics if a one-shot root source has already been consumed.
    fn into_iter(self) -> S::Traversal {
        self.start()
    }
}

impl<S: SequenceSource> IntoIterator for &LazyIterator<S> {
    type Item = S::Item;
    type IntoIter = S::Traversal;

    /// # Panics
    ///
    /// Panics if a one-shot root source has already been consumed.
    fn into_iter(self) -> S::Traversal {
        self.start()
    }
}

impl<T: Clone> From<Vec<T>> for LazyIterator<Items<T>> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T: Clone> FromIterator<T> for LazyIterator<Items<T>> {
    fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
        Self::new(Items::new(iterable.into_iter().collect()))
    }
}
