//! The restartable source abstraction and the basic sources.
//!
//! A [`SequenceSource`] is a capability: "produce one fresh traversal".
//! Traversals are ordinary [`Iterator`]s that own their cursor state, so two
//! traversals of the same source never observe each other.
//!
//! Basic sources:
//!
//! - [`Items`]: an in-memory container, cloned out element by element
//! - [`Producer`]: a factory closure invoked once per traversal
//! - [`Once`]: a one-shot external iterator that refuses a second traversal
//! - [`Empty`]: no elements at all

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::SequenceError;
use super::lazy_iterator::LazyIterator;

/// A producer of independent traversals over one logical sequence.
///
/// Calling [`traverse`](SequenceSource::traverse) never computes an element;
/// it only builds the cursor. Elements are produced when the returned
/// iterator is pulled.
///
/// # Restartability
///
/// Every successful call must start the logical sequence from the beginning,
/// regardless of how far earlier traversals advanced. Sources that cannot
/// honour this (see [`Once`]) return [`SequenceError::AlreadyConsumed`]
/// instead of an empty traversal.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::{SequenceError, SequenceSource};
///
/// struct Countdown(u32);
///
/// impl SequenceSource for Countdown {
///     type Item = u32;
///     type Traversal = std::iter::Rev<std::ops::RangeInclusive<u32>>;
///
///     fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
///         Ok((1..=self.0).rev())
///     }
/// }
///
/// let source = Countdown(3);
/// assert_eq!(source.traverse().unwrap().collect::<Vec<_>>(), vec![3, 2, 1]);
/// assert_eq!(source.traverse().unwrap().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub trait SequenceSource {
    /// The element type.
    type Item;

    /// The cursor for a single traversal.
    type Traversal: Iterator<Item = Self::Item>;

    /// Starts a fresh traversal.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::AlreadyConsumed`] when the source is backed by a
    /// one-shot resource that has already been traversed.
    fn traverse(&self) -> Result<Self::Traversal, SequenceError>;
}

/// Conversion into a [`LazyIterator`].
///
/// Implemented for `Vec<T>`, arrays, slices and `LazyIterator` itself, so the
/// free constructors accept plain containers as well as pipelines.
pub trait IntoSequence {
    /// The source of the resulting `LazyIterator`.
    type Source: SequenceSource;

    /// Wraps `self` in a `LazyIterator`.
    fn into_sequence(self) -> LazyIterator<Self::Source>;
}

impl<S: SequenceSource> IntoSequence for LazyIterator<S> {
    type Source = S;

    #[inline]
    fn into_sequence(self) -> LazyIterator<S> {
        self
    }
}

impl<T: Clone> IntoSequence for Vec<T> {
    type Source = Items<T>;

    #[inline]
    fn into_sequence(self) -> LazyIterator<Items<T>> {
        LazyIterator::from_vec(self)
    }
}

impl<T: Clone, const N: usize> IntoSequence for [T; N] {
    type Source = Items<T>;

    #[inline]
    fn into_sequence(self) -> LazyIterator<Items<T>> {
        LazyIterator::from_vec(Vec::from(self))
    }
}

impl<T: Clone> IntoSequence for &[T] {
    type Source = Items<T>;

    #[inline]
    fn into_sequence(self) -> LazyIterator<Items<T>> {
        LazyIterator::from_slice(self)
    }
}

// =============================================================================
// Items
// =============================================================================

/// A restartable source over an in-memory container.
///
/// The values are held behind an `Arc<[T]>` and are never mutated; each
/// traversal clones elements out as they are pulled.
#[derive(Debug)]
pub struct Items<T> {
    values: Arc<[T]>,
}

impl<T> Items<T> {
    pub(crate) fn new(values: Arc<[T]>) -> Self {
        Self { values }
    }

    /// Returns the number of values held by the source.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the source holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Clone for Items<T> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

impl<T: Clone> SequenceSource for Items<T> {
    type Item = T;
    type Traversal = ItemsTraversal<T>;

    fn traverse(&self) -> Result<ItemsTraversal<T>, SequenceError> {
        Ok(ItemsTraversal {
            values: Arc::clone(&self.values),
            position: 0,
        })
    }
}

/// Traversal of [`Items`].
#[derive(Debug)]
pub struct ItemsTraversal<T> {
    values: Arc<[T]>,
    position: usize,
}

impl<T: Clone> Iterator for ItemsTraversal<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.values.get(self.position)?.clone();
        self.position += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.values.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for ItemsTraversal<T> {}

// =============================================================================
// Producer
// =============================================================================

/// A restartable source built from a factory closure.
///
/// The factory is called once at the start of every traversal and must
/// return a fresh iterable each time.
#[derive(Clone)]
pub struct Producer<F> {
    factory: F,
}

impl<F> Producer<F> {
    pub(crate) const fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> fmt::Debug for Producer<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Producer").finish_non_exhaustive()
    }
}

impl<F, I> SequenceSource for Producer<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    type Item = I::Item;
    type Traversal = I::IntoIter;

    fn traverse(&self) -> Result<I::IntoIter, SequenceError> {
        Ok((self.factory)().into_iter())
    }
}

// =============================================================================
// Once
// =============================================================================

/// A one-shot source over an external iterator.
///
/// The first traversal takes the iterator; every later traversal fails with
/// [`SequenceError::AlreadyConsumed`] rather than silently yielding nothing.
pub struct Once<I> {
    slot: Mutex<Option<I>>,
}

impl<I> Once<I> {
    pub(crate) fn new(iterator: I) -> Self {
        Self {
            slot: Mutex::new(Some(iterator)),
        }
    }

    /// Returns `true` once the iterator has been handed to a traversal.
    pub fn is_consumed(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<I> fmt::Debug for Once<I> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Once")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl<I: Iterator> SequenceSource for Once<I> {
    type Item = I::Item;
    type Traversal = I;

    fn traverse(&self) -> Result<I, SequenceError> {
        self.slot
            .lock()
            .take()
            .ok_or(SequenceError::AlreadyConsumed { operation: "once" })
    }
}

// =============================================================================
// Empty
// =============================================================================

/// A source with no elements.
pub struct Empty<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> Empty<T> {
    pub(crate) const fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T> Clone for Empty<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Empty<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Empty")
    }
}

impl<T> SequenceSource for Empty<T> {
    type Item = T;
    type Traversal = std::iter::Empty<T>;

    fn traverse(&self) -> Result<std::iter::Empty<T>, SequenceError> {
        Ok(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_traversals_are_independent() {
        let source = Items::new(Arc::from(vec![1, 2, 3]));
        let mut first = source.traverse().unwrap();
        assert_eq!(first.next(), Some(1));
        assert_eq!(first.next(), Some(2));

        let second: Vec<_> = source.traverse().unwrap().collect();
        assert_eq!(second, vec![1, 2, 3]);
        assert_eq!(first.next(), Some(3));
        assert_eq!(first.next(), None);
    }

    #[test]
    fn test_items_size_hint_shrinks() {
        let source = Items::new(Arc::from(vec!['a', 'b']));
        let mut traversal = source.traverse().unwrap();
        assert_eq!(traversal.len(), 2);
        traversal.next();
        assert_eq!(traversal.len(), 1);
        traversal.next();
        traversal.next();
        assert_eq!(traversal.len(), 0);
    }

    #[test]
    fn test_producer_calls_factory_per_traversal() {
        let calls = std::cell::Cell::new(0);
        let source = Producer::new(|| {
            calls.set(calls.get() + 1);
            vec![10, 20]
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(source.traverse().unwrap().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(source.traverse().unwrap().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_once_refuses_second_traversal() {
        let source = Once::new(vec![1, 2].into_iter());
        assert!(!source.is_consumed());
        assert_eq!(source.traverse().unwrap().collect::<Vec<_>>(), vec![1, 2]);
        assert!(source.is_consumed());
        assert_eq!(
            source.traverse().unwrap_err(),
            SequenceError::AlreadyConsumed { operation: "once" }
        );
    }

    #[test]
    fn test_empty_yields_nothing() {
        let source = Empty::<u8>::new();
        assert_eq!(source.traverse().unwrap().next(), None);
    }
}
