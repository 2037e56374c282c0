//! Source constructors.
//!
//! Free functions that build a [`LazyIterator`] directly from arguments.
//! Parameter validation happens here, at construction time; traversals of
//! the returned sequences never fail because of their arguments.
//!
//! | Constructor                  | Length                        |
//! |------------------------------|-------------------------------|
//! | [`range`], [`range_step`]    | finite                        |
//! | [`range_from`]               | unbounded (ends on overflow)  |
//! | [`repeat`]                   | infinite                      |
//! | [`repeat_n`]                 | `n`                           |
//! | [`cycle`]                    | infinite                      |
//! | [`enumerate`]                | as source                     |
//! | [`zip`]                      | shorter of the two            |
//! | [`chunk`]                    | `ceil(len / size)`            |
//! | [`flatten`]                  | sum of inner lengths          |

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::error::SequenceError;
use super::lazy_iterator::LazyIterator;
use super::source::{IntoSequence, Items, SequenceSource};

// =============================================================================
// Range
// =============================================================================

/// An arithmetic progression over `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: i64,
    end: Option<i64>,
    step: i64,
}

impl SequenceSource for Range {
    type Item = i64;
    type Traversal = RangeTraversal;

    fn traverse(&self) -> Result<RangeTraversal, SequenceError> {
        Ok(RangeTraversal {
            next: Some(self.start),
            end: self.end,
            step: self.step,
        })
    }
}

/// Traversal of [`Range`].
#[derive(Debug, Clone)]
pub struct RangeTraversal {
    next: Option<i64>,
    end: Option<i64>,
    step: i64,
}

impl Iterator for RangeTraversal {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next?;
        if let Some(end) = self.end {
            let past_end = if self.step > 0 {
                current >= end
            } else {
                current <= end
            };
            if past_end {
                self.next = None;
                return None;
            }
        }
        self.next = current.checked_add(self.step);
        Some(current)
    }
}

/// Creates the half-open progression `start, start + 1, ..., end - 1`.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::range;
///
/// assert_eq!(range(2, 6).to_vec(), vec![2, 3, 4, 5]);
/// assert!(range(6, 2).to_vec().is_empty());
/// ```
pub const fn range(start: i64, end: i64) -> LazyIterator<Range> {
    LazyIterator::new(Range {
        start,
        end: Some(end),
        step: 1,
    })
}

/// Creates the half-open progression from `start` towards `end` by `step`.
///
/// A negative step counts down while the value is greater than `end`.
///
/// # Errors
///
/// Returns [`SequenceError::InvalidArgument`] if `step` is zero.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::range_step;
///
/// assert_eq!(range_step(0, 10, 3).unwrap().to_vec(), vec![0, 3, 6, 9]);
/// assert_eq!(range_step(10, 0, -4).unwrap().to_vec(), vec![10, 6, 2]);
/// assert!(range_step(0, 10, 0).is_err());
/// ```
pub fn range_step(start: i64, end: i64, step: i64) -> Result<LazyIterator<Range>, SequenceError> {
    if step == 0 {
        return Err(SequenceError::invalid_argument(
            "range_step",
            "step",
            "must not be zero",
        ));
    }
    Ok(LazyIterator::new(Range {
        start,
        end: Some(end),
        step,
    }))
}

/// Creates the unbounded progression `start, start + 1, ...`.
///
/// The sequence only ends if it would overflow `i64`. Consume it through a
/// bounding operator such as [`take`](LazyIterator::take) or
/// [`first`](LazyIterator::first).
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::range_from;
///
/// assert_eq!(range_from(7).first(), Some(7));
/// assert_eq!(range_from(0).skip(3).take(2).to_vec(), vec![3, 4]);
/// ```
pub const fn range_from(start: i64) -> LazyIterator<Range> {
    LazyIterator::new(Range {
        start,
        end: None,
        step: 1,
    })
}

// =============================================================================
// Repeat
// =============================================================================

/// Repeats one value, either forever or a fixed number of times.
#[derive(Debug, Clone)]
pub struct Repeat<T> {
    value: T,
    count: Option<usize>,
}

impl<T: Clone> SequenceSource for Repeat<T> {
    type Item = T;
    type Traversal = RepeatTraversal<T>;

    fn traverse(&self) -> Result<RepeatTraversal<T>, SequenceError> {
        Ok(RepeatTraversal {
            value: self.value.clone(),
            remaining: self.count,
        })
    }
}

/// Traversal of [`Repeat`].
#[derive(Debug)]
pub struct RepeatTraversal<T> {
    value: T,
    remaining: Option<usize>,
}

impl<T: Clone> Iterator for RepeatTraversal<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match &mut self.remaining {
            None => Some(self.value.clone()),
            Some(0) => None,
            Some(remaining) => {
                *remaining -= 1;
                Some(self.value.clone())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining
            .map_or((usize::MAX, None), |remaining| (remaining, Some(remaining)))
    }
}

/// Repeats `value` forever.
///
/// Only safe under a bounding operator.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::repeat;
///
/// assert_eq!(repeat("x").take(3).to_vec(), vec!["x", "x", "x"]);
/// assert_eq!(repeat(1).find(|_| true), Some(1));
/// ```
pub fn repeat<T: Clone>(value: T) -> LazyIterator<Repeat<T>> {
    LazyIterator::new(Repeat { value, count: None })
}

/// Repeats `value` exactly `count` times.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::repeat_n;
///
/// assert_eq!(repeat_n('z', 2).to_vec(), vec!['z', 'z']);
/// assert_eq!(repeat_n('z', 0).count(), 0);
/// ```
pub fn repeat_n<T: Clone>(value: T, count: usize) -> LazyIterator<Repeat<T>> {
    LazyIterator::new(Repeat {
        value,
        count: Some(count),
    })
}

// =============================================================================
// Cycle
// =============================================================================

/// Repeats a restartable source forever by re-traversing it.
///
/// If a round produces no element at all the traversal ends instead of
/// spinning, so cycling an empty source yields an empty sequence.
#[derive(Debug)]
pub struct Cycle<S> {
    source: Arc<S>,
}

impl<S> Cycle<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

impl<S> Clone for Cycle<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: SequenceSource> SequenceSource for Cycle<S> {
    type Item = S::Item;
    type Traversal = CycleTraversal<S>;

    fn traverse(&self) -> Result<CycleTraversal<S>, SequenceError> {
        Ok(CycleTraversal {
            current: Some(self.source.traverse()?),
            source: Arc::clone(&self.source),
            produced: false,
        })
    }
}

/// Traversal of [`Cycle`].
pub struct CycleTraversal<S: SequenceSource> {
    source: Arc<S>,
    current: Option<S::Traversal>,
    produced: bool,
}

impl<S> fmt::Debug for CycleTraversal<S>
where
    S: SequenceSource + fmt::Debug,
    S::Traversal: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CycleTraversal")
            .field("source", &self.source)
            .field("current", &self.current)
            .field("produced", &self.produced)
            .finish()
    }
}

impl<S: SequenceSource> Iterator for CycleTraversal<S> {
    type Item = S::Item;

    /// # Panics
    ///
    /// Panics if the cycled source refuses to restart, which only happens for
    /// one-shot sources.
    fn next(&mut self) -> Option<S::Item> {
        loop {
            let current = self.current.as_mut()?;
            if let Some(item) = current.next() {
                self.produced = true;
                return Some(item);
            }
            if !self.produced {
                self.current = None;
                return None;
            }
            self.produced = false;
            match self.source.traverse() {
                Ok(traversal) => self.current = Some(traversal),
                Err(error) => panic!("{error}"),
            }
        }
    }
}

/// Repeats `values` forever, in their original order.
///
/// # Errors
///
/// Returns [`SequenceError::EmptySource`] if `values` is empty.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::cycle;
///
/// let colors = cycle(["red", "green", "blue"]).unwrap();
/// assert_eq!(
///     colors.take(7).to_vec(),
///     vec!["red", "green", "blue", "red", "green", "blue", "red"]
/// );
/// assert!(cycle(Vec::<u8>::new()).is_err());
/// ```
pub fn cycle<I>(values: I) -> Result<LazyIterator<Cycle<Items<I::Item>>>, SequenceError>
where
    I: IntoIterator,
    I::Item: Clone,
{
    let values: Arc<[I::Item]> = values.into_iter().collect();
    if values.is_empty() {
        return Err(SequenceError::EmptySource { operation: "cycle" });
    }
    Ok(LazyIterator::new(Cycle::new(Items::new(values))))
}

// =============================================================================
// Enumerate
// =============================================================================

/// Pairs each element with its zero-based position.
#[derive(Debug, Clone)]
pub struct Enumerate<S> {
    source: S,
}

impl<S> Enumerate<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SequenceSource> SequenceSource for Enumerate<S> {
    type Item = (usize, S::Item);
    type Traversal = EnumerateTraversal<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(EnumerateTraversal {
            inner: self.source.traverse()?,
            index: 0,
        })
    }
}

/// Traversal of [`Enumerate`].
#[derive(Debug)]
pub struct EnumerateTraversal<I> {
    inner: I,
    index: usize,
}

impl<I: Iterator> Iterator for EnumerateTraversal<I> {
    type Item = (usize, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        let index = self.index;
        self.index += 1;
        Some((index, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Pairs each element of `source` with its zero-based position.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::enumerate;
///
/// assert_eq!(enumerate(vec!['a', 'b']).to_vec(), vec![(0, 'a'), (1, 'b')]);
/// ```
pub fn enumerate<I: IntoSequence>(source: I) -> LazyIterator<Enumerate<I::Source>> {
    source.into_sequence().enumerate()
}

// =============================================================================
// Zip
// =============================================================================

/// Pairs the elements of two sources, stopping at the shorter one.
#[derive(Debug, Clone)]
pub struct Zip<A, B> {
    left: A,
    right: B,
}

impl<A, B> Zip<A, B> {
    pub(crate) const fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A: SequenceSource, B: SequenceSource> SequenceSource for Zip<A, B> {
    type Item = (A::Item, B::Item);
    type Traversal = ZipTraversal<A::Traversal, B::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(ZipTraversal {
            left: self.left.traverse()?,
            right: self.right.traverse()?,
            finished: false,
        })
    }
}

/// Traversal of [`Zip`].
///
/// The left side is pulled first; when the right side is exhausted the
/// pending left element is dropped and neither side is pulled again.
#[derive(Debug)]
pub struct ZipTraversal<A, B> {
    left: A,
    right: B,
    finished: bool,
}

impl<A: Iterator, B: Iterator> Iterator for ZipTraversal<A, B> {
    type Item = (A::Item, B::Item);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let pair = self
            .left
            .next()
            .and_then(|pending| self.right.next().map(|other| (pending, other)));
        self.finished = pair.is_none();
        pair
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let (left_lower, left_upper) = self.left.size_hint();
        let (right_lower, right_upper) = self.right.size_hint();
        let upper = match (left_upper, right_upper) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (Some(bound), None) | (None, Some(bound)) => Some(bound),
            (None, None) => None,
        };
        (left_lower.min(right_lower), upper)
    }
}

/// Pairs the elements of `left` and `right`, stopping at the shorter one.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::zip;
///
/// assert_eq!(zip(vec![1, 2, 3], vec!['a', 'b']).to_vec(), vec![(1, 'a'), (2, 'b')]);
/// ```
pub fn zip<A, B>(left: A, right: B) -> LazyIterator<Zip<A::Source, B::Source>>
where
    A: IntoSequence,
    B: IntoSequence,
{
    left.into_sequence().zip(right)
}

// =============================================================================
// Chunk
// =============================================================================

/// Groups elements into vectors of a fixed size; the tail group may be shorter.
#[derive(Debug, Clone)]
pub struct Chunk<S> {
    source: S,
    size: NonZeroUsize,
}

impl<S> Chunk<S> {
    pub(crate) fn new(source: S, size: usize) -> Result<Self, SequenceError> {
        let size = NonZeroUsize::new(size).ok_or(SequenceError::invalid_argument(
            "chunk",
            "size",
            "must be greater than zero",
        ))?;
        Ok(Self { source, size })
    }
}

impl<S: SequenceSource> SequenceSource for Chunk<S> {
    type Item = Vec<S::Item>;
    type Traversal = ChunkTraversal<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(ChunkTraversal {
            inner: self.source.traverse()?,
            size: self.size,
            exhausted: false,
        })
    }
}

/// Traversal of [`Chunk`].
#[derive(Debug)]
pub struct ChunkTraversal<I> {
    inner: I,
    size: NonZeroUsize,
    exhausted: bool,
}

impl<I: Iterator> Iterator for ChunkTraversal<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Vec<I::Item>> {
        if self.exhausted {
            return None;
        }
        let capacity = self.size.get().min(self.inner.size_hint().0.max(1));
        let mut group = Vec::with_capacity(capacity);
        while group.len() < self.size.get() {
            if let Some(item) = self.inner.next() {
                group.push(item);
            } else {
                self.exhausted = true;
                break;
            }
        }
        if group.is_empty() { None } else { Some(group) }
    }
}

/// Groups the elements of `source` into vectors of `size`.
///
/// # Errors
///
/// Returns [`SequenceError::InvalidArgument`] if `size` is zero.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::chunk;
///
/// let chunks = chunk(vec![1, 2, 3, 4, 5], 2).unwrap();
/// assert_eq!(chunks.to_vec(), vec![vec![1, 2], vec![3, 4], vec![5]]);
/// assert!(chunk(vec![1], 0).is_err());
/// ```
pub fn chunk<I: IntoSequence>(
    source: I,
    size: usize,
) -> Result<LazyIterator<Chunk<I::Source>>, SequenceError> {
    source.into_sequence().chunk(size)
}

// =============================================================================
// Flatten
// =============================================================================

/// Concatenates the inner sequences of a source of sequences.
#[derive(Debug, Clone)]
pub struct Flatten<S> {
    source: S,
}

impl<S> Flatten<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S> SequenceSource for Flatten<S>
where
    S: SequenceSource,
    S::Item: IntoIterator,
{
    type Item = <S::Item as IntoIterator>::Item;
    type Traversal = FlattenTraversal<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(FlattenTraversal {
            outer: self.source.traverse()?,
            inner: None,
        })
    }
}

/// Traversal of [`Flatten`]: an outer cursor plus the inner cursor in progress.
pub struct FlattenTraversal<I>
where
    I: Iterator,
    I::Item: IntoIterator,
{
    outer: I,
    inner: Option<<I::Item as IntoIterator>::IntoIter>,
}

impl<I> fmt::Debug for FlattenTraversal<I>
where
    I: Iterator + fmt::Debug,
    I::Item: IntoIterator,
    <I::Item as IntoIterator>::IntoIter: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FlattenTraversal")
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .finish()
    }
}

impl<I> Iterator for FlattenTraversal<I>
where
    I: Iterator,
    I::Item: IntoIterator,
{
    type Item = <I::Item as IntoIterator>::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(inner) = &mut self.inner {
                if let Some(item) = inner.next() {
                    return Some(item);
                }
                self.inner = None;
            }
            self.inner = Some(self.outer.next()?.into_iter());
        }
    }
}

/// Concatenates the inner sequences of `source` in outer order.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::flatten;
///
/// let nested = vec![vec![1, 2], vec![], vec![3]];
/// assert_eq!(flatten(nested).to_vec(), vec![1, 2, 3]);
/// ```
pub fn flatten<I>(source: I) -> LazyIterator<Flatten<I::Source>>
where
    I: IntoSequence,
    <I::Source as SequenceSource>::Item: IntoIterator,
{
    source.into_sequence().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_stops_on_overflow() {
        let values: Vec<_> = range_from(i64::MAX - 1).to_vec();
        assert_eq!(values, vec![i64::MAX - 1, i64::MAX]);
    }

    #[test]
    fn test_range_negative_step_overflow() {
        let values = range_step(i64::MIN + 1, i64::MIN, -2).unwrap().to_vec();
        assert_eq!(values, vec![i64::MIN + 1]);
    }

    #[test]
    fn test_repeat_n_size_hint() {
        let traversal = repeat_n(0u8, 4).try_traverse().unwrap();
        assert_eq!(traversal.size_hint(), (4, Some(4)));
    }

    #[test]
    fn test_chunk_does_not_pull_after_exhaustion() {
        let mut traversal = chunk(vec![1, 2, 3], 2).unwrap().try_traverse().unwrap();
        assert_eq!(traversal.next(), Some(vec![1, 2]));
        assert_eq!(traversal.next(), Some(vec![3]));
        assert_eq!(traversal.next(), None);
        assert_eq!(traversal.next(), None);
    }

    #[test]
    fn test_cycle_traversal_fused_after_empty_round() {
        let mut traversal = LazyIterator::from_vec(Vec::<i32>::new())
            .cycle()
            .try_traverse()
            .unwrap();
        assert_eq!(traversal.next(), None);
        assert_eq!(traversal.next(), None);
    }

    #[test]
    fn test_zip_stops_pulling_after_either_side_ends() {
        let left_pulls = std::cell::Cell::new(0);
        let counted = range_from(0).inspect(|_| left_pulls.set(left_pulls.get() + 1));
        let mut traversal = zip(counted, vec!['a']).try_traverse().unwrap();
        assert_eq!(traversal.next(), Some((0, 'a')));
        assert_eq!(traversal.next(), None);
        assert_eq!(traversal.next(), None);
        assert_eq!(traversal.next(), None);
        assert_eq!(left_pulls.get(), 2);
        assert_eq!(traversal.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_chunk_capacity_bounded_by_input() {
        let traversal = chunk(vec![1, 2, 3], usize::MAX)
            .unwrap()
            .try_traverse()
            .unwrap();
        assert_eq!(traversal.collect::<Vec<_>>(), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_zip_size_hint_takes_minimum() {
        let traversal = zip(vec![1, 2, 3], vec![4, 5]).try_traverse().unwrap();
        assert_eq!(traversal.size_hint(), (2, Some(2)));
    }
}
