//! Lazy, restartable sequences.
//!
//! This module provides the synchronous sequence engine:
//!
//! - [`SequenceSource`]: a producer of independent traversals
//! - [`LazyIterator`]: the chainable handle with combinators and terminal consumers
//! - Free constructors: [`range`], [`range_step`], [`range_from`], [`repeat`],
//!   [`repeat_n`], [`cycle`], [`enumerate`], [`zip`], [`chunk`], [`flatten`]
//! - [`SequenceError`]: construction and restart failures
//!
//! # Examples
//!
//! ## Bounding an infinite source
//!
//! ```rust
//! use lazyseq::sequence::range_from;
//!
//! let first_squares = range_from(1).map(|n, _| n * n).take(4);
//! assert_eq!(first_squares.to_vec(), vec![1, 4, 9, 16]);
//! ```
//!
//! ## Reusing a pipeline
//!
//! ```rust
//! use lazyseq::sequence::LazyIterator;
//!
//! let words = LazyIterator::from_vec(vec!["lazy", "seq", "engine"])
//!     .filter(|word| word.len() > 3);
//!
//! assert_eq!(words.count(), 2);
//! assert_eq!(words.first(), Some("lazy"));
//! assert_eq!(words.last(), Some("engine"));
//! ```

mod adapters;
mod constructors;
mod error;
mod lazy_iterator;
mod source;

pub use adapters::{
    Chain, ChainTraversal, Filter, FilterTraversal, Inspect, InspectTraversal, Map, MapTraversal,
    Skip, SkipTraversal, SkipWhile, SkipWhileTraversal, Take, TakeTraversal, TakeWhile,
    TakeWhileTraversal,
};
pub use constructors::{
    Chunk, ChunkTraversal, Cycle, CycleTraversal, Enumerate, EnumerateTraversal, Flatten,
    FlattenTraversal, Range, RangeTraversal, Repeat, RepeatTraversal, Zip, ZipTraversal, chunk,
    cycle, enumerate, flatten, range, range_from, range_step, repeat, repeat_n, zip,
};
pub use error::SequenceError;
pub use lazy_iterator::LazyIterator;
pub use source::{Empty, IntoSequence, Items, ItemsTraversal, Once, Producer, SequenceSource};

static_assertions::assert_impl_all!(LazyIterator<Items<String>>: Send, Sync, Clone);
static_assertions::assert_impl_all!(LazyIterator<Range>: Send, Sync, Clone);
static_assertions::assert_impl_all!(LazyIterator<Once<std::vec::IntoIter<u8>>>: Send, Sync);
