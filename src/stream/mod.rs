//! Asynchronous lazy sequences.
//!
//! This module integrates asynchronous producers into the lazy-pull model of
//! [`crate::sequence`]. A traversal is a [`futures::Stream`]; terminal
//! consumers are `async fn`s and work on any executor.
//!
//! - [`AsyncSequenceSource`]: a producer of independent stream traversals
//! - [`AsyncLazyIterator`]: combinators and asynchronous terminal consumers
//! - [`from_async`]: restartable, from a stream factory
//! - [`from_stream`]: one-shot, from an existing stream
//! - [`LazyIterator::into_async`](crate::sequence::LazyIterator::into_async):
//!   lifts a synchronous pipeline
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::sequence::range;
//! use futures::executor::block_on;
//!
//! let lifted = range(0, 5).into_async().skip(1).map(|n, index| (index, n));
//! assert_eq!(block_on(lifted.first()), Some((0, 1)));
//! ```

mod adapters;
mod async_lazy_iterator;
mod source;

pub use adapters::{
    AsyncEnumerate, AsyncFilter, AsyncMap, AsyncSkip, AsyncTake, EnumerateStream, FilterStream,
    MapStream, SkipStream, TakeStream,
};
pub use async_lazy_iterator::{AsyncLazyIterator, from_async, from_stream};
pub use source::{AsyncProducer, AsyncSequenceSource, Lifted, OnceStream};

static_assertions::assert_impl_all!(
    AsyncLazyIterator<Lifted<crate::sequence::Items<u32>>>: Send, Sync, Clone
);
static_assertions::assert_impl_all!(
    AsyncLazyIterator<OnceStream<futures::stream::Iter<std::vec::IntoIter<u8>>>>: Send, Sync
);
