//! Asynchronous sources.
//!
//! The asynchronous counterpart of [`SequenceSource`]: a traversal is a
//! [`Stream`] instead of an [`Iterator`], so a pull may suspend until an
//! external completion arrives.

use std::fmt;

use futures::Stream;
use parking_lot::Mutex;

use crate::sequence::{SequenceError, SequenceSource};

/// A producer of independent asynchronous traversals.
///
/// `traverse` only builds the stream; nothing is awaited until the stream is
/// polled.
pub trait AsyncSequenceSource {
    /// The element type.
    type Item;

    /// The stream for a single traversal.
    type Traversal: Stream<Item = Self::Item>;

    /// Starts a fresh traversal.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::AlreadyConsumed`] when the source wraps a
    /// one-shot stream that has already been traversed.
    fn traverse(&self) -> Result<Self::Traversal, SequenceError>;
}

/// A restartable asynchronous source built from a stream factory.
#[derive(Clone)]
pub struct AsyncProducer<F> {
    factory: F,
}

impl<F> AsyncProducer<F> {
    pub(crate) const fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> fmt::Debug for AsyncProducer<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("AsyncProducer").finish_non_exhaustive()
    }
}

impl<F, St> AsyncSequenceSource for AsyncProducer<F>
where
    F: Fn() -> St,
    St: Stream,
{
    type Item = St::Item;
    type Traversal = St;

    fn traverse(&self) -> Result<St, SequenceError> {
        Ok((self.factory)())
    }
}

/// A one-shot asynchronous source over an existing stream.
pub struct OnceStream<St> {
    slot: Mutex<Option<St>>,
}

impl<St> OnceStream<St> {
    pub(crate) fn new(stream: St) -> Self {
        Self {
            slot: Mutex::new(Some(stream)),
        }
    }

    /// Returns `true` once the stream has been handed to a traversal.
    pub fn is_consumed(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<St> fmt::Debug for OnceStream<St> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OnceStream")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl<St: Stream> AsyncSequenceSource for OnceStream<St> {
    type Item = St::Item;
    type Traversal = St;

    fn traverse(&self) -> Result<St, SequenceError> {
        self.slot.lock().take().ok_or(SequenceError::AlreadyConsumed {
            operation: "from_stream",
        })
    }
}

/// A synchronous source viewed as an asynchronous one.
///
/// Its streams never suspend.
#[derive(Debug, Clone)]
pub struct Lifted<S> {
    source: S,
}

impl<S> Lifted<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SequenceSource> AsyncSequenceSource for Lifted<S> {
    type Item = S::Item;
    type Traversal = futures::stream::Iter<S::Traversal>;

    fn traverse(&self) -> Result<Self::Traversal, SequenceError> {
        Ok(futures::stream::iter(self.source.traverse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::executor::block_on;

    #[test]
    fn test_async_producer_restarts() {
        let source = AsyncProducer::new(|| futures::stream::iter(vec![1, 2]));
        let first: Vec<_> = block_on(source.traverse().unwrap().collect());
        let second: Vec<_> = block_on(source.traverse().unwrap().collect());
        assert_eq!(first, vec![1, 2]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_once_stream_refuses_second_traversal() {
        let source = OnceStream::new(futures::stream::iter(vec!['a']));
        assert!(source.traverse().is_ok());
        assert!(source.is_consumed());
        assert_eq!(
            source.traverse().unwrap_err(),
            SequenceError::AlreadyConsumed {
                operation: "from_stream"
            }
        );
    }
}
