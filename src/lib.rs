//! # lazyseq
//!
//! Restartable lazy sequences for Rust.
//!
//! ## Overview
//!
//! A pipeline is a description, not a computation. Nothing runs until a
//! terminal consumer asks for results, and one pipeline can be consumed any
//! number of times without being rebuilt. It includes:
//!
//! - **Sources**: containers, producers, one-shot iterators, ranges, repetition, cycles
//! - **Combinators**: `map`, `filter`, `take`, `skip`, `zip`, `chunk`, `flatten`, ...
//! - **Terminal consumers**: `to_vec`, `fold`, `for_each`, `find`, `any`, `all`,
//!   `first`, `last`, `count`
//! - **Asynchronous sources**: streams pulled through the same lazy model
//!
//! ## Feature Flags
//!
//! - `sequence`: Synchronous sequences
//! - `async`: Asynchronous sequences over `futures::Stream`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lazyseq::prelude::*;
//!
//! let colors = cycle(["red", "green", "blue"]).unwrap().take(4);
//! assert_eq!(colors.to_vec(), vec!["red", "green", "blue", "red"]);
//! assert_eq!(colors.count(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, traits and constructors.
///
/// # Usage
///
/// ```rust
/// use lazyseq::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "sequence")]
    pub use crate::sequence::*;

    #[cfg(feature = "async")]
    pub use crate::stream::*;
}

#[cfg(feature = "sequence")]
pub mod sequence;

#[cfg(feature = "async")]
pub mod stream;

#[cfg(all(test, feature = "sequence"))]
mod tests {
    #[test]
    fn prelude_exposes_constructors() {
        use crate::prelude::*;
        assert_eq!(range(0, 3).to_vec(), vec![0, 1, 2]);
    }
}
