//! Error types for sequence construction and traversal.
//!
//! Structural mistakes (a zero step, an empty cycle) are reported when the
//! source is built, never deferred to traversal time. Errors raised by user
//! callbacks are not represented here: they travel through the `try_*`
//! consumers unchanged.

use std::fmt;

/// Errors reported by sequence constructors and by sources that cannot
/// start another traversal.
///
/// # Examples
///
/// ```rust
/// use lazyseq::sequence::{SequenceError, range_step};
///
/// let error = range_step(0, 10, 0).unwrap_err();
/// assert_eq!(
///     error,
///     SequenceError::InvalidArgument {
///         operation: "range_step",
///         parameter: "step",
///         reason: "must not be zero",
///     }
/// );
/// assert_eq!(
///     format!("{error}"),
///     "range_step: invalid argument `step`: must not be zero"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// A constructor received a structurally invalid parameter.
    InvalidArgument {
        /// The constructor or combinator that rejected the argument.
        operation: &'static str,
        /// The name of the offending parameter.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// An operation that needs at least one element received none.
    EmptySource {
        /// The constructor that received the empty input.
        operation: &'static str,
    },
    /// A one-shot source was asked for a second traversal.
    AlreadyConsumed {
        /// The kind of one-shot source.
        operation: &'static str,
    },
}

impl SequenceError {
    pub(crate) const fn invalid_argument(
        operation: &'static str,
        parameter: &'static str,
        reason: &'static str,
    ) -> Self {
        Self::InvalidArgument {
            operation,
            parameter,
            reason,
        }
    }

    /// Returns the name of the operation that reported the error.
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::InvalidArgument { operation, .. }
            | Self::EmptySource { operation }
            | Self::AlreadyConsumed { operation } => operation,
        }
    }
}

impl fmt::Display for SequenceError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument {
                operation,
                parameter,
                reason,
            } => write!(
                formatter,
                "{operation}: invalid argument `{parameter}`: {reason}"
            ),
            Self::EmptySource { operation } => {
                write!(formatter, "{operation}: source must not be empty")
            }
            Self::AlreadyConsumed { operation } => write!(
                formatter,
                "{operation}: source already consumed and cannot be traversed again"
            ),
        }
    }
}

impl std::error::Error for SequenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let error = SequenceError::invalid_argument("chunk", "size", "must be greater than zero");
        assert_eq!(
            format!("{error}"),
            "chunk: invalid argument `size`: must be greater than zero"
        );
    }

    #[test]
    fn test_empty_source_display() {
        let error = SequenceError::EmptySource { operation: "cycle" };
        assert_eq!(format!("{error}"), "cycle: source must not be empty");
    }

    #[test]
    fn test_already_consumed_display() {
        let error = SequenceError::AlreadyConsumed { operation: "once" };
        assert_eq!(
            format!("{error}"),
            "once: source already consumed and cannot be traversed again"
        );
    }

    #[test]
    fn test_operation_accessor() {
        assert_eq!(
            SequenceError::invalid_argument("range_step", "step", "must not be zero").operation(),
            "range_step"
        );
        assert_eq!(SequenceError::EmptySource { operation: "cycle" }.operation(), "cycle");
        assert_eq!(
            SequenceError::AlreadyConsumed {
                operation: "from_stream"
            }
            .operation(),
            "from_stream"
        );
    }

    #[test]
    fn test_error_equality() {
        let first = SequenceError::EmptySource { operation: "cycle" };
        let second = SequenceError::EmptySource { operation: "cycle" };
        let third = SequenceError::AlreadyConsumed { operation: "cycle" };
        assert_eq!(first, second);
        assert_ne!(first, third);
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(SequenceError::EmptySource { operation: "cycle" });
        assert_eq!(error.to_string(), "cycle: source must not be empty");
    }
}
