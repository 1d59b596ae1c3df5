//! Core error types

use crate::classifier::DelimiterClass;
use thiserror::Error;

/// Errors raised while assembling core building blocks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A character was listed in more than one delimiter set
    #[error("character {ch:?} is listed as both {first} and {second} delimiter")]
    OverlappingDelimiter {
        /// The offending character
        ch: char,
        /// The class that wins by precedence
        first: DelimiterClass,
        /// The class that loses by precedence
        second: DelimiterClass,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_delimiter_display() {
        let err = CoreError::OverlappingDelimiter {
            ch: ',',
            first: DelimiterClass::Strong,
            second: DelimiterClass::Weak,
        };
        assert_eq!(
            err.to_string(),
            "character ',' is listed as both strong and weak delimiter"
        );
    }
}
