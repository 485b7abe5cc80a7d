//! # Error Types

use core::fmt;

/// Errors reported by the query engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A name-list query asked for more names than the result mask has bits
    TooManyNames {
        /// Number of names passed
        given: usize,
        /// Maximum number of names per query
        max: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyNames { given, max } => {
                write!(f, "Too many feature names: {given} given, at most {max} per query")
            },
        }
    }
}

impl core::error::Error for Error {}

/// Result type for query operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::TooManyNames { given: 33, max: 32 };
        assert_eq!(err.to_string(), "Too many feature names: 33 given, at most 32 per query");
    }
}
