use thiserror::Error;

/// Errors returned by indexing, ranking and grouping in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required argument was empty.
    #[error("empty input: {what}")]
    EmptyInput {
        /// Name of the empty argument.
        what: &'static str,
    },

    /// An index pipeline phase was called before the phase it depends on.
    #[error("index phase `{phase}` called before its inputs were built")]
    NotIndexed {
        /// The phase that was invoked too early.
        phase: &'static str,
    },

    /// The matrix is too small for a truncated SVD.
    #[error("degenerate matrix {rows}x{cols}: svd rank {rank} is below 1")]
    Degenerate {
        /// Row count of the decomposed matrix.
        rows: usize,
        /// Column count of the decomposed matrix.
        cols: usize,
        /// Rank the reduction asked for.
        rank: usize,
    },

    /// Two vectors or matrices disagree on a dimension.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A configuration value is out of its accepted range.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A singleton map was expected but a different number of entries was given.
    #[error("expected exactly one entry, found {found}")]
    SingletonExpected {
        /// Number of entries supplied.
        found: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
