// Typed errors for the recommendation core.
//
// The resolver and artifact constructors return these so callers can tell a
// recoverable "try another title" apart from a broken similarity space.
// Application plumbing (file loading, CLI) wraps them in anyhow.

/// Title resolution failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing in the catalog matches the query, even loosely.
    /// `query` is the user's original string, untouched, for display.
    #[error("Sorry, '{query}' not found in our database. Please try another movie.")]
    NotFound { query: String },
}

/// A similarity artifact violates its construction contract.
///
/// These indicate a bug in whatever built the artifacts, not a runtime
/// condition to recover from at scoring time.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ArtifactError {
    #[error("similarity matrix is not square: {values} values for dimension {dim}")]
    NotSquare { dim: usize, values: usize },

    #[error("index has {titles} titles but the matrix dimension is {dim}")]
    DimensionMismatch { titles: usize, dim: usize },

    #[error("title '{title}' appears at both index {first} and index {second}")]
    DuplicateTitle {
        title: String,
        first: usize,
        second: usize,
    },

    #[error("similarity index names '{0}', which is not in the catalog")]
    UnknownTitle(String),

    #[error("genre weight must be within 0.0..=1.0, got {0}")]
    InvalidGenreWeight(f64),
}
