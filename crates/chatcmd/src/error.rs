//! Error types for grammar matching and dispatch.

use thiserror::Error;

/// Why a matcher (or the dispatch engine) rejected an input.
///
/// The `Display` form is the user-facing message; the caller decides how to
/// present it. Grammar failures are always values, never panics: a rejected
/// branch is ordinary data the engine weighs against its sibling branches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Input did not start with the expected literal word.
    #[error("Expected '{0}'")]
    ExpectedLiteral(String),

    /// Input did not start with a numeric token.
    #[error("Expected a number for '{0}'")]
    ExpectedNumber(String),

    /// A quoted string was opened but never closed.
    #[error("Expected matching quote")]
    UnterminatedQuote,

    /// Fewer than three coordinate components could be read.
    #[error("Invalid position")]
    InvalidPosition,

    /// Caret components mixed with absolute or relative ones.
    #[error("Local axis must be used together, they cannot be mixed with local and absolute coordinates.")]
    MixedCoordinateModes,

    /// A `requires` gate predicate evaluated false; carries the gate's
    /// static message.
    #[error("{0}")]
    GateRefused(String),

    /// Input ran out before reaching an executable node.
    #[error("Unexpected end of command")]
    UnexpectedEnd,

    /// A node matched but had no children to continue with.
    #[error("No results found")]
    NoResults,

    /// Free-form failure from a custom matcher.
    #[error("{0}")]
    Custom(String),
}
