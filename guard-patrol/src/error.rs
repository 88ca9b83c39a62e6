use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Input that cannot be turned into a map. Nothing is simulated when one of
/// these is returned.
#[derive(Debug, Error, Diagnostic)]
pub enum MapError {
    #[error("map contains no tiles")]
    #[diagnostic(code(guard_patrol::empty_map))]
    Empty,

    #[error("unexpected character {glyph:?} in map")]
    #[diagnostic(
        code(guard_patrol::unexpected_glyph),
        help("maps may only contain '.', '#' and one of '^', 'v', '<', '>'")
    )]
    UnexpectedGlyph {
        glyph: char,
        #[source_code]
        src: String,
        #[label("not a map tile")]
        span: SourceSpan,
    },

    #[error("row {row} is {found} tiles wide, expected {expected}")]
    #[diagnostic(code(guard_patrol::ragged_rows))]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
        #[source_code]
        src: String,
        #[label("this row")]
        span: SourceSpan,
    },

    #[error("no guard found in map")]
    #[diagnostic(
        code(guard_patrol::missing_guard),
        help("mark the guard's start with '^', 'v', '<' or '>'")
    )]
    MissingGuard,

    #[error("more than one guard found in map")]
    #[diagnostic(code(guard_patrol::multiple_guards))]
    MultipleGuards {
        #[source_code]
        src: String,
        #[label("first guard")]
        first: SourceSpan,
        #[label("another guard")]
        second: SourceSpan,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum PatrolError {
    /// The pose history should always catch a loop before this fires.
    #[error("guard made {moves} moves without exiting or looping (cap {cap})")]
    #[diagnostic(code(guard_patrol::safety_cap_exceeded))]
    SafetyCapExceeded { moves: usize, cap: usize },
}
