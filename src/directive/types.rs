use thiserror::Error;

/// Errors produced while scanning or parsing directive text.
///
/// Line numbers are 1-based and refer to the configuration input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("line {line}: wrong argument count or unexpected line ending after '{token}'")]
    ArgCount { line: usize, token: String },

    #[error("line {line}: unrecognized subdirective '{name}'")]
    UnknownSubdirective { line: usize, name: String },

    #[error("line {line}: expected directive '{expected}', got '{found}'")]
    UnexpectedDirective {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: unterminated quoted value")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: unexpected '}}'")]
    UnexpectedClose { line: usize },

    #[error("line {line}: block is never closed")]
    UnclosedBlock { line: usize },
}
