use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum TemplateError {
    /// A `{%`, `{{` or `{#` construct that never closes.
    #[error("Unterminated '{opening}' on line {line}")]
    Unterminated { opening: &'static str, line: usize },

    #[error("Unclosed '{tag}' tag opened on line {line}")]
    Unclosed { tag: String, line: usize },

    #[error("'{tag}' on line {line} does not close an open tag")]
    Orphaned { tag: String, line: usize },

    #[error("endblock '{found}' on line {line} does not match open block '{expected}'")]
    MismatchedEndBlock {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("Block '{name}' is defined more than once (line {line})")]
    DuplicateBlock { name: String, line: usize },

    #[error("A template may only extend one parent (line {line})")]
    MultipleExtends { line: usize },

    #[error("Malformed '{tag}' tag on line {line}")]
    Malformed { tag: String, line: usize },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
