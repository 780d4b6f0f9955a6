use crate::tokenizer::CommandKind;

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Fatal problems with the input document as a whole.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected an <svg> root element, found <{found}>")]
    MissingRoot { found: String },
}

/// A single path element's `d` data could not be interpreted.
///
/// Recovered locally: the element yields no shape and extraction continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathCommandError {
    #[error("path data has content before the first command at offset {offset}")]
    DataBeforeCommand { offset: usize },

    #[error("unknown path command '{letter}' at offset {offset}")]
    UnknownCommand { letter: char, offset: usize },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("path data must start with a move command, found {found:?}")]
    MissingMoveTo { found: CommandKind },

    #[error("{command:?} takes arguments in groups of {expected}, got {found}")]
    BadArity {
        command: CommandKind,
        expected: usize,
        found: usize,
    },

    #[error("path produces more than {limit} segments")]
    TooManySegments { limit: usize },
}

/// A fill value matched none of the recognised colour syntaxes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognised colour value '{value}'")]
pub struct ColorFormatError {
    pub value: String,
}
