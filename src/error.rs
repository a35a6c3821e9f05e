use crate::reader::TextPos;

pub type Result<T> = std::result::Result<T, Error>;

/// A list of all possible errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input ended in the middle of a construct that required more of it.
    #[error("unexpected end of stream at {0}")]
    UnexpectedEndOfStream(TextPos),

    /// A literal character did not match the required character or set.
    #[error("expected {expected}, found '{found}' at {pos}")]
    UnexpectedChar {
        expected: &'static str,
        found: char,
        pos: TextPos,
    },

    /// A required multi-character delimiter was not found.
    #[error("expected '{expected}' at {pos}")]
    UnexpectedString {
        expected: &'static str,
        pos: TextPos,
    },

    /// A token failed the XML name production.
    #[error("invalid name at {0}")]
    InvalidName(TextPos),

    /// A second attribute with the same name on one element.
    #[error("attribute '{name}' at {pos} is already defined")]
    DuplicatedAttribute { name: String, pos: TextPos },

    /// A close tag did not match the open element.
    #[error("expected '</{expected}>', not '</{found}>' at {pos}")]
    UnexpectedCloseTag {
        expected: String,
        found: String,
        pos: TextPos,
    },

    /// A reference to an entity missing from the entity table.
    #[error("unknown entity reference '{name}' at {pos}")]
    UnknownEntityReference { name: String, pos: TextPos },

    /// The declaration version literal is not `1.` followed by digits.
    #[error("invalid version literal '{value}' at {pos}")]
    InvalidVersion { value: String, pos: TextPos },

    /// The declaration `standalone` value is neither `yes` nor `no`.
    #[error("standalone must be 'yes' or 'no', found '{value}' at {pos}")]
    InvalidStandalone { value: String, pos: TextPos },

    /// A tree mutation that would break the document structure.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// A whitespace node was given a value with non-whitespace characters.
    #[error("value is not all whitespace")]
    NotAllWhitespace,

    /// A node list detected a structural change of the underlying list
    /// while iterating it.
    #[error("node list changed during iteration")]
    ListChanged,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the position in the source text, for parse errors.
    pub fn pos(&self) -> Option<TextPos> {
        match *self {
            Error::UnexpectedEndOfStream(pos) => Some(pos),
            Error::UnexpectedChar { pos, .. } => Some(pos),
            Error::UnexpectedString { pos, .. } => Some(pos),
            Error::InvalidName(pos) => Some(pos),
            Error::DuplicatedAttribute { pos, .. } => Some(pos),
            Error::UnexpectedCloseTag { pos, .. } => Some(pos),
            Error::UnknownEntityReference { pos, .. } => Some(pos),
            Error::InvalidVersion { pos, .. } => Some(pos),
            Error::InvalidStandalone { pos, .. } => Some(pos),
            _ => None,
        }
    }
}
