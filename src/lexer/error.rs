use thiserror::Error;

use crate::source::Location;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected character '{character}'")]
    UnexpectedCharacter { character: char, location: Location },
    #[error("Unexpected end")]
    UnexpectedEnd { location: Location },
}

impl LexError {
    pub fn location(&self) -> &Location {
        match self {
            LexError::UnexpectedCharacter { location, .. }
            | LexError::UnexpectedEnd { location } => location,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;
