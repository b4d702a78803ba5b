use thiserror::Error;

use crate::lexer::LexError;
use crate::source::Location;

/// User-visible parse failure. Grammar mismatches never surface as one of
/// these; they are resolved by backtracking inside the parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Unexpected end of statements")]
    UnexpectedEndOfStatements { location: Location },
    #[error("Import failed")]
    ImportFailed {
        specifier: String,
        location: Location,
    },
    #[error("Unknown import type")]
    UnknownImportType {
        specifier: String,
        location: Location,
    },
}

impl ParseError {
    pub fn location(&self) -> &Location {
        match self {
            ParseError::Lex(err) => err.location(),
            ParseError::UnexpectedEndOfStatements { location }
            | ParseError::ImportFailed { location, .. }
            | ParseError::UnknownImportType { location, .. } => location,
        }
    }
}
