use std::fmt;

use crate::source::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    String(String),

    // Keywords
    For,
    In,

    // Delimiters
    Dot,          // .
    BracketOpen,  // [
    BracketClose, // ]
    ParenOpen,    // (
    ParenClose,   // )
    Assign,       // =

    EndOfStream,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "IDENTIFIER",
            TokenKind::String(_) => "STRING",
            TokenKind::For => "FOR",
            TokenKind::In => "IN",
            TokenKind::Dot => "DOT",
            TokenKind::BracketOpen => "BRACK_OPEN",
            TokenKind::BracketClose => "BRACK_CLOSE",
            TokenKind::ParenOpen => "PAR_OPEN",
            TokenKind::ParenClose => "PAR_CLOSE",
            TokenKind::Assign => "ASSIGN",
            TokenKind::EndOfStream => "EOS",
        }
    }

    /// Discriminant-only comparison, ignoring any text payload.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self { kind, location }
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfStream)
    }
}
