use std::rc::Rc;

use log::trace;

use crate::source::{Location, Source};
use crate::token::{Token, TokenKind};

pub mod error;

pub use error::{LexError, LexResult};

/// Pull-based, single-pass producer of tokens.
///
/// Once the underlying input is exhausted an implementation keeps returning
/// [`TokenKind::EndOfStream`] on every call.
pub trait TokenStream {
    fn next_token(&mut self) -> LexResult<Token>;
}

pub struct Lexer {
    source: Rc<Source>,
    position: usize,
    line_start: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: Rc<Source>) -> Self {
        Self {
            source,
            position: 0,
            line_start: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_trivia()?;

        let location = self.location();
        let Some(ch) = self.peek_char() else {
            return Ok(Token::new(TokenKind::EndOfStream, location));
        };

        let kind = match ch {
            '.' => self.single(TokenKind::Dot),
            '[' => self.single(TokenKind::BracketOpen),
            ']' => self.single(TokenKind::BracketClose),
            '(' => self.single(TokenKind::ParenOpen),
            ')' => self.single(TokenKind::ParenClose),
            '=' => self.single(TokenKind::Assign),
            '"' => self.read_string()?,
            c if c.is_ascii_alphabetic() => self.read_identifier(),
            character => {
                return Err(LexError::UnexpectedCharacter {
                    character,
                    location,
                });
            }
        };
        trace!("token {} at {location}", kind.name());
        Ok(Token::new(kind, location))
    }

    /// Skips whitespace, `#` line comments and `/* */` block comments.
    fn skip_trivia(&mut self) -> LexResult<()> {
        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) {
                self.advance_char();
            } else if ch == '#' {
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance_char();
                }
            } else if ch == '/' {
                let location = self.location();
                self.advance_char();
                if !self.check('*') {
                    return Err(LexError::UnexpectedCharacter {
                        character: '/',
                        location,
                    });
                }
                self.skip_block_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> LexResult<()> {
        loop {
            match self.advance_char() {
                Some('*') if self.check('/') => return Ok(()),
                Some(_) => {}
                None => {
                    return Err(LexError::UnexpectedEnd {
                        location: self.location(),
                    });
                }
            }
        }
    }

    fn read_identifier(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        match &self.source.text()[start..self.position] {
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            ident => TokenKind::Identifier(ident.to_string()),
        }
    }

    fn read_string(&mut self) -> LexResult<TokenKind> {
        self.advance_char(); // Consume opening quote
        let mut value = String::new();
        let mut escaped = false;
        loop {
            let Some(c) = self.advance_char() else {
                return Err(LexError::UnexpectedEnd {
                    location: self.location(),
                });
            };
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => return Ok(TokenKind::String(value)),
                _ => {
                    escaped = false;
                    value.push(c);
                }
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance_char();
        kind
    }
}

impl Lexer {
    fn peek_char(&self) -> Option<char> {
        self.source.text()[self.position..].chars().next()
    }

    fn advance_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = self.position;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn check(&mut self, expected: char) -> bool {
        let found = self.peek_char() == Some(expected);
        if found {
            self.advance_char();
        }
        found
    }

    fn location(&self) -> Location {
        Location::new(
            self.source.clone(),
            self.position,
            self.line_start,
            self.line,
            self.column,
        )
    }
}

/// ASCII whitespace plus vertical tab, which `char::is_ascii_whitespace`
/// leaves out.
fn is_whitespace(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

impl TokenStream for Lexer {
    fn next_token(&mut self) -> LexResult<Token> {
        Lexer::next_token(self)
    }
}

/// Lexes `source` to completion, including the trailing end-of-stream token.
pub fn tokenize(source: Rc<Source>) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_end = token.is_end();
        tokens.push(token);
        if is_end {
            break;
        }
    }
    Ok(tokens)
}
