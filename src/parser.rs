//! Backtracking recursive-descent parser.
//!
//! ```text
//! program      := statement* END
//! statement    := assignment | call_stmt
//! assignment   := variable '=' expr
//! expr         := import_expr | call_stmt | object | '(' object ')'
//!               | list | list_for | STRING
//! list         := '[' expr* ']'
//! list_for     := '[' expr 'for' variable 'in' expr ']'
//! object       := IDENT ('.' IDENT)*
//! variable     := IDENT
//! import_expr  := 'import' '(' STRING ')'
//! call_stmt    := object '(' call_arg* ')'
//! call_arg     := IDENT '=' expr | expr
//! ```
//!
//! Alternatives are tried in order, rewinding the token stream between
//! attempts. When every alternative mismatches, the mismatch of the last one
//! is reported upwards. Repetitions end quietly at the first item that does
//! not match. Lexical errors and import failures are fatal and stop parsing.

use std::rc::Rc;

use log::{debug, trace};

use crate::ast::{Node, NodeKind};
use crate::lexer::{LexError, Lexer};
use crate::source::{Location, Source};
use crate::token::{Token, TokenKind};

pub mod error;
pub mod import;
pub mod rewindable;

pub use error::ParseError;
pub use import::{ImportOutcome, ImportResolver, StaticImportResolver};
pub use rewindable::{RewindableTokenStream, Snapshot};

type Tokens = RewindableTokenStream<Lexer>;

/// Outcome of a production that did not match.
#[derive(Debug)]
enum Failure {
    /// The input does not fit this production; the caller may try another.
    Mismatch(Token),
    /// Committed error; parsing stops.
    Fatal(ParseError),
}

impl From<LexError> for Failure {
    fn from(err: LexError) -> Self {
        Failure::Fatal(ParseError::Lex(err))
    }
}

type Parsed<T> = Result<T, Failure>;

type Production<'r> = fn(&Parser<'r>, &mut Tokens) -> Parsed<Node>;

/// Result of [`Parser::parse`]. An AST is present exactly when no error
/// was reported.
#[derive(Debug)]
pub struct ParseResult {
    ast: Option<Node>,
    errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn ast(&self) -> Option<&Node> {
        self.ast.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_result(self) -> Result<Node, Vec<ParseError>> {
        match self.ast {
            Some(ast) if self.errors.is_empty() => Ok(ast),
            _ => Err(self.errors),
        }
    }
}

pub struct Parser<'r> {
    resolver: &'r dyn ImportResolver,
}

impl<'r> Parser<'r> {
    pub fn new(resolver: &'r dyn ImportResolver) -> Self {
        Self { resolver }
    }

    pub fn parse(&self, source: Rc<Source>) -> ParseResult {
        debug!("parsing {}", source.name());
        let mut tokens = RewindableTokenStream::new(Lexer::new(source));

        match self.parse_program(&mut tokens) {
            Ok(ast) => {
                debug!("parsed {} top-level statements", ast.children().len());
                ParseResult {
                    ast: Some(ast),
                    errors: Vec::new(),
                }
            }
            Err(Failure::Fatal(err)) => {
                debug!("parse failed: {err}");
                ParseResult {
                    ast: None,
                    errors: vec![err],
                }
            }
            // parse_program only fails fatally.
            Err(Failure::Mismatch(token)) => ParseResult {
                ast: None,
                errors: vec![ParseError::UnexpectedEndOfStatements {
                    location: token.location,
                }],
            },
        }
    }

    fn parse_program(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let mut node = Node::new(NodeKind::Program, peek_location(tokens)?);
        self.repeat(tokens, &mut node, Self::parse_statement)?;

        let next = tokens.peek()?;
        if next.is_end() {
            Ok(node)
        } else {
            Err(Failure::Fatal(ParseError::UnexpectedEndOfStatements {
                location: next.location.clone(),
            }))
        }
    }

    fn parse_statement(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let alternatives: [Production<'r>; 2] =
            [Self::parse_assignment, Self::parse_call_statement];
        self.choice(tokens, &alternatives)
    }

    fn parse_assignment(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let mut node = Node::new(NodeKind::Assignment, peek_location(tokens)?);
        node.push(self.parse_variable(tokens)?);
        expect(tokens, TokenKind::Assign)?;
        node.push(self.parse_expr(tokens)?);
        Ok(node)
    }

    fn parse_expr(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let alternatives: [Production<'r>; 7] = [
            Self::parse_import,
            Self::parse_call_statement,
            Self::parse_object,
            Self::parse_parenthesized,
            Self::parse_list,
            Self::parse_list_for,
            Self::parse_string,
        ];
        self.choice(tokens, &alternatives)
    }

    fn parse_parenthesized(&self, tokens: &mut Tokens) -> Parsed<Node> {
        expect(tokens, TokenKind::ParenOpen)?;
        let node = self.parse_object(tokens)?;
        expect(tokens, TokenKind::ParenClose)?;
        Ok(node)
    }

    fn parse_list(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let mut node = Node::new(NodeKind::List, peek_location(tokens)?);
        expect(tokens, TokenKind::BracketOpen)?;
        self.repeat(tokens, &mut node, Self::parse_expr)?;
        expect(tokens, TokenKind::BracketClose)?;
        Ok(node)
    }

    fn parse_list_for(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let mut node = Node::new(NodeKind::ListFor, peek_location(tokens)?);
        expect(tokens, TokenKind::BracketOpen)?;
        node.push(self.parse_expr(tokens)?);
        expect(tokens, TokenKind::For)?;
        node.push(self.parse_variable(tokens)?);
        expect(tokens, TokenKind::In)?;
        node.push(self.parse_expr(tokens)?);
        expect(tokens, TokenKind::BracketClose)?;
        Ok(node)
    }

    /// `a.b.c` becomes `c( b( a ) )`: each segment wraps the previous one.
    fn parse_object(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let (name, location) = identifier(tokens)?;
        let mut node = Node::with_text(NodeKind::Object, location, name);

        loop {
            let snapshot = tokens.snapshot();
            match expect(tokens, TokenKind::Dot) {
                Ok(_) => {}
                Err(Failure::Mismatch(_)) => {
                    tokens.rewind(snapshot);
                    return Ok(node);
                }
                Err(fatal) => return Err(fatal),
            }
            let (name, location) = identifier(tokens)?;
            let mut outer = Node::with_text(NodeKind::Object, location, name);
            outer.push(node);
            node = outer;
        }
    }

    fn parse_variable(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let (name, location) = identifier(tokens)?;
        Ok(Node::with_text(NodeKind::Variable, location, name))
    }

    fn parse_string(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let token = tokens.next()?;
        match token.kind {
            TokenKind::String(value) => {
                Ok(Node::with_text(NodeKind::String, token.location, value))
            }
            _ => Err(Failure::Mismatch(token)),
        }
    }

    fn parse_import(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let keyword = tokens.next()?;
        if !matches!(&keyword.kind, TokenKind::Identifier(name) if name == "import") {
            return Err(Failure::Mismatch(keyword));
        }
        expect(tokens, TokenKind::ParenOpen)?;
        let target = tokens.next()?;
        let specifier = match target.kind {
            TokenKind::String(specifier) => specifier,
            _ => return Err(Failure::Mismatch(target)),
        };
        expect(tokens, TokenKind::ParenClose)?;

        trace!("resolving import {specifier:?}");
        match self.resolver.resolve(&specifier) {
            ImportOutcome::Program(source) => {
                trace!("parsing imported program {}", source.name());
                let mut nested = RewindableTokenStream::new(Lexer::new(source));
                self.parse_program(&mut nested)
            }
            ImportOutcome::External => Err(Failure::Fatal(ParseError::UnknownImportType {
                specifier,
                location: keyword.location,
            })),
            ImportOutcome::Failed => Err(Failure::Fatal(ParseError::ImportFailed {
                specifier,
                location: keyword.location,
            })),
        }
    }

    fn parse_call_statement(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let mut node = Node::new(NodeKind::Call, peek_location(tokens)?);
        node.push(self.parse_object(tokens)?);
        expect(tokens, TokenKind::ParenOpen)?;
        self.repeat(tokens, &mut node, Self::parse_call_arg)?;
        expect(tokens, TokenKind::ParenClose)?;
        Ok(node)
    }

    fn parse_call_arg(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let alternatives: [Production<'r>; 2] = [Self::parse_kwarg, Self::parse_expr];
        self.choice(tokens, &alternatives)
    }

    fn parse_kwarg(&self, tokens: &mut Tokens) -> Parsed<Node> {
        let (name, location) = identifier(tokens)?;
        let mut node = Node::with_text(NodeKind::Kwarg, location, name);
        expect(tokens, TokenKind::Assign)?;
        node.push(self.parse_expr(tokens)?);
        Ok(node)
    }

    /// Ordered choice. Rewinds after every mismatch and re-raises the last one.
    fn choice(&self, tokens: &mut Tokens, alternatives: &[Production<'r>]) -> Parsed<Node> {
        let snapshot = tokens.snapshot();
        let mut last = None;
        for alternative in alternatives {
            match alternative(self, tokens) {
                Ok(node) => return Ok(node),
                Err(Failure::Mismatch(token)) => {
                    tokens.rewind(snapshot);
                    last = Some(token);
                }
                Err(fatal) => return Err(fatal),
            }
        }
        match last {
            Some(token) => Err(Failure::Mismatch(token)),
            None => Err(Failure::Mismatch(tokens.next()?)),
        }
    }

    /// Zero or more `production`s appended to `node`.
    fn repeat(
        &self,
        tokens: &mut Tokens,
        node: &mut Node,
        production: Production<'r>,
    ) -> Parsed<()> {
        loop {
            let snapshot = tokens.snapshot();
            match production(self, tokens) {
                Ok(child) => node.push(child),
                Err(Failure::Mismatch(_)) => {
                    tokens.rewind(snapshot);
                    return Ok(());
                }
                Err(fatal) => return Err(fatal),
            }
        }
    }
}

fn peek_location(tokens: &mut Tokens) -> Parsed<Location> {
    Ok(tokens.peek()?.location.clone())
}

fn expect(tokens: &mut Tokens, kind: TokenKind) -> Parsed<Token> {
    let token = tokens.next()?;
    if token.kind.same_kind(&kind) {
        Ok(token)
    } else {
        Err(Failure::Mismatch(token))
    }
}

fn identifier(tokens: &mut Tokens) -> Parsed<(String, Location)> {
    let token = tokens.next()?;
    match token.kind {
        TokenKind::Identifier(name) => Ok((name, token.location)),
        _ => Err(Failure::Mismatch(token)),
    }
}

/// Parses `source` with a resolver that rejects every import.
pub fn parse_standalone(source: Rc<Source>) -> ParseResult {
    Parser::new(&StaticImportResolver::new()).parse(source)
}
