use crate::lexer::{LexResult, TokenStream};
use crate::token::Token;

/// Opaque cursor position handed out by [`RewindableTokenStream::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot(usize);

/// Buffers every token pulled from the underlying stream so the parser can
/// back up to an earlier position. Buffered tokens are never pulled twice.
pub struct RewindableTokenStream<S> {
    source: S,
    buffer: Vec<Token>,
    cursor: usize,
}

impl<S: TokenStream> RewindableTokenStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    pub fn next(&mut self) -> LexResult<Token> {
        self.fill()?;
        let token = self.buffer[self.cursor].clone();
        self.cursor += 1;
        Ok(token)
    }

    pub fn peek(&mut self) -> LexResult<&Token> {
        self.fill()?;
        Ok(&self.buffer[self.cursor])
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.cursor)
    }

    pub fn rewind(&mut self, snapshot: Snapshot) {
        debug_assert!(snapshot.0 <= self.buffer.len());
        self.cursor = snapshot.0;
    }

    /// Makes sure a token exists at the cursor.
    fn fill(&mut self) -> LexResult<()> {
        if self.cursor == self.buffer.len() {
            let token = self.source.next_token()?;
            self.buffer.push(token);
        }
        Ok(())
    }
}
