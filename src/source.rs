//! Source buffers and the locations that point back into them.
//!
//! Every token and AST node carries a [`Location`]. A location holds a
//! reference-counted handle to its [`Source`], so the text it points into
//! stays alive for as long as anything refers to it.

use std::fmt;
use std::rc::Rc;

/// A named, immutable source text.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    name: String,
    text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            text: text.into(),
        })
    }

    /// Anonymous source, used for inline snippets and tests.
    pub fn from_text(text: impl Into<String>) -> Rc<Self> {
        Self::new("<input>", text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Position of a token or node inside a [`Source`].
///
/// Lines and columns are 1-based; `offset` and `line_start` are byte offsets.
#[derive(Clone)]
pub struct Location {
    source: Rc<Source>,
    offset: usize,
    line_start: usize,
    line: usize,
    column: usize,
}

impl Location {
    pub(crate) fn new(
        source: Rc<Source>,
        offset: usize,
        line_start: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            source,
            offset,
            line_start,
            line,
            column,
        }
    }

    /// Location of the first character of `source`.
    pub fn start_of(source: &Rc<Source>) -> Self {
        Self::new(source.clone(), 0, 0, 1, 1)
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Full text of the line this location is on, without the newline.
    pub fn line_text(&self) -> &str {
        let rest = &self.source.text[self.line_start..];
        rest.split('\n').next().unwrap_or("")
    }

    /// Renders the source line with a caret under this location.
    ///
    /// ```text
    /// x = y
    ///     ^-- Undefined variable 'y'
    /// ```
    pub fn annotate(&self, message: &str) -> String {
        let padding = " ".repeat(self.column.saturating_sub(1));
        format!("{}\n{padding}^-- {message}", self.line_text())
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source) && self.offset == other.offset
    }
}

impl Eq for Location {}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.name, self.line, self.column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.name, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotates_the_line_under_the_column() {
        let source = Source::from_text("a = \"x\"\nb = missing\n");
        let location = Location::new(source, 12, 8, 2, 5);
        assert_eq!(location.line_text(), "b = missing");
        assert_eq!(
            location.annotate("Undefined variable 'missing'"),
            "b = missing\n    ^-- Undefined variable 'missing'"
        );
    }

    #[test]
    fn locations_compare_by_source_identity_and_offset() {
        let first = Source::from_text("abc");
        let second = Source::from_text("abc");
        assert_eq!(Location::start_of(&first), Location::start_of(&first));
        assert_ne!(Location::start_of(&first), Location::start_of(&second));
    }
}
