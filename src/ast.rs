//! Syntax tree produced by the parser and walked by the interpreter.
//!
//! Every node is a [`Node`]: a tag, the location it was parsed at, an optional
//! literal (identifier, attribute or keyword name, string contents) and its
//! ordered children. Child arity is fixed per tag:
//!
//! | tag          | text        | children                          |
//! |--------------|-------------|-----------------------------------|
//! | `Program`    |             | statements                        |
//! | `Assignment` |             | `Variable`, value                 |
//! | `Call`       |             | callee `Object`, arguments        |
//! | `Kwarg`      | keyword     | value                             |
//! | `List`       |             | entries                           |
//! | `ListFor`    |             | body, loop `Variable`, source     |
//! | `Object`     | name        | none, or the inner `Object`       |
//! | `Variable`   | name        | none                              |
//! | `String`     | contents    | none                              |
//!
//! Attribute chains nest right to left: `a.b.c` is
//! `Object:c( Object:b( Object:a ) )`.

use std::fmt;

use crate::source::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Assignment,
    Call,
    Kwarg,
    List,
    ListFor,
    Object,
    Variable,
    String,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::Assignment => "ASSIGNMENT_STATEMENT",
            NodeKind::Call => "CALL_STATEMENT",
            NodeKind::Kwarg => "KWARG",
            NodeKind::List => "LIST",
            NodeKind::ListFor => "LIST_FOR",
            NodeKind::Object => "OBJECT",
            NodeKind::Variable => "VARIABLE",
            NodeKind::String => "STRING",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    location: Location,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self {
            kind,
            location,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(kind: NodeKind, location: Location, text: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Literal payload; empty for tags that carry none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }
}

/// Canonical `TAG[:text][ ( child ... )]` rendering, stable across parses.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if !self.text().is_empty() {
            write!(f, ":{}", self.text())?;
        }
        if !self.children.is_empty() {
            f.write_str(" ( ")?;
            for child in &self.children {
                write!(f, "{child} ")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
