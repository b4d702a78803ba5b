use thiserror::Error;

use crate::ast::NodeKind;
use crate::runtime::{ObjectError, ScopeError};
use crate::source::Location;

/// Typed errors produced while evaluating a program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpretErrorKind {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Variable '{name}' is already defined")]
    AlreadyDefined { name: String },
    #[error("Cannot assign null to '{name}'")]
    NullAssignment { name: String },
    #[error("Object of type {type_name} is not callable")]
    NotCallable { type_name: &'static str },
    #[error("Unknown attribute '{attribute}' for type {type_name}")]
    UnknownAttribute {
        attribute: String,
        type_name: &'static str,
    },
    /// Reported by a host function about the call as a whole.
    #[error("{message}")]
    Call { message: String },
    /// Reported by a host function about one argument.
    #[error("{message}")]
    Argument { message: String },
    #[error(transparent)]
    ObjectKind(ObjectError),
    #[error("Unexpected node '{kind}'")]
    UnexpectedNode { kind: NodeKind },
}

impl From<ScopeError> for InterpretErrorKind {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::UndefinedVariable { name } => {
                InterpretErrorKind::UndefinedVariable { name }
            }
            ScopeError::AlreadyDefined { name } => InterpretErrorKind::AlreadyDefined { name },
        }
    }
}

impl From<ObjectError> for InterpretErrorKind {
    fn from(err: ObjectError) -> Self {
        match err {
            ObjectError::UnknownAttribute {
                attribute,
                type_name,
            } => InterpretErrorKind::UnknownAttribute {
                attribute,
                type_name,
            },
            ObjectError::NotCallable { type_name } => InterpretErrorKind::NotCallable { type_name },
            other => InterpretErrorKind::ObjectKind(other),
        }
    }
}

/// An evaluation error and the location of the node it is attributed to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct InterpretError {
    location: Location,
    kind: InterpretErrorKind,
}

impl InterpretError {
    pub fn new(location: Location, kind: InterpretErrorKind) -> Self {
        Self { location, kind }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn kind(&self) -> &InterpretErrorKind {
        &self.kind
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
