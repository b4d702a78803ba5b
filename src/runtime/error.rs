use thiserror::Error;

/// An object was used in a way its kind does not support.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error("Unknown attribute '{attribute}' for type {type_name}")]
    UnknownAttribute {
        attribute: String,
        type_name: &'static str,
    },
    #[error("Object of type {type_name} is not callable")]
    NotCallable { type_name: &'static str },
    #[error("Object of type {type_name} is not a string")]
    NotAString { type_name: &'static str },
    #[error("Object of type {type_name} is not a list")]
    NotAList { type_name: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Variable '{name}' is already defined")]
    AlreadyDefined { name: String },
}

/// Lookup failures on a [`CallArgList`](crate::runtime::call::CallArgList).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallArgError {
    #[error("Missing positional argument {index}")]
    MissingPositionalArgument { index: usize },
    #[error("Missing keyword argument '{keyword}'")]
    MissingKeywordArgument { keyword: String },
}
