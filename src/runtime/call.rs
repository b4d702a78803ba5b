//! Argument binding between the interpreter and host functions.
//!
//! The interpreter evaluates each argument, files it into a [`CallArgList`]
//! and hands the list to the callee's [`CallHandler`]. Handlers report back
//! through a [`CallResult`]: a return value plus any number of call-level
//! errors and errors tied to a specific argument. Argument errors are mapped
//! back to the argument's syntax node through its [`ArgId`].

use std::fmt;

use crate::runtime::arena::ObjectArena;
use crate::runtime::error::CallArgError;
use crate::runtime::object::ObjectRef;

/// Host code invoked when a `Function` object is called.
pub trait CallHandler {
    fn call(&self, arena: &mut ObjectArena, args: &CallArgList) -> CallResult;
}

impl<F> CallHandler for F
where
    F: Fn(&mut ObjectArena, &CallArgList) -> CallResult,
{
    fn call(&self, arena: &mut ObjectArena, args: &CallArgList) -> CallResult {
        self(arena, args)
    }
}

/// Position of an argument in evaluation order, positional and keyword alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgId(pub(crate) usize);

impl ArgId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallArg {
    id: ArgId,
    object: ObjectRef,
}

impl CallArg {
    pub fn id(&self) -> ArgId {
        self.id
    }

    pub fn object(&self) -> ObjectRef {
        self.object
    }
}

#[derive(Debug, Default, Clone)]
pub struct CallArgList {
    positional: Vec<CallArg>,
    keyword: Vec<(String, CallArg)>,
    next_id: usize,
}

impl CallArgList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_positional(&mut self, object: ObjectRef) -> ArgId {
        let arg = self.allocate(object);
        self.positional.push(arg);
        arg.id
    }

    /// Adds a keyword argument. A repeated keyword is ignored; the first
    /// occurrence wins.
    pub fn push_keyword(&mut self, keyword: impl Into<String>, object: ObjectRef) -> ArgId {
        let arg = self.allocate(object);
        let keyword = keyword.into();
        if !self.keyword.iter().any(|(name, _)| *name == keyword) {
            self.keyword.push((keyword, arg));
        }
        arg.id
    }

    pub fn positional(&self, index: usize) -> Result<&CallArg, CallArgError> {
        self.positional
            .get(index)
            .ok_or(CallArgError::MissingPositionalArgument { index })
    }

    pub fn keyword(&self, keyword: &str) -> Result<&CallArg, CallArgError> {
        self.keyword
            .iter()
            .find(|(name, _)| name == keyword)
            .map(|(_, arg)| arg)
            .ok_or_else(|| CallArgError::MissingKeywordArgument {
                keyword: keyword.to_string(),
            })
    }

    pub fn positional_args(&self) -> &[CallArg] {
        &self.positional
    }

    /// Keyword arguments in source order.
    pub fn keyword_args(&self) -> impl Iterator<Item = (&str, &CallArg)> {
        self.keyword.iter().map(|(name, arg)| (name.as_str(), arg))
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate(&mut self, object: ObjectRef) -> CallArg {
        let id = ArgId(self.next_id);
        self.next_id += 1;
        CallArg { id, object }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgError {
    pub arg: ArgId,
    pub message: String,
}

/// Outcome of a host call. Successful exactly when no error was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    return_value: ObjectRef,
    call_errors: Vec<String>,
    arg_errors: Vec<ArgError>,
}

impl Default for CallResult {
    fn default() -> Self {
        Self::returning(ObjectRef::NULL)
    }
}

impl CallResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(value: ObjectRef) -> Self {
        Self {
            return_value: value,
            call_errors: Vec::new(),
            arg_errors: Vec::new(),
        }
    }

    /// A result carrying a single call-level error.
    pub fn failure(message: impl fmt::Display) -> Self {
        let mut result = Self::new();
        result.add_call_error(message);
        result
    }

    pub fn success(&self) -> bool {
        self.call_errors.is_empty() && self.arg_errors.is_empty()
    }

    pub fn set_return_value(&mut self, value: ObjectRef) {
        self.return_value = value;
    }

    pub fn return_value(&self) -> ObjectRef {
        self.return_value
    }

    pub fn add_call_error(&mut self, message: impl fmt::Display) {
        self.call_errors.push(message.to_string());
    }

    pub fn add_arg_error(&mut self, arg: &CallArg, message: impl fmt::Display) {
        self.arg_errors.push(ArgError {
            arg: arg.id,
            message: message.to_string(),
        });
    }

    pub fn call_errors(&self) -> &[String] {
        &self.call_errors
    }

    pub fn arg_errors(&self) -> &[ArgError] {
        &self.arg_errors
    }
}
