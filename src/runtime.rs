//! Object model shared by the interpreter and its host.
//!
//! Objects live in an [`ObjectArena`] and are referred to by [`ObjectRef`]
//! handles. Variables live in [`Scope`]s. Host functions plug in through
//! [`CallHandler`].
pub mod arena;
pub mod call;
pub mod error;
pub mod object;
pub mod scope;

pub use arena::ObjectArena;
pub use call::{ArgError, ArgId, CallArg, CallArgList, CallHandler, CallResult};
pub use error::{CallArgError, ObjectError, ScopeError};
pub use object::{Object, ObjectRef};
pub use scope::{RootScope, Scope, WrapperScope};
