use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::runtime::call::CallHandler;
use crate::runtime::error::ObjectError;

/// Handle to an object owned by an [`ObjectArena`](crate::runtime::arena::ObjectArena).
///
/// Handles are compared by identity: two handles are equal only if they name
/// the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub(crate) usize);

impl ObjectRef {
    /// The null sentinel. Every arena reserves this slot for it.
    pub const NULL: ObjectRef = ObjectRef(0);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

pub enum Object {
    Null,
    Struct(FxHashMap<String, ObjectRef>),
    Function(Rc<dyn CallHandler>),
    String(String),
    List(Vec<ObjectRef>),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "null",
            Object::Struct(_) => "struct",
            Object::Function(_) => "function",
            Object::String(_) => "string",
            Object::List(_) => "list",
        }
    }

    pub fn attr(&self, name: &str) -> Result<ObjectRef, ObjectError> {
        match self {
            Object::Struct(attributes) => attributes.get(name).copied(),
            _ => None,
        }
        .ok_or_else(|| ObjectError::UnknownAttribute {
            attribute: name.to_string(),
            type_name: self.type_name(),
        })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Object::Function(_))
    }

    pub fn call_handler(&self) -> Result<Rc<dyn CallHandler>, ObjectError> {
        match self {
            Object::Function(handler) => Ok(handler.clone()),
            _ => Err(ObjectError::NotCallable {
                type_name: self.type_name(),
            }),
        }
    }

    pub fn get_string(&self) -> Result<&str, ObjectError> {
        match self {
            Object::String(value) => Ok(value),
            _ => Err(ObjectError::NotAString {
                type_name: self.type_name(),
            }),
        }
    }

    pub fn entries(&self) -> Result<&[ObjectRef], ObjectError> {
        match self {
            Object::List(entries) => Ok(entries),
            _ => Err(ObjectError::NotAList {
                type_name: self.type_name(),
            }),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => f.write_str("Null"),
            Object::Struct(attributes) => f.debug_tuple("Struct").field(attributes).finish(),
            Object::Function(_) => f.write_str("Function(..)"),
            Object::String(value) => f.debug_tuple("String").field(value).finish(),
            Object::List(entries) => f.debug_tuple("List").field(entries).finish(),
        }
    }
}
