use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::runtime::call::{CallArgList, CallHandler, CallResult};
use crate::runtime::error::ObjectError;
use crate::runtime::object::{Object, ObjectRef};

/// Owns every object created during an evaluation.
///
/// Objects are never freed before the arena itself, so an [`ObjectRef`]
/// handed out by an arena stays valid for the arena's lifetime. Handles are
/// plain indices; using a handle with an arena that did not create it is a
/// logic error and may panic.
#[derive(Debug)]
pub struct ObjectArena {
    objects: Vec<Object>,
}

impl Default for ObjectArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectArena {
    pub fn new() -> Self {
        Self {
            objects: vec![Object::Null],
        }
    }

    pub fn null(&self) -> ObjectRef {
        ObjectRef::NULL
    }

    pub fn create_struct<I>(&mut self, attributes: I) -> ObjectRef
    where
        I: IntoIterator<Item = (String, ObjectRef)>,
    {
        self.alloc(Object::Struct(attributes.into_iter().collect()))
    }

    pub fn create_function(&mut self, handler: Rc<dyn CallHandler>) -> ObjectRef {
        self.alloc(Object::Function(handler))
    }

    /// Wraps a host closure as a `Function` object.
    pub fn create_native<F>(&mut self, handler: F) -> ObjectRef
    where
        F: Fn(&mut ObjectArena, &CallArgList) -> CallResult + 'static,
    {
        self.create_function(Rc::new(handler))
    }

    pub fn create_string(&mut self, value: impl Into<String>) -> ObjectRef {
        self.alloc(Object::String(value.into()))
    }

    pub fn create_list(&mut self, entries: Vec<ObjectRef>) -> ObjectRef {
        self.alloc(Object::List(entries))
    }

    pub fn get(&self, handle: ObjectRef) -> &Object {
        &self.objects[handle.0]
    }

    pub fn attr(&self, handle: ObjectRef, name: &str) -> Result<ObjectRef, ObjectError> {
        self.get(handle).attr(name)
    }

    pub fn get_string(&self, handle: ObjectRef) -> Result<&str, ObjectError> {
        self.get(handle).get_string()
    }

    pub fn entries(&self, handle: ObjectRef) -> Result<&[ObjectRef], ObjectError> {
        self.get(handle).entries()
    }

    /// Number of live objects, the null sentinel included.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Stable textual form: `"text"`, `[a b]`, `{k = v}` with sorted keys,
    /// `<function>` and `null`.
    pub fn render(&self, handle: ObjectRef) -> String {
        let mut out = String::new();
        self.render_into(handle, &mut out);
        out
    }

    fn render_into(&self, handle: ObjectRef, out: &mut String) {
        match self.get(handle) {
            Object::Null => out.push_str("null"),
            Object::Function(_) => out.push_str("<function>"),
            Object::String(value) => {
                out.push('"');
                for c in value.chars() {
                    if c == '"' || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('"');
            }
            Object::List(entries) => {
                out.push('[');
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    self.render_into(*entry, out);
                }
                out.push(']');
            }
            Object::Struct(attributes) => {
                let mut names = attributes.keys().collect::<Vec<_>>();
                names.sort();
                out.push('{');
                for (i, name) in names.into_iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(name);
                    out.push_str(" = ");
                    self.render_into(attributes[name], out);
                }
                out.push('}');
            }
        }
    }

    fn alloc(&mut self, object: Object) -> ObjectRef {
        let handle = ObjectRef(self.objects.len());
        self.objects.push(object);
        handle
    }
}

/// Builds a struct from borrowed names; handy for hosts assembling results.
pub fn struct_from<'a, I>(arena: &mut ObjectArena, attributes: I) -> ObjectRef
where
    I: IntoIterator<Item = (&'a str, ObjectRef)>,
{
    let attributes = attributes
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect::<FxHashMap<_, _>>();
    arena.create_struct(attributes)
}
