use rustc_hash::FxHashMap;

use crate::runtime::error::ScopeError;
use crate::runtime::object::ObjectRef;

/// Name-to-object bindings. Each scope's own bindings are write-once.
pub trait Scope {
    /// Looks `name` up here, then in enclosing scopes.
    fn get(&self, name: &str) -> Result<ObjectRef, ScopeError>;

    /// Binds `name` in this scope only. Shadowing an outer binding is allowed.
    fn put(&mut self, name: &str, object: ObjectRef) -> Result<(), ScopeError>;
}

#[derive(Debug, Default)]
struct Bindings(FxHashMap<String, ObjectRef>);

impl Bindings {
    fn get(&self, name: &str) -> Option<ObjectRef> {
        self.0.get(name).copied()
    }

    fn insert(&mut self, name: &str, object: ObjectRef) -> Result<(), ScopeError> {
        if self.0.contains_key(name) {
            return Err(ScopeError::AlreadyDefined {
                name: name.to_string(),
            });
        }
        self.0.insert(name.to_string(), object);
        Ok(())
    }
}

/// Outermost scope; owned by the host.
#[derive(Debug, Default)]
pub struct RootScope {
    bindings: Bindings,
}

impl RootScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.0.is_empty()
    }

    /// All bindings in unspecified order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, ObjectRef)> {
        let bindings = &self.bindings.0;
        bindings
            .iter()
            .map(|(name, object)| (name.as_str(), *object))
    }

    /// All bindings ordered by name.
    pub fn sorted_bindings(&self) -> Vec<(&str, ObjectRef)> {
        let mut bindings = self.bindings().collect::<Vec<_>>();
        bindings.sort_by(|a, b| a.0.cmp(b.0));
        bindings
    }
}

impl Scope for RootScope {
    fn get(&self, name: &str) -> Result<ObjectRef, ScopeError> {
        self.bindings
            .get(name)
            .ok_or_else(|| ScopeError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    fn put(&mut self, name: &str, object: ObjectRef) -> Result<(), ScopeError> {
        self.bindings.insert(name, object)
    }
}

/// Scope layered over a parent it can read but never writes to.
pub struct WrapperScope<'p> {
    parent: &'p dyn Scope,
    bindings: Bindings,
}

impl<'p> WrapperScope<'p> {
    pub fn new(parent: &'p dyn Scope) -> Self {
        Self {
            parent,
            bindings: Bindings::default(),
        }
    }
}

impl Scope for WrapperScope<'_> {
    fn get(&self, name: &str) -> Result<ObjectRef, ScopeError> {
        match self.bindings.get(name) {
            Some(object) => Ok(object),
            None => self.parent.get(name),
        }
    }

    fn put(&mut self, name: &str, object: ObjectRef) -> Result<(), ScopeError> {
        self.bindings.insert(name, object)
    }
}
