use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::source::Source;

/// What an import specifier resolved to.
#[derive(Debug, Clone)]
pub enum ImportOutcome {
    /// Source of another program, parsed in place of the import.
    Program(Rc<Source>),
    /// Something that is not a program. Recognised but not importable.
    External,
    Failed,
}

/// Maps the string in `import("...")` to something the parser can use.
pub trait ImportResolver {
    fn resolve(&self, specifier: &str) -> ImportOutcome;
}

/// Resolves specifiers from an in-memory table. Unknown specifiers fail.
#[derive(Debug, Default)]
pub struct StaticImportResolver {
    sources: FxHashMap<String, Rc<Source>>,
}

impl StaticImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, specifier: impl Into<String>, source: Rc<Source>) {
        self.sources.insert(specifier.into(), source);
    }
}

impl ImportResolver for StaticImportResolver {
    fn resolve(&self, specifier: &str) -> ImportOutcome {
        match self.sources.get(specifier) {
            Some(source) => ImportOutcome::Program(source.clone()),
            None => ImportOutcome::Failed,
        }
    }
}
