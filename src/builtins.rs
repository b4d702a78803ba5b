//! Host functions the `mkr` binary installs into every root scope.

use log::debug;

use crate::runtime::{CallArgList, CallResult, ObjectArena, ObjectRef, RootScope, Scope, ScopeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Concat,
    Join,
    Struct,
}

impl BuiltinFunction {
    pub const ALL: [BuiltinFunction; 3] = [Self::Concat, Self::Join, Self::Struct];

    pub fn name(self) -> &'static str {
        match self {
            Self::Concat => "concat",
            Self::Join => "join",
            Self::Struct => "struct",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    pub fn call(self, arena: &mut ObjectArena, args: &CallArgList) -> CallResult {
        match self {
            Self::Concat => concat(arena, args),
            Self::Join => join(arena, args),
            Self::Struct => make_struct(arena, args),
        }
    }
}

/// Binds every builtin under its name in `scope`.
pub fn install(arena: &mut ObjectArena, scope: &mut RootScope) -> Result<(), ScopeError> {
    for builtin in BuiltinFunction::ALL {
        let function = arena.create_native(move |arena, args| builtin.call(arena, args));
        scope.put(builtin.name(), function)?;
    }
    debug!("installed {} builtins", BuiltinFunction::ALL.len());
    Ok(())
}

/// `concat(s...)`: all positional strings, in order.
fn concat(arena: &mut ObjectArena, args: &CallArgList) -> CallResult {
    let mut result = CallResult::new();
    let mut text = String::new();
    for arg in args.positional_args() {
        match arena.get_string(arg.object()) {
            Ok(part) => text.push_str(part),
            Err(err) => result.add_arg_error(arg, err),
        }
    }
    if result.success() {
        result.set_return_value(arena.create_string(text));
    }
    result
}

/// `join(list sep="")`: list entries separated by `sep`.
fn join(arena: &mut ObjectArena, args: &CallArgList) -> CallResult {
    let list = match args.positional(0) {
        Ok(arg) => arg,
        Err(err) => return CallResult::failure(err),
    };
    let separator = match args.keyword("sep") {
        Ok(arg) => match arena.get_string(arg.object()) {
            Ok(separator) => separator.to_string(),
            Err(err) => {
                let mut result = CallResult::new();
                result.add_arg_error(arg, err);
                return result;
            }
        },
        Err(_) => String::new(),
    };

    let mut result = CallResult::new();
    let entries = match arena.entries(list.object()) {
        Ok(entries) => entries,
        Err(err) => {
            result.add_arg_error(list, err);
            return result;
        }
    };
    let mut parts = Vec::with_capacity(entries.len());
    for entry in entries {
        match arena.get_string(*entry) {
            Ok(part) => parts.push(part),
            Err(err) => {
                result.add_arg_error(list, format!("List entry: {err}"));
                return result;
            }
        }
    }
    let joined = parts.join(&separator);
    result.set_return_value(arena.create_string(joined));
    result
}

/// `struct(k=v ...)`: a struct with one attribute per keyword argument.
fn make_struct(arena: &mut ObjectArena, args: &CallArgList) -> CallResult {
    let mut result = CallResult::new();
    for arg in args.positional_args() {
        result.add_arg_error(arg, "struct only takes keyword arguments");
    }
    if !result.success() {
        return result;
    }
    let attributes = args
        .keyword_args()
        .map(|(name, arg)| (name.to_string(), arg.object()))
        .collect::<Vec<(String, ObjectRef)>>();
    result.set_return_value(arena.create_struct(attributes));
    result
}
