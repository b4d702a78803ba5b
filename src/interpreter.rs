use log::{debug, trace};

use crate::ast::{Node, NodeKind};
use crate::runtime::{CallArgList, ObjectArena, ObjectRef, RootScope, Scope, WrapperScope};

mod error;

pub use error::{InterpretError, InterpretErrorKind};

/// Evaluation stopped; the reason has already been recorded.
struct Abort;

type Eval<T> = Result<T, Abort>;

/// Evaluates `ast` into `scope`, creating objects in `arena`.
///
/// Returns the errors in the order they were recorded. Evaluation halts at
/// the first failing node, but statements evaluated before it keep their
/// effects on `scope`.
pub fn interpret(
    arena: &mut ObjectArena,
    scope: &mut dyn Scope,
    ast: &Node,
) -> Vec<InterpretError> {
    Interpreter::new(arena).run(scope, ast)
}

/// Tree-walking evaluator over the AST.
pub struct Interpreter<'a> {
    arena: &'a mut ObjectArena,
    errors: Vec<InterpretError>,
}

impl<'a> Interpreter<'a> {
    pub fn new(arena: &'a mut ObjectArena) -> Self {
        Self {
            arena,
            errors: Vec::new(),
        }
    }

    pub fn run(mut self, scope: &mut dyn Scope, ast: &Node) -> Vec<InterpretError> {
        debug!("interpreting {} statements", ast.children().len());
        let outcome = match ast.kind() {
            NodeKind::Program => self.exec_program(ast, scope),
            kind => Err(self.fail(ast, InterpretErrorKind::UnexpectedNode { kind })),
        };
        if outcome.is_err() {
            debug!("interpretation stopped with {} errors", self.errors.len());
        }
        self.errors
    }

    fn exec_program(&mut self, node: &Node, scope: &mut dyn Scope) -> Eval<()> {
        for statement in node.children() {
            self.exec_statement(statement, scope)?;
        }
        Ok(())
    }

    fn exec_statement(&mut self, node: &Node, scope: &mut dyn Scope) -> Eval<()> {
        trace!("statement {} at {}", node.kind(), node.location());
        match node.kind() {
            NodeKind::Assignment => self.exec_assignment(node, scope),
            NodeKind::Call => self.eval_call(node, scope).map(|_| ()),
            kind => Err(self.fail(node, InterpretErrorKind::UnexpectedNode { kind })),
        }
    }

    fn exec_assignment(&mut self, node: &Node, scope: &mut dyn Scope) -> Eval<()> {
        let name = self.child(node, 0)?.text();
        let value_node = self.child(node, 1)?;
        let value = self.eval_expression(value_node, scope)?;

        if value.is_null() {
            return Err(self.fail(
                node,
                InterpretErrorKind::NullAssignment {
                    name: name.to_string(),
                },
            ));
        }
        scope
            .put(name, value)
            .map_err(|err| self.fail(node, err.into()))
    }

    fn eval_expression(&mut self, node: &Node, scope: &dyn Scope) -> Eval<ObjectRef> {
        match node.kind() {
            NodeKind::Object => self.eval_object(node, scope),
            NodeKind::Call => self.eval_call(node, scope),
            NodeKind::String => Ok(self.arena.create_string(node.text())),
            NodeKind::List => self.eval_list(node, scope),
            NodeKind::ListFor => self.eval_list_for(node, scope),
            NodeKind::Program => self.eval_imported_program(node),
            kind => Err(self.fail(node, InterpretErrorKind::UnexpectedNode { kind })),
        }
    }

    /// `a` is a scope lookup; `a.b` looks `b` up on the value of `a`.
    fn eval_object(&mut self, node: &Node, scope: &dyn Scope) -> Eval<ObjectRef> {
        match node.child(0) {
            Some(inner) => {
                let owner = self.eval_expression(inner, scope)?;
                self.arena
                    .attr(owner, node.text())
                    .map_err(|err| self.fail(node, err.into()))
            }
            None => scope
                .get(node.text())
                .map_err(|err| self.fail(node, err.into())),
        }
    }

    fn eval_call(&mut self, node: &Node, scope: &dyn Scope) -> Eval<ObjectRef> {
        let callee_node = self.child(node, 0)?;
        let callee = self.eval_expression(callee_node, scope)?;
        let handler = self
            .arena
            .get(callee)
            .call_handler()
            .map_err(|err| self.fail(node, err.into()))?;

        // Indexed by ArgId, so handler errors can point at their argument.
        let mut arg_nodes = Vec::new();
        let mut args = CallArgList::new();
        for arg in &node.children()[1..] {
            if arg.kind() == NodeKind::Kwarg {
                let value_node = self.child(arg, 0)?;
                let value = self.eval_expression(value_node, scope)?;
                args.push_keyword(arg.text(), value);
            } else {
                let value = self.eval_expression(arg, scope)?;
                args.push_positional(value);
            }
            arg_nodes.push(arg);
        }

        trace!("calling {} with {} arguments", node.location(), args.len());
        let result = handler.call(self.arena, &args);

        for err in result.arg_errors() {
            let arg = arg_nodes.get(err.arg.index()).copied().unwrap_or(node);
            self.fail(
                arg,
                InterpretErrorKind::Argument {
                    message: err.message.clone(),
                },
            );
        }
        for message in result.call_errors() {
            self.fail(
                node,
                InterpretErrorKind::Call {
                    message: message.clone(),
                },
            );
        }

        if result.success() {
            Ok(result.return_value())
        } else {
            Err(Abort)
        }
    }

    fn eval_list(&mut self, node: &Node, scope: &dyn Scope) -> Eval<ObjectRef> {
        let mut entries = Vec::with_capacity(node.children().len());
        for child in node.children() {
            entries.push(self.eval_expression(child, scope)?);
        }
        Ok(self.arena.create_list(entries))
    }

    /// `[body for var in source]`: the body sees `var` through a fresh
    /// wrapper scope per element.
    fn eval_list_for(&mut self, node: &Node, scope: &dyn Scope) -> Eval<ObjectRef> {
        let body = self.child(node, 0)?;
        let variable = self.child(node, 1)?;
        let source_node = self.child(node, 2)?;

        let source = self.eval_expression(source_node, scope)?;
        let elements = match self.arena.entries(source) {
            Ok(entries) => entries.to_vec(),
            Err(err) => return Err(self.fail(source_node, err.into())),
        };

        let mut results = Vec::with_capacity(elements.len());
        for element in elements {
            let mut inner = WrapperScope::new(scope);
            inner
                .put(variable.text(), element)
                .map_err(|err| self.fail(variable, err.into()))?;
            results.push(self.eval_expression(body, &inner)?);
        }
        Ok(self.arena.create_list(results))
    }

    /// An imported program runs in its own root scope and evaluates to a
    /// struct of its top-level bindings.
    fn eval_imported_program(&mut self, node: &Node) -> Eval<ObjectRef> {
        trace!(
            "evaluating imported program from {}",
            node.location().source().name()
        );
        let mut root = RootScope::new();
        self.exec_program(node, &mut root)?;
        let attributes = root
            .bindings()
            .map(|(name, object)| (name.to_string(), object))
            .collect::<Vec<_>>();
        Ok(self.arena.create_struct(attributes))
    }

    fn child<'n>(&mut self, node: &'n Node, index: usize) -> Eval<&'n Node> {
        match node.child(index) {
            Some(child) => Ok(child),
            None => Err(self.fail(
                node,
                InterpretErrorKind::UnexpectedNode { kind: node.kind() },
            )),
        }
    }

    fn fail(&mut self, node: &Node, kind: InterpretErrorKind) -> Abort {
        self.errors
            .push(InterpretError::new(node.location().clone(), kind));
        Abort
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use indoc::indoc;

    use super::*;
    use crate::parser::{Parser, StaticImportResolver};
    use crate::runtime::arena::struct_from;
    use crate::runtime::{CallArgList, CallResult, ScopeError};
    use crate::source::Source;

    fn parse_with(input: &str, resolver: &StaticImportResolver) -> Node {
        let result = Parser::new(resolver).parse(Source::from_text(input));
        match result.into_result() {
            Ok(ast) => ast,
            Err(errors) => panic!("parse of {input:?} failed: {errors:?}"),
        }
    }

    fn parse(input: &str) -> Node {
        parse_with(input, &StaticImportResolver::new())
    }

    fn run(arena: &mut ObjectArena, scope: &mut RootScope, input: &str) -> Vec<InterpretError> {
        interpret(arena, scope, &parse(input))
    }

    /// Host function returning the n-th positional argument.
    fn nth_arg(arena: &mut ObjectArena, index: usize) -> ObjectRef {
        arena.create_native(move |_, args: &CallArgList| match args.positional(index) {
            Ok(arg) => CallResult::returning(arg.object()),
            Err(err) => CallResult::failure(err),
        })
    }

    fn concat(arena: &mut ObjectArena) -> ObjectRef {
        arena.create_native(|arena, args| {
            let mut text = String::new();
            for arg in args.positional_args() {
                match arena.get_string(arg.object()) {
                    Ok(part) => text.push_str(part),
                    Err(err) => {
                        let mut result = CallResult::new();
                        result.add_arg_error(arg, err);
                        return result;
                    }
                }
            }
            CallResult::returning(arena.create_string(text))
        })
    }

    fn strings(arena: &ObjectArena, list: ObjectRef) -> Vec<String> {
        arena
            .entries(list)
            .expect("list")
            .iter()
            .map(|entry| arena.get_string(*entry).expect("string").to_string())
            .collect()
    }

    #[test]
    fn assigns_string_literal() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        assert!(run(&mut arena, &mut scope, "a=\"x\"").is_empty());
        let a = scope.get("a").expect("bound");
        assert_eq!(arena.get_string(a), Ok("x"));
    }

    #[test]
    fn assigns_existing_object_by_identity() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let x = arena.create_struct(Vec::new());
        let y = arena.create_struct(Vec::new());
        scope.put("x", x).expect("put");
        scope.put("y", y).expect("put");
        assert!(run(&mut arena, &mut scope, "a=x b=y").is_empty());
        assert_eq!(scope.get("a"), Ok(x));
        assert_eq!(scope.get("b"), Ok(y));
    }

    #[test]
    fn undefined_variable_is_a_single_error() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let errors = run(&mut arena, &mut scope, "a=x");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind(),
            &InterpretErrorKind::UndefinedVariable {
                name: "x".to_string()
            }
        );
        assert_eq!(errors[0].location().column(), 3);
        assert!(scope.get("a").is_err());
    }

    #[test]
    fn rebinding_is_rejected() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let first = arena.create_struct(Vec::new());
        scope.put("a", first).expect("put");
        scope
            .put("b", arena.create_struct(Vec::new()))
            .expect("put");

        let errors = run(&mut arena, &mut scope, "a=b");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Variable 'a' is already defined");
        assert_eq!(scope.get("a"), Ok(first));
    }

    #[test]
    fn null_assignment_creates_no_binding() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        scope.put("null", arena.null()).expect("put");
        let errors = run(&mut arena, &mut scope, "x = null");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind(), InterpretErrorKind::NullAssignment { .. }));
        assert_eq!(
            scope.get("x"),
            Err(ScopeError::UndefinedVariable {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn earlier_statements_survive_a_failure() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let errors = run(&mut arena, &mut scope, "a=\"1\" b=missing c=\"3\"");
        assert_eq!(errors.len(), 1);
        assert!(scope.get("a").is_ok());
        assert!(scope.get("b").is_err());
        assert!(scope.get("c").is_err());
    }

    #[test]
    fn resolves_attribute_chains() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let z = arena.create_string("z");
        let y = struct_from(&mut arena, [("z", z)]);
        let x = struct_from(&mut arena, [("y", y)]);
        scope.put("x", x).expect("put");

        assert!(run(&mut arena, &mut scope, "a=x.y b=x.y.z").is_empty());
        assert_eq!(scope.get("a"), Ok(y));
        assert_eq!(scope.get("b"), Ok(z));
    }

    #[test]
    fn unknown_attribute_points_at_the_attribute() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let x = arena.create_struct(Vec::new());
        scope.put("x", x).expect("put");
        let errors = run(&mut arena, &mut scope, "a = x.nope");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Unknown attribute 'nope' for type struct");
        assert_eq!(errors[0].location().column(), 7);
    }

    #[test]
    fn calls_return_host_values() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let a = arena.create_struct(Vec::new());
        let b = arena.create_struct(Vec::new());
        let c = arena.create_struct(Vec::new());
        for (name, object) in [("a", a), ("b", b), ("c", c)] {
            scope.put(name, object).expect("put");
        }
        let first = nth_arg(&mut arena, 0);
        let third = nth_arg(&mut arena, 2);
        scope.put("first", first).expect("put");
        scope.put("third", third).expect("put");

        let input = r#"x = first(a) y = third(a b c) z = first("s")"#;
        let errors = run(&mut arena, &mut scope, input);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(scope.get("x"), Ok(a));
        assert_eq!(scope.get("y"), Ok(c));
        let z = scope.get("z").expect("bound");
        assert_eq!(arena.get_string(z), Ok("s"));
    }

    #[test]
    fn keyword_arguments_are_bound_by_name() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let c = arena.create_struct(Vec::new());
        scope
            .put("a", arena.create_struct(Vec::new()))
            .expect("put");
        scope
            .put("b", arena.create_struct(Vec::new()))
            .expect("put");
        scope.put("c", c).expect("put");
        let f = arena.create_native(|_, args| match args.keyword("kw2") {
            Ok(arg) => CallResult::returning(arg.object()),
            Err(err) => CallResult::failure(err),
        });
        scope.put("f", f).expect("put");

        let errors = run(&mut arena, &mut scope, "x = f(a kw1=b kw2=c)");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(scope.get("x"), Ok(c));
    }

    #[test]
    fn call_statement_result_is_discarded() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let f = arena.create_native(move |_, _| {
            counter.set(counter.get() + 1);
            CallResult::new()
        });
        scope.put("f", f).expect("put");
        assert!(run(&mut arena, &mut scope, "f() f()").is_empty());
        assert_eq!(calls.get(), 2);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn calling_a_non_function_fails_at_the_call() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        scope.put("s", arena.create_string("s")).expect("put");
        let errors = run(&mut arena, &mut scope, "x = s()");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind(),
            &InterpretErrorKind::NotCallable {
                type_name: "string"
            }
        );
        assert_eq!(errors[0].location().column(), 5);
    }

    #[test]
    fn handler_errors_are_attributed() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        scope.put("a", arena.create_string("a")).expect("put");
        let f = arena.create_native(|_, args| {
            let mut result = CallResult::new();
            for arg in args.positional_args() {
                result.add_arg_error(arg, "bad positional");
            }
            if let Ok(arg) = args.keyword("k") {
                result.add_arg_error(arg, "bad keyword");
            }
            result.add_call_error("call failed");
            result
        });
        scope.put("f", f).expect("put");

        let errors = run(&mut arena, &mut scope, "x = f(a k=a)");
        let reported = errors
            .iter()
            .map(|err| (err.message(), err.location().column()))
            .collect::<Vec<_>>();
        assert_eq!(
            reported,
            vec![
                ("bad positional".to_string(), 7),
                ("bad keyword".to_string(), 9),
                ("call failed".to_string(), 5),
            ]
        );
        assert!(scope.get("x").is_err());
    }

    #[test]
    fn failed_call_aborts_following_statements() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let f = arena.create_native(|_, _| CallResult::failure("error"));
        scope.put("f", f).expect("put");
        let errors = run(&mut arena, &mut scope, "f() y = \"never\"");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind(), InterpretErrorKind::Call { .. }));
        assert!(scope.get("y").is_err());
    }

    #[test]
    fn builds_lists_in_order() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let errors = run(&mut arena, &mut scope, r#"l = ["a" "b" []]"#);
        assert!(errors.is_empty(), "{errors:?}");
        let l = scope.get("l").expect("bound");
        let entries = arena.entries(l).expect("list").to_vec();
        assert_eq!(entries.len(), 3);
        assert_eq!(arena.get_string(entries[1]), Ok("b"));
        assert_eq!(arena.entries(entries[2]), Ok(&[][..]));
    }

    #[test]
    fn list_comprehension_uses_a_scope_per_element() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let concat = concat(&mut arena);
        scope.put("concat", concat).expect("put");
        let input = indoc! {r#"
            l = ["a" "b" "c"]
            x = [concat(e "q") for e in l]
        "#};
        let errors = run(&mut arena, &mut scope, input);
        assert!(errors.is_empty(), "{errors:?}");

        let x = scope.get("x").expect("bound");
        assert_eq!(strings(&arena, x), ["aq", "bq", "cq"]);
        assert!(scope.get("e").is_err());
    }

    #[test]
    fn loop_variable_may_shadow_outer_binding() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let input = r#"e = "outer" x = [e for e in ["1" "2"]] y = e"#;
        let errors = run(&mut arena, &mut scope, input);
        assert!(errors.is_empty(), "{errors:?}");
        let x = scope.get("x").expect("bound");
        assert_eq!(strings(&arena, x), ["1", "2"]);
        let y = scope.get("y").expect("bound");
        assert_eq!(arena.get_string(y), Ok("outer"));
    }

    #[test]
    fn comprehension_over_non_list_fails_at_the_source() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let errors = run(&mut arena, &mut scope, "s = \"abc\" x = [e for e in s]");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Object of type string is not a list");
        assert_eq!(errors[0].location().column(), 27);
    }

    #[test]
    fn per_argument_error_inside_comprehension() {
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let concat = concat(&mut arena);
        scope.put("concat", concat).expect("put");
        let input = r#"x = [concat(e) for e in ["a" []]]"#;
        let errors = run(&mut arena, &mut scope, input);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Object of type list is not a string");
        assert_eq!(errors[0].location().column(), 13);
    }

    #[test]
    fn import_evaluates_to_struct_of_bindings() {
        let mut resolver = StaticImportResolver::new();
        resolver.set("t.mkr", Source::new("t.mkr", "t = \"txt\""));
        let ast = parse_with("a = import(\"t.mkr\")", &resolver);

        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let errors = interpret(&mut arena, &mut scope, &ast);
        assert!(errors.is_empty(), "{errors:?}");

        let a = scope.get("a").expect("bound");
        let t = arena.attr(a, "t").expect("attribute");
        assert_eq!(arena.get_string(t), Ok("txt"));
        assert!(scope.get("t").is_err());
    }

    #[test]
    fn imported_program_does_not_see_host_bindings() {
        let mut resolver = StaticImportResolver::new();
        resolver.set("t.mkr", Source::new("t.mkr", "t = host"));
        let ast = parse_with("a = import(\"t.mkr\")", &resolver);

        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        scope.put("host", arena.create_string("h")).expect("put");
        let errors = interpret(&mut arena, &mut scope, &ast);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location().source().name(), "t.mkr");
    }

    #[test]
    fn rejects_non_program_root() {
        let source = Source::from_text("x");
        let ast = Node::with_text(
            NodeKind::Variable,
            crate::source::Location::start_of(&source),
            "x",
        );
        let mut arena = ObjectArena::new();
        let mut scope = RootScope::new();
        let errors = interpret(&mut arena, &mut scope, &ast);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Unexpected node 'VARIABLE'");
    }
}
