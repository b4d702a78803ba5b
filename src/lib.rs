pub mod ast;
pub mod builtins;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod source;
pub mod token;
