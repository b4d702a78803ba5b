use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::debug;

use mkr::builtins;
use mkr::interpreter::interpret;
use mkr::parser::{ImportOutcome, ImportResolver, Parser};
use mkr::runtime::{ObjectArena, RootScope};
use mkr::source::{Location, Source};

#[derive(ClapParser)]
#[command(name = "mkr")]
#[command(about = "Evaluate an mkr build description and print its bindings")]
struct Cli {
    /// Program to evaluate; `-` or nothing reads stdin
    file: Option<PathBuf>,
    /// Directory imports are resolved against (default: the program's directory)
    #[arg(long)]
    import_root: Option<PathBuf>,
    /// Print the parsed syntax tree before evaluating
    #[arg(long)]
    dump_ast: bool,
    /// Log parser and interpreter activity
    #[arg(short, long)]
    verbose: bool,
}

/// Resolves `import("x")` to the file `x` under a root directory.
struct FileImportResolver {
    root: PathBuf,
}

impl ImportResolver for FileImportResolver {
    fn resolve(&self, specifier: &str) -> ImportOutcome {
        let path = self.root.join(specifier);
        match fs::read_to_string(&path) {
            Ok(text) => ImportOutcome::Program(Source::new(path.display().to_string(), text)),
            Err(err) => {
                debug!("cannot import {}: {err}", path.display());
                ImportOutcome::Failed
            }
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_module("mkr", log::LevelFilter::Debug);
    }
    logger.init();

    let (source, default_root) = read_program(cli.file.as_deref())?;
    let resolver = FileImportResolver {
        root: cli.import_root.unwrap_or(default_root),
    };

    let ast = match Parser::new(&resolver).parse(source).into_result() {
        Ok(ast) => ast,
        Err(errors) => {
            for err in &errors {
                report(err.location(), &err.to_string());
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    if cli.dump_ast {
        println!("{ast}");
    }

    let mut arena = ObjectArena::new();
    let mut scope = RootScope::new();
    builtins::install(&mut arena, &mut scope).context("Installing builtins")?;

    let errors = interpret(&mut arena, &mut scope, &ast);
    if !errors.is_empty() {
        for err in &errors {
            report(err.location(), &err.message());
        }
        return Ok(ExitCode::FAILURE);
    }

    for (name, object) in scope.sorted_bindings() {
        if builtins::BuiltinFunction::from_name(name).is_none() {
            println!("{name} = {}", arena.render(object));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Reads the program and picks the directory imports are relative to.
fn read_program(path: Option<&Path>) -> Result<(Rc<Source>, PathBuf)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok((Source::new(path.display().to_string(), text), root))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Reading stdin")?;
            Ok((Source::new("<stdin>", text), PathBuf::from(".")))
        }
    }
}

fn report(location: &Location, message: &str) {
    eprintln!("{location}: error: {message}");
    eprintln!("{}", location.annotate(message));
}
