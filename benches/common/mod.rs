#![allow(dead_code)]
use std::path::Path;
use std::rc::Rc;

use mkr::ast::Node;
use mkr::parser::{Parser, StaticImportResolver};
use mkr::source::Source;
use test_support::{Case, load_bench_cases};

/// A benchmarked fixture: its program plus the files it may import.
pub struct Workload {
    pub label: String,
    pub source: Rc<Source>,
    pub resolver: StaticImportResolver,
}

impl Workload {
    pub fn parse(&self) -> Node {
        Parser::new(&self.resolver)
            .parse(self.source.clone())
            .into_result()
            .unwrap_or_else(|errors| panic!("parse {}: {errors:?}", self.label))
    }
}

fn load_workload(case: &Case) -> Workload {
    let text = case
        .program_text()
        .unwrap_or_else(|err| panic!("read {}: {err:#}", case.name));
    let mut resolver = StaticImportResolver::new();
    for (specifier, text) in case
        .import_texts()
        .unwrap_or_else(|err| panic!("read imports of {}: {err:#}", case.name))
    {
        resolver.set(specifier.clone(), Source::new(specifier, text));
    }
    Workload {
        label: case.name.clone(),
        source: Source::new(case.program_path.display().to_string(), text),
        resolver,
    }
}

pub fn workloads() -> Vec<Workload> {
    load_bench_cases(Path::new("tests/programs"))
        .unwrap_or_else(|err| panic!("load bench cases: {err:#}"))
        .iter()
        .map(load_workload)
        .collect()
}
