use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    Success,
    ParseError,
    RuntimeError,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BenchConfig {
    pub enabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    /// Rendered `name = value` lines of the final scope, builtins excluded.
    pub bindings_file: Option<String>,
    /// One expected message per line; each must appear in the matching error.
    pub errors_file: Option<String>,
    pub error_count: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    pub class: CaseClass,
    /// Files in the case directory that `import("...")` may name.
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub bench: BenchConfig,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub program_path: PathBuf,
    pub spec: CaseSpec,
}

impl Case {
    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(relative_path))
            .with_context(|| format!("Reading {} fixture file {}", self.name, relative_path))
    }

    pub fn program_text(&self) -> Result<String> {
        fs::read_to_string(&self.program_path)
            .with_context(|| format!("Reading program of {}", self.name))
    }

    /// `(specifier, text)` for every importable file of the case.
    pub fn import_texts(&self) -> Result<Vec<(String, String)>> {
        self.spec
            .imports
            .iter()
            .map(|specifier| Ok((specifier.clone(), self.read_text(specifier)?)))
            .collect()
    }

    /// Expected error messages, one per non-empty line.
    pub fn expected_errors(&self) -> Result<Vec<String>> {
        let Some(file) = self.spec.expected.errors_file.as_deref() else {
            return Ok(Vec::new());
        };
        Ok(self
            .read_text(file)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

pub fn load_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();

    for entry in
        fs::read_dir(programs_dir).with_context(|| format!("Reading {}", programs_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let case_path = path.join("case.yaml");
        if !case_path.exists() {
            continue;
        }

        let program_path = path.join("program.mkr");
        ensure!(
            program_path.exists(),
            "Missing program.mkr for case {}",
            path.display()
        );

        let case_name = path
            .file_name()
            .and_then(|value| value.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid case directory name {}", path.display()))?;
        let case_raw = fs::read_to_string(&case_path)
            .with_context(|| format!("Reading {}", case_path.display()))?;
        let spec: CaseSpec = serde_yaml::from_str(&case_raw)
            .with_context(|| format!("Parsing {}", case_path.display()))?;

        cases.push(Case {
            name: case_name,
            dir: path,
            program_path,
            spec,
        });
    }

    ensure!(
        !cases.is_empty(),
        "No test cases found in {}",
        programs_dir.display()
    );
    cases.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(cases)
}

/// Cases marked for benchmarking, with their tags checked.
pub fn load_bench_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();
    for case in load_cases(programs_dir)? {
        if !case.spec.bench.enabled {
            continue;
        }
        ensure!(
            !case.spec.bench.tags.is_empty(),
            "Case {} has bench enabled but no tags",
            case.name
        );
        ensure!(
            case.spec.class == CaseClass::Success,
            "Case {} is benchmarked but does not succeed",
            case.name
        );
        cases.push(case);
    }
    Ok(cases)
}

pub fn normalize_output(output: &str) -> String {
    output.replace("\r\n", "\n").trim_end().to_string()
}
