//! Runs every `fixtures/*.json` case through the generator and compares the
//! produced class names with the case's expectation.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use json_vo::{Generator, GeneratorConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    root: String,
    #[serde(default)]
    config: GeneratorConfig,
    schema: Value,
    /// Fully-qualified class names, in generation order.
    expect: Vec<String>,
}

fn main() -> ExitCode {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures"));

    match run(&dir) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn run(dir: &Path) -> Result<bool> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect::<Vec<_>>();
    paths.sort();

    let mut failed = 0;
    for path in &paths {
        let name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        match check(path) {
            Ok(()) => println!("{} {name}", "ok".green().bold()),
            Err(e) => {
                failed += 1;
                println!("{} {name}: {e:#}", "FAIL".red().bold());
            }
        }
    }
    println!("{} cases, {} failed", paths.len(), failed);
    Ok(failed == 0)
}

fn check(path: &Path) -> Result<()> {
    let source = std::fs::read_to_string(path)?;
    let fixture: Fixture = json_vo::path_de::from_str_with_path(&source)?;
    let collection = Generator::new(fixture.config).generate(&fixture.schema, &fixture.root)?;
    let actual: Vec<_> = collection.names().map(str::to_string).collect();
    anyhow::ensure!(actual == fixture.expect, "expected {:?}, got {:?}", fixture.expect, actual);
    Ok(())
}
