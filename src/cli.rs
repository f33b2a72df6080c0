//! CLI: schema → (PHP files | class model JSON)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use json_vo::config::GeneratorConfig;
use json_vo::emit::{CodeEmitter, PreservingSource, write_files};
use json_vo::generator::Generator;
use json_vo::jq_exec::{run_jaq, select_pointer};
use json_vo::model::ClassDescriptionCollection;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate immutable PHP value objects and entities from JSON Schema documents
#[derive(Parser, Debug)]
#[command(name = "json-vo", version, about, long_about = None)]
pub struct CommandLineInterface {
    /// Verbose output. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate PHP classes
    Generate(GenerateOut),
    /// print the class model as JSON
    Inspect(InspectOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the schema inside each document (e.g. /definitions/order)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is one schema.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct GeneratorSettings {
    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// ambient namespace of the generated classes
    #[arg(long)]
    namespace: Option<String>,

    /// top-level class name (input file stem if omitted)
    #[arg(long)]
    root_class: Option<String>,

    /// directory the namespace maps to
    #[arg(long)]
    src_root: Option<PathBuf>,

    /// skip getter methods on entities
    #[arg(long)]
    no_getters: bool,

    /// add one constant per entity property
    #[arg(long)]
    constants: bool,

    /// skip the exception class per enum
    #[arg(long)]
    no_exceptions: bool,

    /// move native type hints into docblocks
    #[arg(long)]
    untyped: bool,

    /// date time output format or PHP constant name (e.g. DATE_ATOM)
    #[arg(long)]
    date_time_format: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output directory; the source root is placed below it (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// keep members between the custom markers of existing files
    #[arg(long)]
    preserve: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct InspectOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One schema document and the name of its top-level class.
struct SchemaInput {
    root_name: String,
    schema: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<SchemaInput>> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read {}", source_path.display()))?;
            let document = serde_json::from_str::<Value>(&source)
                .with_context(|| format!("failed to parse JSON source file ({})", source_path.display()))?;
            let document = match self.json_pointer.as_deref() {
                Some(pointer) => select_pointer(document, pointer)
                    .with_context(|| format!("in {}", source_path.display()))?,
                None => document,
            };
            let documents = match self.jq_expr.as_deref() {
                Some(jq_expr) => run_jaq(jq_expr, &document).with_context(|| {
                    format!("failed to apply jq expression to source file ({})", source_path.display())
                })?,
                None => vec![document],
            };
            let root_name = file_stem(&source_path);
            out.extend(documents.into_iter().map(|schema| SchemaInput { root_name: root_name.clone(), schema }));
        }
        Ok(out)
    }
}

impl GeneratorSettings {
    /// File configuration (or defaults) with flags applied on top.
    fn resolve(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(root_class) = &self.root_class {
            config.root_class = Some(root_class.clone());
        }
        if let Some(src_root) = &self.src_root {
            config.src_root = src_root.clone();
        }
        if let Some(format) = &self.date_time_format {
            config.date_time_format = Some(format.clone());
        }
        config.getters &= !self.no_getters;
        config.constants |= self.constants;
        config.exceptions &= !self.no_exceptions;
        config.typed &= !self.untyped;
        Ok(config)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let mut config = target.generator_settings.resolve()?;
                if let Some(out) = &target.out {
                    config.src_root = out.join(&config.src_root);
                }
                let inputs = target.input_settings.load()?;
                let generator = Generator::new(config);
                let collection = generate_all(&generator, &inputs)?;

                let mut emitter = generator.emitter();
                if target.preserve {
                    emitter = emitter.with_existing_source(PreservingSource);
                }
                let files = emitter.render(&collection)?;

                if target.out.is_some() {
                    write_files(&files)?;
                    for path in files.keys() {
                        eprintln!("{} {}", "wrote".green().bold(), path.display());
                    }
                    tracing::info!(files = files.len(), "generation finished");
                } else {
                    for (path, source) in &files {
                        println!("// {}\n{source}", path.display());
                    }
                }
                Ok(())
            }
            Command::Inspect(target) => {
                let config = target.generator_settings.resolve()?;
                let inputs = target.input_settings.load()?;
                let generator = Generator::new(config);
                let collection = generate_all(&generator, &inputs)?;
                let model_src = serde_json::to_string_pretty(&collection)?;

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &model_src).with_context(|| format!("failed to write {}", out.display()))?;
                    eprintln!("{} {}", "wrote".green().bold(), out.display());
                } else {
                    println!("{model_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn generate_all(generator: &Generator, inputs: &[SchemaInput]) -> Result<ClassDescriptionCollection> {
    let mut collection = ClassDescriptionCollection::new();
    for input in inputs {
        let root_name = generator.config().root_class.as_deref().unwrap_or(&input.root_name);
        let classes = generator
            .generate(&input.schema, root_name)
            .with_context(|| format!("failed to generate classes for {root_name}"))?;
        collection.extend(classes);
    }
    Ok(collection)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "root".to_string())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generate_with_overrides() {
        let cli = CommandLineInterface::try_parse_from([
            "json-vo", "-vv", "generate", "-i", "order.json", "--namespace", "Acme", "--no-getters", "--constants",
            "--untyped", "--out", "build",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Generate(target) = cli.cmd else { panic!("expected generate") };
        assert_eq!(target.out, Some(PathBuf::from("build")));
        let config = target.generator_settings.resolve().unwrap();
        assert_eq!(config.namespace, "Acme");
        assert!(!config.getters);
        assert!(config.constants);
        assert!(!config.typed);
        assert!(config.exceptions);
    }

    #[test]
    fn input_is_required() {
        assert!(CommandLineInterface::try_parse_from(["json-vo", "inspect"]).is_err());
    }

    #[test]
    fn flags_override_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("json-vo.json");
        std::fs::write(&path, r#"{"namespace": "FromFile", "constants": true}"#).unwrap();
        let path_arg = path.to_string_lossy().to_string();
        let cli = CommandLineInterface::try_parse_from([
            "json-vo", "inspect", "-i", "a.json", "--config", path_arg.as_str(), "--namespace", "FromFlag",
        ])
        .unwrap();
        let Command::Inspect(target) = cli.cmd else { panic!("expected inspect") };
        let config = target.generator_settings.resolve().unwrap();
        assert_eq!(config.namespace, "FromFlag");
        assert!(config.constants);
    }

    #[test]
    fn inputs_are_named_after_their_file_and_pre_selected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billing_account.json");
        std::fs::write(&path, r#"{"definitions": {"account": {"type": "object"}}}"#).unwrap();
        let settings = InputSettings {
            json_pointer: Some("/definitions/account".into()),
            jq_expr: None,
            input: vec![path.to_string_lossy().to_string()],
        };
        let inputs = settings.load().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].root_name, "billing_account");
        assert_eq!(inputs[0].schema, serde_json::json!({"type": "object"}));
    }

    #[test]
    fn generate_writes_files_below_out() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("person.json");
        std::fs::write(&input, r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#).unwrap();
        let out = dir.path().join("build");
        let input_arg = input.to_string_lossy().to_string();
        let out_arg = out.to_string_lossy().to_string();
        let cli = CommandLineInterface::try_parse_from([
            "json-vo",
            "generate",
            "-i",
            input_arg.as_str(),
            "--namespace",
            "Acme",
            "--out",
            out_arg.as_str(),
        ])
        .unwrap();
        cli.run().unwrap();
        assert!(out.join("src/Person.php").is_file());
        assert!(out.join("src/Name.php").is_file());
    }

    #[test]
    fn unmatched_globs_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        assert!(resolve_file_path_patterns([pattern]).is_err());
    }
}
