//! Generator settings, loadable from a JSON file. Every field has a default,
//! so `{}` is a valid configuration.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Ambient namespace of every generated class.
    pub namespace: String,
    /// Name of the top-level class; the input file stem when unset.
    pub root_class: Option<String>,
    /// Directory the root namespace maps to.
    pub src_root: PathBuf,
    /// Native type hints (`false` moves them into docblocks).
    pub typed: bool,
    pub getters: bool,
    pub constants: bool,
    /// Companion `Invalid<Type>` exception per enum.
    pub exceptions: bool,
    /// Date time output format, or a predefined PHP constant name.
    pub date_time_format: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: "App".to_string(),
            root_class: None,
            src_root: PathBuf::from("src"),
            typed: true,
            getters: true,
            constants: false,
            exceptions: true,
            date_time_format: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        crate::path_de::from_slice_with_path(&bytes)
            .map_err(|err| match err {
                GenerateError::Config(message) => GenerateError::Config(format!("{}: {message}", path.display())),
                other => other,
            })
    }
}
