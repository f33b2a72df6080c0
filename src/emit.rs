//! Rendering a class collection into source files.
//!
//! [`CodeEmitter`] is the seam between the class model and text. The PHP
//! emitter can consult an [`ExistingSource`] per class to carry hand-written
//! members over into the regenerated file; without one every file is
//! overwritten.
pub mod layout;
pub mod php;
pub mod preserve;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::model::{ClassDescription, ClassDescriptionCollection};

pub use self::layout::SourceLayout;
pub use self::php::PhpEmitter;
pub use self::preserve::PreservingSource;

/// `path → source text`, in collection order.
pub type RenderedFiles = IndexMap<PathBuf, String>;

pub trait CodeEmitter {
    fn render(&self, collection: &ClassDescriptionCollection) -> Result<RenderedFiles>;
}

/// A hand-written member found in a previously generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreservedMember {
    /// Method, property or constant name; generated members win on conflict.
    pub name: String,
    /// Verbatim source, including its own indentation.
    pub source: String,
}

/// Supplies the hand-written members of the file a class renders to.
pub trait ExistingSource {
    /// `None` when there is nothing to merge and the file is overwritten.
    fn existing_members(&self, class: &ClassDescription, path: &Path) -> Result<Option<Vec<PreservedMember>>>;
}

impl<F> ExistingSource for F
where
    F: Fn(&ClassDescription, &Path) -> Option<Vec<PreservedMember>>,
{
    fn existing_members(&self, class: &ClassDescription, path: &Path) -> Result<Option<Vec<PreservedMember>>> {
        Ok(self(class, path))
    }
}

/// Write every rendered file, creating parent directories as needed.
pub fn write_files(files: &RenderedFiles) -> Result<()> {
    for (path, source) in files {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, source)?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "wrote file");
    }
    Ok(())
}
