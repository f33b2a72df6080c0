use std::path::PathBuf;

use crate::model::ClassDescription;

/// PSR-4 style mapping: classes under `root_namespace` live below `src_root`,
/// one directory per remaining namespace segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub src_root: PathBuf,
    pub root_namespace: String,
}

impl SourceLayout {
    pub fn new(src_root: impl Into<PathBuf>, root_namespace: impl Into<String>) -> Self {
        Self {
            src_root: src_root.into(),
            root_namespace: root_namespace.into().trim_matches('\\').to_string(),
        }
    }

    pub fn path_for(&self, class: &ClassDescription) -> PathBuf {
        let namespace = class.namespace.trim_matches('\\');
        let relative = if self.root_namespace.is_empty() {
            namespace
        } else if namespace == self.root_namespace {
            ""
        } else {
            namespace
                .strip_prefix(self.root_namespace.as_str())
                .and_then(|rest| rest.strip_prefix('\\'))
                .unwrap_or(namespace)
        };

        let mut path = self.src_root.clone();
        path.extend(relative.split('\\').filter(|s| !s.is_empty()));
        path.push(format!("{}.php", class.name));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn root_namespace_maps_to_src_root() {
        let layout = SourceLayout::new("src", "Acme\\");
        assert_eq!(layout.path_for(&ClassDescription::entity("Order", "Acme")), Path::new("src/Order.php"));
        assert_eq!(
            layout.path_for(&ClassDescription::entity("InvalidState", "Acme\\Exception")),
            Path::new("src/Exception/InvalidState.php")
        );
    }

    #[test]
    fn foreign_namespaces_keep_every_segment() {
        let layout = SourceLayout::new("src", "Acme");
        assert_eq!(
            layout.path_for(&ClassDescription::entity("City", "AcmeGeo\\Model")),
            Path::new("src/AcmeGeo/Model/City.php")
        );
    }
}
