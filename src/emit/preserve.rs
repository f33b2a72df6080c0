use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::model::ClassDescription;

use super::php::{CUSTOM_END, CUSTOM_START};
use super::{ExistingSource, PreservedMember};

static MEMBER_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|protected|private|static|final|abstract|var)\s+)+(?:function\s+&?(?P<method>\w+)|const\s+(?P<constant>\w+)|(?:\??[\w\\]+\s+)?\$(?P<property>\w+))",
    )
    .expect("member pattern compiles")
});

/// Keeps members written between `// @custom-start` and `// @custom-end`
/// in files that already exist on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreservingSource;

impl ExistingSource for PreservingSource {
    fn existing_members(&self, class: &ClassDescription, path: &Path) -> Result<Option<Vec<PreservedMember>>> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let members = custom_members(&source);
        if members.is_empty() {
            return Ok(None);
        }
        tracing::debug!(class = %class.fqcn(), count = members.len(), "preserving hand-written members");
        Ok(Some(members))
    }
}

/// Members inside the custom regions of `source`. Comment lines stay with
/// the member that follows them.
pub fn custom_members(source: &str) -> Vec<PreservedMember> {
    let mut members: Vec<PreservedMember> = Vec::new();
    let mut pending = String::new();
    let mut inside = false;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed == CUSTOM_START {
            inside = true;
            continue;
        }
        if trimmed == CUSTOM_END {
            inside = false;
            if !pending.is_empty() {
                match members.last_mut() {
                    Some(last) => last.source.push_str(&pending),
                    None => members.push(PreservedMember { name: String::new(), source: std::mem::take(&mut pending) }),
                }
                pending.clear();
            }
            continue;
        }
        if !inside {
            continue;
        }

        if let Some(caps) = MEMBER_START.captures(line) {
            let name = ["method", "constant", "property"]
                .iter()
                .find_map(|group| caps.name(group))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let mut source = std::mem::take(&mut pending);
            source.push_str(line);
            source.push('\n');
            members.push(PreservedMember { name, source });
        } else if is_comment(trimmed) && !continues_member(&members) {
            pending.push_str(line);
            pending.push('\n');
        } else if let Some(last) = members.last_mut() {
            last.source.push_str(line);
            last.source.push('\n');
        } else {
            pending.push_str(line);
            pending.push('\n');
        }
    }
    members
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("/**") || trimmed.starts_with('*') || trimmed.starts_with("//") || trimmed.starts_with("#")
}

/// True while the last member still has an unclosed body.
fn continues_member(members: &[PreservedMember]) -> bool {
    members.last().is_some_and(|m| {
        let opens = m.source.matches('{').count();
        let closes = m.source.matches('}').count();
        opens > closes
    })
}
