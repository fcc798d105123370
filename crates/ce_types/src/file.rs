// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Either text or raw bytes. The spec describes `File.content` as
/// "text or bytes"; modeling it as a closed enum means a caller that
/// only ever handles probe scripts and manifests (always text) never
/// has to guess whether a conversion is lossy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "data")]
pub enum FileContent {
    Text(String),
    Bytes(Vec<u8>),
}

impl FileContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(s) => Some(s),
            FileContent::Bytes(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FileContent::Text(s) => s.len(),
            FileContent::Bytes(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A generated or ingested artifact, relative to a cycle's working
/// directory. Files are never mutated in place: a new version gets a
/// new path under `mod_N/`, so a `File` value is always a snapshot.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct File {
    pub path: PathBuf,
    pub content: FileContent,
    pub work_dir: PathBuf,
    pub fname: String,
}

impl File {
    pub fn text(work_dir: impl Into<PathBuf>, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let fname = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        File {
            path,
            content: FileContent::Text(content.into()),
            work_dir: work_dir.into(),
            fname,
        }
    }

    /// True if `path` lies at or below `work_dir` once both are
    /// lexically normalized. Callers that write files must check this
    /// before touching disk; it is the one boundary check the file
    /// model contract requires.
    pub fn is_within_work_dir(&self) -> bool {
        path_is_within(&self.work_dir, &self.path)
    }
}

pub fn path_is_within(base: &Path, candidate: &Path) -> bool {
    use std::path::Component;
    let mut depth: i64 = 0;
    for component in candidate.components() {
        match component {
            Component::ParentDir => depth -= 1,
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {
                // An absolute candidate is only "within" base if it's
                // literally prefixed by base; relative depth-counting
                // doesn't apply.
                return candidate.starts_with(base);
            }
        }
        if depth < 0 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_parent_escape() {
        let f = File::text("work", "../etc/passwd", "x");
        assert!(!f.is_within_work_dir());
    }

    #[test]
    fn accepts_nested_path() {
        let f = File::text("work", "mod_1/unit_test.py", "x");
        assert!(f.is_within_work_dir());
    }
}
