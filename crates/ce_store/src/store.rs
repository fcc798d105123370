// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use ce_types::file::path_is_within;
use ce_types::{File, FileContent};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The well-known snapshot key every cycle writes its `CycleState` to
/// after each phase boundary and each improvement iteration.
pub const SNAPSHOT_KEY: &str = "outputs/output.json";

/// Filesystem access scoped to one cycle's working directory. Every
/// path taken by a method here is relative to `work_dir`; nothing a
/// caller passes can land above it.
pub struct LocalFileStore {
    work_dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        LocalFileStore {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn resolve(&self, relative_path: &Path) -> Result<PathBuf, StoreError> {
        if !path_is_within(&self.work_dir, relative_path) {
            return Err(StoreError::PathEscapesWorkDir(relative_path.to_path_buf()));
        }
        Ok(self.work_dir.join(relative_path))
    }

    /// Writes `content` to `relative_path` under `work_dir`, creating
    /// parent directories as needed, and returns the `File` value
    /// recording what was written.
    pub async fn write_text(
        &self,
        relative_path: impl AsRef<Path>,
        content: impl Into<String>,
    ) -> Result<File, StoreError> {
        let relative_path = relative_path.as_ref();
        let absolute = self.resolve(relative_path)?;
        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }
        let content = content.into();
        tokio::fs::write(&absolute, &content)
            .await
            .map_err(|source| StoreError::Io { path: absolute.clone(), source })?;
        Ok(File::text(self.work_dir.clone(), relative_path.to_path_buf(), content))
    }

    pub async fn read_text(&self, relative_path: impl AsRef<Path>) -> Result<String, StoreError> {
        let relative_path = relative_path.as_ref();
        let absolute = self.resolve(relative_path)?;
        tokio::fs::read_to_string(&absolute)
            .await
            .map_err(|source| StoreError::Io { path: absolute, source })
    }

    pub async fn remove(&self, relative_path: impl AsRef<Path>) -> Result<(), StoreError> {
        let relative_path = relative_path.as_ref();
        let absolute = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&absolute).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path: absolute, source }),
        }
    }

    /// Recursively copies `from` (relative) to `to` (relative),
    /// preserving the prior `mod_dir`'s contents before the improver
    /// lays its own modifications over the copy.
    pub async fn copy_dir(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<(), StoreError> {
        let from = self.resolve(from.as_ref())?;
        let to = self.resolve(to.as_ref())?;
        copy_dir_recursive(&from, &to).await
    }

    /// Serializes `value` to pretty JSON and writes it to
    /// [`SNAPSHOT_KEY`] atomically: write to a sibling temp file, then
    /// rename over the target, so a reader never observes a partial
    /// write.
    pub async fn snapshot<T: Serialize>(&self, value: &T) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(value)?;
        let target = self.resolve(Path::new(SNAPSHOT_KEY))?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }
        let tmp = target.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        tokio::fs::rename(&tmp, &target)
            .await
            .map_err(|source| StoreError::Io { path: target, source })?;
        Ok(())
    }

    pub fn snapshot_content(&self, value: &FileContent) -> Option<&str> {
        value.as_text()
    }
}

fn copy_dir_recursive<'a>(
    from: &'a Path,
    to: &'a Path,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StoreError>> + Send + 'a>> {
    Box::pin(async move {
        tokio::fs::create_dir_all(to)
            .await
            .map_err(|source| StoreError::Io { path: to.to_path_buf(), source })?;
        let mut entries = tokio::fs::read_dir(from)
            .await
            .map_err(|source| StoreError::Io { path: from.to_path_buf(), source })?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| StoreError::Io { path: from.to_path_buf(), source })?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|source| StoreError::Io { path: entry.path(), source })?;
            let dest = to.join(entry.file_name());
            if file_type.is_dir() {
                copy_dir_recursive(&entry.path(), &dest).await?;
            } else {
                tokio::fs::copy(entry.path(), &dest)
                    .await
                    .map_err(|source| StoreError::Io { path: entry.path(), source })?;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        store.write_text("mod_0/unit_test.py", "assert True").await.unwrap();
        let content = store.read_text("mod_0/unit_test.py").await.unwrap();
        assert_eq!(content, "assert True");
    }

    #[tokio::test]
    async fn rejects_path_escaping_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        let err = store.write_text("../escape.txt", "x").await.unwrap_err();
        assert!(matches!(err, StoreError::PathEscapesWorkDir(_)));
    }

    #[tokio::test]
    async fn snapshot_is_readable_immediately_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        store.snapshot(&serde_json::json!({"phase": "PREPROCESS"})).await.unwrap();
        let content = store.read_text(SNAPSHOT_KEY).await.unwrap();
        assert!(content.contains("PREPROCESS"));
    }

    #[tokio::test]
    async fn copy_dir_preserves_nested_structure() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        store.write_text("mod_0/a/b.txt", "hi").await.unwrap();
        store.copy_dir("mod_0", "mod_1").await.unwrap();
        let content = store.read_text("mod_1/a/b.txt").await.unwrap();
        assert_eq!(content, "hi");
    }
}
