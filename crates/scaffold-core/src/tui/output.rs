//! Writing generated output to disk

use crate::templates::GeneratedFile;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Write each generated file below `target_dir`, creating directories as needed
pub async fn write_files(files: &[GeneratedFile], target_dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let target_path = target_dir.join(&file.path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, &file.content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        written.push(file.path.clone());
    }

    Ok(written)
}

/// Write an archive, creating its parent directory if needed
pub async fn write_archive(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write archive: {}", path.display()))
}

/// Number of entries in a directory, or None if it does not exist
pub fn existing_entries(dir: &Path) -> Option<usize> {
    std::fs::read_dir(dir).ok().map(|entries| entries.count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_files_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            GeneratedFile::new("serverless.yml", "service: svc\n"),
            GeneratedFile::new("handlers/api/users.js", "// users\n"),
        ];

        let written = write_files(&files, dir.path()).await.unwrap();

        assert_eq!(written, vec!["serverless.yml", "handlers/api/users.js"]);
        let users = std::fs::read_to_string(dir.path().join("handlers/api/users.js")).unwrap();
        assert_eq!(users, "// users\n");
    }

    #[tokio::test]
    async fn test_write_archive_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/project.zip");

        write_archive(b"PK", &path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"PK");
    }

    #[test]
    fn test_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(existing_entries(dir.path()), Some(0));
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        assert_eq!(existing_entries(dir.path()), Some(1));
        assert_eq!(existing_entries(&dir.path().join("missing")), None);
    }
}
