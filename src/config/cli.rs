use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Local filesystem storage. Relative paths resolve against `base_path`,
/// absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Storage rooted at the process working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(Path::new(path))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        let data = tokio::fs::read(&full_path).await?;
        tracing::trace!("Read {} bytes from {}", data.len(), full_path.display());
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("reportes/resultado.csv", b"Cedula\n1\n").await.unwrap();

        let data = storage.read_file("reportes/resultado.csv").await.unwrap();
        assert_eq!(data, b"Cedula\n1\n");
        assert!(temp_dir.path().join("reportes").is_dir());
    }

    #[tokio::test]
    async fn test_absolute_paths_ignore_base() {
        let temp_dir = TempDir::new().unwrap();
        let absolute = temp_dir.path().join("contactos.csv");
        std::fs::write(&absolute, b"Nombre\n").unwrap();

        let storage = LocalStorage::new("/nonexistent/base");
        let data = storage.read_file(absolute.to_str().unwrap()).await.unwrap();
        assert_eq!(data, b"Nombre\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        assert!(storage.read_file("nope.xlsx").await.is_err());
    }
}
