use super::FileSystem;
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create(&self, path: &Path) -> Result<Box<dyn Write>> {
        let file = fs::File::create(path).context(format!("Failed to create file {:?}", path))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("test.txt"), "hello world").unwrap();
        dir
    }

    #[test]
    fn test_exists() {
        let dir = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.exists(&dir.path().join("test.txt")));
        assert!(fs.exists(&dir.path().join("subdir")));
        assert!(!fs.exists(&dir.path().join("missing")));
    }

    #[test]
    fn test_is_dir() {
        let dir = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.is_dir(&dir.path().join("subdir")));
        assert!(!fs.is_dir(&dir.path().join("test.txt")));
    }

    #[test]
    fn test_create_writes_content() {
        let dir = create_test_dir();
        let fs = RealFileSystem::new();
        let target = dir.path().join("subdir/out.xml");

        {
            let mut writer = fs.create(&target).unwrap();
            writer.write_all(b"<project/>").unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "<project/>");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = create_test_dir();
        let fs = RealFileSystem::new();

        let result = fs.create(&dir.path().join("missing/out.xml"));
        assert!(result.is_err());
    }
}
