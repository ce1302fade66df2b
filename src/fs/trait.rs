//! FileSystem trait definition

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Abstraction over file system operations for testability
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Create (or truncate) a file and return a writer for it
    fn create(&self, path: &Path) -> Result<Box<dyn Write>>;

    /// Join paths
    fn join(&self, base: &Path, path: &str) -> PathBuf {
        base.join(path)
    }
}
