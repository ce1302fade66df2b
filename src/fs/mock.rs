use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone)]
struct MockEntry {
    content: Vec<u8>,
    kind: EntryKind,
}

type Entries = Arc<RwLock<HashMap<PathBuf, MockEntry>>>;

/// In-memory file system. Files created through [`FileSystem::create`] are
/// kept so tests can inspect what was written.
pub struct MockFileSystem {
    files: Entries,
    failing: RwLock<HashSet<PathBuf>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            failing: RwLock::new(HashSet::new()),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: content.as_bytes().to_vec(),
                kind: EntryKind::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.files.write().unwrap();
        ensure_parents(&mut files, path.as_ref());
    }

    /// Make every later `create` of `path` fail.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.failing
            .write()
            .unwrap()
            .insert(path.as_ref().to_path_buf());
    }

    /// Contents of a file, if one exists at `path`.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let files = self.files.read().unwrap();
        files
            .get(path.as_ref())
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| String::from_utf8_lossy(&entry.content).into_owned())
    }

    /// Paths of all regular files, sorted.
    pub fn written_files(&self) -> Vec<PathBuf> {
        let files = self.files.read().unwrap();
        let mut paths: Vec<PathBuf> = files
            .iter()
            .filter(|(_, entry)| entry.kind == EntryKind::File)
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        files.entry(current.clone()).or_insert(MockEntry {
            content: Vec::new(),
            kind: EntryKind::Directory,
        });
    }
}

struct MockWriter {
    path: PathBuf,
    files: Entries,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = self
            .files
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "mock file system poisoned"))?;
        match files.get_mut(&self.path) {
            Some(entry) => {
                entry.content.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{:?} was removed while open", self.path),
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|entry| entry.kind == EntryKind::Directory)
            .unwrap_or(false)
    }

    fn create(&self, path: &Path) -> Result<Box<dyn Write>> {
        if self.failing.read().unwrap().contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }

        let mut files = self.files.write().unwrap();
        let parent_is_dir = path
            .parent()
            .and_then(|parent| files.get(parent))
            .map(|entry| entry.kind == EntryKind::Directory)
            .unwrap_or(false);
        if !parent_is_dir {
            return Err(anyhow!("Parent directory of {:?} does not exist", path));
        }

        files.insert(
            path.to_path_buf(),
            MockEntry {
                content: Vec::new(),
                kind: EntryKind::File,
            },
        );

        Ok(Box::new(MockWriter {
            path: path.to_path_buf(),
            files: Arc::clone(&self.files),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dir_creates_parents() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws/.dtc/DCs/example.org/app/_comp");

        assert!(fs.is_dir(Path::new("/ws/.dtc")));
        assert!(fs.is_dir(Path::new("/ws/.dtc/DCs/example.org/app/_comp")));
        assert!(!fs.exists(Path::new("/ws/other")));
    }

    #[test]
    fn test_create_and_read_back() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws");

        let mut writer = fs.create(Path::new("/ws/pom.xml")).unwrap();
        writer.write_all(b"<project>").unwrap();
        writer.write_all(b"</project>").unwrap();
        drop(writer);

        assert_eq!(fs.contents("/ws/pom.xml").unwrap(), "<project></project>");
        assert_eq!(fs.written_files(), vec![PathBuf::from("/ws/pom.xml")]);
    }

    #[test]
    fn test_create_truncates() {
        let fs = MockFileSystem::new();
        fs.add_file("/ws/pom.xml", "old");

        let mut writer = fs.create(Path::new("/ws/pom.xml")).unwrap();
        writer.write_all(b"new").unwrap();

        assert_eq!(fs.contents("/ws/pom.xml").unwrap(), "new");
    }

    #[test]
    fn test_create_without_parent_fails() {
        let fs = MockFileSystem::new();
        assert!(fs.create(Path::new("/nowhere/pom.xml")).is_err());
    }

    #[test]
    fn test_fail_writes_to() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws");
        fs.fail_writes_to("/ws/pom.xml");

        assert!(fs.create(Path::new("/ws/pom.xml")).is_err());
        assert!(fs.create(Path::new("/ws/other.xml")).is_ok());
    }
}
