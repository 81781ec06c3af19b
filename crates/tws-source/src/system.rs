use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;
use dashmap::DashSet;
use walkdir::WalkDir;

use crate::path::clean_utf8_path;
use crate::path::safe_join;

/// Path-addressed storage with directory semantics.
///
/// Directories exist either because they were created explicitly or because
/// a file lives somewhere below them. Writing a file creates its parent
/// directories.
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String>;

    fn write(&self, path: &Utf8Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Utf8Path) -> bool {
        self.is_file(path) || self.is_directory(path)
    }

    fn is_file(&self, path: &Utf8Path) -> bool;

    fn is_directory(&self, path: &Utf8Path) -> bool;

    fn create_directory(&self, path: &Utf8Path) -> io::Result<()>;

    /// Remove a file, or a directory together with everything below it.
    fn delete(&self, path: &Utf8Path) -> io::Result<()>;

    /// Move a file or directory. Fails if `to` already exists.
    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()>;

    /// All files below `root`, sorted.
    fn walk_files(&self, root: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>>;
}

fn not_found(path: &Utf8Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{path}: not found"))
}

fn already_exists(path: &Utf8Path) -> io::Error {
    io::Error::new(io::ErrorKind::AlreadyExists, format!("{path}: already exists"))
}

#[derive(Default)]
pub struct InMemoryFileSystem {
    files: DashMap<Utf8PathBuf, String>,
    directories: DashSet<Utf8PathBuf>,
}

impl InMemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<Utf8PathBuf>, content: impl Into<String>) {
        let path = clean_utf8_path(&path.into());
        self.files.insert(path, content.into());
    }

    fn is_below(path: &Utf8Path, root: &Utf8Path) -> bool {
        path != root && (root.as_str() == "." || path.starts_with(root))
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        self.files
            .get(&clean_utf8_path(path))
            .map(|content| content.value().clone())
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Utf8Path, content: &str) -> io::Result<()> {
        let path = clean_utf8_path(path);
        if self.directories.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{path}: is a directory"),
            ));
        }
        self.files.insert(path, content.to_string());
        Ok(())
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(&clean_utf8_path(path))
    }

    fn is_directory(&self, path: &Utf8Path) -> bool {
        let path = clean_utf8_path(path);
        if path.as_str() == "." || self.directories.contains(&path) {
            return true;
        }
        self.files
            .iter()
            .any(|entry| Self::is_below(entry.key(), &path))
    }

    fn create_directory(&self, path: &Utf8Path) -> io::Result<()> {
        let path = clean_utf8_path(path);
        if self.files.contains_key(&path) {
            return Err(already_exists(&path));
        }
        self.directories.insert(path);
        Ok(())
    }

    fn delete(&self, path: &Utf8Path) -> io::Result<()> {
        let path = clean_utf8_path(path);
        if self.files.remove(&path).is_some() {
            return Ok(());
        }
        if !self.is_directory(&path) {
            return Err(not_found(&path));
        }
        self.files.retain(|key, _| !Self::is_below(key, &path));
        self.directories
            .retain(|dir| dir != &path && !Self::is_below(dir, &path));
        Ok(())
    }

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        let from = clean_utf8_path(from);
        let to = clean_utf8_path(to);
        if self.exists(&to) {
            return Err(already_exists(&to));
        }

        if let Some((_, content)) = self.files.remove(&from) {
            self.files.insert(to, content);
            return Ok(());
        }
        if !self.is_directory(&from) {
            return Err(not_found(&from));
        }

        let moved: Vec<(Utf8PathBuf, String)> = self
            .files
            .iter()
            .filter(|entry| Self::is_below(entry.key(), &from))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        for (path, content) in moved {
            self.files.remove(&path);
            if let Ok(rest) = path.strip_prefix(&from) {
                self.files.insert(to.join(rest), content);
            }
        }

        let dirs: Vec<Utf8PathBuf> = self
            .directories
            .iter()
            .filter(|dir| dir.key() == &from || Self::is_below(dir.key(), &from))
            .map(|dir| dir.key().clone())
            .collect();
        for dir in dirs {
            self.directories.remove(&dir);
            if let Ok(rest) = dir.strip_prefix(&from) {
                self.directories.insert(to.join(rest));
            }
        }

        Ok(())
    }

    fn walk_files(&self, root: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
        let root = clean_utf8_path(root);
        let mut files: Vec<Utf8PathBuf> = self
            .files
            .iter()
            .filter(|entry| Self::is_below(entry.key(), &root))
            .map(|entry| entry.key().clone())
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Standard file system implementation that uses [`std::fs`].
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Utf8Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }

    fn is_directory(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }

    fn create_directory(&self, path: &Utf8Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn delete(&self, path: &Utf8Path) -> io::Result<()> {
        if path.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        if to.exists() {
            return Err(already_exists(to));
        }
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(from, to)
    }

    fn walk_files(&self, root: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
        if !root.is_dir() {
            tracing::warn!("Template directory does not exist: {}", root);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) else {
                continue;
            };
            files.push(path);
        }
        files.sort();
        Ok(files)
    }
}

/// A view onto another [`FileSystem`] that takes relative paths and keeps
/// them inside `root`.
#[derive(Clone)]
pub struct ScopedFileSystem {
    root: Utf8PathBuf,
    inner: Arc<dyn FileSystem>,
}

impl ScopedFileSystem {
    pub fn new(root: impl Into<Utf8PathBuf>, inner: Arc<dyn FileSystem>) -> Self {
        Self {
            root: clean_utf8_path(&root.into()),
            inner,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn resolve(&self, path: &Utf8Path) -> io::Result<Utf8PathBuf> {
        if path.is_absolute() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{path}: expected a relative path"),
            ));
        }
        safe_join(&self.root, path.as_str())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))
    }

    fn relative(&self, path: Utf8PathBuf) -> Utf8PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(rest) => rest.to_path_buf(),
            Err(_) => path,
        }
    }
}

impl FileSystem for ScopedFileSystem {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        self.inner.read_to_string(&self.resolve(path)?)
    }

    fn write(&self, path: &Utf8Path, content: &str) -> io::Result<()> {
        self.inner.write(&self.resolve(path)?, content)
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        self.resolve(path)
            .is_ok_and(|resolved| self.inner.is_file(&resolved))
    }

    fn is_directory(&self, path: &Utf8Path) -> bool {
        self.resolve(path)
            .is_ok_and(|resolved| self.inner.is_directory(&resolved))
    }

    fn create_directory(&self, path: &Utf8Path) -> io::Result<()> {
        self.inner.create_directory(&self.resolve(path)?)
    }

    fn delete(&self, path: &Utf8Path) -> io::Result<()> {
        self.inner.delete(&self.resolve(path)?)
    }

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        self.inner.rename(&self.resolve(from)?, &self.resolve(to)?)
    }

    fn walk_files(&self, root: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
        Ok(self
            .inner
            .walk_files(&self.resolve(root)?)?
            .into_iter()
            .map(|path| self.relative(path))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod in_memory {
        use super::*;

        #[test]
        fn test_read_existing_file() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/t/text.html.twig", "file content");

            assert_eq!(
                fs.read_to_string(Utf8Path::new("/t/text.html.twig")).unwrap(),
                "file content"
            );
        }

        #[test]
        fn test_read_nonexistent_file() {
            let fs = InMemoryFileSystem::new();

            let result = fs.read_to_string(Utf8Path::new("/missing.html.twig"));
            assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
        }

        #[test]
        fn test_parent_directories_are_implicit() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/t/content_element/text.html.twig", "");

            assert!(fs.is_directory(Utf8Path::new("/t")));
            assert!(fs.is_directory(Utf8Path::new("/t/content_element")));
            assert!(!fs.is_directory(Utf8Path::new("/t/content_element/text.html.twig")));
            assert!(!fs.is_directory(Utf8Path::new("/t/content")));
        }

        #[test]
        fn test_delete_directory_removes_children() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/t/a/one.html.twig", "");
            fs.add_file("/t/a/b/two.html.twig", "");
            fs.add_file("/t/ab.html.twig", "");

            fs.delete(Utf8Path::new("/t/a")).unwrap();

            assert_eq!(
                fs.walk_files(Utf8Path::new("/t")).unwrap(),
                vec![Utf8PathBuf::from("/t/ab.html.twig")]
            );
        }

        #[test]
        fn test_rename_directory() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/t/a/one.html.twig", "1");
            fs.create_directory(Utf8Path::new("/t/a/empty")).unwrap();

            fs.rename(Utf8Path::new("/t/a"), Utf8Path::new("/t/b")).unwrap();

            assert_eq!(fs.read_to_string(Utf8Path::new("/t/b/one.html.twig")).unwrap(), "1");
            assert!(fs.is_directory(Utf8Path::new("/t/b/empty")));
            assert!(!fs.exists(Utf8Path::new("/t/a")));
        }

        #[test]
        fn test_rename_refuses_existing_target() {
            let fs = InMemoryFileSystem::new();
            fs.add_file("/t/a.html.twig", "a");
            fs.add_file("/t/b.html.twig", "b");

            let err = fs
                .rename(Utf8Path::new("/t/a.html.twig"), Utf8Path::new("/t/b.html.twig"))
                .unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        }
    }

    mod scoped {
        use super::*;

        fn scoped() -> (Arc<InMemoryFileSystem>, ScopedFileSystem) {
            let inner = Arc::new(InMemoryFileSystem::new());
            let scoped = ScopedFileSystem::new("/project/templates", inner.clone());
            (inner, scoped)
        }

        #[test]
        fn test_write_lands_below_root() {
            let (inner, scoped) = scoped();
            scoped
                .write(Utf8Path::new("content_element/text.html.twig"), "x")
                .unwrap();

            assert!(inner.is_file(Utf8Path::new(
                "/project/templates/content_element/text.html.twig"
            )));
        }

        #[test]
        fn test_rejects_escaping_paths() {
            let (_, scoped) = scoped();

            assert!(scoped.write(Utf8Path::new("../secret"), "x").is_err());
            assert!(scoped.write(Utf8Path::new("/etc/passwd"), "x").is_err());
            assert!(!scoped.exists(Utf8Path::new("../templates")));
        }

        #[test]
        fn test_walk_returns_relative_paths() {
            let (inner, scoped) = scoped();
            inner.add_file("/project/templates/a/b.html.twig", "");

            assert_eq!(
                scoped.walk_files(Utf8Path::new(".")).unwrap(),
                vec![Utf8PathBuf::from("a/b.html.twig")]
            );
        }
    }

    mod os {
        use super::*;

        #[test]
        fn test_write_creates_parents_and_walks() {
            let dir = tempfile::tempdir().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
            let fs = OsFileSystem;

            fs.write(&root.join("a/b/c.html.twig"), "content").unwrap();

            assert!(fs.is_directory(&root.join("a/b")));
            assert_eq!(
                fs.walk_files(&root).unwrap(),
                vec![root.join("a/b/c.html.twig")]
            );
        }

        #[test]
        fn test_walk_missing_root_is_empty() {
            let dir = tempfile::tempdir().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

            assert!(OsFileSystem.walk_files(&root.join("missing")).unwrap().is_empty());
        }
    }
}
