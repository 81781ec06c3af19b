//! Move requests of the file manager.
//!
//! Requests carry a JSON body `{"paths": [...], "target": "..."}` with paths
//! relative to the storage root.

use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Serialize;
use serde_json::Value;
use tws_source::clean_utf8_path;
use tws_source::FileSystem;

use crate::error::StudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Directory,
}

/// An existing file or directory in the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageItem {
    pub path: Utf8PathBuf,
    pub kind: ItemKind,
}

impl StorageItem {
    /// Look up `path`; absolute and missing paths yield `None`.
    pub fn get(storage: &dyn FileSystem, path: &str) -> Option<Self> {
        let path = Utf8Path::new(path);
        if path.is_absolute() {
            return None;
        }

        let path = clean_utf8_path(path);
        let kind = if storage.is_file(&path) {
            ItemKind::File
        } else if storage.is_directory(&path) {
            ItemKind::Directory
        } else {
            return None;
        };

        Some(Self { path, kind })
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == ItemKind::File
    }

    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(Utf8Path::new(""))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveStats {
    pub moved_files: usize,
    pub moved_directories: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub items: Vec<StorageItem>,
    pub target: StorageItem,
}

fn decode(body: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn as_path(value: &Value) -> Option<String> {
    match value {
        Value::String(path) => Some(path.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Items named by the `paths` array, without duplicates. Unknown and
/// absolute paths are dropped.
///
/// # Errors
///
/// Fails if the body is not a JSON object with a `paths` array.
pub fn parse_items(body: &str, storage: &dyn FileSystem) -> Result<Vec<StorageItem>, StudioError> {
    let data = decode(body).ok_or_else(|| invalid("Malformed request body."))?;
    let paths = data
        .get("paths")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("Missing 'paths'."))?;

    let mut items: Vec<StorageItem> = Vec::new();
    for item in paths
        .iter()
        .filter_map(as_path)
        .filter_map(|path| StorageItem::get(storage, &path))
    {
        if !items.iter().any(|known| known.path == item.path) {
            items.push(item);
        }
    }

    Ok(items)
}

/// # Errors
///
/// Fails unless there is at least one source, all sources share a parent
/// directory and the target is an existing directory that is not a source.
pub fn parse_move_request(body: &str, storage: &dyn FileSystem) -> Result<MoveRequest, StudioError> {
    let items = parse_items(body, storage)?;

    let target = decode(body)
        .and_then(|data| data.get("target").and_then(Value::as_str).map(String::from))
        .and_then(|target| StorageItem::get(storage, &target))
        .filter(|target| !target.is_file())
        .ok_or_else(|| invalid("Cannot move. Invalid source/targets."))?;

    let Some(first) = items.first() else {
        return Err(invalid("Cannot move. Invalid source/targets."));
    };

    let same_directory = items
        .iter()
        .all(|item| item.directory() == first.directory());
    let target_is_source = items.iter().any(|item| item.path == target.path);

    if !same_directory || target_is_source {
        return Err(invalid("Cannot move. Invalid source/targets."));
    }

    Ok(MoveRequest { items, target })
}

impl MoveRequest {
    /// Move every item into the target directory.
    ///
    /// # Errors
    ///
    /// Stops at the first item the storage refuses to move.
    pub fn execute(&self, storage: &dyn FileSystem) -> Result<MoveStats, StudioError> {
        let mut stats = MoveStats::default();

        for item in &self.items {
            let Some(file_name) = item.path.file_name() else {
                continue;
            };
            let destination = self.target.path.join(file_name);

            storage
                .rename(&item.path, &destination)
                .map_err(StudioError::io(&item.path))?;

            tracing::debug!("Moved {} to {}", item.path, destination);

            match item.kind {
                ItemKind::File => stats.moved_files += 1,
                ItemKind::Directory => stats.moved_directories += 1,
            }
        }

        Ok(stats)
    }
}

fn invalid(message: &str) -> StudioError {
    StudioError::InvalidRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tws_source::InMemoryFileSystem;
    use tws_source::ScopedFileSystem;

    use super::*;

    fn storage() -> ScopedFileSystem {
        let fs = Arc::new(InMemoryFileSystem::new());
        fs.add_file("/files/a.txt", "a");
        fs.add_file("/files/b.txt", "b");
        fs.add_file("/files/docs/c.txt", "c");
        fs.add_file("/files/archive/old.txt", "old");
        ScopedFileSystem::new("/files", fs)
    }

    mod items {
        use super::*;

        #[test]
        fn test_drops_duplicates_absolute_and_missing() {
            let storage = storage();

            let items = parse_items(
                r#"{"paths": ["a.txt", "./a.txt", "/etc/passwd", "missing.txt", "docs", 42, null]}"#,
                &storage,
            )
            .unwrap();

            assert_eq!(
                items,
                [
                    StorageItem {
                        path: "a.txt".into(),
                        kind: ItemKind::File
                    },
                    StorageItem {
                        path: "docs".into(),
                        kind: ItemKind::Directory
                    },
                ]
            );
        }

        #[test]
        fn test_malformed_bodies() {
            let storage = storage();

            assert!(parse_items("not json", &storage).is_err());
            assert!(parse_items("[]", &storage).is_err());
            assert!(parse_items(r#"{"paths": "a.txt"}"#, &storage).is_err());
        }
    }

    mod moves {
        use super::*;

        #[test]
        fn test_move_into_directory() {
            let storage = storage();

            let request =
                parse_move_request(r#"{"paths": ["a.txt", "docs"], "target": "archive"}"#, &storage)
                    .unwrap();
            let stats = request.execute(&storage).unwrap();

            assert_eq!(
                stats,
                MoveStats {
                    moved_files: 1,
                    moved_directories: 1
                }
            );
            assert!(storage.is_file(Utf8Path::new("archive/a.txt")));
            assert!(storage.is_file(Utf8Path::new("archive/docs/c.txt")));
            assert!(!storage.exists(Utf8Path::new("a.txt")));
        }

        #[test]
        fn test_sources_must_share_a_directory() {
            let storage = storage();

            let err = parse_move_request(
                r#"{"paths": ["a.txt", "docs/c.txt"], "target": "archive"}"#,
                &storage,
            )
            .unwrap_err();

            assert!(matches!(err, StudioError::InvalidRequest(_)));
        }

        #[test]
        fn test_target_must_be_a_directory_outside_the_sources() {
            let storage = storage();

            assert!(parse_move_request(r#"{"paths": ["a.txt"], "target": "b.txt"}"#, &storage).is_err());
            assert!(parse_move_request(r#"{"paths": ["docs"], "target": "docs"}"#, &storage).is_err());
            assert!(parse_move_request(r#"{"paths": ["a.txt"], "target": "nowhere"}"#, &storage).is_err());
            assert!(parse_move_request(r#"{"paths": [], "target": "archive"}"#, &storage).is_err());
        }
    }
}
