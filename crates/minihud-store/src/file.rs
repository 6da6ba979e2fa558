//! JSON-file entry store.
//!
//! One file holds the saved data of many objects:
//!
//! ```text
//! {
//!   "<object id>": { "<key>": "<value>", ... },
//!   ...
//! }
//! ```
//!
//! A [`FileEntryStore`] is scoped to a single object id. Every write
//! rewrites the whole document through a temporary file in the same
//! directory followed by a rename, so a reader after a crash sees either the
//! previous or the new document, never a torn file. A batch from
//! [`EntryStore::set_entries`] is one rewrite. Two handles on the same
//! file do not coordinate; the last writer wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::EntryStore;

type Document = BTreeMap<String, BTreeMap<String, String>>;

/// File-backed [`EntryStore`] for one object.
#[derive(Debug)]
pub struct FileEntryStore {
    path: PathBuf,
    object_id: String,
    document: RwLock<Document>,
}

impl FileEntryStore {
    /// Open (or start) the document at `path`, scoped to `object_id`.
    ///
    /// A missing file is an empty document. An unreadable document is a
    /// [`StoreError::CorruptRecord`].
    pub fn open(path: &Path, object_id: impl Into<String>) -> StoreResult<Self> {
        let document = read_document(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            object_id: object_id.into(),
            document: RwLock::new(document),
        })
    }

    /// Object ids with at least one entry in the document at `path`.
    pub fn object_ids(path: &Path) -> StoreResult<Vec<String>> {
        Ok(read_document(path)?
            .into_iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(id, _)| id)
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Remove every entry of this object and rewrite the file.
    pub fn remove_object(&self) -> StoreResult<usize> {
        self.update(|doc, object_id| doc.remove(object_id).map_or(0, |entries| entries.len()))
    }

    /// Apply `change` to a copy of the document and persist it.
    ///
    /// The in-memory document is replaced only after the write succeeds, so
    /// a failed write leaves reads returning what is on disk. Nothing is
    /// written when `change` leaves the document as it was.
    fn update<R>(&self, change: impl FnOnce(&mut Document, &str) -> R) -> StoreResult<R> {
        let mut doc = self.document.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = doc.clone();
        let result = change(&mut next, &self.object_id);
        if next != *doc {
            write_document(&self.path, &next)?;
            *doc = next;
        }
        Ok(result)
    }
}

fn read_document(path: &Path) -> StoreResult<Document> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
        Err(e) => return Err(e.into()),
    };
    if raw.trim().is_empty() {
        return Ok(Document::new());
    }
    serde_json::from_str(&raw).map_err(|e| StoreError::CorruptRecord {
        key: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn write_document(path: &Path, doc: &Document) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    serde_json::to_writer_pretty(&mut tmp, doc)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    debug!(path = %path.display(), objects = doc.len(), "entry document written");
    Ok(())
}

impl EntryStore for FileEntryStore {
    fn get_entry(&self, key: &str) -> StoreResult<String> {
        let doc = self.document.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(doc
            .get(&self.object_id)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_default())
    }

    fn set_entry(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|doc, object_id| {
            doc.entry(object_id.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        })
    }

    fn set_entries(&self, entries: &[(String, String)]) -> StoreResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        self.update(|doc, object_id| {
            let section = doc.entry(object_id.to_string()).or_default();
            for (key, value) in entries {
                section.insert(key.clone(), value.clone());
            }
        })
    }

    fn remove_entry(&self, key: &str) -> StoreResult<bool> {
        self.update(|doc, object_id| {
            doc.get_mut(object_id)
                .is_some_and(|entries| entries.remove(key).is_some())
        })
    }

    fn remove_entries(&self, keys: &[String]) -> StoreResult<usize> {
        self.update(|doc, object_id| {
            doc.get_mut(object_id).map_or(0, |entries| {
                keys.iter()
                    .filter(|key| entries.remove(key.as_str()).is_some())
                    .count()
            })
        })
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let doc = self.document.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(doc
            .get(&self.object_id)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }
}
