//! Persistent describer cache with dataset deduplication.
//!
//! Entries live under `<root>/entries/`, one JSON file per key. A describer is
//! stored as a [`DescriberRecord`] that names its dataset by content hash; the
//! dataset itself is stored once, under that hash, no matter how many
//! describers refer to it.
//!
//! A store whose `entries` directory does not exist yet is *uninitialized*:
//! reads fail with [`DfxError::EmptyStore`] rather than an I/O error, and
//! [`CacheStore::has`] answers `false`.
//!
//! The store is single-process. Concurrent writers to one directory are not
//! coordinated beyond atomic file replacement; the last writer wins.

pub mod entry;

use crate::dataset::Dataset;
use crate::describer::{Describer, DescriberFactory, DescriberKind, DescriberRecord, Subject};
use crate::error::{DfxError, Result, ResultExt as _};
use entry::{Entry, EntryHeader, EntryKind, StoredEntry, file_name};
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead as _, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Subdirectory holding entry files.
pub const ENTRIES_DIR: &str = "entries";

#[derive(Debug)]
pub struct CacheStore {
    root: PathBuf,
    /// Datasets already loaded or saved by this process, by content hash.
    datasets: Mutex<HashMap<String, Arc<Dataset>>>,
}

impl CacheStore {
    /// Open a store rooted at `root`. Nothing touches the disk until the first save.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            datasets: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entries_dir(&self) -> PathBuf {
        self.root.join(ENTRIES_DIR)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.entries_dir().join(file_name(key))
    }

    pub fn is_initialized(&self) -> bool {
        self.entries_dir().is_dir()
    }

    /// True when `key` is stored. Never fails; an uninitialized store has no keys.
    pub fn has(&self, key: &str) -> bool {
        self.entry_path(key).is_file()
    }

    /// Persist a describer, storing its dataset first if the store lacks it.
    pub fn save_describer(&self, describer: &Describer) -> Result<()> {
        self.save_dataset(describer.dataset())?;
        self.write_entry(
            describer.identity(),
            Entry::Describer(describer.to_record()),
        )?;
        tracing::debug!(key = %describer.identity(), "Saved describer");
        Ok(())
    }

    /// Persist a dataset under its content hash. Returns `false` when it was
    /// already stored.
    pub fn save_dataset(&self, dataset: &Arc<Dataset>) -> Result<bool> {
        let hash = dataset.content_hash().to_owned();
        self.remember(&hash, Arc::clone(dataset));
        if self.has(&hash) {
            return Ok(false);
        }
        self.write_entry(&hash, Entry::Dataset(Dataset::clone(dataset)))?;
        tracing::debug!(hash = %hash, rows = dataset.height(), "Saved dataset");
        Ok(true)
    }

    /// Load a describer and re-link it to its dataset.
    pub fn get_describer(&self, key: &str) -> Result<Describer> {
        let record = self.read_record(key)?;
        let dataset = self.get_dataset(&record.dataset_hash).map_err(|e| match e {
            DfxError::NotFound(hash) => {
                DfxError::CorruptEntry(format!("{key} refers to missing dataset {hash}"))
            }
            other => other,
        })?;
        Describer::from_record(record, dataset)
    }

    /// Load a dataset by content hash. Repeated loads share one instance.
    pub fn get_dataset(&self, hash: &str) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.memo().get(hash) {
            return Ok(Arc::clone(dataset));
        }
        let Entry::Dataset(dataset) = self.read_entry(hash)?.entry else {
            return Err(DfxError::CorruptEntry(format!("{hash} is not a dataset")));
        };
        if dataset.content_hash() != hash {
            return Err(DfxError::CorruptEntry(format!(
                "dataset stored under {hash} hashes to {}",
                dataset.content_hash()
            )));
        }
        let dataset = Arc::new(dataset);
        self.remember(hash, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Every stored key, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.headers()?.into_iter().map(|h| h.key).collect();
        keys.sort();
        Ok(keys)
    }

    /// Number of dataset blobs on disk.
    pub fn dataset_count(&self) -> Result<usize> {
        Ok(self
            .headers()?
            .iter()
            .filter(|h| h.kind == EntryKind::Dataset)
            .count())
    }

    /// Remove every entry. Safe on an uninitialized store.
    pub fn clear(&self) -> Result<()> {
        self.memo().clear();
        let dir = self.entries_dir();
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to clear cache store {}", dir.display()))?;
            tracing::warn!(root = %self.root.display(), "Cleared cache store");
        }
        Ok(())
    }

    fn read_record(&self, key: &str) -> Result<DescriberRecord> {
        match self.read_entry(key)?.entry {
            Entry::Describer(record) => Ok(record),
            Entry::Dataset(_) => Err(DfxError::CorruptEntry(format!("{key} is not a describer"))),
        }
    }

    fn read_entry(&self, key: &str) -> Result<StoredEntry> {
        if !self.is_initialized() {
            return Err(DfxError::EmptyStore);
        }
        let path = self.entry_path(key);
        if !path.is_file() {
            return Err(DfxError::NotFound(key.to_owned()));
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry {}", path.display()))?;
        let stored = StoredEntry::from_json(&json)?;
        if stored.header.key != key {
            return Err(DfxError::CorruptEntry(format!(
                "{} holds key {}, expected {key}",
                path.display(),
                stored.header.key
            )));
        }
        Ok(stored)
    }

    /// Write to a temporary file, then rename over the final path.
    fn write_entry(&self, key: &str, entry: Entry) -> Result<()> {
        let dir = self.entries_dir();
        fs::create_dir_all(&dir).context("Failed to create cache store directory")?;

        let json = StoredEntry::new(key, entry).to_json()?;

        let tmp = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, json).context("Failed to write cache entry")?;
        fs::rename(&tmp, self.entry_path(key)).context("Failed to move cache entry into place")
    }

    /// Headers of every entry. Only the first line of each file is read, so
    /// listing cost does not grow with dataset size.
    fn headers(&self) -> Result<Vec<EntryHeader>> {
        let dir = self.entries_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut headers = Vec::new();
        for entry in fs::read_dir(&dir)
            .context("Failed to read cache store directory")?
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match read_header(&path) {
                Ok(header) => headers.push(header),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable cache entry"),
            }
        }
        Ok(headers)
    }

    fn memo(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Dataset>>> {
        self.datasets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember(&self, hash: &str, dataset: Arc<Dataset>) {
        self.memo().entry(hash.to_owned()).or_insert(dataset);
    }
}

fn read_header(path: &Path) -> Result<EntryHeader> {
    let mut line = String::new();
    BufReader::new(fs::File::open(path)?).read_line(&mut line)?;
    Ok(serde_json::from_str(&line)?)
}

impl DescriberFactory for CacheStore {
    /// Serve a cached, evaluated describer, or build, evaluate and save a new one.
    ///
    /// Misses and unreadable entries fall through to computation. A failed
    /// save is logged; the fresh describer is returned regardless.
    fn get_or_create(
        &self,
        kind: DescriberKind,
        dataset: &Arc<Dataset>,
        subject: Subject,
    ) -> Result<Describer> {
        let fresh = Describer::new(kind, Arc::clone(dataset), subject)?;
        let key = fresh.identity();

        match self
            .read_record(key)
            .and_then(|record| Describer::from_record(record, Arc::clone(dataset)))
        {
            Ok(cached) if cached.is_evaluated() => {
                tracing::debug!(key = %key, "Cache hit");
                return Ok(cached);
            }
            Ok(_) => tracing::debug!(key = %key, "Cached describer was never evaluated"),
            Err(e) if e.is_cache_miss() => tracing::debug!(key = %key, "Cache miss"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Ignoring unreadable cache entry"),
        }

        fresh.ensure_evaluated(self);
        if let Err(e) = self.save_describer(&fresh) {
            tracing::warn!(key = %key, error = %e, "Failed to save describer to cache");
        }
        Ok(fresh)
    }
}
