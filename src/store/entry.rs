//! On-disk layout of a single cache entry.

use crate::dataset::Dataset;
use crate::describer::DescriberRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Describer,
    Dataset,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Entry {
    Describer(DescriberRecord),
    Dataset(Dataset),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Describer(_) => EntryKind::Describer,
            Self::Dataset(_) => EntryKind::Dataset,
        }
    }
}

/// One file under `entries/`: an [`EntryHeader`] line, then the payload line.
#[derive(Debug)]
pub struct StoredEntry {
    pub header: EntryHeader,
    pub entry: Entry,
}

impl StoredEntry {
    pub fn new(key: &str, entry: Entry) -> Self {
        Self {
            header: EntryHeader {
                key: key.to_owned(),
                kind: entry.kind(),
                saved_at: Utc::now(),
            },
            entry,
        }
    }

    /// Compact JSON never contains a raw newline, so each part fits one line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        Ok(format!(
            "{}\n{}\n",
            serde_json::to_string(&self.header)?,
            serde_json::to_string(&self.entry)?
        ))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let (header, entry) = json.split_once('\n').unwrap_or((json, ""));
        Ok(Self {
            header: serde_json::from_str(header)?,
            entry: serde_json::from_str(entry)?,
        })
    }
}

/// Listing view of an entry, read without touching the payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryHeader {
    pub key: String,
    pub kind: EntryKind,
    pub saved_at: DateTime<Utc>,
}

/// File name for a key: keys contain characters no file system likes.
pub fn file_name(key: &str) -> String {
    format!("{:x}.json", Sha256::digest(key.as_bytes()))
}
