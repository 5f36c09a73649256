//! In-memory tabular data handed to the describers.
//!
//! A [`Dataset`] is an ordered list of named [`Column`]s of equal length. Each
//! column carries an inferred [`DataType`] and may contain nulls.
//!
//! ## Identity
//!
//! Every dataset has a structural content hash ([`Dataset::content_hash`]),
//! computed once per in-memory instance and reused for every describer built
//! over it. Describer cache keys embed this hash, and the cache store files
//! the dataset itself under it, so the hash must change whenever content does.
//!
//! ```
//! use dfx::dataset::{Column, Dataset};
//!
//! # fn example() -> dfx::error::Result<()> {
//! let df = Dataset::new(vec![
//!     Column::new("region", ["west", "west", "east"]),
//!     Column::new("sales", [10, 20, 30]),
//! ])?;
//! assert_eq!(df.height(), 3);
//! assert_eq!(df.content_hash().len(), 64);
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod hash;
pub mod polars_io;
pub mod value;

pub use column::{Column, DataType};
pub use hash::compute_dataset_hash;
pub use value::Value;

use crate::error::{DfxError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    #[serde(skip)]
    hash: OnceLock<String>,
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Dataset {
    /// Build a dataset, rejecting ragged columns and duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(DfxError::InvalidInput(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }
        if let Some(first) = columns.first()
            && let Some(ragged) = columns.iter().find(|c| c.len() != first.len())
        {
            return Err(DfxError::InvalidInput(format!(
                "column '{}' has {} rows, expected {}",
                ragged.name(),
                ragged.len(),
                first.len()
            )));
        }
        Ok(Self {
            columns,
            hash: OnceLock::new(),
        })
    }

    /// Load a dataset previously written with [`Dataset::save_json`].
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
        let parsed: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;
        // Re-run validation on whatever came off disk.
        Self::new(parsed.columns)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize dataset")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write dataset file: {}", path.display()))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Like [`Dataset::column`], but a missing column is an input error.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| {
            DfxError::InvalidInput(format!(
                "column '{name}' not in dataset (columns: {})",
                self.column_names().join(", ")
            ))
        })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// `(column name, value)` pairs for one row.
    pub fn row(&self, index: usize) -> Option<Vec<(&str, &Value)>> {
        if index >= self.height() {
            return None;
        }
        self.columns
            .iter()
            .map(|c| c.get(index).map(|v| (c.name(), v)))
            .collect()
    }

    /// Content hash, computed on first use and memoized for this instance.
    pub fn content_hash(&self) -> &str {
        self.hash.get_or_init(|| compute_dataset_hash(self))
    }
}
