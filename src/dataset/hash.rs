//! Structural content hash for datasets.
//!
//! The hash covers column order, names, inferred types and every value, so two
//! datasets share a hash only when their contents match. Each field is type
//! tagged and length prefixed before it is fed to SHA-256, which keeps
//! `["ab", "c"]` and `["a", "bc"]` apart.

use super::{Column, Dataset, Value};
use sha2::{Digest as _, Sha256};

/// Compute the SHA-256 content hash of a dataset as lowercase hex (64 chars).
pub fn compute_dataset_hash(dataset: &Dataset) -> String {
    let mut hasher = Sha256::new();
    hasher.update((dataset.columns().len() as u64).to_le_bytes());
    for column in dataset.columns() {
        update_column(&mut hasher, column);
    }
    let hash = hasher.finalize();
    format!("{hash:x}")
}

fn update_column(hasher: &mut Sha256, column: &Column) {
    update_str(hasher, column.name());
    update_str(hasher, column.dtype().as_str());
    hasher.update((column.len() as u64).to_le_bytes());
    for value in column.values() {
        match value {
            Value::Null => hasher.update([0u8]),
            Value::Bool(b) => hasher.update([1u8, u8::from(*b)]),
            Value::Int(v) => {
                hasher.update([2u8]);
                hasher.update(v.to_le_bytes());
            }
            Value::Float(v) => {
                hasher.update([3u8]);
                hasher.update(v.to_bits().to_le_bytes());
            }
            Value::Text(s) => {
                hasher.update([4u8]);
                update_str(hasher, s);
            }
        }
    }
}

fn update_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn single(name: &str, values: Vec<Value>) -> Result<Dataset> {
        Dataset::new(vec![Column::new(name, values)])
    }

    #[test]
    fn test_hash_is_hex_sha256() -> Result<()> {
        let hash = compute_dataset_hash(&single("id", vec![Value::Int(1)])?);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        Ok(())
    }

    #[test]
    fn test_deterministic_hashing() -> Result<()> {
        let a = single("id", vec![Value::Int(1), Value::Int(2)])?;
        let b = single("id", vec![Value::Int(1), Value::Int(2)])?;
        assert_eq!(compute_dataset_hash(&a), compute_dataset_hash(&b));
        Ok(())
    }

    #[test]
    fn test_distinct_content_distinct_hash() -> Result<()> {
        let base = single("id", vec![Value::Int(1), Value::Int(2)])?;
        let variants = [
            single("id", vec![Value::Int(2), Value::Int(1)])?,
            single("key", vec![Value::Int(1), Value::Int(2)])?,
            single("id", vec![Value::from("1"), Value::from("2")])?,
            single("id", vec![Value::Float(1.5), Value::Int(2)])?,
            single("id", vec![Value::Int(1), Value::Int(2), Value::Null])?,
        ];
        let base_hash = compute_dataset_hash(&base);
        for variant in &variants {
            assert_ne!(base_hash, compute_dataset_hash(variant), "{variant:?}");
        }
        Ok(())
    }

    #[test]
    fn test_text_boundaries_do_not_collide() -> Result<()> {
        let a = single("t", vec![Value::from("ab"), Value::from("c")])?;
        let b = single("t", vec![Value::from("a"), Value::from("bc")])?;
        assert_ne!(compute_dataset_hash(&a), compute_dataset_hash(&b));
        Ok(())
    }

    #[test]
    fn test_column_split_does_not_collide() -> Result<()> {
        let one = Dataset::new(vec![
            Column::new("a", [1, 2]),
            Column::new("b", [3, 4]),
        ])?;
        let other = Dataset::new(vec![
            Column::new("a", [1, 2]),
            Column::new("b", [4, 3]),
        ])?;
        assert_ne!(compute_dataset_hash(&one), compute_dataset_hash(&other));
        Ok(())
    }
}
