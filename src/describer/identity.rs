//! Deterministic cache keys for describer instances.
//!
//! The key format is `<ClassName>(<dataset_hash>, <comma-separated-args>)`.
//! Arguments keep the order they were passed in; nothing is sorted or
//! normalized, so `Rel(h, a, b)` and `Rel(h, b, a)` are different keys. A
//! describer without arguments still carries the separator: `ShapeRows(h, )`.

/// Build the identity string for a describer.
pub fn identity(class_name: &str, dataset_hash: &str, args: &[String]) -> String {
    format!("{class_name}({dataset_hash}, {})", args.join(", "))
}
