//! Hiding findings made redundant by a stronger finding on the same subject.
//!
//! The relation is a one-pass filter over a small list, not a graph
//! traversal. When two describers suppress each other, the kind with the
//! lower [`DescriberKind::priority`] survives (ties go to the earlier entry).

use super::{Describer, DescriberKind};

/// Kinds a qualified describer of `kind` makes redundant.
fn suppressed_kinds(kind: DescriberKind) -> &'static [DescriberKind] {
    match kind {
        DescriberKind::ColumnId => &[DescriberKind::ColumnNumeric, DescriberKind::ColumnUnique],
        _ => &[],
    }
}

/// Does `by` make `other` redundant?
pub fn suppresses(by: &Describer, other: &Describer) -> bool {
    suppressed_kinds(by.kind()).contains(&other.kind())
        && by.subject() == other.subject()
        && by.dataset_hash() == other.dataset_hash()
        && by.qualified()
}

/// Split describers into `(unsuppressed, suppressed)`, both in input order.
pub fn resolve(describers: &[Describer]) -> (Vec<&Describer>, Vec<&Describer>) {
    resolve_by(describers, suppresses, |d| d.kind().priority())
}

/// Generic form of [`resolve`] over any item with a suppression relation and a rank.
pub fn resolve_by<'a, T, S, R>(items: &'a [T], suppresses: S, rank: R) -> (Vec<&'a T>, Vec<&'a T>)
where
    S: Fn(&T, &T) -> bool,
    R: Fn(&T) -> u8,
{
    let outranks = |i: usize, j: usize, a: &T, b: &T| (rank(a), i) < (rank(b), j);

    let mut unsuppressed = Vec::new();
    let mut suppressed = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let hidden = items.iter().enumerate().any(|(j, other)| {
            j != i
                && suppresses(other, item)
                && !(suppresses(item, other) && outranks(i, j, item, other))
        });
        if hidden {
            suppressed.push(item);
        } else {
            unsuppressed.push(item);
        }
    }
    (unsuppressed, suppressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Dataset};
    use crate::describer::Subject;
    use std::sync::Arc;

    type Item = (&'static str, u8);

    #[test]
    fn test_id_suppresses_numeric_and_unique() -> crate::error::Result<()> {
        let df = Arc::new(Dataset::new(vec![Column::new("id", [1, 2, 3])])?);
        let describers = [
            DescriberKind::ColumnId,
            DescriberKind::ColumnNumeric,
            DescriberKind::ColumnNull,
            DescriberKind::ColumnUnique,
        ]
        .into_iter()
        .map(|kind| Describer::new(kind, Arc::clone(&df), Subject::column("id")))
        .collect::<crate::error::Result<Vec<_>>>()?;

        let (kept, hidden) = resolve(&describers);
        let kept: Vec<_> = kept.iter().map(|d| d.kind()).collect();
        let hidden: Vec<_> = hidden.iter().map(|d| d.kind()).collect();
        assert_eq!(kept, vec![DescriberKind::ColumnId, DescriberKind::ColumnNull]);
        assert_eq!(
            hidden,
            vec![DescriberKind::ColumnNumeric, DescriberKind::ColumnUnique]
        );
        Ok(())
    }

    #[test]
    fn test_no_suppression_across_columns_or_when_unqualified() -> crate::error::Result<()> {
        let df = Arc::new(Dataset::new(vec![
            Column::new("id", [1, 2, 3]),
            Column::new("dup", [1, 1, 2]),
        ])?);
        let id = Describer::new(DescriberKind::ColumnId, Arc::clone(&df), Subject::column("id"))?;
        let other_numeric = Describer::new(
            DescriberKind::ColumnNumeric,
            Arc::clone(&df),
            Subject::column("dup"),
        )?;
        assert!(!suppresses(&id, &other_numeric));

        let dup_id = Describer::new(DescriberKind::ColumnId, Arc::clone(&df), Subject::column("dup"))?;
        assert!(!dup_id.qualified());
        assert!(!suppresses(&dup_id, &other_numeric));
        Ok(())
    }

    #[test]
    fn test_mutual_suppression_keeps_higher_priority() {
        // (name, rank): "a" and "b" suppress each other.
        let items: [Item; 3] = [("a", 2), ("b", 1), ("c", 3)];
        let mutual = |x: &Item, y: &Item| matches!((x.0, y.0), ("a", "b") | ("b", "a"));
        let (kept, hidden) = resolve_by(&items, mutual, |x| x.1);
        assert_eq!(kept, vec![&("b", 1), &("c", 3)]);
        assert_eq!(hidden, vec![&("a", 2)]);
    }

    #[test]
    fn test_mutual_suppression_tie_keeps_first() {
        let items: [Item; 2] = [("a", 1), ("b", 1)];
        let (kept, hidden) = resolve_by(&items, |x: &Item, y: &Item| x.0 != y.0, |x| x.1);
        assert_eq!(kept, vec![&("a", 1)]);
        assert_eq!(hidden, vec![&("b", 1)]);
    }

    #[test]
    fn test_never_suppresses_itself() {
        let items = [1u8, 2];
        let (kept, hidden) = resolve_by(&items, |_, _| false, |x| *x);
        assert_eq!(kept.len(), 2);
        assert!(hidden.is_empty());

        let lone = [1u8];
        let (kept, _) = resolve_by(&lone, |_, _| true, |x| *x);
        assert_eq!(kept, vec![&1]);
    }
}
