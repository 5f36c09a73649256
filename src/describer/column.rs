//! Single-column analyzers.

use super::stats::histogram;
use super::{DescriberKind, Outcome};
use crate::dataset::{Column, DataType, Value};
use crate::render::{Block, Inline};
use crate::utils::{fmt_num, fmt_pct, truncate_chars};

/// Duplicate rate at or above which a column counts as "duplicated".
pub const DUPLICATION_THRESHOLD: f64 = 0.2;

/// Longest value listing a text description carries.
const TEXT_LISTING_CHARS: usize = 100;

pub(super) fn evaluate(kind: DescriberKind, column: &Column) -> Outcome {
    match kind {
        DescriberKind::ColumnId => id(column),
        DescriberKind::ColumnText => text(column),
        DescriberKind::ColumnNumeric => numeric(column),
        DescriberKind::ColumnNull => nulls(column),
        DescriberKind::ColumnUnique => unique(column),
        DescriberKind::ColumnDuplicated => duplicated(column),
        other => Outcome::invalid(format!("{other} does not describe a single column")),
    }
}

fn id(column: &Column) -> Outcome {
    if column.dtype() != DataType::Integer {
        return Outcome::unqualified("Not an integer");
    }
    if column.duplicate_count() > 0 {
        return Outcome::unqualified("Not unique");
    }

    let consecutive = is_consecutive(column.values());
    let (min, max) = (column.min(), column.max());
    let range = match (min, max) {
        (Some(min), Some(max)) => format!("{}-{}", fmt_num(min), fmt_num(max)),
        _ => "empty".to_owned(),
    };
    let description = format!(
        "Unique integer, {}, {range}",
        if consecutive {
            "consecutive"
        } else {
            "non-consecutive"
        }
    );

    Outcome::qualified(description)
        .with_metric("min", min.unwrap_or(f64::NAN))
        .with_metric("max", max.unwrap_or(f64::NAN))
        .with_metric("consecutive", if consecutive { 1.0 } else { 0.0 })
}

/// Every row-to-row step is exactly +1. Nulls break the run.
fn is_consecutive(values: &[Value]) -> bool {
    values.windows(2).all(|pair| match pair {
        [Value::Int(a), Value::Int(b)] => b.checked_sub(*a) == Some(1),
        _ => false,
    })
}

fn text(column: &Column) -> Outcome {
    let non_text = column.non_text_types();
    if !non_text.is_empty() {
        return Outcome::unqualified(format!("Non string types: {}", non_text.join(", ")));
    }

    let distinct = column.distinct_values();
    let listing = distinct
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Outcome::qualified(format!(
        "Text ({})",
        truncate_chars(&listing, TEXT_LISTING_CHARS)
    ))
    .with_metric("distinct_count", distinct.len() as f64)
}

fn numeric(column: &Column) -> Outcome {
    let non_numeric = || Outcome::unqualified(format!("Non-numeric type: {}", column.dtype()));
    if !column.is_numeric() {
        return non_numeric();
    }
    let (Some(min), Some(max)) = (column.min(), column.max()) else {
        return non_numeric();
    };

    let description = format!("Numeric ({}-{})", fmt_num(min), fmt_num(max));
    let hist = histogram(&column.numeric_values());
    let rows = hist
        .bins
        .iter()
        .map(|(start, count)| {
            vec![
                Inline::text(fmt_num(*start)),
                Inline::text(fmt_num(start + hist.bin_width)),
                Inline::text(count.to_string()),
            ]
        })
        .collect();

    Outcome::qualified(description.clone())
        .with_metric("min", min)
        .with_metric("max", max)
        .with_metric("bin_width", hist.bin_width)
        .with_block(Block::Paragraph(vec![Inline::text(description)]))
        .with_block(Block::Table {
            header: vec![
                Inline::text("from"),
                Inline::text("to"),
                Inline::text("count"),
            ],
            rows,
            highlight: None,
        })
}

fn nulls(column: &Column) -> Outcome {
    let count = column.null_count();
    let rate = column.null_rate();
    let outcome = if count == 0 {
        Outcome::qualified("No nulls")
    } else {
        Outcome::unqualified(format!("{} nulls ({count})", fmt_pct(rate)))
    };
    outcome
        .with_metric("null_rate", rate)
        .with_metric("null_count", count as f64)
}

fn unique(column: &Column) -> Outcome {
    let rate = column.duplicate_rate();
    let outcome = if column.duplicate_count() == 0 {
        Outcome::qualified("Unique")
    } else {
        Outcome::unqualified(format!("{} duplicated", fmt_pct(rate)))
    };
    outcome.with_metric("duplicate_rate", rate)
}

fn duplicated(column: &Column) -> Outcome {
    let rate = column.duplicate_rate();
    let outcome = if rate >= DUPLICATION_THRESHOLD {
        Outcome::qualified(format!("Duplicated ({})", fmt_pct(rate)))
    } else {
        Outcome::unqualified(format!(
            "Duplication rate {} is below threshold {}",
            fmt_pct(rate),
            fmt_pct(DUPLICATION_THRESHOLD)
        ))
    };
    outcome.with_metric("duplicate_rate", rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describer::State;

    #[test]
    fn test_id_consecutive() {
        let outcome = id(&Column::new("id", [1, 2, 3]));
        assert_eq!(outcome.state, State::Qualified);
        assert_eq!(outcome.description, "Unique integer, consecutive, 1-3");
    }

    #[test]
    fn test_id_non_consecutive() {
        let outcome = id(&Column::new("id", [1, 2, 4]));
        assert_eq!(outcome.state, State::Qualified);
        assert_eq!(outcome.description, "Unique integer, non-consecutive, 1-4");
    }

    #[test]
    fn test_id_unqualified() {
        assert_eq!(id(&Column::new("id", ["1", "2", "3"])).description, "Not an integer");
        let dup = id(&Column::new("id", [1, 1, 2]));
        assert_eq!(dup.state, State::Unqualified);
        assert_eq!(dup.description, "Not unique");
    }

    #[test]
    fn test_text() {
        let outcome = text(&Column::new("name", ["a", "b", "a"]));
        assert_eq!(outcome.state, State::Qualified);
        assert_eq!(outcome.description, "Text (a, b)");

        let mixed = text(&Column::new(
            "name",
            [Value::from("a"), Value::Int(1), Value::Null],
        ));
        assert_eq!(mixed.state, State::Unqualified);
        assert_eq!(mixed.description, "Non string types: int, null");
    }

    #[test]
    fn test_text_listing_is_truncated() {
        let long: Vec<String> = (0..60).map(|i| format!("value{i}")).collect();
        let outcome = text(&Column::new("name", long));
        assert!(outcome.description.ends_with(" [truncated...])"));
    }

    #[test]
    fn test_numeric() {
        let outcome = numeric(&Column::new("val", [10, 20, 30]));
        assert_eq!(outcome.state, State::Qualified);
        assert_eq!(outcome.description, "Numeric (10-30)");
        assert!(!outcome.rich.is_empty());

        let not = numeric(&Column::new("val", ["10"]));
        assert_eq!(not.state, State::Unqualified);
        assert_eq!(not.description, "Non-numeric type: text");
    }

    #[test]
    fn test_nulls() {
        assert_eq!(nulls(&Column::new("v", [10, 20, 30])).description, "No nulls");
        let outcome = nulls(&Column::new("v", [Some(10), None, Some(30)]));
        assert_eq!(outcome.state, State::Unqualified);
        assert_eq!(outcome.description, "33.3% nulls (1)");
    }

    #[test]
    fn test_unique_and_duplicated() {
        assert_eq!(unique(&Column::new("v", [10, 20, 30])).description, "Unique");
        let repeated = Column::new("v", [10, 10, 30]);
        assert_eq!(unique(&repeated).description, "33.3% duplicated");

        let dup = duplicated(&repeated);
        assert_eq!(dup.state, State::Qualified);
        assert_eq!(dup.description, "Duplicated (33.3%)");

        let low = duplicated(&Column::new("v", [1, 2, 3, 4, 5, 6, 1]));
        assert_eq!(low.state, State::Unqualified);
        assert_eq!(
            low.description,
            "Duplication rate 14.3% is below threshold 20.0%"
        );
    }
}
