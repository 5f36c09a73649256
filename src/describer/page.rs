//! Aggregating describers that assemble a full view of a table, column,
//! relationship, row or value.
//!
//! Pages are always qualified: they report that there is something to show,
//! not a statistical property. Every nested describer is obtained from the
//! factory the page is evaluated with, and a nested describer that cannot be
//! built is logged and left out rather than failing the page.

use super::kind::{COLUMN_KINDS, RELATIONSHIP_KINDS, SHAPE_KINDS};
use super::{Describer, DescriberFactory, DescriberKind, Outcome, Subject, suppression};
use crate::dataset::{Column, Dataset};
use crate::render::{Block, Inline};
use crate::utils::truncate_chars;
use std::sync::Arc;

/// Rows shown in sample tables.
const SAMPLE_ROWS: usize = 5;
/// Neighbouring columns shown on each side of a column in its sample window.
const SAMPLE_WINDOW: usize = 5;
const TOP_VALUES: usize = 5;

pub(super) fn evaluate(
    kind: DescriberKind,
    dataset: &Arc<Dataset>,
    subject: &Subject,
    factory: &dyn DescriberFactory,
) -> Outcome {
    match (kind, subject) {
        (DescriberKind::TablePage, Subject::Table) => table(dataset, factory),
        (DescriberKind::ColumnPage, Subject::Column(name)) => column(dataset, name, factory),
        (DescriberKind::RelationshipPage, Subject::Relationship(a, b)) => {
            relationship(dataset, a, b, factory)
        }
        (DescriberKind::RowPage, Subject::Row(index)) => row(dataset, *index),
        (DescriberKind::ValuePage, Subject::Value { column, value }) => {
            value_page(dataset, column, value)
        }
        _ => Outcome::invalid(format!("{kind} cannot describe {subject:?}")),
    }
}

/// Fetch and evaluate a nested describer, logging and skipping failures.
fn fetch(
    factory: &dyn DescriberFactory,
    kind: DescriberKind,
    dataset: &Arc<Dataset>,
    subject: Subject,
) -> Option<Describer> {
    match factory.get_or_create(kind, dataset, subject) {
        Ok(describer) => {
            describer.ensure_evaluated(factory);
            Some(describer)
        }
        Err(e) => {
            tracing::warn!(%kind, error = %e, "Skipping describer that could not be built");
            None
        }
    }
}

/// Unsuppressed qualified column findings, in [`COLUMN_KINDS`] order.
fn column_findings(
    dataset: &Arc<Dataset>,
    name: &str,
    factory: &dyn DescriberFactory,
) -> Vec<String> {
    let qualified: Vec<Describer> = COLUMN_KINDS
        .into_iter()
        .filter_map(|kind| fetch(factory, kind, dataset, Subject::column(name)))
        .filter(Describer::qualified)
        .collect();
    let (unsuppressed, _) = suppression::resolve(&qualified);
    unsuppressed.into_iter().map(Describer::description).collect()
}

/// A table of `rows` over `columns`, led by a row-link column.
fn sample_table(
    columns: &[&Column],
    rows: impl IntoIterator<Item = usize>,
    highlight: Option<usize>,
) -> Block {
    let mut header = vec![Inline::text("row")];
    header.extend(columns.iter().map(|c| Inline::Column(c.name().to_owned())));

    let rows = rows
        .into_iter()
        .map(|i| {
            let mut cells = vec![Inline::Row(i)];
            cells.extend(columns.iter().map(|c| match c.get(i) {
                Some(v) if !v.is_null() => Inline::value(c.name(), v),
                _ => Inline::text("null"),
            }));
            cells
        })
        .collect();

    Block::Table {
        header,
        rows,
        highlight: highlight.map(|pos| pos + 1),
    }
}

fn table(dataset: &Arc<Dataset>, factory: &dyn DescriberFactory) -> Outcome {
    let mut blocks = vec![Block::Heading("Shape".to_owned())];
    let mut basics = Vec::new();
    for kind in SHAPE_KINDS {
        if let Some(shape) = fetch(factory, kind, dataset, Subject::Table) {
            basics.push(shape.description());
            blocks.extend(shape.rich_output().blocks().iter().cloned());
        }
    }

    let all: Vec<&Column> = dataset.columns().iter().collect();
    blocks.push(Block::Heading("Sample".to_owned()));
    blocks.push(sample_table(&all, 0..dataset.height().min(SAMPLE_ROWS), None));

    blocks.push(Block::Heading("Columns".to_owned()));
    let items = dataset
        .column_names()
        .into_iter()
        .map(|name| {
            let findings = column_findings(dataset, name, factory);
            let summary = if findings.is_empty() {
                "no notable findings".to_owned()
            } else {
                findings.join("; ")
            };
            vec![
                Inline::Column(name.to_owned()),
                Inline::text(format!(": {summary}")),
            ]
        })
        .collect();
    blocks.push(Block::List(items));

    Outcome::qualified(basics.join("; ")).with_rich(blocks.into())
}

fn column(dataset: &Arc<Dataset>, name: &str, factory: &dyn DescriberFactory) -> Outcome {
    let Some(position) = dataset.column_index(name) else {
        return Outcome::invalid(format!("column '{name}' not in dataset"));
    };
    let mut blocks = vec![Block::Heading(name.to_owned())];

    let lo = position.saturating_sub(SAMPLE_WINDOW);
    let hi = (position + SAMPLE_WINDOW + 1).min(dataset.width());
    let window: Vec<&Column> = dataset.columns().iter().skip(lo).take(hi - lo).collect();
    blocks.push(sample_table(
        &window,
        0..dataset.height().min(SAMPLE_ROWS),
        Some(position - lo),
    ));

    let findings = column_findings(dataset, name, factory);
    blocks.push(Block::Heading("Findings".to_owned()));
    blocks.push(Block::List(
        findings.iter().map(|f| vec![Inline::text(f.clone())]).collect(),
    ));

    if let Some(col) = dataset.column(name) {
        let rows = col
            .value_counts()
            .into_iter()
            .take(TOP_VALUES)
            .map(|(value, count)| vec![Inline::value(name, &value), Inline::text(count.to_string())])
            .collect();
        blocks.push(Block::Heading("Top values".to_owned()));
        blocks.push(Block::Table {
            header: vec![Inline::Column(name.to_owned()), Inline::text("count")],
            rows,
            highlight: None,
        });
    }

    let mut related = Vec::new();
    for other in dataset.column_names().into_iter().filter(|other| *other != name) {
        for kind in RELATIONSHIP_KINDS {
            let subject = Subject::relationship(name, other);
            if let Some(rel) = fetch(factory, kind, dataset, subject)
                && rel.qualified()
            {
                related.push(vec![
                    Inline::Relationship(name.to_owned(), other.to_owned()),
                    Inline::text(format!(": {}", rel.description())),
                ]);
            }
        }
    }
    blocks.push(Block::Heading("Relationships".to_owned()));
    blocks.push(Block::List(related));

    let description = if findings.is_empty() {
        format!("{name}: no notable findings")
    } else {
        format!("{name}: {}", findings.join("; "))
    };
    Outcome::qualified(description).with_rich(blocks.into())
}

fn relationship(
    dataset: &Arc<Dataset>,
    a: &str,
    b: &str,
    factory: &dyn DescriberFactory,
) -> Outcome {
    let mut blocks = vec![Block::Paragraph(vec![Inline::Relationship(
        a.to_owned(),
        b.to_owned(),
    )])];

    let pair: Vec<&Column> = [a, b].iter().filter_map(|n| dataset.column(n)).collect();
    blocks.push(sample_table(&pair, 0..dataset.height().min(SAMPLE_ROWS), None));

    let found: Vec<Describer> = RELATIONSHIP_KINDS
        .into_iter()
        .filter_map(|kind| fetch(factory, kind, dataset, Subject::relationship(a, b)))
        .collect();
    let qualified = found.iter().filter(|d| d.qualified()).count();

    blocks.push(Block::List(
        found
            .iter()
            .map(|d| {
                vec![Inline::text(format!(
                    "{}: {} ({})",
                    d.kind().label(),
                    d.description(),
                    d.state()
                ))]
            })
            .collect(),
    ));
    for d in found.iter().filter(|d| d.qualified()) {
        blocks.extend(d.rich_output().blocks().iter().cloned());
    }

    Outcome::qualified(format!(
        "{a} and {b}: {qualified} of {} relationships qualified",
        found.len()
    ))
    .with_metric("qualified_count", qualified as f64)
    .with_rich(blocks.into())
}

fn row(dataset: &Dataset, index: usize) -> Outcome {
    let Some(cells) = dataset.row(index) else {
        return Outcome::invalid(format!("row {index} out of range"));
    };
    let summary = cells
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ");

    let rows = cells
        .iter()
        .map(|(name, value)| {
            vec![
                Inline::Column((*name).to_owned()),
                if value.is_null() {
                    Inline::text("null")
                } else {
                    Inline::value(*name, value)
                },
            ]
        })
        .collect();

    Outcome::qualified(format!("Row {index}: {}", truncate_chars(&summary, 100)))
        .with_block(Block::Heading(format!("Row {index}")))
        .with_block(Block::Table {
            header: vec![Inline::text("column"), Inline::text("value")],
            rows,
            highlight: None,
        })
}

/// Rows whose rendered value in `column` equals `value`.
fn value_page(dataset: &Dataset, column: &str, value: &str) -> Outcome {
    let Some(col) = dataset.column(column) else {
        return Outcome::invalid(format!("column '{column}' not in dataset"));
    };
    let matches: Vec<usize> = col
        .values()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.to_string() == value)
        .map(|(i, _)| i)
        .collect();
    let count = matches.len();
    let noun = if count == 1 { "row" } else { "rows" };

    let all: Vec<&Column> = dataset.columns().iter().collect();
    let highlight = dataset.column_index(column);
    Outcome::qualified(format!("{count} {noun} where {column} is {value}"))
        .with_metric("row_count", count as f64)
        .with_block(Block::Paragraph(vec![
            Inline::text(format!("{count} {noun} where ")),
            Inline::Column(column.to_owned()),
            Inline::text(" is "),
            Inline::value(column, value),
        ]))
        .with_block(sample_table(
            &all,
            matches.into_iter().take(SAMPLE_ROWS),
            highlight,
        ))
}
