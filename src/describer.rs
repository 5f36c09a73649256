//! The describer engine.
//!
//! A [`Describer`] binds one [`DescriberKind`] to a dataset and a
//! [`Subject`]. Construction validates the subject and fixes the identity;
//! evaluation is deferred until something asks for a verdict, runs exactly
//! once, and its [`Outcome`] is immutable afterwards.
//!
//! ## Evaluation
//!
//! [`Describer::ensure_evaluated`] takes the factory that nested describers
//! (used by pages) are obtained from. The plain accessors ([`Describer::valid`],
//! [`Describer::qualified`], [`Describer::description`], ...) evaluate with a
//! [`PlainFactory`] when nobody evaluated the describer before.
//!
//! ```
//! use dfx::dataset::{Column, Dataset};
//! use dfx::describer::{Describer, DescriberKind, Subject};
//! use std::sync::Arc;
//!
//! # fn example() -> dfx::error::Result<()> {
//! let df = Arc::new(Dataset::new(vec![Column::new("id", [1, 2, 3])])?);
//! let d = Describer::new(DescriberKind::ColumnId, df, Subject::column("id"))?;
//! assert!(d.qualified());
//! assert_eq!(d.description(), "Unique integer, consecutive, 1-3");
//! # Ok(())
//! # }
//! ```
//!
//! ## Persistence
//!
//! [`DescriberRecord`] is the stored form. It refers to the dataset by content
//! hash only; [`Describer::from_record`] re-links it to a loaded dataset.

mod column;
pub mod factory;
pub mod identity;
pub mod kind;
pub mod outcome;
mod page;
mod relationship;
mod shape;
pub mod state;
pub mod stats;
pub mod suppression;

pub use column::DUPLICATION_THRESHOLD;
pub use factory::{DescriberFactory, PlainFactory};
pub use identity::identity;
pub use kind::{DescriberKind, Subject, SubjectShape};
pub use outcome::Outcome;
pub use state::State;

use crate::dataset::Dataset;
use crate::error::{DfxError, Result};
use crate::render::{Block, Inline, RichOutput, UrlBuilder, render_markdown};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

#[derive(Clone)]
pub struct Describer {
    kind: DescriberKind,
    subject: Subject,
    dataset: Arc<Dataset>,
    identity: String,
    outcome: OnceLock<Outcome>,
}

/// Persisted form of a [`Describer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DescriberRecord {
    pub kind: DescriberKind,
    pub subject: Subject,
    pub dataset_hash: String,
    pub identity: String,
    /// `None` when the describer was saved before evaluation.
    pub outcome: Option<Outcome>,
}

impl Describer {
    /// Bind `kind` to a subject of `dataset`.
    ///
    /// Fails with [`DfxError::InvalidInput`] when the subject does not fit the
    /// kind or names something the dataset lacks.
    pub fn new(kind: DescriberKind, dataset: Arc<Dataset>, subject: Subject) -> Result<Self> {
        if subject.shape() != kind.subject_shape() {
            return Err(DfxError::InvalidInput(format!(
                "{kind} expects a {:?} subject, got {subject:?}",
                kind.subject_shape()
            )));
        }
        subject.validate(&dataset)?;
        let identity = identity(kind.class_name(), dataset.content_hash(), &subject.args());
        Ok(Self {
            kind,
            subject,
            dataset,
            identity,
            outcome: OnceLock::new(),
        })
    }

    /// Rebuild a describer from its record and the dataset it refers to.
    pub fn from_record(record: DescriberRecord, dataset: Arc<Dataset>) -> Result<Self> {
        if record.dataset_hash != dataset.content_hash() {
            return Err(DfxError::CorruptEntry(format!(
                "{} refers to dataset {}, got {}",
                record.identity,
                record.dataset_hash,
                dataset.content_hash()
            )));
        }
        let describer = Self::new(record.kind, dataset, record.subject)?;
        if describer.identity != record.identity {
            return Err(DfxError::CorruptEntry(format!(
                "identity mismatch: stored {}, rebuilt {}",
                record.identity, describer.identity
            )));
        }
        Ok(Self {
            outcome: record.outcome.map(OnceLock::from).unwrap_or_default(),
            ..describer
        })
    }

    pub fn to_record(&self) -> DescriberRecord {
        DescriberRecord {
            kind: self.kind,
            subject: self.subject.clone(),
            dataset_hash: self.dataset_hash().to_owned(),
            identity: self.identity.clone(),
            outcome: self.outcome.get().cloned(),
        }
    }

    pub fn kind(&self) -> DescriberKind {
        self.kind
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn dataset_hash(&self) -> &str {
        self.dataset.content_hash()
    }

    /// Cache key: `<ClassName>(<dataset_hash>, <args>)`.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Current state; `Uncalculated` until evaluated.
    pub fn state(&self) -> State {
        self.outcome.get().map_or(State::Uncalculated, |o| o.state)
    }

    pub fn is_evaluated(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Evaluate once, resolving nested describers through `factory`.
    pub fn ensure_evaluated(&self, factory: &dyn DescriberFactory) -> &Outcome {
        self.outcome.get_or_init(|| {
            tracing::debug!(identity = %self.identity, "Evaluating describer");
            self.compute(factory)
        })
    }

    pub fn outcome(&self) -> &Outcome {
        self.ensure_evaluated(&PlainFactory)
    }

    pub fn valid(&self) -> bool {
        self.outcome().state.is_valid()
    }

    /// Qualified implies valid.
    pub fn qualified(&self) -> bool {
        let state = self.outcome().state;
        state.is_valid() && state.is_qualified()
    }

    pub fn description(&self) -> String {
        self.outcome().description.clone()
    }

    /// Rich output, or the description as a single paragraph when the
    /// describer produced nothing richer.
    pub fn rich_output(&self) -> RichOutput {
        let outcome = self.outcome();
        if outcome.rich.is_empty() {
            RichOutput::from(vec![Block::Paragraph(vec![Inline::text(
                outcome.description.clone(),
            )])])
        } else {
            outcome.rich.clone()
        }
    }

    /// Markdown for the rich output, with links built by `urls`.
    pub fn render(&self, urls: &dyn UrlBuilder) -> String {
        render_markdown(&self.rich_output(), urls)
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.outcome().metrics.get(name).copied()
    }

    pub fn suppresses(&self, other: &Self) -> bool {
        suppression::suppresses(self, other)
    }

    fn compute(&self, factory: &dyn DescriberFactory) -> Outcome {
        let dataset = &self.dataset;
        match (self.kind, &self.subject) {
            (DescriberKind::ShapeColumns, Subject::Table) => shape::columns(dataset),
            (DescriberKind::ShapeRows, Subject::Table) => shape::rows(dataset),
            (kind, _) if kind.is_page() => page::evaluate(kind, dataset, &self.subject, factory),
            (kind, Subject::Column(name)) => match dataset.column(name) {
                Some(col) => column::evaluate(kind, col),
                None => Outcome::invalid(format!("column '{name}' not in dataset")),
            },
            (kind, Subject::Relationship(a, b)) => match (dataset.column(a), dataset.column(b)) {
                (Some(a), Some(b)) => relationship::evaluate(kind, a, b),
                _ => Outcome::invalid(format!("columns '{a}' and '{b}' not both in dataset")),
            },
            (kind, subject) => Outcome::invalid(format!("{kind} cannot describe {subject:?}")),
        }
    }
}

impl fmt::Debug for Describer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Describer")
            .field("identity", &self.identity)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Describer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome.get() {
            Some(o) => write!(f, "{}, {}, {}", self.identity, o.state, o.description),
            None => write!(f, "{}, {}", self.identity, State::Uncalculated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::render::PrefixUrlBuilder;

    fn build(kind: DescriberKind, columns: Vec<Column>, subject: Subject) -> Result<Describer> {
        Describer::new(kind, Arc::new(Dataset::new(columns)?), subject)
    }

    #[test]
    fn test_lazy_and_idempotent() -> Result<()> {
        let d = build(
            DescriberKind::ColumnNull,
            vec![Column::new("val", [Some(10), None, Some(30)])],
            Subject::column("val"),
        )?;
        assert_eq!(d.state(), State::Uncalculated);
        let first = (d.description(), d.qualified());
        assert_eq!(d.state(), State::Unqualified);
        let second = (d.description(), d.qualified());
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_every_variant_is_idempotent() -> Result<()> {
        let df = Arc::new(Dataset::new(vec![
            Column::new("group", ["a", "a", "a", "b", "b", "b"]),
            Column::new("val", [10, 20, 30, 100, 110, 120]),
        ])?);
        for kind in DescriberKind::ALL {
            let subject = match kind.subject_shape() {
                SubjectShape::Table => Subject::Table,
                SubjectShape::Column => Subject::column("val"),
                SubjectShape::Relationship => Subject::relationship("group", "val"),
                SubjectShape::Row => Subject::Row(0),
                SubjectShape::Value => Subject::value("group", "a"),
            };
            let d = Describer::new(kind, Arc::clone(&df), subject)?;
            let first = d.ensure_evaluated(&PlainFactory).clone();
            assert_eq!(d.ensure_evaluated(&PlainFactory), &first, "{kind}");
            assert_eq!(d.outcome(), &first, "{kind}");
        }
        Ok(())
    }

    #[test]
    fn test_column_id_scenarios() -> Result<()> {
        let d = build(
            DescriberKind::ColumnId,
            vec![Column::new("id", [1, 2, 3])],
            Subject::column("id"),
        )?;
        assert!(d.qualified());
        assert!(d.description().contains("consecutive"));
        assert!(d.description().contains("1-3"));

        let dup = build(
            DescriberKind::ColumnId,
            vec![Column::new("id", [1, 1, 2])],
            Subject::column("id"),
        )?;
        assert!(!dup.qualified());
        assert!(dup.valid());
        Ok(())
    }

    #[test]
    fn test_anova_scenario() -> Result<()> {
        let d = build(
            DescriberKind::RelationshipAnova,
            vec![
                Column::new("val", [10, 20, 30, 11, 21, 31]),
                Column::new("group", ["a", "a", "a", "b", "b", "b"]),
            ],
            Subject::relationship("group", "val"),
        )?;
        assert!(d.valid());
        assert!(!d.qualified());
        assert!(d.metric("p_value").is_some_and(|p| p >= 0.05));
        Ok(())
    }

    #[test]
    fn test_invalid_is_never_qualified() -> Result<()> {
        let d = build(
            DescriberKind::RelationshipCorrelation,
            vec![Column::new("a", ["x", "y"]), Column::new("b", [1, 2])],
            Subject::relationship("a", "b"),
        )?;
        assert!(!d.valid());
        assert!(!d.qualified());
        assert_eq!(d.description(), "a is not numeric");
        Ok(())
    }

    #[test]
    fn test_construction_rejects_bad_subjects() -> Result<()> {
        let df = Arc::new(Dataset::new(vec![Column::new("id", [1, 2])])?);
        let missing = Describer::new(DescriberKind::ColumnId, Arc::clone(&df), Subject::column("x"));
        assert!(matches!(missing, Err(DfxError::InvalidInput(_))));

        let wrong_shape = Describer::new(DescriberKind::ColumnId, Arc::clone(&df), Subject::Table);
        assert!(matches!(wrong_shape, Err(DfxError::InvalidInput(_))));

        let row = Describer::new(DescriberKind::RowPage, df, Subject::Row(5));
        assert!(matches!(row, Err(DfxError::InvalidInput(_))));
        Ok(())
    }

    #[test]
    fn test_identity_format() -> Result<()> {
        let df = Arc::new(Dataset::new(vec![Column::new("id", [1, 2])])?);
        let rows = Describer::new(DescriberKind::ShapeRows, Arc::clone(&df), Subject::Table)?;
        assert_eq!(rows.identity(), format!("ShapeRows({}, )", df.content_hash()));

        let page = Describer::new(DescriberKind::ValuePage, Arc::clone(&df), Subject::value("id", "2"))?;
        assert_eq!(
            page.identity(),
            format!("ValuePageDescriber({}, id, 2)", df.content_hash())
        );
        Ok(())
    }

    #[test]
    fn test_record_round_trip() -> Result<()> {
        let df = Arc::new(Dataset::new(vec![Column::new("id", [1, 2, 3])])?);
        let d = Describer::new(DescriberKind::ColumnId, Arc::clone(&df), Subject::column("id"))?;
        d.outcome();
        let record = d.to_record();
        assert_eq!(record.dataset_hash, df.content_hash());

        let restored = Describer::from_record(record.clone(), Arc::clone(&df))?;
        assert!(restored.is_evaluated());
        assert_eq!(restored.description(), d.description());

        let other = Arc::new(Dataset::new(vec![Column::new("id", [1, 2, 4])])?);
        let mismatch = Describer::from_record(record, other);
        assert!(matches!(mismatch, Err(DfxError::CorruptEntry(_))));
        Ok(())
    }

    #[test]
    fn test_render_falls_back_to_description() -> Result<()> {
        let d = build(
            DescriberKind::ColumnNull,
            vec![Column::new("val", [1, 2])],
            Subject::column("val"),
        )?;
        assert_eq!(d.render(&PrefixUrlBuilder::new("/df")), "No nulls\n");

        let cols = build(
            DescriberKind::ShapeColumns,
            vec![Column::new("id", [1])],
            Subject::Table,
        )?;
        assert_eq!(
            cols.render(&PrefixUrlBuilder::new("/df")),
            "1 columns: [id](/df/column/id)\n"
        );
        Ok(())
    }
}
