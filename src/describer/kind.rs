//! The closed set of describer kinds and the subjects they describe.

use crate::dataset::Dataset;
use crate::error::{DfxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a describer is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Table,
    Column(String),
    Relationship(String, String),
    Row(usize),
    Value { column: String, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubjectShape {
    Table,
    Column,
    Relationship,
    Row,
    Value,
}

impl Subject {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    pub fn relationship(column_1: impl Into<String>, column_2: impl Into<String>) -> Self {
        Self::Relationship(column_1.into(), column_2.into())
    }

    pub fn value(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Value {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn shape(&self) -> SubjectShape {
        match self {
            Self::Table => SubjectShape::Table,
            Self::Column(_) => SubjectShape::Column,
            Self::Relationship(..) => SubjectShape::Relationship,
            Self::Row(_) => SubjectShape::Row,
            Self::Value { .. } => SubjectShape::Value,
        }
    }

    /// Identity arguments, in constructor order.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Table => Vec::new(),
            Self::Column(name) => vec![name.clone()],
            Self::Relationship(a, b) => vec![a.clone(), b.clone()],
            Self::Row(index) => vec![index.to_string()],
            Self::Value { column, value } => vec![column.clone(), value.clone()],
        }
    }

    /// Check that everything the subject names exists in `dataset`.
    pub(crate) fn validate(&self, dataset: &Dataset) -> Result<()> {
        match self {
            Self::Table => Ok(()),
            Self::Column(name) | Self::Value { column: name, .. } => {
                dataset.require_column(name).map(|_| ())
            }
            Self::Relationship(a, b) => {
                dataset.require_column(a)?;
                dataset.require_column(b)?;
                Ok(())
            }
            Self::Row(index) => {
                if *index < dataset.height() {
                    Ok(())
                } else {
                    Err(DfxError::InvalidInput(format!(
                        "row {index} out of range (dataset has {} rows)",
                        dataset.height()
                    )))
                }
            }
        }
    }
}

/// Every describer variant.
///
/// Declaration order doubles as suppression priority: when two describers
/// suppress each other, the one declared first wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DescriberKind {
    ShapeColumns,
    ShapeRows,
    ColumnId,
    ColumnText,
    ColumnNumeric,
    ColumnNull,
    ColumnUnique,
    ColumnDuplicated,
    RelationshipAnova,
    RelationshipCorrelation,
    RelationshipOneToMany,
    TablePage,
    ColumnPage,
    RelationshipPage,
    RowPage,
    ValuePage,
}

/// Table-level statistics shown on the table page.
pub const SHAPE_KINDS: [DescriberKind; 2] = [DescriberKind::ShapeColumns, DescriberKind::ShapeRows];

/// Per-column analyzers, in the order pages list them.
pub const COLUMN_KINDS: [DescriberKind; 6] = [
    DescriberKind::ColumnId,
    DescriberKind::ColumnText,
    DescriberKind::ColumnNumeric,
    DescriberKind::ColumnNull,
    DescriberKind::ColumnUnique,
    DescriberKind::ColumnDuplicated,
];

/// Pairwise analyzers.
pub const RELATIONSHIP_KINDS: [DescriberKind; 3] = [
    DescriberKind::RelationshipAnova,
    DescriberKind::RelationshipCorrelation,
    DescriberKind::RelationshipOneToMany,
];

impl DescriberKind {
    pub const ALL: [Self; 16] = [
        Self::ShapeColumns,
        Self::ShapeRows,
        Self::ColumnId,
        Self::ColumnText,
        Self::ColumnNumeric,
        Self::ColumnNull,
        Self::ColumnUnique,
        Self::ColumnDuplicated,
        Self::RelationshipAnova,
        Self::RelationshipCorrelation,
        Self::RelationshipOneToMany,
        Self::TablePage,
        Self::ColumnPage,
        Self::RelationshipPage,
        Self::RowPage,
        Self::ValuePage,
    ];

    /// Stable name used as the first component of the cache key.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::ShapeColumns => "ShapeColumns",
            Self::ShapeRows => "ShapeRows",
            Self::ColumnId => "ColumnId",
            Self::ColumnText => "ColumnText",
            Self::ColumnNumeric => "ColumnNumeric",
            Self::ColumnNull => "ColumnNull",
            Self::ColumnUnique => "ColumnUnique",
            Self::ColumnDuplicated => "ColumnDuplicated",
            Self::RelationshipAnova => "RelationshipAnova",
            Self::RelationshipCorrelation => "RelationshipCorrelation",
            Self::RelationshipOneToMany => "RelationshipOneToMany",
            Self::TablePage => "TablePageDescriber",
            Self::ColumnPage => "ColumnPageDescriber",
            Self::RelationshipPage => "RelationshipPageDescriber",
            Self::RowPage => "RowPageDescriber",
            Self::ValuePage => "ValuePageDescriber",
        }
    }

    /// Short human label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShapeColumns => "Columns",
            Self::ShapeRows => "Rows",
            Self::ColumnId => "Identifier",
            Self::ColumnText => "Text",
            Self::ColumnNumeric => "Numeric",
            Self::ColumnNull => "Nulls",
            Self::ColumnUnique => "Uniqueness",
            Self::ColumnDuplicated => "Duplication",
            Self::RelationshipAnova => "ANOVA",
            Self::RelationshipCorrelation => "Correlation",
            Self::RelationshipOneToMany => "Cardinality",
            Self::TablePage => "Table",
            Self::ColumnPage => "Column",
            Self::RelationshipPage => "Relationship",
            Self::RowPage => "Row",
            Self::ValuePage => "Value",
        }
    }

    pub fn subject_shape(&self) -> SubjectShape {
        match self {
            Self::ShapeColumns | Self::ShapeRows | Self::TablePage => SubjectShape::Table,
            Self::ColumnId
            | Self::ColumnText
            | Self::ColumnNumeric
            | Self::ColumnNull
            | Self::ColumnUnique
            | Self::ColumnDuplicated
            | Self::ColumnPage => SubjectShape::Column,
            Self::RelationshipAnova
            | Self::RelationshipCorrelation
            | Self::RelationshipOneToMany
            | Self::RelationshipPage => SubjectShape::Relationship,
            Self::RowPage => SubjectShape::Row,
            Self::ValuePage => SubjectShape::Value,
        }
    }

    /// Aggregation variants that fan out to other describers.
    pub fn is_page(&self) -> bool {
        matches!(
            self,
            Self::TablePage
                | Self::ColumnPage
                | Self::RelationshipPage
                | Self::RowPage
                | Self::ValuePage
        )
    }

    /// Suppression priority; lower wins.
    pub fn priority(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for DescriberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

impl FromStr for DescriberKind {
    type Err = DfxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.class_name() == s)
            .ok_or_else(|| DfxError::InvalidInput(format!("unknown describer kind '{s}'")))
    }
}
