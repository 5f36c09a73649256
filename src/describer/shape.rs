//! Table shape: column listing and row count.

use super::Outcome;
use crate::dataset::Dataset;
use crate::render::{Block, Inline};

pub(super) fn columns(dataset: &Dataset) -> Outcome {
    let names = dataset.column_names();
    let description = format!("{} columns: {}", names.len(), names.join(", "));

    let mut inlines = vec![Inline::text(format!("{} columns: ", names.len()))];
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            inlines.push(Inline::text(", "));
        }
        inlines.push(Inline::Column((*name).to_owned()));
    }

    Outcome::qualified(description)
        .with_metric("column_count", names.len() as f64)
        .with_block(Block::Paragraph(inlines))
}

pub(super) fn rows(dataset: &Dataset) -> Outcome {
    Outcome::qualified(format!("{} rows", dataset.height()))
        .with_metric("row_count", dataset.height() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::describer::State;

    #[test]
    fn test_shape_descriptions() -> crate::error::Result<()> {
        let df = Dataset::new(vec![
            Column::new("id", ["1", "2", "3"]),
            Column::new("val", [10, 20, 30]),
        ])?;
        let cols = columns(&df);
        assert_eq!(cols.state, State::Qualified);
        assert_eq!(cols.description, "2 columns: id, val");
        assert_eq!(rows(&df).description, "3 rows");
        Ok(())
    }
}
