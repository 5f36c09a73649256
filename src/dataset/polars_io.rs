//! Conversion from polars dataframes, the shape ingestion code hands us.

use super::{Column, Dataset, Value};
use crate::error::{DfxError, Result};
use polars::prelude::{DataFrame, DataType as PlDataType, Series};

impl TryFrom<&DataFrame> for Dataset {
    type Error = DfxError;

    fn try_from(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let values = series_values(series)?;
            columns.push(Column::new(series.name().to_string(), values));
        }
        Self::new(columns)
    }
}

/// Read a series into cell values.
///
/// Booleans, integers and floats keep their type; every other dtype
/// (strings, temporals, categoricals) is rendered as text.
fn series_values(series: &Series) -> Result<Vec<Value>> {
    let dtype = series.dtype();
    let values = if dtype.is_bool() {
        let ca = series.bool()?;
        ca.into_iter().map(Value::from).collect()
    } else if dtype.is_integer() {
        let cast = series.cast(&PlDataType::Int64)?;
        let ca = cast.i64()?;
        ca.into_iter().map(Value::from).collect()
    } else if dtype.is_float() {
        let cast = series.cast(&PlDataType::Float64)?;
        let ca = cast.f64()?;
        ca.into_iter().map(Value::from).collect()
    } else {
        let cast = series.cast(&PlDataType::String)?;
        let ca = cast.str()?;
        ca.into_iter().map(Value::from).collect()
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataType;
    use polars::prelude::{Column as PlColumn, NamedFrom as _};

    #[test]
    fn test_from_dataframe_keeps_types_and_nulls() -> Result<()> {
        let df = DataFrame::new(vec![
            PlColumn::from(Series::new("id".into(), &[1i64, 2, 3])),
            PlColumn::from(Series::new("score".into(), &[Some(1.5), None, Some(2.5)])),
            PlColumn::from(Series::new("city".into(), &["SYD", "MEL", "SYD"])),
            PlColumn::from(Series::new("active".into(), &[true, false, true])),
        ])?;

        let dataset = Dataset::try_from(&df)?;
        assert_eq!(dataset.column_names(), vec!["id", "score", "city", "active"]);
        assert_eq!(dataset.require_column("id")?.dtype(), DataType::Integer);
        assert_eq!(dataset.require_column("score")?.null_count(), 1);
        assert_eq!(dataset.require_column("city")?.dtype(), DataType::Text);
        assert_eq!(dataset.require_column("active")?.dtype(), DataType::Boolean);
        Ok(())
    }

    #[test]
    fn test_same_frame_same_hash() -> Result<()> {
        let build = || -> Result<DataFrame> {
            Ok(DataFrame::new(vec![PlColumn::from(Series::new(
                "val".into(),
                &[10i64, 20, 30],
            ))])?)
        };
        let a = Dataset::try_from(&build()?)?;
        let b = Dataset::try_from(&build()?)?;
        assert_eq!(a.content_hash(), b.content_hash());
        Ok(())
    }
}
