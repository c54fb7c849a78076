//! Active dataset with derived column lists.

use polars::prelude::*;
use std::path::PathBuf;

/// Where the active dataset came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Upload(PathBuf),
    Sample { seed: u64 },
}

impl DatasetSource {
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Upload(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
            DatasetSource::Sample { seed } => format!("Sample dataset (seed {})", seed),
        }
    }
}

/// A loaded table plus its numeric / text / all column lists.
///
/// The lists are computed once when the dataset is created and keep the
/// source column order. Every column is either numeric or text.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    source: DatasetSource,
    numeric_columns: Vec<String>,
    text_columns: Vec<String>,
    all_columns: Vec<String>,
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

impl Dataset {
    pub fn new(df: DataFrame, source: DatasetSource) -> Self {
        let mut numeric_columns = Vec::new();
        let mut text_columns = Vec::new();
        let mut all_columns = Vec::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            if is_numeric_dtype(col.dtype()) {
                numeric_columns.push(name.clone());
            } else {
                text_columns.push(name.clone());
            }
            all_columns.push(name);
        }

        Self {
            df,
            source,
            numeric_columns,
            text_columns,
            all_columns,
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn text_columns(&self) -> &[String] {
        &self.text_columns
    }

    pub fn all_columns(&self) -> &[String] {
        &self.all_columns
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.all_columns.iter().any(|c| c == name)
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == name)
    }

    pub fn is_text(&self, name: &str) -> bool {
        self.text_columns.iter().any(|c| c == name)
    }

    /// Column values as f64, nulls and NaN as `None`.
    pub fn numeric_values(&self, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let column = self.df.column(name)?.cast(&DataType::Float64)?;
        let values = column
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Column values coerced to text, nulls as `None`.
    pub fn text_values(&self, name: &str) -> PolarsResult<Vec<Option<String>>> {
        let column = self.df.column(name)?.cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("city".into(), vec!["Oslo", "Rome", "Lima"]),
            Column::new("count".into(), vec![1i64, 2, 3]),
            Column::new("flag".into(), vec![true, false, true]),
            Column::new("ratio".into(), vec![0.5f64, 1.5, f64::NAN]),
        ])
        .unwrap()
    }

    #[test]
    fn classification_is_disjoint_and_ordered() {
        let ds = Dataset::new(mixed_frame(), DatasetSource::Sample { seed: 1 });

        assert_eq!(ds.all_columns(), ["city", "count", "flag", "ratio"]);
        assert_eq!(ds.numeric_columns(), ["count", "ratio"]);
        assert_eq!(ds.text_columns(), ["city", "flag"]);

        for name in ds.all_columns() {
            assert!(ds.is_numeric(name) ^ ds.is_text(name));
        }
        let mut union: Vec<&String> = ds
            .all_columns()
            .iter()
            .filter(|c| ds.is_numeric(c) || ds.is_text(c))
            .collect();
        union.dedup();
        assert_eq!(union.len(), ds.all_columns().len());
    }

    #[test]
    fn numeric_values_map_nan_to_none() {
        let ds = Dataset::new(mixed_frame(), DatasetSource::Sample { seed: 1 });
        assert_eq!(
            ds.numeric_values("ratio").unwrap(),
            vec![Some(0.5), Some(1.5), None]
        );
        assert_eq!(
            ds.numeric_values("count").unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn text_values_coerce_numbers() {
        let ds = Dataset::new(mixed_frame(), DatasetSource::Sample { seed: 1 });
        assert_eq!(
            ds.text_values("count").unwrap(),
            vec![Some("1".to_string()), Some("2".to_string()), Some("3".to_string())]
        );
        assert!(ds.text_values("missing").is_err());
    }
}
