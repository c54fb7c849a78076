//! CSV Data Loader Module
//! Parses uploaded CSV files with Polars and holds the active dataset.

use super::dataset::{Dataset, DatasetSource};
use super::sample::generate_sample;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Holds the session's active dataset. Each load replaces it entirely.
#[derive(Default)]
pub struct DataLoader {
    dataset: Option<Dataset>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a CSV file with a header row.
    ///
    /// The whole file is scanned for schema inference so a column is only
    /// numeric when every value in it parses as a number.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        if df.width() == 0 {
            return Err(LoaderError::NoData);
        }
        Ok(df)
    }

    /// Install the outcome of [`DataLoader::read_csv`] for `path`.
    ///
    /// A parsed frame becomes the active dataset. A failure clears the
    /// active dataset, so a broken upload never leaves the previous one showing.
    pub fn apply_csv_result(
        &mut self,
        result: Result<DataFrame, LoaderError>,
        path: PathBuf,
    ) -> Result<&Dataset, LoaderError> {
        match result {
            Ok(df) => Ok(self.set_dataset(Dataset::new(df, DatasetSource::Upload(path)))),
            Err(e) => {
                log::warn!("Failed to parse {:?}: {}", path, e);
                self.dataset = None;
                Err(e)
            }
        }
    }

    /// Replace the active dataset with the generated sample.
    pub fn load_sample(&mut self, seed: u64, rows: usize) -> Result<&Dataset, LoaderError> {
        let df = generate_sample(seed, rows)?;
        Ok(self.set_dataset(Dataset::new(df, DatasetSource::Sample { seed })))
    }

    fn set_dataset(&mut self, dataset: Dataset) -> &Dataset {
        log::info!(
            "Loaded {}: {} rows, {} columns ({} numeric, {} text)",
            dataset.source().describe(),
            dataset.row_count(),
            dataset.all_columns().len(),
            dataset.numeric_columns().len(),
            dataset.text_columns().len()
        );
        self.dataset.insert(dataset)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }
}
