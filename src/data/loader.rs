//! Dataset loading

use crate::error::{PalmerError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use tracing::info;

/// Loads CSV data into a DataFrame from a remote URL or a local file
pub struct DatasetLoader {
    /// Rows sampled for schema inference
    infer_schema_length: Option<usize>,
    /// Sentinel string parsed as null ("NA" in the penguins CSV)
    null_value: String,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(100),
            null_value: "NA".to_string(),
        }
    }

    /// Set the number of rows used for schema inference
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }

    /// Set the sentinel string treated as a missing value
    pub fn with_null_value(mut self, value: impl Into<String>) -> Self {
        self.null_value = value.into();
        self
    }

    /// Load from `source`, dispatching on whether it looks like a URL
    pub fn load(&self, source: &str) -> Result<DataFrame> {
        if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch_csv(source)
        } else {
            self.load_csv(source)
        }
    }

    /// Fetch a remote CSV resource over HTTP(S) and parse it.
    /// Network and HTTP-status failures surface as errors; no retry.
    pub fn fetch_csv(&self, url: &str) -> Result<DataFrame> {
        info!(url, "fetching dataset");
        let body = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;

        let df = self
            .csv_options()
            .into_reader_with_file_handle(Cursor::new(body.to_vec()))
            .finish()
            .map_err(|e| PalmerError::DataError(e.to_string()))?;

        info!(rows = df.height(), cols = df.width(), "dataset fetched");
        Ok(df)
    }

    /// Load a CSV file from the local filesystem
    pub fn load_csv(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path).map_err(|e| PalmerError::DataError(e.to_string()))?;

        self.csv_options()
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| PalmerError::DataError(e.to_string()))
    }

    fn csv_options(&self) -> CsvReadOptions {
        let parse_opts = CsvParseOptions::default().with_null_values(Some(
            NullValues::AllColumnsSingle(self.null_value.as_str().into()),
        ));

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
    }
}
