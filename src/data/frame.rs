//! Column-named numeric table
//!
//! A `Frame` holds the dataset as named f64 columns over row-major storage.
//! Headers are normalized on ingest (trimmed, lowercased, spaces to
//! underscores) so downstream code can address columns by stable names.

use std::path::Path;

use ndarray::Array2;

use super::{DataError, Result};

/// A row-major numeric table with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

impl Frame {
    /// Build a frame from column names and row-major data.
    ///
    /// Fails on duplicate column names or ragged rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(DataError::DuplicateColumn(name.clone()));
            }
        }
        for row in &rows {
            if row.len() != columns.len() {
                return Err(DataError::ColumnLength {
                    column: "<row>".to_string(),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Read a CSV file with a header row into a frame.
    ///
    /// Every cell must parse as f64; the offending column and row are named
    /// otherwise.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let mut row = Vec::with_capacity(columns.len());
            for (col_idx, cell) in record.iter().enumerate() {
                let value: f64 = cell.parse().map_err(|_| DataError::NonNumeric {
                    column: columns
                        .get(col_idx)
                        .cloned()
                        .unwrap_or_else(|| format!("#{col_idx}")),
                    row: row_idx,
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        Self::new(columns, rows)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of a column's values.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Value at (row, column name).
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx])
    }

    /// Drop a column if present. Returns whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                self.columns.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
                true
            }
            None => false,
        }
    }

    /// Append a column.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(DataError::DuplicateColumn(name));
        }
        if values.len() != self.rows.len() {
            return Err(DataError::ColumnLength {
                column: name,
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Keep only rows for which the predicate holds.
    pub fn retain_rows<F: FnMut(&[f64]) -> bool>(&mut self, mut keep: F) {
        self.rows.retain(|row| keep(row));
    }

    /// Remove the named column, returning its values.
    pub fn take_column(&mut self, name: &str) -> Option<Vec<f64>> {
        let values = self.column(name)?;
        self.drop_column(name);
        Some(values)
    }

    /// Dense matrix view of the frame, rows by columns.
    pub fn to_matrix(&self) -> Array2<f64> {
        let flat: Vec<f64> = self.rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.n_rows(), self.n_cols()), flat)
            .expect("row-major frame data is rectangular")
    }

    /// Split the frame into features and binary labels.
    ///
    /// The label column is removed; its values must all be 0 or 1.
    pub fn split_features_labels(mut self, label: &str) -> Result<(Frame, Vec<u8>)> {
        let values = self
            .take_column(label)
            .ok_or_else(|| DataError::MissingColumn(label.to_string()))?;
        let mut labels = Vec::with_capacity(values.len());
        for (row, value) in values.into_iter().enumerate() {
            if value == 0.0 {
                labels.push(0);
            } else if value == 1.0 {
                labels.push(1);
            } else {
                return Err(DataError::InvalidLabel { row, value });
            }
        }
        Ok((self, labels))
    }
}
