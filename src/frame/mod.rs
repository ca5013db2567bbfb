//! Minimal panel-data frame: named, typed columns over rows keyed by
//! (identifier, timestamp).
//!
//! The frame carries exactly the operations the decomposition and plotting
//! layers need: typed column access, stable time sorting, identifier
//! filtering, and a wide-to-long `melt` reshape.

mod column;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Error, Result};

pub use self::column::{Column, ColumnType};

/// Options for the wide-to-long [`PanelFrame::melt`] reshape.
#[derive(Debug, Clone)]
pub struct MeltOptions {
    /// Columns kept as identifiers, repeated once per value column.
    pub id_vars: Vec<String>,
    /// Numeric columns unpivoted into (variable, value) rows.
    pub value_vars: Vec<String>,
    /// Name of the output variable column.
    pub var_name: String,
    /// Name of the output value column.
    pub value_name: String,
}

impl Default for MeltOptions {
    fn default() -> Self {
        Self {
            id_vars: Vec::new(),
            value_vars: Vec::new(),
            var_name: "variable".to_string(),
            value_name: "value".to_string(),
        }
    }
}

/// A table of named, equally long columns.
#[derive(Debug, Clone, Default)]
pub struct PanelFrame {
    columns: HashMap<String, Column>,
    column_names: Vec<String>,
    row_count: usize,
}

impl PanelFrame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the frame's row count.
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        if self.column_names.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }
        self.column_names.push(name.clone());
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Typed access to a float column.
    pub fn float_column(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Float64(values) => Ok(values),
            other => Err(Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: ColumnType::Float64,
                found: other.column_type(),
            }),
        }
    }

    /// Typed access to a string column.
    pub fn str_column(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Str(values) => Ok(values),
            other => Err(Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: ColumnType::Str,
                found: other.column_type(),
            }),
        }
    }

    /// Typed access to a datetime column.
    pub fn datetime_column(&self, name: &str) -> Result<&[chrono::NaiveDateTime]> {
        match self.column(name)? {
            Column::DateTime(values) => Ok(values),
            other => Err(Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: ColumnType::DateTime,
                found: other.column_type(),
            }),
        }
    }

    /// Gather rows by position into a new frame. Indices must be in bounds.
    pub fn take(&self, indices: &[usize]) -> PanelFrame {
        let mut columns = HashMap::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            columns.insert(name.clone(), column.take(indices));
        }
        PanelFrame {
            columns,
            column_names: self.column_names.clone(),
            row_count: indices.len(),
        }
    }

    /// Stable sort of the whole frame by a datetime column. Rows with equal
    /// timestamps keep their input order, so interleaved series stay
    /// internally ordered.
    pub fn sort_by_time(&self, time_col: &str) -> Result<PanelFrame> {
        let times = self.datetime_column(time_col)?;
        let mut order: Vec<usize> = (0..self.row_count).collect();
        order.sort_by_key(|&i| times[i]);
        Ok(self.take(&order))
    }

    /// Rows where a string column equals `value`. An empty selection is a
    /// valid (empty) frame, not an error.
    pub fn filter_eq(&self, name: &str, value: &str) -> Result<PanelFrame> {
        let values = self.str_column(name)?;
        let indices: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.as_str() == value)
            .map(|(i, _)| i)
            .collect();
        Ok(self.take(&indices))
    }

    /// Distinct values of a string column in first-appearance order.
    pub fn distinct_str(&self, name: &str) -> Result<Vec<String>> {
        let values = self.str_column(name)?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for value in values {
            if seen.insert(value.as_str()) {
                out.push(value.clone());
            }
        }
        Ok(out)
    }

    /// Wide-to-long reshape. Every value column becomes one block of
    /// (variable, value) rows; identifier columns are repeated per block.
    pub fn melt(&self, options: &MeltOptions) -> Result<PanelFrame> {
        if options.value_vars.is_empty() {
            return Err(Error::InvalidInput(
                "melt requires at least one value column".to_string(),
            ));
        }
        for name in options.id_vars.iter().chain(options.value_vars.iter()) {
            self.column(name)?;
        }

        let blocks = options.value_vars.len();
        let repeat: Vec<usize> = (0..blocks).flat_map(|_| 0..self.row_count).collect();

        let mut out = PanelFrame::new();
        for name in &options.id_vars {
            out.add_column(name.clone(), self.column(name)?.take(&repeat))?;
        }

        let mut variable = Vec::with_capacity(blocks * self.row_count);
        let mut value = Vec::with_capacity(blocks * self.row_count);
        for name in &options.value_vars {
            let values = self.float_column(name)?;
            variable.extend(std::iter::repeat(name.clone()).take(self.row_count));
            value.extend_from_slice(values);
        }
        out.add_column(options.var_name.clone(), Column::Str(variable))?;
        out.add_column(options.value_name.clone(), Column::Float64(value))?;
        Ok(out)
    }

    /// Read a frame from a CSV file, inferring column types.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<PanelFrame> {
        crate::io::read_csv(path)
    }

    /// Write the frame to a CSV file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::io::write_csv(self, path)
    }
}
