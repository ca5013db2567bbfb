use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Physical type of a [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Float64,
    Str,
    DateTime,
}

/// A single column of a [`PanelFrame`](crate::frame::PanelFrame).
///
/// Columns are plain value vectors; a frame guarantees that all of its
/// columns share one length.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float64(Vec<f64>),
    Str(Vec<String>),
    DateTime(Vec<NaiveDateTime>),
}

impl Column {
    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Float64(values) => values.len(),
            Column::Str(values) => values.len(),
            Column::DateTime(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Float64(_) => ColumnType::Float64,
            Column::Str(_) => ColumnType::Str,
            Column::DateTime(_) => ColumnType::DateTime,
        }
    }

    /// Gather values by row position. Indices must be in bounds.
    pub(crate) fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Float64(values) => {
                Column::Float64(indices.iter().map(|&i| values[i]).collect())
            }
            Column::Str(values) => {
                Column::Str(indices.iter().map(|&i| values[i].clone()).collect())
            }
            Column::DateTime(values) => {
                Column::DateTime(indices.iter().map(|&i| values[i]).collect())
            }
        }
    }
}
