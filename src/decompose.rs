//! Classical seasonal decomposition of grouped time series.
//!
//! [`SeasonalDecompose`] splits each identifier's series into trend,
//! seasonal and residual components over a fixed period and appends them as
//! columns aligned with the time-sorted input. The trend is a centered
//! moving average with linearly extrapolated edges, so every row carries a
//! finite value for all three components.
//!
//! The decomposed columns leak future information into the past; do not use
//! them as forecasting features.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frame::{Column, PanelFrame};

/// Name of the appended trend column.
pub const TREND_COLUMN: &str = "trend";
/// Name of the appended seasonal column.
pub const SEASONAL_COLUMN: &str = "seasonal";
/// Name of the appended residual column.
pub const RESIDUAL_COLUMN: &str = "residual";

/// How the components combine to reconstruct the original value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionModel {
    /// Y(t) = Trend(t) + Seasonal(t) + Residual(t)
    Additive,
    /// Y(t) = Trend(t) * Seasonal(t) * Residual(t)
    Multiplicative,
}

impl fmt::Display for DecompositionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompositionModel::Additive => write!(f, "additive"),
            DecompositionModel::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

impl FromStr for DecompositionModel {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "additive" => Ok(DecompositionModel::Additive),
            "multiplicative" => Ok(DecompositionModel::Multiplicative),
            other => Err(Error::InvalidInput(format!(
                "unknown decomposition model: {}",
                other
            ))),
        }
    }
}

/// Names of the identifier, time and target columns of a panel frame.
///
/// An explicit value object rather than per-call string parameters, so the
/// same names can be shared across decompose and plot calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: String,
    pub time: String,
    pub target: String,
}

impl ColumnSpec {
    pub fn new(
        id: impl Into<String>,
        time: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            target: target.into(),
        }
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            id: "unique_id".to_string(),
            time: "ds".to_string(),
            target: "y".to_string(),
        }
    }
}

/// Per-series component vectors, aligned with the series' row order.
#[derive(Debug)]
struct Components {
    trend: Vec<f64>,
    seasonal: Vec<f64>,
    residual: Vec<f64>,
}

/// Seasonal decomposition over every identifier of a panel frame.
#[derive(Debug, Clone)]
pub struct SeasonalDecompose {
    model: DecompositionModel,
    period: usize,
    columns: ColumnSpec,
}

impl SeasonalDecompose {
    /// Create a decomposition with period 12 and default column names.
    pub fn new(model: DecompositionModel) -> Self {
        Self {
            model,
            period: 12,
            columns: ColumnSpec::default(),
        }
    }

    /// Number of observations in one full seasonal cycle.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn with_columns(mut self, columns: ColumnSpec) -> Self {
        self.columns = columns;
        self
    }

    /// Decompose every series of `frame`.
    ///
    /// Returns the frame sorted by time with `trend`, `seasonal` and
    /// `residual` columns appended, one value per input row.
    pub fn run(&self, frame: &PanelFrame) -> Result<PanelFrame> {
        if self.period == 0 {
            return Err(Error::InvalidInput("period must be at least 1".to_string()));
        }

        let mut sorted = frame.sort_by_time(&self.columns.time)?;
        let ids = sorted.str_column(&self.columns.id)?;
        let target = sorted.float_column(&self.columns.target)?;

        // Row indices per identifier: time-sorted order inside each group,
        // first-appearance order across groups.
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for (row, id) in ids.iter().enumerate() {
                match seen.get(id.as_str()) {
                    Some(&slot) => groups[slot].1.push(row),
                    None => {
                        seen.insert(id.as_str(), groups.len());
                        groups.push((id.clone(), vec![row]));
                    }
                }
            }
        }
        debug!(
            "decomposing {} series over {} rows (model {}, period {})",
            groups.len(),
            sorted.row_count(),
            self.model,
            self.period
        );

        let model = self.model;
        let period = self.period;
        let parts: Vec<(Vec<usize>, Components)> = groups
            .into_par_iter()
            .map(|(_, rows)| {
                let series: Vec<f64> = rows.iter().map(|&row| target[row]).collect();
                decompose_series(&series, model, period).map(|components| (rows, components))
            })
            .collect::<Result<Vec<_>>>()?;

        let row_count = sorted.row_count();
        let mut trend = vec![f64::NAN; row_count];
        let mut seasonal = vec![f64::NAN; row_count];
        let mut residual = vec![f64::NAN; row_count];
        for (rows, components) in parts {
            for (offset, &row) in rows.iter().enumerate() {
                trend[row] = components.trend[offset];
                seasonal[row] = components.seasonal[offset];
                residual[row] = components.residual[offset];
            }
        }

        sorted.add_column(TREND_COLUMN, Column::Float64(trend))?;
        sorted.add_column(SEASONAL_COLUMN, Column::Float64(seasonal))?;
        sorted.add_column(RESIDUAL_COLUMN, Column::Float64(residual))?;
        Ok(sorted)
    }
}

/// Decompose every series of `frame` using the default column names
/// (`unique_id`, `ds`, `y`).
pub fn decompose(
    frame: &PanelFrame,
    model: DecompositionModel,
    period: usize,
) -> Result<PanelFrame> {
    SeasonalDecompose::new(model).with_period(period).run(frame)
}

fn decompose_series(
    values: &[f64],
    model: DecompositionModel,
    period: usize,
) -> Result<Components> {
    let needed = 2 * period;
    if values.len() < needed {
        return Err(Error::InsufficientData {
            needed,
            got: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::MissingValues(
            "target contains non-finite values".to_string(),
        ));
    }
    if model == DecompositionModel::Multiplicative && values.iter().any(|&v| v <= 0.0) {
        return Err(Error::InvalidInput(
            "multiplicative decomposition requires strictly positive values".to_string(),
        ));
    }

    let mut trend = centered_moving_average(values, period);
    extrapolate_trend(&mut trend);

    let detrended: Vec<f64> = values
        .iter()
        .zip(&trend)
        .map(|(&value, &trend_value)| match model {
            DecompositionModel::Additive => value - trend_value,
            DecompositionModel::Multiplicative => value / trend_value,
        })
        .collect();

    let seasonal = seasonal_component(&detrended, period, model);

    let residual: Vec<f64> = detrended
        .iter()
        .zip(&seasonal)
        .map(|(&detrended_value, &seasonal_value)| match model {
            DecompositionModel::Additive => detrended_value - seasonal_value,
            DecompositionModel::Multiplicative => detrended_value / seasonal_value,
        })
        .collect();

    Ok(Components {
        trend,
        seasonal,
        residual,
    })
}

/// Centered moving average of window `period`. Even periods use the
/// half-weighted window of length period + 1 so the average stays centered.
/// Edge positions that cannot fit a full window are NaN.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut trend = vec![f64::NAN; n];
    let half = period / 2;
    if period % 2 == 1 {
        for i in half..n - half {
            let window = &values[i - half..=i + half];
            trend[i] = window.iter().sum::<f64>() / period as f64;
        }
    } else {
        for i in half..n - half {
            let mut acc = 0.5 * (values[i - half] + values[i + half]);
            acc += values[i - half + 1..i + half].iter().sum::<f64>();
            trend[i] = acc / period as f64;
        }
    }
    trend
}

/// Fill the NaN edges of a moving-average trend by extending the line
/// through the two nearest fitted points on each side.
fn extrapolate_trend(trend: &mut [f64]) {
    let first = trend.iter().position(|v| v.is_finite());
    let last = trend.iter().rposition(|v| v.is_finite());
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) if last > first => (first, last),
        _ => return,
    };

    let front_slope = trend[first + 1] - trend[first];
    for i in (0..first).rev() {
        trend[i] = trend[i + 1] - front_slope;
    }
    let back_slope = trend[last] - trend[last - 1];
    for i in last + 1..trend.len() {
        trend[i] = trend[i - 1] + back_slope;
    }
}

/// Per-phase means of the detrended series, normalized (zero mean for
/// additive, unit mean for multiplicative) and tiled to the series length.
fn seasonal_component(
    detrended: &[f64],
    period: usize,
    model: DecompositionModel,
) -> Vec<f64> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &value) in detrended.iter().enumerate() {
        sums[i % period] += value;
        counts[i % period] += 1;
    }
    // Every phase is populated: the series holds at least two full cycles.
    let mut pattern: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &count)| sum / count as f64)
        .collect();

    let mean = pattern.iter().sum::<f64>() / period as f64;
    match model {
        DecompositionModel::Additive => {
            for value in &mut pattern {
                *value -= mean;
            }
        }
        DecompositionModel::Multiplicative => {
            for value in &mut pattern {
                *value /= mean;
            }
        }
    }

    (0..detrended.len()).map(|i| pattern[i % period]).collect()
}
