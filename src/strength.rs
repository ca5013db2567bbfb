//! Variance-ratio diagnostics for a decomposed series.

use serde::{Deserialize, Serialize};

use crate::decompose::{ColumnSpec, RESIDUAL_COLUMN, SEASONAL_COLUMN, TREND_COLUMN};
use crate::error::{Error, Result};
use crate::frame::PanelFrame;

/// Strength of the trend and seasonal components of one series, each in
/// [0, 1]. Values near 1 mean the component explains most of the variation
/// left after removing the other component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecompositionStrength {
    pub trend: f64,
    pub seasonality: f64,
}

/// Compute component strengths for one identifier of a decomposed frame.
///
/// `trend = max(0, 1 - var(residual) / var(trend + residual))`, and
/// seasonality analogously with the seasonal component.
pub fn decomposition_strength(
    frame: &PanelFrame,
    series_id: &str,
    columns: &ColumnSpec,
) -> Result<DecompositionStrength> {
    let selected = frame.filter_eq(&columns.id, series_id)?;
    if selected.row_count() == 0 {
        return Err(Error::Empty(format!(
            "no rows for identifier {}",
            series_id
        )));
    }

    let trend = selected.float_column(TREND_COLUMN)?;
    let seasonal = selected.float_column(SEASONAL_COLUMN)?;
    let residual = selected.float_column(RESIDUAL_COLUMN)?;

    let deseasonalized: Vec<f64> = trend
        .iter()
        .zip(residual)
        .map(|(&t, &r)| t + r)
        .collect();
    let detrended: Vec<f64> = seasonal
        .iter()
        .zip(residual)
        .map(|(&s, &r)| s + r)
        .collect();

    let residual_var = variance(residual);
    Ok(DecompositionStrength {
        trend: strength_ratio(residual_var, variance(&deseasonalized)),
        seasonality: strength_ratio(residual_var, variance(&detrended)),
    })
}

fn strength_ratio(residual_var: f64, component_var: f64) -> f64 {
    if component_var > 0.0 {
        (1.0 - residual_var / component_var).max(0.0)
    } else {
        0.0
    }
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_of_constant_is_zero() {
        assert_eq!(variance(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn strength_ratio_is_clamped_to_zero() {
        assert_eq!(strength_ratio(2.0, 1.0), 0.0);
        assert!(strength_ratio(0.5, 1.0) > 0.0);
    }
}
