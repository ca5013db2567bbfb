//! Polar seasonality charts: one series, or a faceted grid of series.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{debug, warn};

use crate::decompose::{ColumnSpec, SEASONAL_COLUMN};
use crate::error::{Error, Result};
use crate::frame::{Column, PanelFrame};

use super::figure::{
    Anchor, Annotation, BarPolarTrace, ColorAxis, Figure, GridSpec, Layout, SubplotConfig,
    Trace,
};

/// Chart height per subplot row, in pixels.
const ROW_HEIGHT: u32 = 300;

/// Maps a timestamp to a discrete period label for seasonal aggregation.
///
/// An immutable value object shared freely across calls; the default labels
/// by abbreviated month name.
#[derive(Debug, Clone, Copy)]
pub enum PeriodRule {
    /// "Jan" .. "Dec"
    MonthName,
    /// "1" .. "12"
    MonthNumber,
    /// "Q1" .. "Q4"
    Quarter,
    /// "Mon" .. "Sun"
    Weekday,
    /// "0" .. "23"
    Hour,
    /// Caller-supplied labeling function.
    Custom {
        name: &'static str,
        label: fn(&NaiveDateTime) -> String,
    },
}

impl Default for PeriodRule {
    fn default() -> Self {
        PeriodRule::MonthName
    }
}

impl PeriodRule {
    /// Name of the label column in the seasonality aggregate.
    pub fn column_name(&self) -> &'static str {
        match self {
            PeriodRule::MonthName | PeriodRule::MonthNumber => "month",
            PeriodRule::Quarter => "quarter",
            PeriodRule::Weekday => "weekday",
            PeriodRule::Hour => "hour",
            PeriodRule::Custom { name, .. } => name,
        }
    }

    /// Label for one timestamp.
    pub fn label(&self, timestamp: &NaiveDateTime) -> String {
        match self {
            PeriodRule::MonthName => timestamp.format("%b").to_string(),
            PeriodRule::MonthNumber => timestamp.month().to_string(),
            PeriodRule::Quarter => format!("Q{}", (timestamp.month() - 1) / 3 + 1),
            PeriodRule::Weekday => timestamp.format("%a").to_string(),
            PeriodRule::Hour => timestamp.hour().to_string(),
            PeriodRule::Custom { label, .. } => label(timestamp),
        }
    }
}

/// Mean seasonal value per period label for one identifier.
///
/// Rows are time-sorted before labeling and labels keep first-appearance
/// order. An identifier with no rows yields an empty aggregate.
pub fn seasonal_means(
    frame: &PanelFrame,
    series_id: &str,
    columns: &ColumnSpec,
    rule: &PeriodRule,
) -> Result<PanelFrame> {
    let selected = frame.filter_eq(&columns.id, series_id)?;
    if selected.row_count() == 0 {
        warn!("no rows for identifier {}", series_id);
    }
    let sorted = selected.sort_by_time(&columns.time)?;
    let times = sorted.datetime_column(&columns.time)?;
    let seasonal = sorted.float_column(SEASONAL_COLUMN)?;

    let mut labels: Vec<String> = Vec::new();
    let mut sums: Vec<f64> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for (timestamp, &value) in times.iter().zip(seasonal) {
        let label = rule.label(timestamp);
        let slot = match slots.get(&label) {
            Some(&slot) => slot,
            None => {
                slots.insert(label.clone(), labels.len());
                labels.push(label);
                sums.push(0.0);
                counts.push(0);
                labels.len() - 1
            }
        };
        sums[slot] += value;
        counts[slot] += 1;
    }

    let means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &count)| sum / count as f64)
        .collect();

    let mut aggregate = PanelFrame::new();
    aggregate.add_column(rule.column_name(), Column::Str(labels))?;
    aggregate.add_column(SEASONAL_COLUMN, Column::Float64(means))?;
    Ok(aggregate)
}

/// Polar bar chart of one series' mean seasonal effect per period label,
/// colored on a blue-to-red scale, radial axis hidden.
pub fn plot_seasonality(
    frame: &PanelFrame,
    series_id: &str,
    columns: &ColumnSpec,
    rule: &PeriodRule,
) -> Result<Figure> {
    let aggregate = seasonal_means(frame, series_id, columns, rule)?;
    let labels = aggregate.str_column(rule.column_name())?;
    let means = aggregate.float_column(SEASONAL_COLUMN)?;

    let trace = BarPolarTrace {
        name: series_id.to_string(),
        r: means.to_vec(),
        theta: labels.to_vec(),
        subplot: 0,
    };
    let layout = Layout {
        grid: Some(GridSpec { rows: 1, cols: 1 }),
        subplots: vec![SubplotConfig::polar(1, 1, 0)],
        coloraxis: Some(ColorAxis::blue_red(means)),
        ..Layout::default()
    };
    Ok(Figure::new(vec![Trace::BarPolar(trace)], layout))
}

/// Grid of polar seasonality subplots, one per identifier, wrapped row-major
/// at `facet_col_wrap` columns.
///
/// Defaults to every distinct identifier in first-appearance order. All
/// subplots share one fixed blue-to-red color axis, every radial axis is
/// hidden, each subplot is titled with its identifier left-aligned to the
/// subplot's horizontal domain start, and the chart height is 300 pixels
/// per row. An explicitly empty identifier list is an error.
pub fn plot_seasonalities(
    frame: &PanelFrame,
    series_ids: Option<&[String]>,
    columns: &ColumnSpec,
    rule: &PeriodRule,
    facet_col_wrap: usize,
) -> Result<Figure> {
    if facet_col_wrap == 0 {
        return Err(Error::InvalidInput(
            "facet_col_wrap must be at least 1".to_string(),
        ));
    }
    let ids: Vec<String> = match series_ids {
        Some(ids) => ids.to_vec(),
        None => frame.distinct_str(&columns.id)?,
    };
    if ids.is_empty() {
        return Err(Error::InvalidInput(
            "no identifiers to plot".to_string(),
        ));
    }

    let cols = ids.len().min(facet_col_wrap);
    let rows = (ids.len() + cols - 1) / cols;
    debug!(
        "seasonality grid: {} series in {} x {} subplots",
        ids.len(),
        rows,
        cols
    );

    let mut traces = Vec::with_capacity(ids.len());
    let mut subplots = Vec::with_capacity(ids.len());
    let mut annotations = Vec::with_capacity(ids.len());
    let mut all_means: Vec<f64> = Vec::new();
    for (index, id) in ids.iter().enumerate() {
        let aggregate = seasonal_means(frame, id, columns, rule)?;
        let labels = aggregate.str_column(rule.column_name())?;
        let means = aggregate.float_column(SEASONAL_COLUMN)?;
        all_means.extend_from_slice(means);

        traces.push(Trace::BarPolar(BarPolarTrace {
            name: id.clone(),
            r: means.to_vec(),
            theta: labels.to_vec(),
            subplot: index,
        }));
        let subplot = SubplotConfig::polar(rows, cols, index);
        annotations.push(Annotation {
            text: id.clone(),
            x: subplot.x_domain[0],
            y: subplot.y_domain[1],
            x_anchor: Anchor::Left,
            y_anchor: Anchor::Bottom,
        });
        subplots.push(subplot);
    }

    let layout = Layout {
        grid: Some(GridSpec { rows, cols }),
        height: Some(ROW_HEIGHT * rows as u32),
        subplots,
        annotations,
        coloraxis: Some(ColorAxis::blue_red(&all_means)),
        ..Layout::default()
    };
    Ok(Figure::new(traces, layout))
}
