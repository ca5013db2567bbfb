//! Faceted component plot for one decomposed series.

use log::{debug, warn};
use rand::Rng;

use crate::decompose::{ColumnSpec, RESIDUAL_COLUMN, SEASONAL_COLUMN, TREND_COLUMN};
use crate::error::Result;
use crate::frame::{MeltOptions, PanelFrame};

use super::figure::{
    Anchor, Annotation, Figure, GridSpec, Layout, LineTrace, SubplotConfig, Trace,
};

const COMPONENT_VARIABLE: &str = "component";

/// Line chart of one series' observed, trend, seasonal and residual values,
/// one facet per component stacked in a single column with independently
/// scaled value axes.
///
/// With `series_id = None` and a non-empty frame, a series is picked by a
/// uniform draw over rows, so identifiers with more rows are proportionally
/// more likely to be chosen. An identifier that selects no rows yields an
/// empty figure, not an error.
pub fn plot_components(
    frame: &PanelFrame,
    series_id: Option<&str>,
    columns: &ColumnSpec,
) -> Result<Figure> {
    let component_names = [
        columns.target.clone(),
        TREND_COLUMN.to_string(),
        SEASONAL_COLUMN.to_string(),
        RESIDUAL_COLUMN.to_string(),
    ];

    if frame.row_count() == 0 && series_id.is_none() {
        return Ok(empty_component_figure(&component_names));
    }

    let chosen = match series_id {
        Some(id) => id.to_string(),
        None => {
            let ids = frame.str_column(&columns.id)?;
            let row = rand::rng().random_range(0..frame.row_count());
            debug!("sampled row {} for the component plot", row);
            ids[row].clone()
        }
    };

    let selected = frame.filter_eq(&columns.id, &chosen)?;
    if selected.row_count() == 0 {
        warn!("no rows for identifier {}", chosen);
    }
    let sorted = selected.sort_by_time(&columns.time)?;

    let long = sorted.melt(&MeltOptions {
        id_vars: vec![columns.time.clone()],
        value_vars: component_names.to_vec(),
        var_name: COMPONENT_VARIABLE.to_string(),
        value_name: columns.target.clone(),
    })?;
    let component = long.str_column(COMPONENT_VARIABLE)?;
    let times = long.datetime_column(&columns.time)?;
    let values = long.float_column(&columns.target)?;

    let mut traces = Vec::with_capacity(component_names.len());
    for (facet, name) in component_names.iter().enumerate() {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for row in 0..long.row_count() {
            if component[row] == *name {
                x.push(times[row].to_string());
                y.push(values[row]);
            }
        }
        traces.push(Trace::Line(LineTrace {
            name: name.clone(),
            x,
            y,
            subplot: facet,
        }));
    }

    Ok(Figure::new(traces, component_layout(&component_names)))
}

fn empty_component_figure(component_names: &[String]) -> Figure {
    let traces = component_names
        .iter()
        .enumerate()
        .map(|(facet, name)| {
            Trace::Line(LineTrace {
                name: name.clone(),
                x: Vec::new(),
                y: Vec::new(),
                subplot: facet,
            })
        })
        .collect();
    Figure::new(traces, component_layout(component_names))
}

fn component_layout(component_names: &[String]) -> Layout {
    let rows = component_names.len();
    let mut subplots = Vec::with_capacity(rows);
    let mut annotations = Vec::with_capacity(rows);
    for (index, name) in component_names.iter().enumerate() {
        let subplot = SubplotConfig::cartesian(rows, 1, index, true);
        annotations.push(Annotation {
            text: name.clone(),
            x: subplot.x_domain[0],
            y: subplot.y_domain[1],
            x_anchor: Anchor::Left,
            y_anchor: Anchor::Bottom,
        });
        subplots.push(subplot);
    }
    Layout {
        grid: Some(GridSpec { rows, cols: 1 }),
        subplots,
        annotations,
        ..Layout::default()
    }
}
