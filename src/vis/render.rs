//! Plotters-based rendering of [`Figure`] values to PNG or SVG files.
//!
//! Rendering is a convenience on top of the figure model; figure
//! construction never depends on this module.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use log::debug;
use plotters::coord::Shift;
use plotters::element::Polygon;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::Result;

use super::figure::{
    Anchor, BarPolarTrace, ColorAxis, Figure, LineTrace, SubplotConfig, Trace,
};

const DEFAULT_WIDTH: u32 = 900;
const DEFAULT_HEIGHT: u32 = 600;

const LINE_PALETTE: &[(u8, u8, u8)] = &[
    (0, 123, 255),
    (255, 99, 71),
    (46, 204, 113),
    (255, 193, 7),
    (142, 68, 173),
    (52, 152, 219),
];

/// Render a figure to a PNG file.
pub fn render_png<P: AsRef<Path>>(figure: &Figure, path: P) -> Result<()> {
    let (width, height) = canvas_size(figure);
    let root = BitMapBackend::new(path.as_ref(), (width, height)).into_drawing_area();
    draw_figure(figure, &root)
}

/// Render a figure to an SVG file.
pub fn render_svg<P: AsRef<Path>>(figure: &Figure, path: P) -> Result<()> {
    let (width, height) = canvas_size(figure);
    let root = SVGBackend::new(path.as_ref(), (width, height)).into_drawing_area();
    draw_figure(figure, &root)
}

fn canvas_size(figure: &Figure) -> (u32, u32) {
    (
        figure.layout.width.unwrap_or(DEFAULT_WIDTH),
        figure.layout.height.unwrap_or(DEFAULT_HEIGHT),
    )
}

fn draw_figure<DB>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (width, height) = root.dim_in_pixel();

    if let Some(title) = &figure.layout.title {
        let style = ("sans-serif", 18)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new(title.clone(), ((width / 2) as i32, 8), style))?;
    }

    let coloraxis = figure
        .layout
        .coloraxis
        .unwrap_or_else(|| ColorAxis::blue_red(&[]));

    for (index, trace) in figure.traces.iter().enumerate() {
        let subplot = subplot_for(figure, trace.subplot());
        let area = subplot_area(root, &subplot, width, height);
        match trace {
            Trace::Line(line) => draw_line(&area, line, index)?,
            Trace::BarPolar(bars) => {
                draw_bar_polar(&area, bars, &coloraxis, subplot.radial_axis_visible)?
            }
        }
    }

    for annotation in &figure.layout.annotations {
        let x = (annotation.x * width as f64) as i32;
        let y = ((1.0 - annotation.y) * height as f64) as i32;
        let style = ("sans-serif", 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(
                h_pos(annotation.x_anchor),
                v_pos(annotation.y_anchor),
            ));
        root.draw(&Text::new(annotation.text.clone(), (x, y), style))?;
    }

    root.present()?;
    debug!("rendered figure with {} traces", figure.traces.len());
    Ok(())
}

fn subplot_for(figure: &Figure, index: usize) -> SubplotConfig {
    figure
        .layout
        .subplots
        .get(index)
        .cloned()
        .unwrap_or(SubplotConfig {
            row: 0,
            col: 0,
            x_domain: [0.0, 1.0],
            y_domain: [0.0, 1.0],
            polar: false,
            radial_axis_visible: false,
            independent_y: true,
        })
}

fn subplot_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    subplot: &SubplotConfig,
    width: u32,
    height: u32,
) -> DrawingArea<DB, Shift> {
    let x0 = (subplot.x_domain[0] * width as f64) as i32;
    let w = ((subplot.x_domain[1] - subplot.x_domain[0]) * width as f64) as i32;
    let y0 = ((1.0 - subplot.y_domain[1]) * height as f64) as i32;
    let h = ((subplot.y_domain[1] - subplot.y_domain[0]) * height as f64) as i32;
    root.clone().shrink((x0, y0), (w, h))
}

fn draw_line<DB>(area: &DrawingArea<DB, Shift>, trace: &LineTrace, index: usize) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if trace.y.is_empty() {
        return Ok(());
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &value in &trace.y {
        if value.is_finite() {
            y_min = y_min.min(value);
            y_max = y_max.max(value);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    } else if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let x_max = (trace.y.len() - 1).max(1) as f64;

    let (r, g, b) = LINE_PALETTE[index % LINE_PALETTE.len()];
    let color = RGBColor(r, g, b);

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .caption(&trace.name, ("sans-serif", 14))
        .x_label_area_size(20)
        .y_label_area_size(48)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;
    chart.configure_mesh().max_light_lines(2).draw()?;
    chart.draw_series(LineSeries::new(
        trace.y.iter().enumerate().map(|(i, &v)| (i as f64, v)),
        &color,
    ))?;
    Ok(())
}

fn draw_bar_polar<DB>(
    area: &DrawingArea<DB, Shift>,
    trace: &BarPolarTrace,
    coloraxis: &ColorAxis,
    radial_axis_visible: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let bars = trace.r.len();
    if bars == 0 {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let cx = w as i32 / 2;
    let cy = h as i32 / 2;
    let radius = 0.5 * w.min(h) as f64 - 24.0;
    if radius <= 0.0 {
        return Ok(());
    }
    let max_magnitude = trace.r.iter().fold(0.0f64, |acc, &v| acc.max(v.abs()));
    let scale = if max_magnitude > 0.0 {
        radius / max_magnitude
    } else {
        0.0
    };

    for (i, (&value, label)) in trace.r.iter().zip(&trace.theta).enumerate() {
        // Sectors start at the top and run clockwise.
        let a0 = TAU * i as f64 / bars as f64 - FRAC_PI_2;
        let a1 = TAU * (i + 1) as f64 / bars as f64 - FRAC_PI_2;
        let bar_radius = scale * value.max(0.0);

        let mut points = vec![(cx, cy)];
        let steps = 16;
        for step in 0..=steps {
            let angle = a0 + (a1 - a0) * step as f64 / steps as f64;
            points.push((
                cx + (bar_radius * angle.cos()).round() as i32,
                cy + (bar_radius * angle.sin()).round() as i32,
            ));
        }
        let (r, g, b) = coloraxis.color_for(value);
        area.draw(&Polygon::new(points, RGBColor(r, g, b).filled()))?;

        let mid = (a0 + a1) / 2.0;
        let label_x = cx + ((radius + 12.0) * mid.cos()).round() as i32;
        let label_y = cy + ((radius + 12.0) * mid.sin()).round() as i32;
        let style = ("sans-serif", 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(label.clone(), (label_x, label_y), style))?;
    }

    if radial_axis_visible {
        area.draw(&Circle::new((cx, cy), radius as i32, &BLACK.mix(0.2)))?;
    }
    Ok(())
}

fn h_pos(anchor: Anchor) -> HPos {
    match anchor {
        Anchor::Left => HPos::Left,
        Anchor::Right => HPos::Right,
        _ => HPos::Center,
    }
}

fn v_pos(anchor: Anchor) -> VPos {
    match anchor {
        Anchor::Top => VPos::Top,
        Anchor::Bottom => VPos::Bottom,
        _ => VPos::Center,
    }
}
