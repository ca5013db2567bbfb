//! Decompose a small two-store panel and print the resulting chart JSON.

use chrono::NaiveDate;
use tsdecomp::{
    decompose, plot_components, plot_seasonalities, Column, ColumnSpec, DecompositionModel,
    PanelFrame, PeriodRule,
};

fn main() -> tsdecomp::Result<()> {
    let mut ids = Vec::new();
    let mut times = Vec::new();
    let mut values = Vec::new();
    for (store, base) in [("store-1", 120.0), ("store-2", 80.0)] {
        for i in 0..36usize {
            ids.push(store.to_string());
            times.push(
                NaiveDate::from_ymd_opt(2021 + (i / 12) as i32, (i % 12) as u32 + 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            );
            let season = (i as f64 * std::f64::consts::TAU / 12.0).sin() * 9.0;
            values.push(base + 0.8 * i as f64 + season);
        }
    }
    let mut frame = PanelFrame::new();
    frame.add_column("unique_id", Column::Str(ids))?;
    frame.add_column("ds", Column::DateTime(times))?;
    frame.add_column("y", Column::Float64(values))?;

    let decomposed = decompose(&frame, DecompositionModel::Additive, 12)?;

    let components = plot_components(&decomposed, Some("store-1"), &ColumnSpec::default())?;
    println!("{}", components.to_json()?);

    let grid = plot_seasonalities(
        &decomposed,
        None,
        &ColumnSpec::default(),
        &PeriodRule::MonthName,
        4,
    )?;
    println!("{}", grid.to_json()?);

    #[cfg(feature = "visualization")]
    {
        tsdecomp::vis::render_png(&components, "components.png")?;
        tsdecomp::vis::render_png(&grid, "seasonality.png")?;
    }
    Ok(())
}
