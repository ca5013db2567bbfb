//! Seasonal decomposition and exploratory seasonality plots for grouped
//! time series.
//!
//! A panel frame holds many series in one table, rows keyed by identifier
//! and timestamp. [`decompose`] splits every series into trend, seasonal
//! and residual columns; the `vis` module turns a decomposed frame into
//! chart value objects: a faceted component plot for one series, a polar
//! seasonality chart, or a faceted grid of polar charts across series.
//! With the `visualization` feature, figures render to PNG/SVG via
//! plotters.

pub mod decompose;
pub mod error;
pub mod frame;
pub mod io;
pub mod strength;
pub mod vis;

// Re-export commonly used types
pub use decompose::{decompose, ColumnSpec, DecompositionModel, SeasonalDecompose};
pub use error::{Error, Result};
pub use frame::{Column, ColumnType, MeltOptions, PanelFrame};
pub use strength::{decomposition_strength, DecompositionStrength};
pub use vis::{plot_components, plot_seasonalities, plot_seasonality, Figure, PeriodRule};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
