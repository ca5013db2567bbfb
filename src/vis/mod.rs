//! Chart construction for decomposed panel frames.
//!
//! Figures are backend-independent value objects; the optional
//! `visualization` feature adds plotters-based PNG/SVG rendering.

pub mod components;
pub mod figure;
pub mod seasonality;

#[cfg(feature = "visualization")]
pub mod render;

pub use self::components::plot_components;
pub use self::figure::{
    Anchor, Annotation, BarPolarTrace, ColorAxis, ColorScale, Figure, GridSpec, Layout,
    LineTrace, SubplotConfig, Trace,
};
pub use self::seasonality::{
    plot_seasonalities, plot_seasonality, seasonal_means, PeriodRule,
};

#[cfg(feature = "visualization")]
pub use self::render::{render_png, render_svg};
