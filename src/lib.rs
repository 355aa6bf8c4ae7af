//! chw-viz
//!
//! A lightweight Rust library for loading, cross-filtering, visualizing, and
//! summarizing country health & wealth data. Pairs with the `chw` CLI and the
//! `chw-gui` desktop app.
//!
//! ### Features
//! - Load the merged GDP/life-expectancy CSV, join per-year population, and
//!   parse a GeoJSON world boundary file
//! - Linked brush filtering: the intersection of per-view ranges selects the
//!   country codes every chart highlights
//! - Render histograms, scatterplots, a choropleth map, and a dual-axis
//!   trend view to SVG
//! - Quick per-attribute statistics (min, max, mean, median)
//!
//! ### Example
//! ```no_run
//! use chw_viz::dataset::{self, Dataset};
//! use chw_viz::models::Attribute;
//! use chw_viz::selection::{Brush, BrushCoordinator, BrushSource, Range};
//!
//! let mut records = dataset::load_records("data/countries_health_wealth_clean.csv")?;
//! dataset::merge_population(&mut records, "data/population.csv")?;
//! let data = Dataset::new(records);
//!
//! let mut brushes = BrushCoordinator::new();
//! brushes.update(
//!     BrushSource::GdpHistogram,
//!     Some(Brush::Interval(Attribute::Gdp, Range::new(20_000.0, 40_000.0))),
//! );
//! let year = data.latest_year().expect("dataset has years");
//! let selected = brushes.selection(&data.for_year(year));
//! println!("{} countries selected", selected.count(data.len()));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod dataset;
pub mod models;
pub mod selection;
pub mod stats;
pub mod storage;
pub mod viz;

pub use dataset::{Dataset, DatasetError, WorldMap};
pub use models::{Attribute, Record};
pub use selection::{Brush, BrushCoordinator, BrushSource, Range, Selection};
pub use viz::{ChartConfig, ChartKind, Theme};
