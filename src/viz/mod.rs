//! Chart renderers for the fixed set of views.
//!
//! Every renderer is a pure function of `(records, view parameters,
//! selection, theme)` writing one SVG file: re-invoking with identical
//! inputs reproduces the same bytes, and output replaces any prior file.
//! Selection state only changes visual weight (opacity, radius); axis
//! domains and the map projection are derived from the full record slice.

pub mod choropleth;
pub mod histogram;
pub mod scatter;
pub mod trend;
pub mod types;
pub mod util;

pub use types::{ChartConfig, ChartKind, Palette, Theme};

use crate::dataset::{Dataset, WorldMap};
use crate::models::Attribute;
use crate::selection::BrushCoordinator;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Parameters of the dropdown/toggle controls, resolved against the dataset.
#[derive(Debug, Clone)]
pub struct ViewParams {
    /// Attribute coloring the choropleth.
    pub attribute: Attribute,
    /// Country for the trend view and the year-scatter highlight.
    pub country: Option<String>,
    /// Year shown by the single-year views; defaults to the latest year.
    pub year: Option<i32>,
    pub theme: Theme,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            attribute: Attribute::Gdp,
            country: None,
            year: None,
            theme: Theme::default(),
        }
    }
}

impl ViewParams {
    /// Prefer Canada when present, otherwise the first name in the dropdown.
    pub fn resolve_country(&self, dataset: &Dataset) -> Option<String> {
        if let Some(c) = &self.country {
            return Some(c.clone());
        }
        let countries = dataset.countries();
        if countries.iter().any(|c| c == "Canada") {
            Some("Canada".to_string())
        } else {
            countries.first().cloned()
        }
    }

    pub fn resolve_year(&self, dataset: &Dataset) -> Option<i32> {
        self.year.or_else(|| dataset.latest_year())
    }
}

/// Render every view into `out_dir` using the coordinator's current
/// selection, and return the written paths. The choropleth is skipped (with
/// a warning) when no boundary file was loaded.
pub fn render_all(
    dataset: &Dataset,
    world: Option<&WorldMap>,
    params: &ViewParams,
    brushes: &BrushCoordinator,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let year = params
        .resolve_year(dataset)
        .ok_or_else(|| anyhow::anyhow!("dataset has no years"))?;
    let year_records = dataset.for_year(year);
    let selection = brushes.selection(&year_records);

    let mut written = Vec::new();
    for kind in ChartKind::ALL {
        let cfg = ChartConfig::for_kind(kind, params.theme);
        let path = out_dir.join(kind.file_name());
        match kind {
            ChartKind::GdpHistogram => {
                histogram::render(&year_records, Attribute::Gdp, &selection, &cfg, &path)?
            }
            ChartKind::LifeHistogram => histogram::render(
                &year_records,
                Attribute::LifeExpectancy,
                &selection,
                &cfg,
                &path,
            )?,
            ChartKind::Scatter => scatter::render(&year_records, &selection, &cfg, &path)?,
            ChartKind::YearScatter => scatter::render_year(
                dataset.records(),
                year,
                params.resolve_country(dataset).as_deref(),
                &cfg,
                &path,
            )?,
            ChartKind::Choropleth => match world {
                Some(world) => {
                    choropleth::render(world, &year_records, params.attribute, &selection, &cfg, &path)?
                }
                None => {
                    log::warn!("no boundary file loaded; skipping choropleth");
                    continue;
                }
            },
            ChartKind::Trend => {
                let country = params
                    .resolve_country(dataset)
                    .unwrap_or_default();
                trend::render(dataset.records(), &country, Some(year), &cfg, &path)?
            }
        }
        written.push(path);
    }
    Ok(written)
}
