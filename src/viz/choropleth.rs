//! World choropleth: country outlines filled from a sequential color ramp
//! over the chosen attribute, plus a horizontal gradient legend.
//!
//! The projection is fitted once per render from the boundary data alone, so
//! toggling the colored attribute or the selection never moves geometry.

use crate::dataset::WorldMap;
use crate::models::{Attribute, Record};
use crate::selection::Selection;
use crate::viz::types::{ChartConfig, ramp_stops};
use crate::viz::util::{finite_extent, fmt_attr_value, lerp_color};
use ahash::AHashMap;
use anyhow::{Result, anyhow};
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use std::path::Path;

/// Web-Mercator latitude cutoff.
const MAX_LAT_DEG: f64 = 85.051129;
/// Inner padding between the map frame and the outermost geometry.
const PADDING: f64 = 24.0;
/// Vertical band below the map reserved for the gradient legend.
const LEGEND_BAND: u32 = 64;

fn mercator(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lat = lat_deg.clamp(-MAX_LAT_DEG, MAX_LAT_DEG).to_radians();
    let y = (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    (lon_deg.to_radians(), y)
}

/// Mercator scaled and translated to fit the boundary extent into the frame.
struct FitProjection {
    scale: f64,
    tx: f64,
    ty: f64,
}

impl FitProjection {
    fn fit(world: &WorldMap, width: f64, height: f64) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for shape in &world.shapes {
            for ring in &shape.rings {
                for &(lon, lat) in ring {
                    let (x, y) = mercator(lon, lat);
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        if min_x > max_x || min_y > max_y {
            return None;
        }
        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let scale = ((width - 2.0 * PADDING) / span_x).min((height - 2.0 * PADDING) / span_y);
        let tx = width / 2.0 - scale * (min_x + max_x) / 2.0;
        let ty = height / 2.0 + scale * (min_y + max_y) / 2.0;
        Some(Self { scale, tx, ty })
    }

    fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (x, y) = mercator(lon, lat);
        (
            (self.tx + self.scale * x).round() as i32,
            (self.ty - self.scale * y).round() as i32,
        )
    }
}

/// Render the choropleth for one attribute over a single-year record slice.
///
/// Countries present in the boundary file but absent from the records (or
/// missing the attribute) get the neutral "no data" fill. Countries outside
/// the selection are dimmed; the geometry itself never changes.
pub fn render<P: AsRef<Path>>(
    world: &WorldMap,
    records: &[Record],
    attr: Attribute,
    selection: &Selection,
    cfg: &ChartConfig,
    out_path: P,
) -> Result<()> {
    if world.is_empty() {
        return Err(anyhow!("no boundary features to draw"));
    }
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    let root = SVGBackend::new(path_string.as_str(), (cfg.width, cfg.height)).into_drawing_area();
    let palette = cfg.theme.palette();
    root.fill(&palette.background).map_err(|e| anyhow!("{:?}", e))?;

    let map_h = cfg.height.saturating_sub(LEGEND_BAND);
    let projection = FitProjection::fit(world, cfg.width as f64, map_h as f64)
        .ok_or_else(|| anyhow!("no boundary features to draw"))?;

    // Water backdrop behind the landmasses.
    root.draw(&Rectangle::new(
        [(0, 0), (cfg.width as i32, map_h as i32)],
        palette.map_water.filled(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let by_code: AHashMap<&str, &Record> =
        records.iter().map(|r| (r.code.as_str(), r)).collect();
    // Ramp domain over the full record slice; skips missing values.
    let domain = finite_extent(records, attr);
    let (ramp_lo, ramp_hi) = ramp_stops(attr);

    for shape in &world.shapes {
        let value = by_code
            .get(shape.code.as_str())
            .and_then(|r| r.value(attr))
            .filter(|v| v.is_finite());
        let fill = match (domain, value) {
            (Some((lo, hi)), Some(v)) => {
                let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };
                lerp_color(ramp_lo, ramp_hi, t)
            }
            _ => palette.no_data,
        };
        let dimmed = !selection.contains(&shape.code);
        let fill_style = if dimmed {
            fill.mix(0.25).filled()
        } else {
            fill.to_rgba().filled()
        };
        let border_style = if dimmed {
            palette.map_border.mix(0.4).stroke_width(1)
        } else {
            palette.map_border.stroke_width(1)
        };

        for ring in &shape.rings {
            let mut pts: Vec<(i32, i32)> = ring
                .iter()
                .map(|&(lon, lat)| projection.project(lon, lat))
                .collect();
            root.draw(&Polygon::new(pts.clone(), fill_style))
                .map_err(|e| anyhow!("{:?}", e))?;
            if let Some(&first) = pts.first() {
                pts.push(first);
            }
            root.draw(&PathElement::new(pts, border_style))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if let Some(domain) = domain {
        draw_legend(&root, attr, domain, cfg, map_h)?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Horizontal gradient bar with min/mid/max ticks and the attribute label.
fn draw_legend<DB>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    attr: Attribute,
    (lo, hi): (f64, f64),
    cfg: &ChartConfig,
    map_h: u32,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let palette = cfg.theme.palette();
    let (ramp_lo, ramp_hi) = ramp_stops(attr);

    let legend_w: i32 = 260;
    let legend_h: i32 = 14;
    let x0 = (cfg.width as i32 - legend_w) / 2;
    let y0 = map_h as i32 + 18;

    const STEPS: i32 = 64;
    let step_w = legend_w as f64 / STEPS as f64;
    for i in 0..STEPS {
        let t = i as f64 / (STEPS - 1) as f64;
        let color = lerp_color(ramp_lo, ramp_hi, t);
        let sx0 = x0 + (i as f64 * step_w).floor() as i32;
        let sx1 = x0 + ((i + 1) as f64 * step_w).ceil() as i32;
        root.draw(&Rectangle::new(
            [(sx0, y0), (sx1.min(x0 + legend_w), y0 + legend_h)],
            color.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    root.draw(&Rectangle::new(
        [(x0, y0), (x0 + legend_w, y0 + legend_h)],
        palette.map_border.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let label_style = (FontFamily::SansSerif, 12)
        .into_font()
        .color(&palette.caption)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    root.draw(&Text::new(
        attr.axis_label().to_string(),
        (cfg.width as i32 / 2, y0 - 6),
        label_style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let tick_style = (FontFamily::SansSerif, 11)
        .into_font()
        .color(&palette.caption)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (frac, v) in [(0.0, lo), (0.5, lo + (hi - lo) / 2.0), (1.0, hi)] {
        let x = x0 + (frac * legend_w as f64).round() as i32;
        root.draw(&Text::new(
            fmt_attr_value(attr, v),
            (x, y0 + legend_h + 6),
            tick_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}
