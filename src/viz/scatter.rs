//! GDP-vs-life-expectancy scatterplots: the brushed overview and the
//! single-year view with a highlighted country.

use crate::models::{Attribute, Record};
use crate::selection::Selection;
use crate::viz::types::ChartConfig;
use crate::viz::util::{finite_extent, group_int, nice_extent};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use std::path::Path;

/// Render the GDP-vs-life scatterplot, dimming points outside the selection.
///
/// Point positions depend only on the record slice; the selection changes
/// radius and opacity, never the axes.
pub fn render<P: AsRef<Path>>(
    records: &[Record],
    selection: &Selection,
    cfg: &ChartConfig,
    out_path: P,
) -> Result<()> {
    if records.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    let root = SVGBackend::new(path_string.as_str(), (cfg.width, cfg.height)).into_drawing_area();
    let palette = cfg.theme.palette();
    root.fill(&palette.background).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = scaffold(&root, records, "GDP per Capita vs Life Expectancy", cfg)?;

    let color = palette.gdp;
    chart
        .draw_series(records.iter().map(|r| {
            let (radius, opacity) = if selection.is_all() {
                (4, 0.8)
            } else if selection.contains(&r.code) {
                (5, 0.9)
            } else {
                (3, 0.1)
            };
            Circle::new(
                (r.gdp, r.life_expectancy),
                radius,
                color.mix(opacity).filled(),
            )
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Render the scatter restricted to one year, drawing `highlight` (a country
/// name) larger and in the accent color. An empty year yields a placeholder
/// message instead of an error.
pub fn render_year<P: AsRef<Path>>(
    records: &[Record],
    year: i32,
    highlight: Option<&str>,
    cfg: &ChartConfig,
    out_path: P,
) -> Result<()> {
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    let root = SVGBackend::new(path_string.as_str(), (cfg.width, cfg.height)).into_drawing_area();
    let palette = cfg.theme.palette();
    root.fill(&palette.background).map_err(|e| anyhow!("{:?}", e))?;

    let filtered: Vec<&Record> = records.iter().filter(|r| r.year == year).collect();
    if filtered.is_empty() {
        return placeholder(&root, "No data for selected year.", cfg);
    }
    let owned: Vec<Record> = filtered.iter().map(|r| (*r).clone()).collect();

    let mut chart = scaffold(
        &root,
        &owned,
        &format!("GDP vs Life Expectancy — {year}"),
        cfg,
    )?;

    chart
        .draw_series(owned.iter().map(|r| {
            let highlighted = highlight.is_some_and(|c| r.country == c);
            let (radius, color, opacity) = if highlighted {
                (5, palette.accent, 0.9)
            } else {
                (3, palette.gdp, 0.7)
            };
            Circle::new(
                (r.gdp, r.life_expectancy),
                radius,
                color.mix(opacity).filled(),
            )
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Shared axes: GDP on X, life expectancy on Y, niced full-data domains.
fn scaffold<'a, DB>(
    root: &'a DrawingArea<DB, Shift>,
    records: &[Record],
    title: &str,
    cfg: &ChartConfig,
) -> Result<
    ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
>
where
    DB: DrawingBackend,
{
    let palette = cfg.theme.palette();
    let gdp = finite_extent(records, Attribute::Gdp)
        .ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let life = finite_extent(records, Attribute::LifeExpectancy)
        .ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let (x0, x1) = nice_extent(gdp, 10);
    let (y0, y1) = nice_extent(life, 10);

    let mut chart = ChartBuilder::on(root)
        .margin(16)
        .caption(
            title,
            (FontFamily::SansSerif, 15)
                .into_font()
                .color(&palette.text),
        )
        .set_label_area_size(LabelAreaPosition::Left, 52)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(Attribute::Gdp.axis_label())
        .y_desc(Attribute::LifeExpectancy.axis_label())
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&|v: &f64| group_int(*v))
        .y_label_formatter(&|v: &f64| format!("{v:.0}"))
        .label_style(
            (FontFamily::SansSerif, 12)
                .into_font()
                .color(&palette.caption),
        )
        .axis_desc_style(
            (FontFamily::SansSerif, 13)
                .into_font()
                .color(&palette.caption),
        )
        .axis_style(palette.axis)
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    Ok(chart)
}

/// Draw a centered message instead of marks, for parameter combinations
/// that select nothing.
pub(crate) fn placeholder<DB>(
    root: &DrawingArea<DB, Shift>,
    message: &str,
    cfg: &ChartConfig,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let palette = cfg.theme.palette();
    let style = (FontFamily::SansSerif, 14)
        .into_font()
        .color(&palette.caption)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        message.to_string(),
        ((cfg.width / 2) as i32, (cfg.height / 2) as i32),
        style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
