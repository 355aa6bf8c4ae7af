//! Per-country trend view: GDP and life expectancy over time on dual Y axes,
//! with a dashed marker at the selected year.

use crate::models::{Attribute, Record};
use crate::viz::scatter::placeholder;
use crate::viz::types::ChartConfig;
use crate::viz::util::{finite_extent, group_int, nice_extent};
use anyhow::{Result, anyhow};
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_svg::SVGBackend;
use std::path::Path;

/// Render the time-series trend for one country. `year` places the dashed
/// marker; it is skipped silently when the country has no row for that year.
pub fn render<P: AsRef<Path>>(
    records: &[Record],
    country: &str,
    year: Option<i32>,
    cfg: &ChartConfig,
    out_path: P,
) -> Result<()> {
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    let root = SVGBackend::new(path_string.as_str(), (cfg.width, cfg.height)).into_drawing_area();
    let palette = cfg.theme.palette();
    root.fill(&palette.background).map_err(|e| anyhow!("{:?}", e))?;

    let mut filtered: Vec<&Record> = records.iter().filter(|r| r.country == country).collect();
    if filtered.is_empty() {
        return placeholder(&root, "No data for selected country.", cfg);
    }
    filtered.sort_by_key(|r| r.year);
    let owned: Vec<Record> = filtered.iter().map(|r| (*r).clone()).collect();

    let (mut min_year, mut max_year) = (
        owned.iter().map(|r| r.year).min().unwrap_or(0),
        owned.iter().map(|r| r.year).max().unwrap_or(0),
    );
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }
    let x_range = min_year as f64..max_year as f64;

    let gdp_extent = finite_extent(&owned, Attribute::Gdp)
        .ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let life_extent = finite_extent(&owned, Attribute::LifeExpectancy)
        .ok_or_else(|| anyhow!("no numeric values to plot"))?;
    // Left axis anchored at zero; right axis floats with the data.
    let (_, gdp_top) = nice_extent((0.0, gdp_extent.1), 5);
    let (life_lo, life_hi) = nice_extent(life_extent, 5);

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            format!("GDP & Life Expectancy over Time — {country}"),
            (FontFamily::SansSerif, 14)
                .into_font()
                .color(&palette.text),
        )
        .set_label_area_size(LabelAreaPosition::Left, 56)
        .set_label_area_size(LabelAreaPosition::Right, 44)
        .set_label_area_size(LabelAreaPosition::Bottom, 36)
        .build_cartesian_2d(x_range.clone(), 0.0..gdp_top)
        .map_err(|e| anyhow!("{:?}", e))?
        .set_secondary_coord(x_range, life_lo..life_hi);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Year")
        .y_desc(Attribute::Gdp.axis_label())
        .x_labels(6)
        .y_labels(5)
        .x_label_formatter(&|v: &f64| format!("{:.0}", v))
        .y_label_formatter(&|v: &f64| group_int(*v))
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

    chart
        .configure_secondary_axes()
        .y_desc(Attribute::LifeExpectancy.axis_label())
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
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let gdp_line: Vec<(f64, f64)> = owned.iter().map(|r| (r.year as f64, r.gdp)).collect();
    let life_line: Vec<(f64, f64)> = owned
        .iter()
        .map(|r| (r.year as f64, r.life_expectancy))
        .collect();

    chart
        .draw_series(LineSeries::new(
            gdp_line,
            ShapeStyle {
                color: palette.gdp.to_rgba(),
                filled: false,
                stroke_width: 2,
            },
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    chart
        .draw_secondary_series(LineSeries::new(
            life_line,
            ShapeStyle {
                color: palette.life.to_rgba(),
                filled: false,
                stroke_width: 2,
            },
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

    // Year marker: dashed vertical line plus emphasized points on each series.
    if let Some(year) = year
        && let Some(point) = owned.iter().find(|r| r.year == year)
    {
        let x = year as f64;
        let marker_style = palette.marker.mix(0.8).stroke_width(1);
        // Dashed vertical line: alternating segments over the full height.
        let dashes = 20usize;
        let seg = gdp_top / (dashes * 2) as f64;
        chart
            .draw_series((0..dashes).map(|i| {
                let y0 = seg * (2 * i) as f64;
                PathElement::new(vec![(x, y0), (x, y0 + seg)], marker_style)
            }))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(Circle::new(
                (x, point.gdp),
                7,
                palette.background.to_rgba().filled(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(Circle::new(
                (x, point.gdp),
                5,
                palette.gdp.to_rgba().filled(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_secondary_series(std::iter::once(Circle::new(
                (x, point.life_expectancy),
                7,
                palette.background.to_rgba().filled(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_secondary_series(std::iter::once(Circle::new(
                (x, point.life_expectancy),
                5,
                palette.life.to_rgba().filled(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
