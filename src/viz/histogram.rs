//! Attribute distribution as a binned bar chart, with bin-level highlight
//! state driven by the current selection.

use crate::models::{Attribute, Record};
use crate::selection::Selection;
use crate::viz::types::ChartConfig;
use crate::viz::util::{bin_records, finite_extent, group_int, nice_extent};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_svg::SVGBackend;
use std::path::Path;

const BIN_COUNT: usize = 20;

/// Render the distribution of `attr` over `records` to an SVG file.
///
/// Bins whose members all fall outside the selection are dimmed; a bin with
/// at least one selected member renders at full weight. Axis domains come
/// from the full record slice, never from the selection.
pub fn render<P: AsRef<Path>>(
    records: &[Record],
    attr: Attribute,
    selection: &Selection,
    cfg: &ChartConfig,
    out_path: P,
) -> Result<()> {
    if records.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    let root = SVGBackend::new(path_string.as_str(), (cfg.width, cfg.height)).into_drawing_area();
    draw(root, records, attr, selection, cfg)
}

fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    records: &[Record],
    attr: Attribute,
    selection: &Selection,
    cfg: &ChartConfig,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let palette = cfg.theme.palette();
    root.fill(&palette.background).map_err(|e| anyhow!("{:?}", e))?;

    let extent =
        finite_extent(records, attr).ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let (lo, hi) = nice_extent(extent, BIN_COUNT);
    let bins = bin_records(records, attr, (lo, hi), BIN_COUNT);
    let y_max = bins.iter().map(|b| b.count()).max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            format!("Distribution of {}", attr.label()),
            (FontFamily::SansSerif, 15)
                .into_font()
                .color(&palette.text),
        )
        .set_label_area_size(LabelAreaPosition::Left, 48)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(lo..hi, 0.0..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |v: &f64| match attr {
        Attribute::LifeExpectancy => format!("{v:.0}"),
        _ => group_int(*v),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(attr.axis_label())
        .y_desc("Number of Countries")
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&x_label_fmt)
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

    let fill = cfg.theme.series_color(attr);
    chart
        .draw_series(bins.iter().map(|bin| {
            let highlighted = selection.is_all()
                || bin.members.iter().any(|r| selection.contains(&r.code));
            let style = if highlighted {
                fill.to_rgba().filled()
            } else {
                fill.mix(0.2).filled()
            };
            let mut bar = Rectangle::new([(bin.x0, 0.0), (bin.x1, bin.count() as f64)], style);
            // 1px gap between bars
            bar.set_margin(0, 0, 1, 1);
            bar
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
