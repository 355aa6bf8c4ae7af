//! Utility functions for visualization: extents, binning, tick formatting,
//! and color interpolation.

use crate::models::{Attribute, Record};
use num_format::{Locale, ToFormattedString};
use plotters::style::RGBColor;

/// Min/max over the finite values of an attribute; `None` when nothing is
/// finite. Missing values are skipped, never errors.
pub fn finite_extent(records: &[Record], attr: Attribute) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for r in records {
        if let Some(v) = r.value(attr).filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
    }
    (min <= max).then_some((min, max))
}

/// Step of roughly `span / count` rounded to a 1/2/5 decade multiple.
pub fn tick_step(span: f64, count: usize) -> f64 {
    let raw = span / count.max(1) as f64;
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let residual = raw / mag;
    let factor = if residual >= 5.0 {
        10.0
    } else if residual >= 2.0 {
        5.0
    } else {
        2.0
    };
    mag * factor
}

/// Widen an extent outward so both ends land on tick boundaries.
/// Degenerate extents get a unit of breathing room.
pub fn nice_extent((min, max): (f64, f64), count: usize) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let step = tick_step(max - min, count);
    ((min / step).floor() * step, (max / step).ceil() * step)
}

/// One histogram bin: its value interval plus the records that fell into it.
#[derive(Debug, Clone)]
pub struct Bin<'a> {
    pub x0: f64,
    pub x1: f64,
    pub members: Vec<&'a Record>,
}

impl Bin<'_> {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Partition records into `count` equal-width bins over `(lo, hi)`.
/// Records with a missing or out-of-domain value are left out.
pub fn bin_records<'a>(
    records: &'a [Record],
    attr: Attribute,
    (lo, hi): (f64, f64),
    count: usize,
) -> Vec<Bin<'a>> {
    let count = count.max(1);
    let width = (hi - lo) / count as f64;
    let mut bins: Vec<Bin<'a>> = (0..count)
        .map(|i| Bin {
            x0: lo + i as f64 * width,
            x1: lo + (i + 1) as f64 * width,
            members: Vec::new(),
        })
        .collect();
    if width <= 0.0 {
        return bins;
    }
    for r in records {
        let Some(v) = r.value(attr).filter(|v| v.is_finite()) else {
            continue;
        };
        if v < lo || v > hi {
            continue;
        }
        // The top of the domain belongs to the last bin.
        let idx = (((v - lo) / width) as usize).min(count - 1);
        bins[idx].members.push(r);
    }
    bins
}

/// Grouped integer, e.g. `30,000`.
pub fn group_int(v: f64) -> String {
    (v.round() as i64).to_formatted_string(&Locale::en)
}

/// Tick/tooltip formatting per attribute: `$30,000`, `75.3`, `1,400,000`.
pub fn fmt_attr_value(attr: Attribute, v: f64) -> String {
    match attr {
        Attribute::Gdp => format!("${}", group_int(v)),
        Attribute::LifeExpectancy => format!("{v:.1}"),
        Attribute::Population => group_int(v),
    }
}

/// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
pub fn lerp_color(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}
