//! Linked cross-filtering: per-view brush ranges and the intersected set of
//! matching country codes.
//!
//! The coordinator owns one optional brush per source view. Whenever a brush
//! changes, the selection is recomputed from scratch as the conjunction of
//! all active brushes; there is no incremental update and nothing persists
//! beyond the owning view's lifetime.

use crate::models::{Attribute, Record};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A closed numeric interval produced by a brush gesture.
///
/// Brush ends may arrive in either drag order; construction normalizes so
/// `min <= max` always holds. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// A missing value never matches an active range; it is not a wildcard.
    pub fn admits(&self, v: Option<f64>) -> bool {
        v.is_some_and(|v| self.contains(v))
    }
}

/// Which view a brush came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BrushSource {
    GdpHistogram,
    LifeHistogram,
    Scatterplot,
}

/// A single view's active constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    /// 1-D range over the attribute a histogram currently plots.
    Interval(Attribute, Range),
    /// 2-D scatterplot region, expressed as one range per axis.
    Region { gdp: Range, life: Range },
}

impl Brush {
    fn admits(&self, record: &Record) -> bool {
        match self {
            Brush::Interval(attr, range) => range.admits(record.value(*attr)),
            Brush::Region { gdp, life } => {
                gdp.contains(record.gdp) && life.contains(record.life_expectancy)
            }
        }
    }
}

/// The derived result of a recompute: either "no constraint" or the set of
/// codes satisfying every active brush.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// No brush active; all records visible at full weight.
    All,
    Codes(AHashSet<String>),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn contains(&self, code: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Codes(codes) => codes.contains(code),
        }
    }

    /// Number of selected codes, where "all" counts as `total`.
    pub fn count(&self, total: usize) -> usize {
        match self {
            Selection::All => total,
            Selection::Codes(codes) => codes.len(),
        }
    }
}

/// Owns the per-view brushes and computes the intersected selection.
///
/// Injected into the render path rather than living in ambient global state;
/// every mutation happens synchronously inside an event callback.
#[derive(Debug, Clone, Default)]
pub struct BrushCoordinator {
    brushes: BTreeMap<BrushSource, Brush>,
}

impl BrushCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one source's brush; `None` clears it. Absence of a selection
    /// is a valid state, so there are no error conditions here.
    pub fn update(&mut self, source: BrushSource, brush: Option<Brush>) {
        match brush {
            Some(b) => {
                self.brushes.insert(source, b);
            }
            None => {
                self.brushes.remove(&source);
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.brushes.clear();
    }

    pub fn is_clear(&self) -> bool {
        self.brushes.is_empty()
    }

    pub fn brush(&self, source: BrushSource) -> Option<&Brush> {
        self.brushes.get(&source)
    }

    /// Recompute the selection from scratch: a record matches when every
    /// active brush admits it (logical AND across brushes, never a union).
    /// With no active brush the selection is [`Selection::All`], restoring
    /// the pre-interaction state.
    pub fn selection(&self, records: &[Record]) -> Selection {
        if self.brushes.is_empty() {
            return Selection::All;
        }
        let codes: AHashSet<String> = records
            .iter()
            .filter(|r| self.brushes.values().all(|b| b.admits(r)))
            .map(|r| r.code.clone())
            .collect();
        Selection::Codes(codes)
    }
}
