use crate::models::{Attribute, Record};
use serde::{Deserialize, Serialize};

/// Summary statistics for one attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub attribute: Attribute,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute per-attribute statistics over the loaded records.
/// Missing values are counted separately and excluded from the numbers.
pub fn attribute_summary(records: &[Record]) -> Vec<Summary> {
    Attribute::ALL
        .iter()
        .map(|&attribute| {
            let mut vals: Vec<f64> = Vec::new();
            let mut missing = 0usize;
            for r in records {
                match r.value(attribute).filter(|v| v.is_finite()) {
                    Some(v) => vals.push(v),
                    None => missing += 1,
                }
            }
            vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let count = vals.len();
            let min = vals.first().cloned();
            let max = vals.last().cloned();
            let mean = if count > 0 {
                Some(vals.iter().copied().sum::<f64>() / count as f64)
            } else {
                None
            };
            let median = if count == 0 {
                None
            } else if count % 2 == 1 {
                Some(vals[count / 2])
            } else {
                Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
            };
            Summary {
                attribute,
                count,
                missing,
                min,
                max,
                mean,
                median,
            }
        })
        .collect()
}
