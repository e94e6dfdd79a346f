// Summary statistics for a filtered table
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::{Attribute, Table};

/// Descriptive statistics of one numeric attribute.
///
/// Values keep full precision; use [`DescribeRow::formatted`] for display.
/// With zero rows every value except `count` is NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeRow {
    pub attribute: Attribute,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator), NaN below two rows
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl DescribeRow {
    /// Compute the descriptive statistics of `attr` over `table`
    pub fn compute(table: &Table, attr: Attribute) -> Self {
        let mut values = table.column(attr);
        values.sort_by(|a, b| a.total_cmp(b));

        DescribeRow {
            attribute: attr,
            count: values.len(),
            mean: mean(&values),
            std: sample_std_dev(&values),
            min: values.first().copied().unwrap_or(f64::NAN),
            p25: quantile_sorted(&values, 0.25),
            p50: quantile_sorted(&values, 0.50),
            p75: quantile_sorted(&values, 0.75),
            max: values.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Display strings: count, mean, std, min, 25%, 50%, 75%, max to two decimals
    pub fn formatted(&self) -> [String; 8] {
        [
            format!("{:.2}", self.count as f64),
            format!("{:.2}", self.mean),
            format!("{:.2}", self.std),
            format!("{:.2}", self.min),
            format!("{:.2}", self.p25),
            format!("{:.2}", self.p50),
            format!("{:.2}", self.p75),
            format!("{:.2}", self.max),
        ]
    }
}

/// Column labels matching [`DescribeRow::formatted`]
pub const DESCRIBE_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Aggregate view over a filtered table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub row_count: usize,
    pub category_count: usize,
    pub y_axis: Attribute,
    /// NaN for an empty table
    pub mean_y: f64,
    pub describe: Vec<DescribeRow>,
}

/// Summarize a filtered table; never fails, even when it is empty
pub fn summarize(filtered: &Table, y_axis: Attribute) -> SummaryStats {
    let category_count = filtered
        .iter()
        .map(|r| r.species.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    SummaryStats {
        row_count: filtered.len(),
        category_count,
        y_axis,
        mean_y: mean(&filtered.column(y_axis)),
        describe: Attribute::ALL
            .iter()
            .map(|&attr| DescribeRow::compute(filtered, attr))
            .collect(),
    }
}

/// Arithmetic mean, NaN for no values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation, NaN for fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let mean = mean(values);
    let variance = values.iter()
        .map(|&x| (x - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Quantile of ascending values with linear interpolation between closest ranks
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;

    if idx + 1 < sorted.len() {
        sorted[idx] + frac * (sorted[idx + 1] - sorted[idx])
    } else {
        sorted[idx]
    }
}
