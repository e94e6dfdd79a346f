// Chart-ready series derived from a filtered table
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::{Attribute, Table};
use super::{quantile_sorted, FilterSpec};

/// Scatter points of one species
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub species: String,
    pub points: Vec<[f64; 2]>,
}

/// Per-species counts over shared bin edges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub attribute: Attribute,
    /// `bins + 1` ascending edges; empty when there is no data
    pub edges: Vec<f64>,
    pub series: Vec<HistogramSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub species: String,
    pub counts: Vec<usize>,
}

/// Five-number summary plus every point of one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub attribute: Attribute,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub points: Vec<f64>,
}

/// Every series the explorer charts draw for one filter state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub scatter: Vec<ScatterSeries>,
    pub histogram: Histogram,
    pub boxes: Vec<BoxSummary>,
}

impl ChartSet {
    /// Scatter of Y against X, histogram of Y, boxes for every attribute
    pub fn build(filtered: &Table, spec: &FilterSpec, bins: usize) -> Self {
        ChartSet {
            scatter: scatter(filtered, spec.x_axis, spec.y_axis),
            histogram: histogram(filtered, spec.y_axis, bins),
            boxes: box_summaries(filtered),
        }
    }
}

/// One scatter series per species, sorted by species, points in table order
pub fn scatter(table: &Table, x: Attribute, y: Attribute) -> Vec<ScatterSeries> {
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for record in table {
        groups
            .entry(record.species.as_str())
            .or_default()
            .push([record.value(x), record.value(y)]);
    }

    groups
        .into_iter()
        .map(|(species, points)| ScatterSeries {
            species: species.to_string(),
            points,
        })
        .collect()
}

/// Overlaid histogram of `attr` with equal-width bins over the data range.
///
/// The last bin is closed on the right. A zero-width range puts every value
/// in a single bin.
pub fn histogram(table: &Table, attr: Attribute, bins: usize) -> Histogram {
    let (lo, hi) = match table.bounds(attr) {
        Some(bounds) => bounds,
        None => {
            return Histogram {
                attribute: attr,
                edges: Vec::new(),
                series: Vec::new(),
            }
        }
    };

    let bins = if hi > lo { bins.max(1) } else { 1 };
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for record in table {
        let value = record.value(attr);
        let idx = if width > 0.0 {
            (((value - lo) / width).floor() as usize).min(bins - 1)
        } else {
            0
        };
        groups
            .entry(record.species.as_str())
            .or_insert_with(|| vec![0; bins])[idx] += 1;
    }

    Histogram {
        attribute: attr,
        edges,
        series: groups
            .into_iter()
            .map(|(species, counts)| HistogramSeries {
                species: species.to_string(),
                counts,
            })
            .collect(),
    }
}

/// Box summaries for the four numeric attributes; empty when there is no data
pub fn box_summaries(table: &Table) -> Vec<BoxSummary> {
    if table.is_empty() {
        return Vec::new();
    }

    Attribute::ALL
        .iter()
        .map(|&attr| {
            let points = table.column(attr);
            let mut sorted = points.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));

            BoxSummary {
                attribute: attr,
                min: sorted[0],
                q1: quantile_sorted(&sorted, 0.25),
                median: quantile_sorted(&sorted, 0.5),
                q3: quantile_sorted(&sorted, 0.75),
                max: sorted[sorted.len() - 1],
                points,
            }
        })
        .collect()
}
