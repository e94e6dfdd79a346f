// API request and response models
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use crate::data::{Attribute, Record};
use crate::processing::{
    ChartSet, DescribeRow, FilterSelection, FilterSpec, SummaryStats, DESCRIBE_LABELS,
};

/// Query string shared by the explore and export endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExploreQuery {
    pub species: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    #[serde(default)]
    pub show_raw: bool,
}

impl ExploreQuery {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            species: self.species.clone(),
            x_axis: self.x_axis.clone(),
            y_axis: self.y_axis.clone(),
            x_min: self.x_min,
            x_max: self.x_max,
        }
    }
}

/// Extent of one numeric attribute over the full dataset
#[derive(Debug, Clone, Serialize)]
pub struct AttributeBounds {
    pub attribute: Attribute,
    pub min: f64,
    pub max: f64,
}

/// Everything a client needs to draw the filter controls
#[derive(Debug, Clone, Serialize)]
pub struct ControlsResponse {
    pub species: Vec<String>,
    pub numeric_columns: Vec<Attribute>,
    pub bounds: Vec<AttributeBounds>,
    pub total_rows: usize,
}

/// Metric tiles
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTiles {
    pub row_count: usize,
    pub category_count: usize,
    pub y_axis: Attribute,
    /// `null` when no rows survive the filter
    pub mean_y: f64,
    pub mean_y_display: String,
}

/// One line of the descriptive-statistics table
#[derive(Debug, Clone, Serialize)]
pub struct DescribeEntry {
    #[serde(flatten)]
    pub values: DescribeRow,
    pub display: Vec<DisplayCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayCell {
    pub label: &'static str,
    pub value: String,
}

impl From<&DescribeRow> for DescribeEntry {
    fn from(row: &DescribeRow) -> Self {
        DescribeEntry {
            values: row.clone(),
            display: DESCRIBE_LABELS
                .iter()
                .zip(row.formatted())
                .map(|(&label, value)| DisplayCell { label, value })
                .collect(),
        }
    }
}

/// Full result of one explore request
#[derive(Debug, Clone, Serialize)]
pub struct ExploreResponse {
    pub filter: FilterSpec,
    pub summary: SummaryTiles,
    pub describe: Vec<DescribeEntry>,
    pub charts: ChartSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<Record>>,
}

impl ExploreResponse {
    pub fn new(filter: FilterSpec, stats: &SummaryStats, charts: ChartSet, raw: Option<Vec<Record>>) -> Self {
        ExploreResponse {
            filter,
            summary: SummaryTiles {
                row_count: stats.row_count,
                category_count: stats.category_count,
                y_axis: stats.y_axis,
                mean_y: stats.mean_y,
                mean_y_display: format!("{:.2}", stats.mean_y),
            },
            describe: stats.describe.iter().map(DescribeEntry::from).collect(),
            charts,
            raw,
        }
    }
}
