// API request handlers
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use log::debug;
use serde_json::json;

use crate::data::{Attribute, CsvExport, Table};
use crate::processing::{apply, summarize, ChartSet, FilterSpec};
use crate::storage::DatasetLoader;
use super::{models::*, ApiError};

/// Shared state of every worker
pub struct AppState {
    pub loader: Arc<DatasetLoader>,
    pub histogram_bins: usize,
}

impl AppState {
    pub fn new(loader: Arc<DatasetLoader>, histogram_bins: usize) -> Self {
        AppState {
            loader,
            histogram_bins,
        }
    }
}

/// Health check handler
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "dataset_loaded": state.loader.is_loaded(),
    }))
}

/// Selector options and slider bounds
pub async fn controls(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let table = state.loader.load().await?;

    let bounds = Attribute::ALL
        .iter()
        .filter_map(|&attr| {
            table
                .bounds(attr)
                .map(|(min, max)| AttributeBounds { attribute: attr, min, max })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ControlsResponse {
        species: table.category_options(),
        numeric_columns: Attribute::ALL.to_vec(),
        bounds,
        total_rows: table.len(),
    }))
}

/// Filter, summarize and chart the dataset for one set of selections
pub async fn explore(
    state: web::Data<AppState>,
    query: web::Query<ExploreQuery>,
) -> Result<HttpResponse, ApiError> {
    let table = state.loader.load().await?;
    let spec = resolve_spec(&table, &query)?;

    let filtered = apply(&table, &spec);
    let stats = summarize(&filtered, spec.y_axis);
    let charts = ChartSet::build(&filtered, &spec, state.histogram_bins);
    debug!(
        "explore species={} x={} range={:?}: {} of {} rows",
        spec.category,
        spec.x_axis,
        spec.range,
        filtered.len(),
        table.len()
    );

    let raw = query.show_raw.then(|| filtered.records().to_vec());

    Ok(HttpResponse::Ok().json(ExploreResponse::new(spec, &stats, charts, raw)))
}

/// Download the filtered rows as CSV
pub async fn export(
    state: web::Data<AppState>,
    query: web::Query<ExploreQuery>,
) -> Result<HttpResponse, ApiError> {
    let table = state.loader.load().await?;
    let spec = resolve_spec(&table, &query)?;

    let filtered = apply(&table, &spec);
    let export = CsvExport::from_table(&filtered)?;
    debug!("export {} rows ({} bytes)", filtered.len(), export.bytes.len());

    Ok(HttpResponse::Ok()
        .content_type(export.mime_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.file_name.to_string())],
        })
        .body(export.bytes))
}

fn resolve_spec(table: &Table, query: &ExploreQuery) -> Result<FilterSpec, ApiError> {
    query
        .selection()
        .resolve(table)
        .map_err(|err| ApiError::Validation(err.to_string()))
}
