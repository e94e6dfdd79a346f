// API routes configuration
// Author: Gabriel Demetrios Lafis

use actix_web::web;

use super::{handlers, ApiError};

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed query strings get the same JSON error body as handler errors
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

    cfg.service(
        web::scope("/api/v1")
            .app_data(query_config)
            .route("/health", web::get().to(handlers::health_check))
            .route("/controls", web::get().to(handlers::controls))
            .route("/explore", web::get().to(handlers::explore))
            .route("/export", web::get().to(handlers::export)),
    );
}
