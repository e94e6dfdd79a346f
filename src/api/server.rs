// API server implementation
// Author: Gabriel Demetrios Lafis

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use crate::storage::DatasetLoader;
use crate::utils::Config;
use super::{routes, AppState};

/// API server configuration
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub enable_cors: bool,
    pub histogram_bins: usize,
}

impl ServerConfig {
    /// Build from application configuration
    pub fn from_config(config: &Config) -> Self {
        ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            workers: config.workers(),
            enable_cors: config.server.enable_cors,
            histogram_bins: config.charts.histogram_bins,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig::from_config(&Config::default())
    }
}

/// API server
pub struct Server {
    config: ServerConfig,
    loader: Arc<DatasetLoader>,
}

impl Server {
    /// Create a new API server
    pub fn new(loader: Arc<DatasetLoader>, config: ServerConfig) -> Self {
        Server { config, loader }
    }

    /// Run the API server
    pub async fn run(&self) -> io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port)
            .parse::<SocketAddr>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let state = web::Data::new(AppState::new(
            Arc::clone(&self.loader),
            self.config.histogram_bins,
        ));
        let enable_cors = self.config.enable_cors;

        info!(
            "Starting server at http://{} ({} workers, dataset: {})",
            addr,
            self.config.workers,
            self.loader.source_name()
        );

        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600)
            } else {
                Cors::default()
            };

            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .configure(routes::configure)
        })
        .workers(self.config.workers)
        .bind(addr)?
        .run()
        .await
    }
}
