// Utility module: configuration, logging, errors and validation
// Author: Gabriel Demetrios Lafis

mod config;
mod error;
mod logging;
mod validation;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use validation::*;
