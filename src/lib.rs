// Iris Explorer
// Author: Gabriel Demetrios Lafis

//! # Iris Explorer
//!
//! An interactive exploration service for the Iris dataset.
//!
//! ## Features
//!
//! - Loads the published dataset once and caches it for the process lifetime
//! - Filters by species and by a closed range on the X axis
//! - Summary tiles and a descriptive-statistics table
//! - Scatter, histogram and box-plot series for the charts
//! - CSV export of the filtered rows
//! - HTTP API and command line front ends
//!
//! ## Example
//!
//! ```rust
//! use iris_explorer::{
//!     data::{decode, encode, Attribute},
//!     processing::{apply, summarize, CategorySelection, FilterSpec},
//! };
//!
//! let table = decode(b"sepal_length,sepal_width,petal_length,petal_width,species\n\
//!                      5.1,3.5,1.4,0.2,setosa\n\
//!                      7.0,3.2,4.7,1.4,versicolor\n").unwrap();
//!
//! let spec = FilterSpec::unrestricted(
//!     &table,
//!     CategorySelection::from("setosa"),
//!     Attribute::SepalLength,
//!     Attribute::PetalLength,
//! );
//!
//! let filtered = apply(&table, &spec);
//! let stats = summarize(&filtered, spec.y_axis);
//! assert_eq!(stats.row_count, 1);
//! assert_eq!(stats.category_count, 1);
//!
//! let csv = encode(&filtered).unwrap();
//! assert_eq!(decode(&csv).unwrap(), filtered);
//! ```

pub mod api;
pub mod data;
pub mod processing;
pub mod storage;
pub mod utils;

// Re-export main types
pub use api::Server;
pub use data::{Attribute, Record, Table};
pub use processing::{FilterSpec, SummaryStats};
pub use storage::DatasetLoader;
pub use utils::Config;
