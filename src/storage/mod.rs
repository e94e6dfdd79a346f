// Storage module: the process-wide in-memory dataset cache
// Author: Gabriel Demetrios Lafis

mod cache;

pub use cache::*;
