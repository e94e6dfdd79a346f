// Data module for the Iris table model, its sources and its CSV codec
// Author: Gabriel Demetrios Lafis

mod csv;
mod schema;
mod source;

pub use self::csv::*;
pub use self::schema::*;
pub use self::source::*;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the categorical column after normalization
pub const SPECIES_COLUMN: &str = "Species";

/// Category option meaning "no category constraint"
pub const ALL_CATEGORIES: &str = "All";

/// Represents a source the raw dataset text can be fetched from
pub trait DataSource: Send + Sync {
    /// Fetch the raw CSV text
    fn fetch(&self) -> BoxFuture<'_, Result<String, DataError>>;

    /// Get the source name
    fn name(&self) -> &str;

    /// Get the source type
    fn source_type(&self) -> SourceType;
}

/// Represents a source type
#[derive(Debug, Clone, PartialEq)]
pub enum SourceType {
    File,
    Http,
    Custom(String),
}

/// One of the four numeric measurements of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Attribute {
    /// All numeric attributes in column order
    pub const ALL: [Attribute; 4] = [
        Attribute::SepalLength,
        Attribute::SepalWidth,
        Attribute::PetalLength,
        Attribute::PetalWidth,
    ];

    /// Normalized column name
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::SepalLength => "sepal_length",
            Attribute::SepalWidth => "sepal_width",
            Attribute::PetalLength => "petal_length",
            Attribute::PetalWidth => "petal_width",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.name() == s)
            .ok_or_else(|| DataError::UnknownAttribute(s.to_string()))
    }
}

/// Represents one row of the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
    #[serde(rename = "Species")]
    pub species: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        sepal_length: f64,
        sepal_width: f64,
        petal_length: f64,
        petal_width: f64,
        species: &str,
    ) -> Self {
        Record {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
            species: species.to_string(),
        }
    }

    /// Get the value of a numeric attribute
    pub fn value(&self, attr: Attribute) -> f64 {
        match attr {
            Attribute::SepalLength => self.sepal_length,
            Attribute::SepalWidth => self.sepal_width,
            Attribute::PetalLength => self.petal_length,
            Attribute::PetalWidth => self.petal_width,
        }
    }
}

/// Ordered, immutable collection of records sharing the fixed schema.
///
/// Every record in a table satisfies the schema invariants checked by
/// [`SchemaValidator::validate_record`]: finite measurements and a non-empty,
/// trimmed species label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Create a table, validating every record
    pub fn new(records: Vec<Record>) -> Result<Self, DataError> {
        for (i, record) in records.iter().enumerate() {
            SchemaValidator::validate_record(record, i + 1)?;
        }

        Ok(Table { records })
    }

    /// Build a table from records already known to be valid
    pub(crate) fn from_validated(records: Vec<Record>) -> Self {
        Table { records }
    }

    /// Get the number of records in the table
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a reference to a record by index
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Values of one numeric attribute, in table order
    pub fn column(&self, attr: Attribute) -> Vec<f64> {
        self.records.iter().map(|r| r.value(attr)).collect()
    }

    /// Minimum and maximum of an attribute, `None` for an empty table
    pub fn bounds(&self, attr: Attribute) -> Option<(f64, f64)> {
        let mut values = self.records.iter().map(|r| r.value(attr));
        let first = values.next()?;

        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Sorted distinct species labels
    pub fn categories(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.species.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Options for the category selector: "All" followed by the sorted species
    pub fn category_options(&self) -> Vec<String> {
        let mut options = vec![ALL_CATEGORIES.to_string()];
        options.extend(self.categories());
        options
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Schema violation: {0}")]
    SchemaViolation(String),
    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
