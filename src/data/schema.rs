// Schema normalization and validation
// Author: Gabriel Demetrios Lafis

use ::csv::StringRecord;

use super::{Attribute, DataError, Record, SPECIES_COLUMN};

/// Column names of a normalized table, in output order
pub const COLUMNS: [&str; 5] = [
    "sepal_length",
    "sepal_width",
    "petal_length",
    "petal_width",
    SPECIES_COLUMN,
];

/// Normalize a raw column name: trim, lowercase, spaces to underscores
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Schema validator for ensuring raw data conforms to the Iris schema
pub struct SchemaValidator;

impl SchemaValidator {
    /// Normalize every header and capitalize the species column
    pub fn normalize_headers(headers: &StringRecord) -> Vec<String> {
        headers
            .iter()
            .map(normalize_column_name)
            .map(|name| {
                if name == "species" {
                    SPECIES_COLUMN.to_string()
                } else {
                    name
                }
            })
            .collect()
    }

    /// Validate a record against the schema invariants
    pub fn validate_record(record: &Record, line: usize) -> Result<(), DataError> {
        for attr in Attribute::ALL {
            if !record.value(attr).is_finite() {
                return Err(DataError::SchemaViolation(format!(
                    "Row {}: '{}' is not a finite number", line, attr
                )));
            }
        }

        if record.species.trim().is_empty() {
            return Err(DataError::SchemaViolation(format!(
                "Row {}: '{}' cannot be empty", line, SPECIES_COLUMN
            )));
        }

        if record.species != record.species.trim() {
            return Err(DataError::SchemaViolation(format!(
                "Row {}: '{}' has surrounding whitespace in '{}'",
                line, SPECIES_COLUMN, record.species
            )));
        }

        Ok(())
    }
}

/// Positions of the schema columns within a raw CSV header
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    numeric: [usize; 4],
    species: usize,
}

impl ColumnMap {
    /// Locate every schema column among normalized headers.
    ///
    /// Extra columns are ignored; a missing one is a schema violation.
    pub fn resolve(headers: &[String]) -> Result<Self, DataError> {
        let position = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                DataError::SchemaViolation(format!(
                    "Column '{}' not found (columns: {})",
                    name,
                    headers.join(", ")
                ))
            })
        };

        let mut numeric = [0; 4];
        for (slot, attr) in numeric.iter_mut().zip(Attribute::ALL) {
            *slot = position(attr.name())?;
        }

        Ok(ColumnMap {
            numeric,
            species: position(SPECIES_COLUMN)?,
        })
    }

    /// Build a typed record from a raw CSV row
    pub fn record(&self, row: &StringRecord, line: usize) -> Result<Record, DataError> {
        let mut values = [0.0; 4];
        for ((value, &idx), attr) in values.iter_mut().zip(&self.numeric).zip(Attribute::ALL) {
            let raw = row.get(idx).unwrap_or("").trim();
            *value = raw.parse::<f64>().map_err(|_| {
                DataError::SchemaViolation(format!(
                    "Row {}: '{}' has non-numeric value '{}'", line, attr, raw
                ))
            })?;
        }

        let species = row.get(self.species).unwrap_or("").trim();
        let record = Record::new(values[0], values[1], values[2], values[3], species);
        SchemaValidator::validate_record(&record, line)?;

        Ok(record)
    }
}
