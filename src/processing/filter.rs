// Filter engine: category and range predicates over the Iris table
// Author: Gabriel Demetrios Lafis

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::data::{Attribute, DataError, Record, Table, ALL_CATEGORIES};
use crate::utils::clamp_range;
use super::{Pipeline, ProcessorType, TableProcessor};

/// Category constraint of a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelection {
    All,
    Only(String),
}

impl CategorySelection {
    pub fn as_str(&self) -> &str {
        match self {
            CategorySelection::All => ALL_CATEGORIES,
            CategorySelection::Only(name) => name,
        }
    }
}

impl From<&str> for CategorySelection {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategorySelection::All
        } else {
            CategorySelection::Only(value.to_string())
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategorySelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Current predicate state: category constraint, analysed axes and the
/// closed range applied to the X axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    pub category: CategorySelection,
    pub x_axis: Attribute,
    pub y_axis: Attribute,
    pub range: (f64, f64),
}

impl FilterSpec {
    /// Create a new filter spec
    pub fn new(
        category: CategorySelection,
        x_axis: Attribute,
        y_axis: Attribute,
        range: (f64, f64),
    ) -> Self {
        FilterSpec {
            category,
            x_axis,
            y_axis,
            range,
        }
    }

    /// Spec whose range covers the full extent of the X axis in `table`
    pub fn unrestricted(
        table: &Table,
        category: CategorySelection,
        x_axis: Attribute,
        y_axis: Attribute,
    ) -> Self {
        let range = table
            .bounds(x_axis)
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));

        Self::new(category, x_axis, y_axis, range)
    }

    /// Clamp the range into the X axis bounds of `table`
    pub fn clamped(mut self, table: &Table) -> Self {
        if let Some(bounds) = table.bounds(self.x_axis) {
            self.range = clamp_range(self.range, bounds);
        }
        self
    }

    /// Build the processing pipeline for this spec
    pub fn pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::new("explore");

        if let CategorySelection::Only(name) = &self.category {
            pipeline = pipeline.add(FilterProcessor::category_equals(name));
        }

        pipeline.add(FilterProcessor::between(self.x_axis, self.range.0, self.range.1))
    }
}

/// Raw user selections, as they arrive from a query string or CLI flags
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSelection {
    pub species: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
}

impl FilterSelection {
    /// Resolve selections against the loaded table.
    ///
    /// Missing values fall back to the selector defaults: all species, the
    /// first numeric attribute on both axes and the full X range. Supplied
    /// bounds are clamped into the X range.
    pub fn resolve(&self, table: &Table) -> Result<FilterSpec, DataError> {
        let parse_axis = |value: &Option<String>| match value.as_deref() {
            Some(name) => name.parse::<Attribute>(),
            None => Ok(Attribute::ALL[0]),
        };

        let x_axis = parse_axis(&self.x_axis)?;
        let y_axis = parse_axis(&self.y_axis)?;
        let category = self
            .species
            .as_deref()
            .map(CategorySelection::from)
            .unwrap_or(CategorySelection::All);

        let mut spec = FilterSpec::unrestricted(table, category, x_axis, y_axis);
        if let Some(lo) = self.x_min {
            spec.range.0 = lo;
        }
        if let Some(hi) = self.x_max {
            spec.range.1 = hi;
        }

        Ok(spec.clamped(table))
    }
}

/// Filter records based on a predicate
pub struct FilterProcessor {
    name: String,
    predicate: Box<dyn Fn(&Record) -> bool>,
}

impl FilterProcessor {
    /// Create a new filter processor with a predicate function
    pub fn new<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + 'static,
    {
        FilterProcessor {
            name: name.to_string(),
            predicate: Box::new(predicate),
        }
    }

    /// Keep records whose species equals `species` exactly
    pub fn category_equals(species: &str) -> Self {
        let species = species.to_string();
        Self::new(
            &format!("species_equals_{}", species),
            move |record| record.species == species,
        )
    }

    /// Keep records with `lo <= value <= hi` on `attr`
    pub fn between(attr: Attribute, lo: f64, hi: f64) -> Self {
        Self::new(
            &format!("{}_between", attr),
            move |record| {
                let value = record.value(attr);
                lo <= value && value <= hi
            },
        )
    }
}

impl TableProcessor for FilterProcessor {
    fn process(&self, input: &Table) -> Table {
        let records = input
            .iter()
            .filter(|record| (self.predicate)(record))
            .cloned()
            .collect();

        Table::from_validated(records)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Filter
    }
}

/// Apply a filter spec to a table, producing a new table in the original order
pub fn apply(table: &Table, spec: &FilterSpec) -> Table {
    spec.pipeline().execute(table)
}
