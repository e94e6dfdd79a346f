// Processing module: filtering, summary statistics and chart series
// Author: Gabriel Demetrios Lafis

mod chart;
mod filter;
mod stats;

pub use chart::*;
pub use filter::*;
pub use stats::*;

use crate::data::Table;

/// Represents a processor that derives a new table from an input table
pub trait TableProcessor {
    /// Process a table and return a new table
    fn process(&self, input: &Table) -> Table;

    /// Get the processor name
    fn name(&self) -> &str;

    /// Get the processor type
    fn processor_type(&self) -> ProcessorType;
}

/// Represents a processor type
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorType {
    Filter,
    Custom(String),
}

/// Pipeline for chaining multiple processors
pub struct Pipeline {
    name: String,
    processors: Vec<Box<dyn TableProcessor>>,
}

impl Pipeline {
    /// Create a new pipeline with the given name
    pub fn new(name: &str) -> Self {
        Pipeline {
            name: name.to_string(),
            processors: Vec::new(),
        }
    }

    /// Add a processor to the pipeline
    pub fn add<P: TableProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Names of the chained processors, in execution order
    pub fn stages(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Execute the pipeline on a table
    pub fn execute(&self, input: &Table) -> Table {
        let mut current = input.clone();

        for processor in &self.processors {
            current = processor.process(&current);
        }

        current
    }
}

impl TableProcessor for Pipeline {
    fn process(&self, input: &Table) -> Table {
        self.execute(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Custom("Pipeline".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Attribute, Record};

    #[test]
    fn test_pipeline_chains_processors_in_order() {
        let table = Table::new(vec![
            Record::new(5.1, 3.5, 1.4, 0.2, "setosa"),
            Record::new(6.4, 3.2, 4.5, 1.5, "versicolor"),
            Record::new(5.7, 4.4, 1.5, 0.4, "setosa"),
        ])
        .unwrap();

        let pipeline = Pipeline::new("test")
            .add(FilterProcessor::category_equals("setosa"))
            .add(FilterProcessor::between(Attribute::SepalWidth, 4.0, 5.0));

        let result = pipeline.process(&table);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0), table.get(2));
        assert_eq!(pipeline.name(), "test");
        assert_eq!(pipeline.processor_type(), ProcessorType::Custom("Pipeline".to_string()));
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let table = Table::new(vec![Record::new(5.1, 3.5, 1.4, 0.2, "setosa")]).unwrap();
        assert_eq!(Pipeline::new("noop").execute(&table), table);
        assert_eq!(
            FilterProcessor::category_equals("setosa").processor_type(),
            ProcessorType::Filter
        );
    }
}
