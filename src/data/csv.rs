// CSV decoding of the raw dataset and encoding of filtered exports
// Author: Gabriel Demetrios Lafis

use super::{ColumnMap, DataError, SchemaValidator, Table, COLUMNS};

/// Suggested file name for a filtered export
pub const EXPORT_FILE_NAME: &str = "iris_filtered.csv";

/// MIME type of a filtered export
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Decode CSV bytes into a table.
///
/// Headers go through the same normalization as the remote dataset, so both
/// the published file and our own exports decode through this path.
pub fn decode(bytes: &[u8]) -> Result<Table, DataError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = SchemaValidator::normalize_headers(reader.headers()?);
    let columns = ColumnMap::resolve(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        records.push(columns.record(&row, i + 1)?);
    }

    Ok(Table::from_validated(records))
}

/// Encode a table as UTF-8 CSV with a header line and no index column.
///
/// The header is always written, so an empty table encodes to the header
/// alone. Numbers use the shortest representation that parses back to the
/// same value.
pub fn encode(table: &Table) -> Result<Vec<u8>, DataError> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;

    for record in table {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|err| DataError::Io(err.into_error()))
}

/// Encoded export ready to be offered as a download
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    /// Encode a filtered table for download
    pub fn from_table(table: &Table) -> Result<Self, DataError> {
        Ok(CsvExport {
            file_name: EXPORT_FILE_NAME,
            mime_type: EXPORT_MIME_TYPE,
            bytes: encode(table)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    #[test]
    fn test_encode_empty_table_is_header_only() {
        let bytes = encode(&Table::default()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "sepal_length,sepal_width,petal_length,petal_width,Species\n"
        );
    }

    #[test]
    fn test_encode_keeps_full_precision() {
        let table = Table::new(vec![
            Record::new(5.0, 3.333333333333333, 1.4, 0.2, "setosa"),
        ])
        .unwrap();

        let text = String::from_utf8(encode(&table).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "5.0,3.333333333333333,1.4,0.2,setosa");
    }

    #[test]
    fn test_decode_normalizes_published_headers() {
        let raw = b" Sepal Length ,Sepal Width,Petal Length,Petal Width,Species\n5.1,3.5,1.4,0.2,setosa\n";
        let table = decode(raw).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some(&Record::new(5.1, 3.5, 1.4, 0.2, "setosa")));
    }

    #[test]
    fn test_decode_empty_input_is_schema_violation() {
        assert!(matches!(decode(b""), Err(DataError::SchemaViolation(_))));
    }

    #[test]
    fn test_export_metadata() {
        let export = CsvExport::from_table(&Table::default()).unwrap();
        assert_eq!(export.file_name, "iris_filtered.csv");
        assert_eq!(export.mime_type, "text/csv");
    }
}
