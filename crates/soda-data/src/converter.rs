//! Converters for non-JSON upload formats.
//!
//! SODA only accepts JSON, but callers may hold data in other formats. A
//! [`Converter`] produces a JSON string from its internal representation;
//! [`CsvConverter`] is the built-in CSV implementation. Custom formats plug in
//! by implementing the trait.

use std::path::Path;

use soda_client::{Error, ErrorKind, Result};

/// Produce a JSON string from a non-JSON data format.
pub trait Converter {
    /// Convert the held data into a JSON string ready for upload.
    fn to_json(&self) -> Result<String>;
}

/// Converts CSV text into a JSON array of objects.
///
/// The first row is the header; every following row becomes one JSON object
/// keyed by the header's column names, in row order.
///
/// # Example
///
/// ```rust
/// use soda_data::{Converter, CsvConverter};
///
/// let csv = CsvConverter::new("name,count\nfoo,1\nbar,2");
/// let json = csv.to_json().unwrap();
/// assert_eq!(json, r#"[{"name":"foo","count":"1"},{"name":"bar","count":"2"}]"#);
/// ```
#[derive(Debug, Clone)]
pub struct CsvConverter {
    data: String,
}

impl CsvConverter {
    /// Create a converter from CSV text.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Create a converter by reading CSV text from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(
                ErrorKind::Io(format!("could not open {}", path.display())),
                e,
            )
        })?;

        Ok(Self::new(data))
    }
}

impl Converter for CsvConverter {
    fn to_json(&self) -> Result<String> {
        let mut reader = csv::Reader::from_reader(self.data.trim().as_bytes());

        let headers = reader.headers().map_err(csv_error)?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;

            let mut row = serde_json::Map::with_capacity(headers.len());
            for (column, field) in headers.iter().zip(record.iter()) {
                row.insert(
                    column.to_string(),
                    serde_json::Value::String(field.to_string()),
                );
            }

            rows.push(serde_json::Value::Object(row));
        }

        serde_json::to_string(&rows).map_err(Into::into)
    }
}

fn csv_error(err: csv::Error) -> Error {
    Error::with_source(ErrorKind::InvalidPayload(err.to_string()), err)
}
