//! Loading a load sequence from a delimited text file.
use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::error::{CountResult, CountingError};

/// Where the load sequence lives and how to read it.
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceSource {
    pub path: String,
    /// Column holding the sequence. Required when rows have several fields.
    #[serde(default)]
    pub column: Option<usize>,
    /// Whether the first row is a header.
    #[serde(default)]
    pub header: bool,
    #[serde(default = "SequenceSource::default_delimiter")]
    pub delimiter: String,
}

impl SequenceSource {
    fn default_delimiter() -> String {
        ",".to_string()
    }

    pub fn validate(&self) -> CountResult<()> {
        if self.path.trim().is_empty() {
            return Err(CountingError::invalid("sequence path must not be empty"));
        }
        if self.delimiter.len() != 1 {
            return Err(CountingError::invalid(format!(
                "delimiter must be a single byte, got {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// Reads the configured file.
    pub fn read_sequence(&self) -> Result<Vec<f64>> {
        self.validate()?;
        let path = Path::new(&self.path);
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open sequence file {}", path.display()))?;
        self.read_from(file)
            .with_context(|| format!("failed to read sequence file {}", path.display()))
    }

    /// Reads a sequence from any reader using this source's layout.
    pub fn read_from<R: io::Read>(&self, reader: R) -> Result<Vec<f64>> {
        let delimiter = self.delimiter.as_bytes().first().copied().unwrap_or(b',');
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.header)
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut sequence = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let column = match self.column {
                Some(column) => column,
                None if record.len() > 1 => {
                    return Err(CountingError::invalid(format!(
                        "row {} has {} fields, the sequence must be one-dimensional; set `column`",
                        row + 1,
                        record.len()
                    ))
                    .into());
                }
                None => 0,
            };
            let field = record
                .get(column)
                .ok_or_else(|| anyhow!("row {} has no column {}", row + 1, column))?;
            let value: f64 = field
                .parse()
                .with_context(|| format!("row {}: {:?} is not a number", row + 1, field))?;
            sequence.push(value);
        }
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(column: Option<usize>, header: bool) -> SequenceSource {
        SequenceSource {
            path: "unused".into(),
            column,
            header,
            delimiter: ",".into(),
        }
    }

    #[test]
    fn test_read_single_column() {
        let data = "-2\n1\n-3\n5\n";
        let seq = source(None, false).read_from(data.as_bytes()).unwrap();
        assert_eq!(seq, vec![-2.0, 1.0, -3.0, 5.0]);
    }

    #[test]
    fn test_read_selected_column_with_header() {
        let data = "time,load\n0.0, 1.5\n0.1, -2.5\n";
        let seq = source(Some(1), true).read_from(data.as_bytes()).unwrap();
        assert_eq!(seq, vec![1.5, -2.5]);
    }

    #[test]
    fn test_multi_column_needs_selection() {
        let data = "0.0,1.5\n0.1,-2.5\n";
        let err = source(None, false).read_from(data.as_bytes()).unwrap_err();
        assert!(err.downcast_ref::<CountingError>().is_some());
    }

    #[test]
    fn test_bad_number() {
        assert!(source(None, false).read_from("1.0\nabc\n".as_bytes()).is_err());
    }

    #[test]
    fn test_read_fixture() {
        let src = SequenceSource {
            path: "tests/data/astm_rainflow.csv".into(),
            column: None,
            header: true,
            delimiter: ",".into(),
        };
        let seq = src.read_sequence().unwrap();
        assert_eq!(seq, vec![-2.0, 1.0, -3.0, 5.0, -1.0, 3.0, -4.0, 4.0, -2.0]);
    }
}
