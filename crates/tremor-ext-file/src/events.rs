//! CSV event calendar source.

use std::io::Read;
use std::path::{Path, PathBuf};

use tremor_core::events::{EventSource, RawEvent, RawEventBatch};
use tremor_core::{TremorError, TremorResult};

use crate::csv_error;

enum Input {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Reads an events CSV with a header row.
///
/// Columns are matched by name; extra columns are ignored and missing
/// required columns are reported by [`tremor_core::EventStore::load`].
pub struct EventCsvSource {
    name: String,
    input: Input,
}

impl EventCsvSource {
    /// Source backed by a file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            name: path.display().to_string(),
            input: Input::Path(path.to_path_buf()),
        }
    }

    /// Source backed by any reader, consumed eagerly.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::Io` if the reader fails.
    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> TremorResult<Self> {
        let name = name.into();
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| TremorError::io(name.clone(), e))?;
        Ok(Self {
            name,
            input: Input::Bytes(bytes),
        })
    }

    fn read_from<R: Read>(&self, reader: R) -> TremorResult<RawEventBatch> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers().map_err(|e| csv_error(&self.name, &e))?.clone();
        let columns = headers.iter().map(str::to_string).collect();

        let mut records = Vec::new();
        for result in csv.records() {
            let record = result.map_err(|e| csv_error(&self.name, &e))?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let mut raw: RawEvent = record
                .deserialize(Some(&headers))
                .map_err(|e| csv_error(&self.name, &e))?;
            raw.line = line;
            records.push(raw);
        }

        Ok(RawEventBatch { columns, records })
    }
}

impl EventSource for EventCsvSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn read(&mut self) -> TremorResult<RawEventBatch> {
        match &self.input {
            Input::Path(path) => {
                let file = std::fs::File::open(path).map_err(|e| TremorError::io(self.name.clone(), e))?;
                self.read_from(file)
            }
            Input::Bytes(bytes) => self.read_from(bytes.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_core::EventStore;

    fn load(text: &str) -> TremorResult<EventStore> {
        EventStore::load(&mut EventCsvSource::from_reader("events.csv", text.as_bytes())?)
    }

    #[test]
    fn test_loads_and_sorts() {
        let store = load(
            "event_name,date,country,actual,forecast,previous\n\
             NFP,2024-01-05,US,216,170,173\n\
             CPI,2024-01-11T08:30:00,US,3.4,3.2,\n\
             CPI,2023-12-12,US,n/a,3.1,3.2\n",
        )
        .unwrap();

        let names: Vec<(&str, String)> = store.iter().map(|e| (e.name.as_str(), e.date.to_string())).collect();
        assert_eq!(
            names,
            vec![
                ("CPI", "2023-12-12".to_string()),
                ("CPI", "2024-01-11".to_string()),
                ("NFP", "2024-01-05".to_string()),
            ]
        );
        assert_eq!(store.events()[0].actual, None);
        assert_eq!(store.events()[1].previous, None);
        assert_eq!(store.events()[2].actual, Some(216.0));
    }

    #[test]
    fn test_missing_columns_named() {
        let err = load("event_name,when\nCPI,2024-01-11\n").unwrap_err();
        assert_eq!(
            err,
            TremorError::schema("events.csv", vec!["date".into(), "country".into()])
        );
    }

    #[test]
    fn test_empty_required_value_has_line() {
        let err = load("event_name,date,country\nCPI,2024-01-11,US\nNFP,,US\n").unwrap_err();
        assert_eq!(err, TremorError::missing_value("events.csv", "date", 3));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let err = load("event_name,date,country\nCPI,11/01/2024,US\n").unwrap_err();
        assert_eq!(err, TremorError::parse("events.csv", Some(2), "date", "11/01/2024"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut source = EventCsvSource::from_path("/nonexistent/events.csv");
        assert!(matches!(EventStore::load(&mut source), Err(TremorError::Io { .. })));
    }
}
