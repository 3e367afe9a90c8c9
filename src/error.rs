use std::path::PathBuf;

use thiserror::Error;

/// Errors that can surface while loading city trip data.
///
/// Missing optional columns and empty filter results are not errors; they
/// are represented as typed "no data" states in the report structs.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("unknown city {city:?}")]
    UnknownCity { city: String },

    #[error("failed to read source data at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unparseable timestamp {value:?}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::format::ParseError,
    },
}
