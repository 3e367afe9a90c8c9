//! CSV loading for city trip data.
//!
//! Reads a city's source CSV into an in-memory [`TripTable`], parsing the
//! start/end timestamps and attaching the derived month and weekday names
//! that the filter engine matches against. Loading is fail-fast: the first
//! malformed record aborts the load with a [`DataError`].

use std::fs::File;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{City, CityData};
use crate::error::DataError;
use crate::filter::{self, FilterSelection};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A trip row exactly as it appears in the source CSV. Gender and Birth
/// Year columns exist for Chicago and New York only; the csv crate leaves
/// the `Option` fields as `None` when the column is absent or empty.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: String,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // Stored as a float in the source files, e.g. "1992.0".
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// One bicycle rental event, with the month and weekday names derived from
/// the start timestamp at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_secs: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: String,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    pub month_name: String,
    pub weekday_name: String,
}

/// An ordered, in-memory table of trip records for one city, plus the
/// schema-presence flags for the two optional columns.
#[derive(Debug, Clone)]
pub struct TripTable {
    pub city: City,
    pub has_gender: bool,
    pub has_birth_year: bool,
    pub records: Vec<TripRecord>,
}

impl TripTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads every record from a city's source CSV.
///
/// # Errors
///
/// Returns [`DataError::Io`] if the file cannot be opened,
/// [`DataError::Csv`] for a malformed row, and [`DataError::Timestamp`]
/// for an unparseable start or end timestamp.
pub fn load(config: &CityData, city: City) -> Result<TripTable, DataError> {
    let path = config.path(city);

    let file = File::open(&path).map_err(|source| DataError::Io {
        path: path.clone(),
        source,
    })?;
    let mut rdr = csv::Reader::from_reader(file);

    // Schema introspection up front, so the user aggregator can tell
    // "column absent for this city" apart from "no values in this filter".
    let headers = rdr.headers().map_err(|source| DataError::Csv {
        path: path.clone(),
        source,
    })?;
    let has_gender = headers.iter().any(|h| h == "Gender");
    let has_birth_year = headers.iter().any(|h| h == "Birth Year");

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let raw: RawTrip = result.map_err(|source| DataError::Csv {
            path: path.clone(),
            source,
        })?;
        records.push(parse_record(raw)?);
    }

    debug!(city = %city, rows = records.len(), has_gender, has_birth_year, "Loaded trip table");

    Ok(TripTable {
        city,
        has_gender,
        has_birth_year,
        records,
    })
}

/// The core-to-shell entry point: load a city's table, then narrow it to
/// the requested month and weekday.
pub fn load_and_filter(
    config: &CityData,
    selection: &FilterSelection,
) -> Result<TripTable, DataError> {
    let table = load(config, selection.city)?;
    Ok(filter::apply(&table, selection))
}

fn parse_record(raw: RawTrip) -> Result<TripRecord, DataError> {
    let start_time = parse_timestamp(&raw.start_time)?;
    let end_time = parse_timestamp(&raw.end_time)?;

    Ok(TripRecord {
        month_name: start_time.format("%B").to_string(),
        weekday_name: start_time.format("%A").to_string(),
        start_time,
        end_time,
        duration_secs: raw.trip_duration,
        start_station: raw.start_station,
        end_station: raw.end_station,
        user_type: raw.user_type,
        gender: raw.gender.filter(|g| !g.is_empty()),
        birth_year: raw.birth_year.map(|y| y as i32),
    })
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DataError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        DataError::Timestamp {
            value: value.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_data_dir(name: &str, chicago_csv: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("bikeshare_loader_{}", name));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("chicago.csv"), chicago_csv).unwrap();
        dir
    }

    const FULL_SCHEMA: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-06-05 08:15:00,2017-06-05 08:25:00,600,Streeter Dr & Grand Ave,Clinton St & Washington Blvd,Subscriber,Male,1989.0
2017-01-03 17:40:00,2017-01-03 17:49:00,540,Canal St & Adams St,Michigan Ave & Oak St,Customer,,
";

    #[test]
    fn test_load_derives_month_and_weekday() {
        let dir = temp_data_dir("derive", FULL_SCHEMA);
        let table = load(&CityData::new(&dir), City::Chicago).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].month_name, "June");
        assert_eq!(table.records[0].weekday_name, "Monday");
        assert_eq!(table.records[1].month_name, "January");
        assert_eq!(table.records[1].weekday_name, "Tuesday");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_parses_optional_fields() {
        let dir = temp_data_dir("optional", FULL_SCHEMA);
        let table = load(&CityData::new(&dir), City::Chicago).unwrap();

        assert!(table.has_gender);
        assert!(table.has_birth_year);
        assert_eq!(table.records[0].gender.as_deref(), Some("Male"));
        assert_eq!(table.records[0].birth_year, Some(1989));
        // Empty cells deserialize to None
        assert_eq!(table.records[1].gender, None);
        assert_eq!(table.records[1].birth_year, None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_detects_missing_columns() {
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-06-05 08:15:00,2017-06-05 08:25:00,600,Lincoln Memorial,Jefferson Dr & 14th St SW,Subscriber
";
        let dir = temp_data_dir("missing_cols", csv);
        let table = load(&CityData::new(&dir), City::Chicago).unwrap();

        assert!(!table.has_gender);
        assert!(!table.has_birth_year);
        assert_eq!(table.records[0].gender, None);
        assert_eq!(table.records[0].birth_year, None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_fails_fast_on_bad_timestamp() {
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
not-a-timestamp,2017-06-05 08:25:00,600,Streeter Dr & Grand Ave,Canal St & Adams St,Subscriber,Male,1989.0
";
        let dir = temp_data_dir("bad_timestamp", csv);
        let err = load(&CityData::new(&dir), City::Chicago).unwrap_err();

        assert!(matches!(err, DataError::Timestamp { ref value, .. } if value == "not-a-timestamp"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let config = CityData::new("/nonexistent/bikeshare_data");
        let err = load(&config, City::Washington).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
