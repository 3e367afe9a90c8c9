//! The four descriptive-statistics aggregators.
//!
//! Each report type is a pure function of the filtered table it receives,
//! built via `from_table`. Mode computations are order-stable: when two
//! values tie, the one first encountered in table iteration order wins.
//! Empty tables and schema-absent columns become typed "no data" states
//! rather than errors.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use chrono::Timelike;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::loader::TripTable;

/// Order-stable mode: the most frequent value, ties broken toward the
/// value seen first. `None` for empty input.
fn mode<T>(values: impl IntoIterator<Item = T>) -> Option<T>
where
    T: Eq + Hash + Clone,
{
    let values: Vec<T> = values.into_iter().collect();
    let counts = values.iter().counts();
    let max = counts.values().copied().max()?;
    values.iter().find(|v| counts[*v] == max).cloned()
}

/// Distinct values with their occurrence counts, most frequent first,
/// ties ordered by name for determinism.
fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let counts: HashMap<&str, usize> = values.into_iter().counts();
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// A per-city-optional analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldStats<T> {
    /// The source schema for this city has no such column.
    Missing,
    /// The column exists but the filtered table holds no usable values.
    Empty,
    Present(T),
}

/// Most frequent travel times over the filtered table.
#[derive(Debug, Serialize)]
pub struct TimeStats {
    pub common_month: Option<String>,
    pub common_day: Option<String>,
    pub common_hour: Option<u32>,
    pub elapsed_secs: f64,
}

impl TimeStats {
    pub fn from_table(table: &TripTable) -> Self {
        let started = Instant::now();

        let common_month =
            mode(table.records.iter().map(|r| r.month_name.as_str())).map(str::to_string);
        let common_day =
            mode(table.records.iter().map(|r| r.weekday_name.as_str())).map(str::to_string);
        let common_hour = mode(table.records.iter().map(|r| r.start_time.hour()));

        let elapsed_secs = started.elapsed().as_secs_f64();
        debug!(rows = table.len(), elapsed_secs, "Computed time stats");

        TimeStats {
            common_month,
            common_day,
            common_hour,
            elapsed_secs,
        }
    }
}

/// Most popular start station, end station, and (start, end) trip.
#[derive(Debug, Serialize)]
pub struct StationStats {
    pub common_start_station: Option<String>,
    pub common_end_station: Option<String>,
    /// The two station names joined with `"; "`.
    pub common_trip: Option<String>,
    pub elapsed_secs: f64,
}

impl StationStats {
    pub fn from_table(table: &TripTable) -> Self {
        let started = Instant::now();

        let common_start_station =
            mode(table.records.iter().map(|r| r.start_station.as_str())).map(str::to_string);
        let common_end_station =
            mode(table.records.iter().map(|r| r.end_station.as_str())).map(str::to_string);
        let common_trip = mode(
            table
                .records
                .iter()
                .map(|r| format!("{}; {}", r.start_station, r.end_station)),
        );

        let elapsed_secs = started.elapsed().as_secs_f64();
        debug!(rows = table.len(), elapsed_secs, "Computed station stats");

        StationStats {
            common_start_station,
            common_end_station,
            common_trip,
            elapsed_secs,
        }
    }
}

/// Total and mean trip duration, in seconds. Both are `None` for an empty
/// table; a mean is never computed by dividing by zero.
#[derive(Debug, Serialize)]
pub struct DurationStats {
    pub total_secs: Option<f64>,
    pub mean_secs: Option<f64>,
    pub elapsed_secs: f64,
}

impl DurationStats {
    pub fn from_table(table: &TripTable) -> Self {
        let started = Instant::now();

        let (total_secs, mean_secs) = if table.is_empty() {
            (None, None)
        } else {
            let total: f64 = table.records.iter().map(|r| r.duration_secs).sum();
            (Some(total), Some(total / table.len() as f64))
        };

        let elapsed_secs = started.elapsed().as_secs_f64();
        debug!(rows = table.len(), elapsed_secs, "Computed duration stats");

        DurationStats {
            total_secs,
            mean_secs,
            elapsed_secs,
        }
    }
}

/// Earliest, most recent, and most common rider birth year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider demographics. User-type counts are always available; gender and
/// birth year are probed against the city's schema rather than assumed.
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    pub genders: FieldStats<Vec<(String, usize)>>,
    pub birth_years: FieldStats<BirthYearStats>,
    pub elapsed_secs: f64,
}

impl UserStats {
    pub fn from_table(table: &TripTable) -> Self {
        let started = Instant::now();

        let user_types = value_counts(table.records.iter().map(|r| r.user_type.as_str()));

        let genders = if !table.has_gender {
            FieldStats::Missing
        } else {
            let counts = value_counts(table.records.iter().filter_map(|r| r.gender.as_deref()));
            if counts.is_empty() {
                FieldStats::Empty
            } else {
                FieldStats::Present(counts)
            }
        };

        let birth_years = if !table.has_birth_year {
            FieldStats::Missing
        } else {
            let years: Vec<i32> = table.records.iter().filter_map(|r| r.birth_year).collect();
            match (
                years.iter().min().copied(),
                years.iter().max().copied(),
                mode(years.iter().copied()),
            ) {
                (Some(earliest), Some(most_recent), Some(most_common)) => {
                    FieldStats::Present(BirthYearStats {
                        earliest,
                        most_recent,
                        most_common,
                    })
                }
                _ => FieldStats::Empty,
            }
        };

        let elapsed_secs = started.elapsed().as_secs_f64();
        debug!(rows = table.len(), elapsed_secs, "Computed user stats");

        UserStats {
            user_types,
            genders,
            birth_years,
            elapsed_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::City;
    use crate::loader::TripRecord;
    use chrono::NaiveDateTime;

    fn record(
        start: &str,
        duration: f64,
        stations: (&str, &str),
        user_type: &str,
        gender: Option<&str>,
        birth_year: Option<i32>,
    ) -> TripRecord {
        let start_time = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        TripRecord {
            month_name: start_time.format("%B").to_string(),
            weekday_name: start_time.format("%A").to_string(),
            start_time,
            end_time: start_time,
            duration_secs: duration,
            start_station: stations.0.to_string(),
            end_station: stations.1.to_string(),
            user_type: user_type.to_string(),
            gender: gender.map(str::to_string),
            birth_year,
        }
    }

    fn empty_table() -> TripTable {
        TripTable {
            city: City::Chicago,
            has_gender: true,
            has_birth_year: true,
            records: vec![],
        }
    }

    fn sample_table() -> TripTable {
        TripTable {
            city: City::Chicago,
            has_gender: true,
            has_birth_year: true,
            records: vec![
                record(
                    "2017-06-05 08:15:00",
                    600.0,
                    ("Streeter Dr & Grand Ave", "Streeter Dr & Grand Ave"),
                    "Subscriber",
                    Some("Male"),
                    Some(1989),
                ),
                record(
                    "2017-06-12 08:40:00",
                    540.0,
                    ("Streeter Dr & Grand Ave", "Streeter Dr & Grand Ave"),
                    "Customer",
                    Some("Female"),
                    Some(1992),
                ),
                record(
                    "2017-01-03 17:05:00",
                    660.0,
                    ("Canal St & Adams St", "Michigan Ave & Oak St"),
                    "Subscriber",
                    Some("Male"),
                    Some(1992),
                ),
            ],
        }
    }

    #[test]
    fn test_mode_ties_break_toward_first_seen() {
        assert_eq!(mode(["b", "a", "a", "b"]), Some("b"));
        assert_eq!(mode(["a", "b", "b", "a"]), Some("a"));
    }

    #[test]
    fn test_mode_empty_is_none() {
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_value_counts_sorts_by_frequency_then_name() {
        let counts = value_counts(["x", "y", "y", "z", "x"]);
        assert_eq!(
            counts,
            vec![
                ("x".to_string(), 2),
                ("y".to_string(), 2),
                ("z".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_time_stats() {
        let stats = TimeStats::from_table(&sample_table());
        assert_eq!(stats.common_month.as_deref(), Some("June"));
        assert_eq!(stats.common_day.as_deref(), Some("Monday"));
        assert_eq!(stats.common_hour, Some(8));
    }

    #[test]
    fn test_time_stats_empty_table() {
        let stats = TimeStats::from_table(&empty_table());
        assert_eq!(stats.common_month, None);
        assert_eq!(stats.common_day, None);
        assert_eq!(stats.common_hour, None);
    }

    #[test]
    fn test_station_stats_pair_uses_semicolon_delimiter() {
        let stats = StationStats::from_table(&sample_table());
        assert_eq!(
            stats.common_start_station.as_deref(),
            Some("Streeter Dr & Grand Ave")
        );
        assert_eq!(
            stats.common_trip.as_deref(),
            Some("Streeter Dr & Grand Ave; Streeter Dr & Grand Ave")
        );
    }

    #[test]
    fn test_station_stats_empty_table() {
        let stats = StationStats::from_table(&empty_table());
        assert_eq!(stats.common_start_station, None);
        assert_eq!(stats.common_end_station, None);
        assert_eq!(stats.common_trip, None);
    }

    #[test]
    fn test_duration_stats() {
        let stats = DurationStats::from_table(&sample_table());
        assert_eq!(stats.total_secs, Some(1800.0));
        assert_eq!(stats.mean_secs, Some(600.0));
    }

    #[test]
    fn test_duration_stats_empty_table_never_divides_by_zero() {
        let stats = DurationStats::from_table(&empty_table());
        assert_eq!(stats.total_secs, None);
        assert_eq!(stats.mean_secs, None);
    }

    #[test]
    fn test_user_stats() {
        let stats = UserStats::from_table(&sample_table());
        assert_eq!(
            stats.user_types,
            vec![("Subscriber".to_string(), 2), ("Customer".to_string(), 1)]
        );
        assert_eq!(
            stats.genders,
            FieldStats::Present(vec![("Male".to_string(), 2), ("Female".to_string(), 1)])
        );
        assert_eq!(
            stats.birth_years,
            FieldStats::Present(BirthYearStats {
                earliest: 1989,
                most_recent: 1992,
                most_common: 1992,
            })
        );
    }

    #[test]
    fn test_user_stats_missing_columns() {
        let mut table = sample_table();
        table.has_gender = false;
        table.has_birth_year = false;
        for r in &mut table.records {
            r.gender = None;
            r.birth_year = None;
        }

        let stats = UserStats::from_table(&table);
        assert_eq!(stats.user_types.len(), 2);
        assert_eq!(stats.genders, FieldStats::Missing);
        assert_eq!(stats.birth_years, FieldStats::Missing);
    }

    #[test]
    fn test_user_stats_present_column_with_no_values() {
        let mut table = sample_table();
        for r in &mut table.records {
            r.gender = None;
            r.birth_year = None;
        }

        let stats = UserStats::from_table(&table);
        assert_eq!(stats.genders, FieldStats::Empty);
        assert_eq!(stats.birth_years, FieldStats::Empty);
    }
}
