//! Interactive prompt loops: filter selection, the paginated raw-data
//! viewer, and the restart loop.
//!
//! Input validation happens here, against the closed city/month/day
//! vocabularies; the core only ever sees vetted selections. All functions
//! are generic over `BufRead`/`Write` so the loops can be unit-tested
//! with in-memory cursors.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use bikeshare_explorer::config::{City, CityData};
use bikeshare_explorer::filter::{DayFilter, FilterSelection, MonthFilter};
use bikeshare_explorer::loader::{self, TripRecord, TripTable};
use bikeshare_explorer::output;
use bikeshare_explorer::stats::{DurationStats, StationStats, TimeStats, UserStats};

/// Only the first six months have published data.
pub const MONTHS: [&str; 6] = ["January", "February", "March", "April", "May", "June"];

pub const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const RAW_PAGE_SIZE: usize = 5;

/// Validates a month input: "all", or an unambiguous abbreviation of at
/// least three characters (so "Jun" is accepted, "Ma" is not).
pub fn month_filter_from_input(input: &str) -> Option<MonthFilter> {
    vocab_filter(input, &MONTHS).map(|f| match f {
        None => MonthFilter::All,
        Some(s) => MonthFilter::Month(s),
    })
}

/// Same validation rule as months, over the weekday vocabulary.
pub fn day_filter_from_input(input: &str) -> Option<DayFilter> {
    vocab_filter(input, &DAYS).map(|f| match f {
        None => DayFilter::All,
        Some(s) => DayFilter::Day(s),
    })
}

/// `Some(None)` means "all"; `Some(Some(input))` a valid concrete value.
fn vocab_filter(input: &str, vocab: &[&str]) -> Option<Option<String>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Some(None);
    }
    if input.len() < 3 {
        return None;
    }
    let matches = vocab
        .iter()
        .filter(|name| bikeshare_explorer::filter::matches_prefix(name, input))
        .count();
    if matches == 1 {
        Some(Some(input.to_string()))
    } else {
        None
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<String> {
    writeln!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}

fn prompt_yes_no<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<bool> {
    let answer = prompt(input, out, message)?;
    Ok(answer.eq_ignore_ascii_case("yes"))
}

/// Asks for city, month, and day, reprompting until each is valid.
pub fn get_filters<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<FilterSelection> {
    let city = loop {
        let answer = prompt(
            input,
            out,
            "\nEnter the city you would like to look at (Chicago, New York, or Washington):",
        )?;
        match answer.parse::<City>() {
            Ok(city) => break city,
            Err(_) => writeln!(
                out,
                "\nInvalid input.\nEnter one of \"Chicago\", \"New York\", or \"Washington\"."
            )?,
        }
    };

    let month = loop {
        let answer = prompt(
            input,
            out,
            "\nEnter the month you would like to look at (enter \"All\" to see all 6 months):",
        )?;
        match month_filter_from_input(&answer) {
            Some(month) => break month,
            None => writeln!(
                out,
                "\nInvalid input.\nEnter one of \"Jan\", \"Feb\", \"Mar\", \"Apr\", \"May\", \"Jun\", or \"All\"."
            )?,
        }
    };

    let day = loop {
        let answer = prompt(
            input,
            out,
            "\nEnter the day of the week you would like to look at (enter \"All\" to see data for all days):",
        )?;
        match day_filter_from_input(&answer) {
            Some(day) => break day,
            None => writeln!(
                out,
                "\nInvalid input.\nEnter one of \"Mon\", \"Tue\", \"Wed\", \"Thu\", \"Fri\", \"Sat\", \"Sun\", or \"All\"."
            )?,
        }
    };

    writeln!(out, "{}", output::SECTION_RULE)?;

    Ok(FilterSelection { city, month, day })
}

fn raw_line(record: &TripRecord) -> String {
    format!(
        "{}  {}  {:>6}s  {} -> {}  {}",
        record.start_time.format("%Y-%m-%d %H:%M:%S"),
        record.end_time.format("%Y-%m-%d %H:%M:%S"),
        record.duration_secs,
        record.start_station,
        record.end_station,
        record.user_type,
    )
}

/// Shows the filtered table five rows at a time, as long as the user
/// keeps answering "yes".
pub fn raw_data_pager<R: BufRead, W: Write>(
    table: &TripTable,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let mut offset = 0;
    while offset < table.len() {
        let more = prompt_yes_no(
            input,
            out,
            "\nWould you like to see 5 lines of raw data? Enter yes or no.",
        )?;
        if !more {
            return Ok(());
        }
        for record in table.records.iter().skip(offset).take(RAW_PAGE_SIZE) {
            writeln!(out, "{}", raw_line(record))?;
        }
        offset += RAW_PAGE_SIZE;
    }
    if table.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nNo more raw data to show.")?;
    Ok(())
}

/// One full session: prompt, load, report, page, and offer a restart.
/// Load failures are displayed and lead back to the restart prompt; only
/// I/O failures on the streams themselves abort the loop.
pub fn run<R: BufRead, W: Write>(config: &CityData, input: &mut R, out: &mut W) -> Result<()> {
    loop {
        writeln!(out, "Hello! Let's explore some US bikeshare data!")?;
        let selection = get_filters(input, out)?;
        info!(
            city = %selection.city,
            month = ?selection.month,
            day = ?selection.day,
            "Filters selected"
        );

        match loader::load_and_filter(config, &selection) {
            Ok(table) => {
                writeln!(out, "{}", output::render_time_stats(&TimeStats::from_table(&table)))?;
                writeln!(
                    out,
                    "{}",
                    output::render_station_stats(&StationStats::from_table(&table))
                )?;
                writeln!(
                    out,
                    "{}",
                    output::render_duration_stats(&DurationStats::from_table(&table))
                )?;
                writeln!(out, "{}", output::render_user_stats(&UserStats::from_table(&table)))?;
                raw_data_pager(&table, input, out)?;
            }
            Err(e) => {
                error!(error = %e, "Failed to load trip data");
                writeln!(out, "\nFailed to load trip data: {e}")?;
            }
        }

        if !prompt_yes_no(input, out, "\nWould you like to restart? Enter yes or no.")? {
            break;
        }
    }
    Ok(())
}

/// Builds a selection from already-collected CLI arguments, applying the
/// same vocabulary validation as the interactive prompts.
pub fn selection_from_args(city: &str, month: &str, day: &str) -> Result<FilterSelection> {
    let city = city.parse::<City>()?;
    let month = month_filter_from_input(month)
        .with_context(|| format!("invalid month {month:?} (expected Jan..Jun or \"all\")"))?;
    let day = day_filter_from_input(day)
        .with_context(|| format!("invalid day {day:?} (expected Mon..Sun or \"all\")"))?;
    Ok(FilterSelection { city, month, day })
}


#[cfg(test)]
mod shell_test_support {
    use bikeshare_explorer::config::City;
    use bikeshare_explorer::loader::{TripRecord, TripTable};
    use chrono::NaiveDateTime;

    pub fn table_of(rows: usize) -> TripTable {
        let start_time =
            NaiveDateTime::parse_from_str("2017-06-05 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let records = (0..rows)
            .map(|i| TripRecord {
                month_name: "June".to_string(),
                weekday_name: "Monday".to_string(),
                start_time,
                end_time: start_time,
                duration_secs: 300.0,
                start_station: format!("row-{i}"),
                end_station: "End".to_string(),
                user_type: "Subscriber".to_string(),
                gender: None,
                birth_year: None,
            })
            .collect();
        TripTable {
            city: City::Chicago,
            has_gender: false,
            has_birth_year: false,
            records,
        }
    }
}
