//! Report rendering for the four aggregators.
//!
//! Only the computed values are contractual; the text here aims to read
//! like the classic bikeshare explorer. Reports go to stdout (or the
//! shell's writer), never through the logger. JSON output is also
//! supported for non-interactive use.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;

use crate::stats::{DurationStats, FieldStats, StationStats, TimeStats, UserStats};

/// Separator printed between report sections.
pub const SECTION_RULE: &str = "----------------------------------------";

const NO_DATA: &str = "No trip data for this filter.";

/// Prints any report as pretty-printed JSON.
pub fn print_json<T: Serialize>(stats: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

pub fn render_time_stats(stats: &TimeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n");

    match (&stats.common_month, &stats.common_day, stats.common_hour) {
        (Some(month), Some(day), Some(hour)) => {
            let _ = writeln!(out, "Most common month: {month}");
            let _ = writeln!(out, "Most common day: {day}");
            let _ = writeln!(out, "Most common hour: {hour} o'clock");
        }
        _ => {
            let _ = writeln!(out, "{NO_DATA}");
        }
    }

    let _ = writeln!(out, "\nThis took {} seconds.", stats.elapsed_secs);
    out.push_str(SECTION_RULE);
    out
}

pub fn render_station_stats(stats: &StationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n");

    match (
        &stats.common_start_station,
        &stats.common_end_station,
        &stats.common_trip,
    ) {
        (Some(start), Some(end), Some(trip)) => {
            let _ = writeln!(out, "Most common start station: {start}");
            let _ = writeln!(out, "Most common end station: {end}");
            let _ = writeln!(out, "Most common trip: {trip}");
        }
        _ => {
            let _ = writeln!(out, "{NO_DATA}");
        }
    }

    let _ = writeln!(out, "\nThis took {} seconds.", stats.elapsed_secs);
    out.push_str(SECTION_RULE);
    out
}

pub fn render_duration_stats(stats: &DurationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nCalculating Trip Duration...\n");

    match (stats.total_secs, stats.mean_secs) {
        (Some(total), Some(mean)) => {
            let _ = writeln!(out, "Total travel time: {total} seconds");
            let _ = writeln!(out, "Average travel time: {mean:.2} seconds");
        }
        _ => {
            let _ = writeln!(out, "{NO_DATA}");
        }
    }

    let _ = writeln!(out, "\nThis took {} seconds.", stats.elapsed_secs);
    out.push_str(SECTION_RULE);
    out
}

pub fn render_user_stats(stats: &UserStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nCalculating User Stats...\n");

    if stats.user_types.is_empty() {
        let _ = writeln!(out, "{NO_DATA}");
    } else {
        let _ = writeln!(out, "User types:");
        for (user_type, count) in &stats.user_types {
            let _ = writeln!(out, "  {user_type}: {count}");
        }
    }

    match &stats.genders {
        FieldStats::Missing => {
            let _ = writeln!(out, "\nThere is no gender data for your chosen city.");
        }
        FieldStats::Empty => {
            let _ = writeln!(out, "\nNo gender data for this filter.");
        }
        FieldStats::Present(counts) => {
            let _ = writeln!(out, "\nGenders:");
            for (gender, count) in counts {
                let _ = writeln!(out, "  {gender}: {count}");
            }
        }
    }

    match &stats.birth_years {
        FieldStats::Missing => {
            let _ = writeln!(out, "\nThere is no birth year data for your chosen city.");
        }
        FieldStats::Empty => {
            let _ = writeln!(out, "\nNo birth year data for this filter.");
        }
        FieldStats::Present(years) => {
            let _ = writeln!(out, "\nEarliest birth year: {}", years.earliest);
            let _ = writeln!(out, "Most recent birth year: {}", years.most_recent);
            let _ = writeln!(out, "Most common birth year: {}", years.most_common);
        }
    }

    let _ = writeln!(out, "\nThis took {} seconds.", stats.elapsed_secs);
    out.push_str(SECTION_RULE);
    out
}
