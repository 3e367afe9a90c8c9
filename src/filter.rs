//! Restricts a trip table to a requested month and weekday.
//!
//! Matching is a case-insensitive prefix match against the full derived
//! name, so callers may pass abbreviations like "Jan" or "Mon". The `All`
//! variants are pure pass-through sentinels.

use crate::config::City;
use crate::loader::TripTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    /// A month name or abbreviation, e.g. "June" or "Jun".
    Month(String),
}

impl MonthFilter {
    pub fn from_input(input: &str) -> MonthFilter {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            MonthFilter::All
        } else {
            MonthFilter::Month(input.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayFilter {
    All,
    /// A weekday name or abbreviation, e.g. "Monday" or "Mon".
    Day(String),
}

impl DayFilter {
    pub fn from_input(input: &str) -> DayFilter {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            DayFilter::All
        } else {
            DayFilter::Day(input.to_string())
        }
    }
}

/// A validated (city, month, day) triple as handed over by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

/// Case-insensitive prefix match of a requested (possibly abbreviated)
/// name against a full derived name.
pub fn matches_prefix(full: &str, requested: &str) -> bool {
    full.len() >= requested.len()
        && full
            .chars()
            .zip(requested.chars())
            .all(|(f, r)| f.eq_ignore_ascii_case(&r))
}

/// Returns a new table holding exactly the records whose derived month and
/// weekday match the selection. The input table is not mutated.
pub fn apply(table: &TripTable, selection: &FilterSelection) -> TripTable {
    let records = table
        .records
        .iter()
        .filter(|r| match &selection.month {
            MonthFilter::All => true,
            MonthFilter::Month(m) => matches_prefix(&r.month_name, m),
        })
        .filter(|r| match &selection.day {
            DayFilter::All => true,
            DayFilter::Day(d) => matches_prefix(&r.weekday_name, d),
        })
        .cloned()
        .collect();

    TripTable {
        city: table.city,
        has_gender: table.has_gender,
        has_birth_year: table.has_birth_year,
        records,
    }
}
