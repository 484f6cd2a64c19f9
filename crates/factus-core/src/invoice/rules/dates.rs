//! Date normalization for invoice text in English and Spanish.
//!
//! Accepts the loose forms found on invoices and in AI extractions
//! ("23/02/2023", "Feb 23, 2023", "23 de febrero de 2023", ...) and turns them
//! into a year/month/day triple.

use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patterns::{
    COMMA_TAB_RUN, DATE_DAY_MONTH_NAME, DATE_DMY, DATE_MONTH_NAME_DAY, DATE_SLASH,
    DATE_SPANISH_LONG, DATE_YMD, WHITESPACE_RUN,
};
use super::text::strip_accents;

/// A parsed calendar triple.
///
/// Day and month are not range-checked; use [`DateParts::to_naive_date`] when a
/// real calendar date is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateParts {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Convert to a calendar date, if the triple names one.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Zero-padded form fields: `("2023", "02", "09")`.
    pub fn padded(&self) -> (String, String, String) {
        (
            format!("{:04}", self.year),
            format!("{:02}", self.month),
            format!("{:02}", self.day),
        )
    }
}

impl fmt::Display for DateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Which capture group holds which component of a pattern.
#[derive(Clone, Copy)]
enum Layout {
    YearMonthDay,
    DayMonthYear,
    DayMonthNameYear,
    MonthNameDayYear,
}

/// Parse loosely formatted date text.
///
/// Patterns are tried in a fixed priority order and the first match wins.
/// Returns `None` for empty or unrecognized input.
pub fn parse_date(text: &str) -> Option<DateParts> {
    let normalized = normalize_date_text(text);
    if normalized.is_empty() {
        return None;
    }

    let attempts: [(&Regex, Layout); 6] = [
        (&*DATE_YMD, Layout::YearMonthDay),
        (&*DATE_DMY, Layout::DayMonthYear),
        (&*DATE_DAY_MONTH_NAME, Layout::DayMonthNameYear),
        (&*DATE_MONTH_NAME_DAY, Layout::MonthNameDayYear),
        (&*DATE_SPANISH_LONG, Layout::DayMonthNameYear),
        (&*DATE_SLASH, Layout::DayMonthYear),
    ];

    attempts
        .iter()
        .find_map(|(pattern, layout)| match_pattern(pattern, *layout, &normalized))
}

/// Normalize text before pattern matching: trim, collapse commas, tabs and
/// whitespace runs into single spaces, lower-case and strip accents.
pub fn normalize_date_text(text: &str) -> String {
    let spaced = COMMA_TAB_RUN.replace_all(text.trim(), " ");
    let collapsed = WHITESPACE_RUN.replace_all(spaced.trim(), " ");
    strip_accents(&collapsed.to_lowercase())
}

fn match_pattern(pattern: &Regex, layout: Layout, text: &str) -> Option<DateParts> {
    let caps = pattern.captures(text)?;

    match layout {
        Layout::YearMonthDay => Some(DateParts::new(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )),
        Layout::DayMonthYear => Some(DateParts::new(
            parse_year(&caps[3])?,
            caps[2].parse().ok()?,
            caps[1].parse().ok()?,
        )),
        Layout::DayMonthNameYear => Some(DateParts::new(
            parse_year(&caps[3])?,
            month_from_name(&caps[2])?,
            caps[1].parse().ok()?,
        )),
        Layout::MonthNameDayYear => Some(DateParts::new(
            parse_year(&caps[3])?,
            month_from_name(&caps[1])?,
            caps[2].parse().ok()?,
        )),
    }
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    // Two-digit years are always 20xx
    if year < 100 { Some(2000 + year) } else { Some(year) }
}

/// Resolve an English or Spanish month name or abbreviation.
///
/// Surrounding dots are ignored, so `"sept."` resolves like `"sept"`.
pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.trim_matches('.') {
        "jan" | "january" | "ene" | "enero" => 1,
        "feb" | "february" | "febrero" => 2,
        "mar" | "march" | "marzo" => 3,
        "apr" | "april" | "abr" | "abril" => 4,
        "may" | "mayo" => 5,
        "jun" | "june" | "junio" => 6,
        "jul" | "july" | "julio" => 7,
        "aug" | "august" | "ago" | "agosto" => 8,
        "sep" | "sept" | "september" | "set" | "septiembre" | "setiembre" => 9,
        "oct" | "october" | "octubre" => 10,
        "nov" | "november" | "noviembre" => 11,
        "dec" | "december" | "dic" | "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}
