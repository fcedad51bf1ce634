//! Calendar dates and their locale-aware display form.

use crate::data::Language;
use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Day-precision date, as published in post front matter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// How a post page displays its date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    /// Long form in the page language (default)
    #[default]
    Localized,
    /// Upstream `MMMM DD, YYYY` form, whatever the page language
    Raw,
}

impl CalendarDate {
    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Parse from "YYYY-MM-DD", or the date part of an RFC3339 timestamp
    /// ("YYYY-MM-DDTHH:MM:SSZ", "YYYY-MM-DDTHH:MM:SS.sss+01:00", ...)
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        if bytes[7] != b'-' {
            return None;
        }
        let day = parse_u8(&bytes[8..10])?;

        if bytes.len() > 10 {
            if !matches!(bytes[10], b'T' | b't' | b' ') {
                return None;
            }
            parse_time_suffix(&bytes[11..])?;
        }

        let date = Self::from_ymd(year, month, day);
        date.validate().ok()?;
        Some(date)
    }

    pub fn validate(&self) -> Result<()> {
        let Self { year, month, day } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }

        Ok(())
    }

    #[inline]
    fn is_leap_year(year: u16) -> bool {
        year.is_multiple_of(4) && (!year.is_multiple_of(100) || year.is_multiple_of(400))
    }

    #[inline]
    fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    #[inline]
    fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// `March 05, 2020`
    pub fn to_long_english(self) -> String {
        format!(
            "{} {:02}, {:04}",
            MONTHS_EN[self.month_index()],
            self.day,
            self.year
        )
    }

    /// `05 mars 2020`
    pub fn to_long_french(self) -> String {
        format!(
            "{:02} {} {:04}",
            self.day,
            MONTHS_FR[self.month_index()],
            self.year
        )
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date `{raw}`")))
    }
}

/// Long-form date in the given language.
///
/// French gets `dd mois yyyy`, every other language the English
/// `Month dd, yyyy` form.
pub fn format_date(language: Language, date: CalendarDate) -> String {
    match language {
        Language::Fr => date.to_long_french(),
        Language::En => date.to_long_english(),
    }
}

/// Date as displayed on a post page for the given mode.
pub fn display_date(mode: DateMode, language: Language, date: CalendarDate) -> String {
    match mode {
        DateMode::Localized => format_date(language, date),
        DateMode::Raw => date.to_long_english(),
    }
}

/// Check an RFC3339 time part: `HH:MM:SS(.fff)?(Z|±HH:MM)`.
fn parse_time_suffix(bytes: &[u8]) -> Option<()> {
    if bytes.len() < 9 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }
    let (hour, minute, second) = (
        parse_u8(&bytes[0..2])?,
        parse_u8(&bytes[3..5])?,
        parse_u8(&bytes[6..8])?,
    );
    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }

    let mut rest = &bytes[8..];
    if let Some(fraction) = rest.strip_prefix(b".") {
        let digits = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        rest = &fraction[digits..];
    }

    match rest {
        [b'Z' | b'z'] => Some(()),
        [b'+' | b'-', h1, h2, b':', m1, m2] => {
            let offset_hour = parse_u8(&[*h1, *h2])?;
            let offset_minute = parse_u8(&[*m1, *m2])?;
            (offset_hour <= 23 && offset_minute <= 59).then_some(())
        }
        _ => None,
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + d as u16;
    }
    Some(result)
}
