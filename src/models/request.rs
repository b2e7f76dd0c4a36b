use std::ops::RangeInclusive;

use crate::error::{FieldError, Location, ValidationError};

pub const DEFAULT_METRIC: &str = "temperature";
pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_POINTS_PER_DAY: u32 = 24;

pub const DAYS_RANGE: RangeInclusive<u32> = 1..=365;
/// 24 is hourly, 144 is every ten minutes.
pub const POINTS_PER_DAY_RANGE: RangeInclusive<u32> = 1..=144;

/// Query parameters exactly as the client sent them. Numbers are kept as
/// strings so that a bad value can be reported per field instead of failing
/// the whole extraction.
#[derive(Debug, Default)]
pub struct RawQuery {
    pub metric: Option<String>,
    pub days: Option<String>,
    pub points_per_day: Option<String>,
}

/// Folds decoded `key=value` pairs in order. A repeated key keeps its last
/// value and unknown keys are ignored.
impl FromIterator<(String, String)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = RawQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "metric" => query.metric = Some(value),
                "days" => query.days = Some(value),
                "points_per_day" => query.points_per_day = Some(value),
                _ => (),
            }
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub city: String,
    pub metric: String,
    pub days: u32,
    pub points_per_day: u32,
}

impl GenerationRequest {
    /// Apply defaults and bounds to a raw query. All offending fields are
    /// collected before giving up.
    pub fn from_query(city: &str, query: RawQuery) -> Result<GenerationRequest, ValidationError> {
        let mut errors = Vec::new();
        if city.is_empty() {
            errors.push(missing_city());
        }
        let days = parse_bounded("days", query.days.as_deref(), DEFAULT_DAYS, &DAYS_RANGE);
        let points_per_day = parse_bounded(
            "points_per_day",
            query.points_per_day.as_deref(),
            DEFAULT_POINTS_PER_DAY,
            &POINTS_PER_DAY_RANGE,
        );
        let (days, points_per_day) = match (days, points_per_day) {
            (Ok(days), Ok(points_per_day)) if errors.is_empty() => (days, points_per_day),
            (days, points_per_day) => {
                errors.extend(days.err());
                errors.extend(points_per_day.err());
                return Err(ValidationError { errors });
            }
        };
        Ok(GenerationRequest {
            city: city.to_string(),
            metric: query.metric.unwrap_or_else(|| DEFAULT_METRIC.to_string()),
            days,
            points_per_day,
        })
    }

    pub fn total_points(&self) -> usize {
        self.days as usize * self.points_per_day as usize
    }
}

pub fn missing_city() -> FieldError {
    FieldError::Missing {
        location: Location::Path,
        field: "city",
    }
}

enum ParsedInteger {
    Value(i64),
    Overflow { negative: bool },
}

/// Lenient integer parsing: surrounding whitespace, an optional sign, single
/// underscores between digits and an all-zero fractional part are accepted.
/// Returns `None` for anything that is not an integer.
fn parse_integer(text: &str) -> Option<ParsedInteger> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let whole = match unsigned.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.is_empty() || !fraction.bytes().all(|b| b == b'0') {
                return None;
            }
            whole
        }
        None => unsigned,
    };
    if whole.is_empty()
        || whole.starts_with('_')
        || whole.ends_with('_')
        || whole.contains("__")
        || !whole.bytes().all(|b| b.is_ascii_digit() || b == b'_')
    {
        return None;
    }
    let digits: String = whole.chars().filter(|c| *c != '_').collect();
    Some(match digits.parse::<i64>() {
        Ok(value) if negative => ParsedInteger::Value(-value),
        Ok(value) => ParsedInteger::Value(value),
        Err(_) => ParsedInteger::Overflow { negative },
    })
}

fn parse_bounded(
    field: &'static str,
    raw: Option<&str>,
    default: u32,
    range: &RangeInclusive<u32>,
) -> Result<u32, FieldError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let (min, max) = (*range.start() as i64, *range.end() as i64);
    let too_small = || FieldError::TooSmall {
        field,
        input: raw.to_string(),
        min,
    };
    let too_large = || FieldError::TooLarge {
        field,
        input: raw.to_string(),
        max,
    };
    match parse_integer(raw) {
        None => Err(FieldError::NotAnInteger {
            field,
            input: raw.to_string(),
        }),
        Some(ParsedInteger::Overflow { negative: true }) => Err(too_small()),
        Some(ParsedInteger::Overflow { negative: false }) => Err(too_large()),
        Some(ParsedInteger::Value(value)) if value < min => Err(too_small()),
        Some(ParsedInteger::Value(value)) if value > max => Err(too_large()),
        Some(ParsedInteger::Value(value)) => Ok(value as u32),
    }
}
