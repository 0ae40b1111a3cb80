use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldError;
use crate::record::Deadline;

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());

/// Characters that decorate numbers on both sites: spaces, currency,
/// thousands separators and percent signs.
const NUMBER_NOISE: &[char] = &[' ', '\u{a0}', '$', ',', '%'];

pub fn strip_number(value: &str) -> String {
    value.trim().chars().filter(|c| !NUMBER_NOISE.contains(c)).collect()
}

pub fn int(value: &str) -> Result<i64, FieldError> {
    strip_number(value)
        .parse::<i64>()
        .map_err(|_| FieldError::NotANumber { raw: value.to_string() })
}

pub fn float(value: &str) -> Result<f64, FieldError> {
    strip_number(value)
        .parse::<f64>()
        .map_err(|_| FieldError::NotANumber { raw: value.to_string() })
}

/// `Ok(None)` for the "not offered" placeholders ("No regular application",
/// "--"). Note the trailing space: "Nov 1" is a real date.
pub fn deadline(value: &str) -> Result<Option<Deadline>, FieldError> {
    let value = value.trim();
    if value.starts_with("No ") || value == "--" {
        return Ok(None);
    }
    Deadline::parse_month_day(value)
        .map(Some)
        .ok_or_else(|| FieldError::BadDeadline { raw: value.to_string() })
}

pub fn range(value: &str) -> Result<(i64, i64), FieldError> {
    let value = value.trim();
    let caps = RANGE_RE
        .captures(value)
        .ok_or_else(|| FieldError::BadRange { raw: value.to_string() })?;
    Ok((int(&caps[1])?, int(&caps[2])?))
}
