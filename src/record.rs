use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire format of a resolved deadline.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Month/day parsing is done against a leap year so "Feb 29" is accepted.
const LEAP_YEAR: i32 = 2000;

/// A recurring annual date without a year, e.g. "Jan 15".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    month: u32,
    day: u32,
}

impl Deadline {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(LEAP_YEAR, month, day).map(|_| Deadline { month, day })
    }

    /// Parse "<month name> <day>", e.g. "Jan 15" or "January 15".
    pub fn parse_month_day(s: &str) -> Option<Self> {
        let date =
            NaiveDate::parse_from_str(&format!("{} {}", s.trim(), LEAP_YEAR), "%B %d %Y").ok()?;
        Deadline::new(date.month(), date.day())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// First occurrence strictly after `today`. A deadline falling on
    /// `today` has already started passing, so it rolls to next year.
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let mut year = today.year();
        loop {
            // Feb 29 only exists in leap years; keep looking.
            if let Some(date) = NaiveDate::from_ymd_opt(year, self.month, self.day) {
                if date > today {
                    return date;
                }
            }
            year += 1;
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NaiveDate::from_ymd_opt(LEAP_YEAR, self.month(), self.day()) {
            Some(date) => write!(f, "{}", date.format("%b %-d")),
            None => write!(f, "{:02}-{:02}", self.month(), self.day()),
        }
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let date = self.next_occurrence(Local::now().date_naive());
        serializer.serialize_str(&date.format(DEADLINE_FORMAT).to_string())
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let date = NaiveDate::parse_from_str(&raw, DEADLINE_FORMAT)
            .map_err(|e| serde::de::Error::custom(format!("deadline {raw:?}: {e}")))?;
        Ok(Deadline {
            month: date.month(),
            day: date.day(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    Public,
    Private,
    /// Whatever else is already in the column. Never produced by extraction.
    #[serde(untagged)]
    Other(String),
}

impl Ownership {
    /// Exact match only; anything else ("Public-private", "4-year") is not an
    /// ownership descriptor.
    pub fn from_descriptor(s: &str) -> Option<Self> {
        match s.trim() {
            "Public" => Some(Ownership::Public),
            "Private" => Some(Ownership::Private),
            _ => None,
        }
    }
}

/// One row of the colleges table. Field names are the Airtable column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollegeRecord {
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "_big_future_id", default, skip_serializing_if = "Option::is_none")]
    pub big_future_id: Option<u64>,
    #[serde(rename = "_princeton_review_id", default, skip_serializing_if = "Option::is_none")]
    pub princeton_review_id: Option<u64>,

    #[serde(rename = "Ownership", default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Ownership>,

    // BigFuture: size, cost, deadlines
    #[serde(rename = "Num. Undergrads", default, skip_serializing_if = "Option::is_none")]
    pub num_undergrads: Option<i64>,
    #[serde(rename = "Tuition: In-State", default, skip_serializing_if = "Option::is_none")]
    pub in_state_tuition: Option<f64>,
    #[serde(rename = "Tuition: Out-of-State", default, skip_serializing_if = "Option::is_none")]
    pub out_of_state_tuition: Option<f64>,
    #[serde(rename = "Standard Deadline", default, skip_serializing_if = "Option::is_none")]
    pub standard_deadline: Option<Deadline>,
    #[serde(rename = "Standard Notification", default, skip_serializing_if = "Option::is_none")]
    pub standard_notification: Option<Deadline>,
    #[serde(rename = "Early Deadline", default, skip_serializing_if = "Option::is_none")]
    pub early_deadline: Option<Deadline>,
    #[serde(rename = "Early Notification", default, skip_serializing_if = "Option::is_none")]
    pub early_notification: Option<Deadline>,

    // BigFuture: share of freshmen per ACT bracket
    #[serde(rename = "ACT Composite 30-36", default, skip_serializing_if = "Option::is_none")]
    pub act_composite_30_36: Option<f64>,
    #[serde(rename = "ACT Composite 24-29", default, skip_serializing_if = "Option::is_none")]
    pub act_composite_24_29: Option<f64>,
    #[serde(rename = "ACT Composite 18-23", default, skip_serializing_if = "Option::is_none")]
    pub act_composite_18_23: Option<f64>,
    #[serde(rename = "ACT Composite 12-17", default, skip_serializing_if = "Option::is_none")]
    pub act_composite_12_17: Option<f64>,
    #[serde(rename = "ACT Math 30-36", default, skip_serializing_if = "Option::is_none")]
    pub act_math_30_36: Option<f64>,
    #[serde(rename = "ACT Math 24-29", default, skip_serializing_if = "Option::is_none")]
    pub act_math_24_29: Option<f64>,
    #[serde(rename = "ACT Math 18-23", default, skip_serializing_if = "Option::is_none")]
    pub act_math_18_23: Option<f64>,
    #[serde(rename = "ACT Math 12-17", default, skip_serializing_if = "Option::is_none")]
    pub act_math_12_17: Option<f64>,
    #[serde(rename = "ACT English 30-36", default, skip_serializing_if = "Option::is_none")]
    pub act_english_30_36: Option<f64>,
    #[serde(rename = "ACT English 24-29", default, skip_serializing_if = "Option::is_none")]
    pub act_english_24_29: Option<f64>,
    #[serde(rename = "ACT English 18-23", default, skip_serializing_if = "Option::is_none")]
    pub act_english_18_23: Option<f64>,
    #[serde(rename = "ACT English 12-17", default, skip_serializing_if = "Option::is_none")]
    pub act_english_12_17: Option<f64>,

    // BigFuture: share of freshmen per GPA bracket
    #[serde(rename = "GPA 3.75+", default, skip_serializing_if = "Option::is_none")]
    pub gpa_375_plus: Option<f64>,
    #[serde(rename = "GPA 3.50-3.74", default, skip_serializing_if = "Option::is_none")]
    pub gpa_350_374: Option<f64>,
    #[serde(rename = "GPA 3.25-3.49", default, skip_serializing_if = "Option::is_none")]
    pub gpa_325_349: Option<f64>,
    #[serde(rename = "GPA 3.00-3.24", default, skip_serializing_if = "Option::is_none")]
    pub gpa_300_324: Option<f64>,
    #[serde(rename = "GPA 2.50-2.99", default, skip_serializing_if = "Option::is_none")]
    pub gpa_250_299: Option<f64>,

    // Princeton Review
    #[serde(rename = "Num. Applicants", default, skip_serializing_if = "Option::is_none")]
    pub num_applicants: Option<i64>,
    #[serde(rename = "Acceptance Rate", default, skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<f64>,
    #[serde(rename = "GPA Average", default, skip_serializing_if = "Option::is_none")]
    pub gpa_average: Option<f64>,
    #[serde(rename = "ACT Range Low", default, skip_serializing_if = "Option::is_none")]
    pub act_range_low: Option<i64>,
    #[serde(rename = "ACT Range High", default, skip_serializing_if = "Option::is_none")]
    pub act_range_high: Option<i64>,

    // Test score submission codes
    #[serde(rename = "SAT Code", default, skip_serializing_if = "Option::is_none")]
    pub sat_code: Option<i64>,
    #[serde(rename = "ACT Code", default, skip_serializing_if = "Option::is_none")]
    pub act_code: Option<i64>,
}
