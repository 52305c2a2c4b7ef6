//! Mission types: the unit of demand in Sortie.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A time-bounded task requiring one pilot and one drone.
///
/// Dates and budget are `None` when the source row could not be coerced;
/// the engine treats such missions as invalid for matching (dates) or as
/// having an indeterminate cost comparison (budget).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub project_id: String,
    pub location: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub budget: Option<Decimal>,
    pub priority: Priority,
    /// Comma-separated certification requirements, free text.
    pub required_certs: String,
    /// Comma-separated skill requirements, free text.
    pub required_skills: String,
    pub weather_forecast: String,
    pub current_assignment: Option<Assignment>,
}

impl Mission {
    /// Duration in whole days, inclusive of both endpoints (minimum 1).
    ///
    /// `None` when either date is missing.
    pub fn duration_days(&self) -> Option<i32> {
        let (start, end) = (self.start_date?, self.end_date?);
        Some((end - start).get_days() + 1)
    }
}

/// Mission priority. Anything the source doesn't mark "Urgent" is normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Normal,
    Urgent,
}

impl Priority {
    /// Parses priority text, trimmed and case-insensitive.
    /// Unrecognized text falls back to `Normal`.
    pub fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("urgent") {
            Self::Urgent
        } else {
            Self::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Urgent => "Urgent",
        }
    }
}

/// The pilot/drone pair committed to a mission.
///
/// Persisted as the literal `"<pilot_id> | <drone_id>"` pipe format; that
/// layout is read by downstream tooling and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub pilot_id: String,
    pub drone_id: String,
}

impl Assignment {
    /// Parses the pipe-delimited assignment field.
    ///
    /// Empty or malformed text is `None`: the mission is treated as
    /// unassigned rather than half-assigned.
    pub fn parse(text: &str) -> Option<Self> {
        let (pilot, drone) = text.split_once('|')?;
        let (pilot, drone) = (pilot.trim(), drone.trim());
        if pilot.is_empty() || drone.is_empty() {
            return None;
        }
        Some(Self {
            pilot_id: pilot.to_string(),
            drone_id: drone.to_string(),
        })
    }

    /// The persisted pipe format.
    pub fn to_field(&self) -> String {
        format!("{} | {}", self.pilot_id, self.drone_id)
    }
}
