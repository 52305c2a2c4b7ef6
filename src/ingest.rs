//! The normalizer boundary: raw string rows in, typed records out.
//!
//! Source rows have the shape of a spreadsheet export — every field a
//! string, `current_assignment` possibly absent. Dates and numbers coerce
//! to `None` when unparseable, mirroring how the upstream sheets behave;
//! statuses and keys do not coerce, because the engine's contract is that
//! it only ever sees clean, classified records.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::model::{Assignment, Drone, DroneStatus, Mission, Pilot, PilotStatus, Priority};

/// Errors from normalizing raw rows.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{kind} row {index} has an empty id")]
    EmptyId { kind: &'static str, index: usize },

    #[error("{kind} {id} has unknown status {status:?}")]
    UnknownStatus {
        kind: &'static str,
        id: String,
        status: String,
    },
}

/// A mission row as exported: all strings, assignment optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMission {
    pub project_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub mission_budget: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub required_certs: String,
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub weather_forecast: String,
    #[serde(default)]
    pub current_assignment: String,
}

/// A pilot row as exported.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPilot {
    pub pilot_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub certifications: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub daily_rate: String,
    #[serde(default)]
    pub current_assignment: String,
}

/// A drone row as exported.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDrone {
    pub drone_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub capabilities: String,
    #[serde(default)]
    pub weather_resistance: String,
    #[serde(default)]
    pub maintenance_due: String,
    #[serde(default)]
    pub current_assignment: String,
}

/// Parses an ISO `YYYY-MM-DD` date, coercing blanks and garbage to `None`.
pub fn coerce_date(text: &str) -> Option<Date> {
    text.trim().parse().ok()
}

/// Parses a decimal amount, coercing blanks and garbage to `None`.
pub fn coerce_money(text: &str) -> Option<Decimal> {
    text.trim().parse().ok()
}

/// Normalizes one mission row.
pub fn mission(raw: &RawMission, index: usize) -> Result<Mission, IngestError> {
    let project_id = raw.project_id.trim();
    if project_id.is_empty() {
        return Err(IngestError::EmptyId {
            kind: "mission",
            index,
        });
    }
    Ok(Mission {
        project_id: project_id.to_string(),
        location: raw.location.trim().to_string(),
        start_date: coerce_date(&raw.start_date),
        end_date: coerce_date(&raw.end_date),
        budget: coerce_money(&raw.mission_budget),
        priority: Priority::parse(&raw.priority),
        required_certs: raw.required_certs.trim().to_string(),
        required_skills: raw.required_skills.trim().to_string(),
        weather_forecast: raw.weather_forecast.trim().to_string(),
        current_assignment: Assignment::parse(&raw.current_assignment),
    })
}

/// Normalizes one pilot row.
pub fn pilot(raw: &RawPilot, index: usize) -> Result<Pilot, IngestError> {
    let pilot_id = raw.pilot_id.trim();
    if pilot_id.is_empty() {
        return Err(IngestError::EmptyId {
            kind: "pilot",
            index,
        });
    }
    let status = PilotStatus::parse(&raw.status).ok_or_else(|| IngestError::UnknownStatus {
        kind: "pilot",
        id: pilot_id.to_string(),
        status: raw.status.clone(),
    })?;
    Ok(Pilot {
        pilot_id: pilot_id.to_string(),
        location: raw.location.trim().to_string(),
        status,
        certifications: raw.certifications.trim().to_string(),
        skills: raw.skills.trim().to_string(),
        daily_rate: coerce_money(&raw.daily_rate),
        current_assignment: non_empty(&raw.current_assignment),
    })
}

/// Normalizes one drone row.
pub fn drone(raw: &RawDrone, index: usize) -> Result<Drone, IngestError> {
    let drone_id = raw.drone_id.trim();
    if drone_id.is_empty() {
        return Err(IngestError::EmptyId {
            kind: "drone",
            index,
        });
    }
    let status = DroneStatus::parse(&raw.status).ok_or_else(|| IngestError::UnknownStatus {
        kind: "drone",
        id: drone_id.to_string(),
        status: raw.status.clone(),
    })?;
    Ok(Drone {
        drone_id: drone_id.to_string(),
        location: raw.location.trim().to_string(),
        status,
        capabilities: raw.capabilities.trim().to_string(),
        weather_resistance: raw.weather_resistance.trim().to_string(),
        maintenance_due: coerce_date(&raw.maintenance_due),
        current_assignment: non_empty(&raw.current_assignment),
    })
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
