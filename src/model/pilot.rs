//! Pilot roster types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A pilot on the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pilot {
    pub pilot_id: String,
    pub location: String,
    pub status: PilotStatus,
    /// Certification catalog, free text (comma-separated by convention).
    pub certifications: String,
    /// Skill catalog, free text (comma-separated by convention).
    pub skills: String,
    pub daily_rate: Option<Decimal>,
    /// Project id of the mission this pilot is committed to, if any.
    pub current_assignment: Option<String>,
}

/// Where a pilot stands in the duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilotStatus {
    /// Free to take a mission. Only available pilots are ever candidates.
    Available,

    /// Committed to a mission.
    Assigned,

    /// Off duty.
    OnLeave,
}

impl PilotStatus {
    /// Parses status text, trimmed and case-insensitive.
    /// Unknown text is `None` — statuses gate eligibility, so the
    /// normalizer refuses rows it cannot classify.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "assigned" => Some(Self::Assigned),
            "on leave" => Some(Self::OnLeave),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Assigned => "Assigned",
            Self::OnLeave => "On Leave",
        }
    }
}
