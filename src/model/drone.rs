//! Drone fleet types.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A drone in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub drone_id: String,
    pub location: String,
    pub status: DroneStatus,
    /// Capability catalog, free text (comma-separated by convention).
    pub capabilities: String,
    /// Weather-resistance rating text, e.g. ingress-protection codes ("IP43").
    pub weather_resistance: String,
    /// When the next maintenance is due. `None` when unscheduled or
    /// the source field was unparseable.
    pub maintenance_due: Option<Date>,
    /// Project id of the mission this drone is committed to, if any.
    pub current_assignment: Option<String>,
}

/// Where a drone stands in the duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneStatus {
    /// Free to fly a mission. Only available drones are ever candidates.
    Available,

    /// Committed to a mission.
    Assigned,

    /// Grounded for maintenance.
    Maintenance,
}

impl DroneStatus {
    /// Parses status text, trimmed and case-insensitive.
    /// Unknown text is `None`; the normalizer refuses such rows.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "assigned" => Some(Self::Assigned),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Assigned => "Assigned",
            Self::Maintenance => "Maintenance",
        }
    }
}
