//! Candidate pairings: the engine's output.

use rust_decimal::Decimal;
use serde::Serialize;

/// A scored, risk-annotated (pilot, drone) pairing proposed for a mission.
///
/// Derived per match invocation and never persisted; only a confirmed
/// candidate becomes durable state, via the assignment writer.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub pilot_id: String,
    pub drone_id: String,

    /// Count of mission-required skills found in the pilot's skill text.
    /// Always ≥ 1 — a zero score disqualifies the pilot earlier.
    pub skill_score: u32,

    /// Pilot daily rate × mission duration. `None` when the rate was
    /// unparseable at the boundary.
    pub mission_cost: Option<Decimal>,

    /// Cost strictly exceeds the mission budget. False when either side
    /// is indeterminate.
    pub budget_warning: bool,

    /// The pilot is committed to a different, date-overlapping mission.
    pub pilot_conflict: bool,

    /// The drone is committed to a different, date-overlapping mission.
    pub drone_conflict: bool,

    /// Rainy forecast and the drone's resistance rating lacks IP43.
    pub weather_risk: bool,

    /// Maintenance falls due on or before the mission start.
    pub maintenance_risk: bool,
}
