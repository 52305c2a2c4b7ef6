//! Eligibility filtering: which pilots and drones can serve a mission at all.
//!
//! Certification and skill checks are deliberate free-text substring matches:
//! the catalogs are uncontrolled sheet columns, not an enumerated taxonomy.
//! The cost of that trade-off is the occasional false positive (e.g.
//! "Part1070" satisfying "Part107").

use crate::model::{Drone, DroneStatus, Mission, Pilot, PilotStatus};

/// Pilots eligible for a mission, each with their skill score.
///
/// A pilot qualifies when they are available, at the mission's location,
/// hold every required certification, and match at least one required skill.
pub fn eligible_pilots<'a>(mission: &Mission, pilots: &'a [Pilot]) -> Vec<(&'a Pilot, u32)> {
    pilots
        .iter()
        .filter(|p| p.status == PilotStatus::Available)
        .filter(|p| p.location == mission.location)
        .filter(|p| holds_all_certs(&mission.required_certs, &p.certifications))
        .filter_map(|p| {
            let score = skill_score(&mission.required_skills, &p.skills);
            (score > 0).then_some((p, score))
        })
        .collect()
}

/// Drones eligible for a mission: available and at the mission's location.
pub fn eligible_drones<'a>(mission: &Mission, drones: &'a [Drone]) -> Vec<&'a Drone> {
    drones
        .iter()
        .filter(|d| d.status == DroneStatus::Available)
        .filter(|d| d.location == mission.location)
        .collect()
}

/// True when every required certification appears (case-insensitive
/// substring) in the pilot's certification text.
///
/// An empty or all-blank requirement set is vacuously satisfied.
fn holds_all_certs(required: &str, held: &str) -> bool {
    let held = held.to_lowercase();
    required_tokens(required).iter().all(|c| held.contains(c))
}

/// Count of required skills found (case-insensitive substring) in the
/// pilot's skill text. Zero disqualifies; an empty requirement set scores
/// zero, so a mission without required skills produces no candidates.
pub fn skill_score(required: &str, held: &str) -> u32 {
    let held = held.to_lowercase();
    u32::try_from(
        required_tokens(required)
            .iter()
            .filter(|s| held.contains(s.as_str()))
            .count(),
    )
    .unwrap_or(u32::MAX)
}

/// Splits a comma-separated requirement field into trimmed, lowercased
/// tokens, dropping empties.
fn required_tokens(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
