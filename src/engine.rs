//! The matching engine: a pure function from one mission plus a roster/fleet
//! snapshot to a ranked list of candidate pairings.
//!
//! The engine never touches the store and never mutates a record. It reads a
//! [`Snapshot`], builds the cross product of eligible pilots × eligible
//! drones, annotates each pair with cost and risk signals, and ranks the
//! result. Selection — and the fresh re-check that must precede it — belongs
//! to the caller.

pub mod conflict;
pub mod eligibility;
pub mod risk;

use jiff::Timestamp;

use crate::model::{Candidate, Drone, Mission, Pilot};

use conflict::EntityKind;

/// An immutable snapshot of the three entity sets, stamped when loaded.
///
/// The store refreshes on the caller's cadence; the engine only promises
/// that a candidate list reflects the snapshot it was given. `is_stale`
/// makes the staleness bound explicit and checkable.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub missions: Vec<Mission>,
    pub pilots: Vec<Pilot>,
    pub drones: Vec<Drone>,
    pub loaded_at: Timestamp,
}

impl Snapshot {
    /// Whether this snapshot is older than `max_age_seconds`.
    pub fn is_stale(&self, max_age_seconds: u64, now: Timestamp) -> bool {
        let age = now.as_second() - self.loaded_at.as_second();
        age > i64::try_from(max_age_seconds).unwrap_or(i64::MAX)
    }

    pub fn mission(&self, project_id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.project_id == project_id)
    }

    pub fn pilot(&self, pilot_id: &str) -> Option<&Pilot> {
        self.pilots.iter().find(|p| p.pilot_id == pilot_id)
    }

    pub fn drone(&self, drone_id: &str) -> Option<&Drone> {
        self.drones.iter().find(|d| d.drone_id == drone_id)
    }
}

/// Errors from evaluating a mission.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The mission under evaluation has an unparseable start or end date.
    /// This is the caller's validation problem, reported rather than
    /// papered over.
    #[error("mission {0} has missing or unparseable dates")]
    MissingDates(String),
}

/// Evaluates one mission against the snapshot, returning ranked candidates.
///
/// Ranking: skill score descending, then cost ascending (indeterminate cost
/// last), then pilot id, then drone id. The id keys make equal-score,
/// equal-cost ordering deterministic across runs.
///
/// An empty list is a report ("no options"), not an error. Conflict flags
/// are computed against committed assignments only; two listed candidates
/// may still exclude each other, so confirmation re-checks.
pub fn match_mission(mission: &Mission, snapshot: &Snapshot) -> Result<Vec<Candidate>, MatchError> {
    let (Some(start), Some(end)) = (mission.start_date, mission.end_date) else {
        return Err(MatchError::MissingDates(mission.project_id.clone()));
    };

    let drones = eligibility::eligible_drones(mission, &snapshot.drones);
    let mut candidates = Vec::new();

    for (pilot, skill_score) in eligibility::eligible_pilots(mission, &snapshot.pilots) {
        // One conflict scan per pilot, not per (pilot, drone) pair.
        let pilot_conflict = conflict::has_conflict(
            &pilot.pilot_id,
            EntityKind::Pilot,
            &snapshot.missions,
            &mission.project_id,
            start,
            end,
        );
        let mission_cost = risk::mission_cost(pilot.daily_rate, mission.duration_days());
        let budget_warning = risk::budget_warning(mission_cost, mission.budget);

        for drone in &drones {
            let drone_conflict = conflict::has_conflict(
                &drone.drone_id,
                EntityKind::Drone,
                &snapshot.missions,
                &mission.project_id,
                start,
                end,
            );
            candidates.push(Candidate {
                pilot_id: pilot.pilot_id.clone(),
                drone_id: drone.drone_id.clone(),
                skill_score,
                mission_cost,
                budget_warning,
                pilot_conflict,
                drone_conflict,
                weather_risk: risk::weather_risk(
                    &mission.weather_forecast,
                    &drone.weather_resistance,
                ),
                maintenance_risk: risk::maintenance_risk(drone.maintenance_due, start),
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.skill_score
            .cmp(&a.skill_score)
            .then_with(|| match (a.mission_cost, b.mission_cost) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.pilot_id.cmp(&b.pilot_id))
            .then_with(|| a.drone_id.cmp(&b.drone_id))
    });

    Ok(candidates)
}
