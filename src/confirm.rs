//! Assignment confirmation and state repair.
//!
//! Confirming a candidate is a three-entity update: pilot row, drone row,
//! mission row, each addressed by its primary id. The decision side here is
//! pure — it validates against a snapshot and emits an [`AssignmentPlan`] —
//! and the storage layer applies the plan in one transaction.
//!
//! The candidate list the user picked from may be a refresh interval old,
//! and another confirmation may have landed since. Validation therefore runs
//! against a snapshot the caller loaded *fresh*, re-running the conflict
//! check; a lost race surfaces as a rejection, never a silent overwrite.

use jiff::civil::Date;

use crate::engine::Snapshot;
use crate::engine::conflict::{self, EntityKind};
use crate::model::{Assignment, DroneStatus, PilotStatus};
use crate::storage::{Storage, StorageError};

/// The three logical row updates that realize a confirmed candidate.
///
/// Applying the same plan twice is a no-op by construction: every update
/// writes the same values, keyed by the same ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub project_id: String,
    pub pilot_id: String,
    pub drone_id: String,
}

impl AssignmentPlan {
    /// The mission row's assignment field: the literal pipe format.
    pub fn mission_field(&self) -> String {
        Assignment {
            pilot_id: self.pilot_id.clone(),
            drone_id: self.drone_id.clone(),
        }
        .to_field()
    }
}

/// How a confirmation concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The three-entity update was applied.
    Applied,

    /// The triple was already fully applied; nothing was written.
    AlreadyApplied,
}

/// Why a confirmation was refused.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error("mission not found: {0}")]
    UnknownMission(String),

    #[error("pilot not found: {0}")]
    UnknownPilot(String),

    #[error("drone not found: {0}")]
    UnknownDrone(String),

    #[error("mission {0} has missing or unparseable dates")]
    MissingDates(String),

    #[error("pilot {pilot_id} is no longer available (status {status})")]
    PilotUnavailable { pilot_id: String, status: String },

    #[error("drone {drone_id} is no longer available (status {status})")]
    DroneUnavailable { drone_id: String, status: String },

    #[error("pilot {pilot_id} is committed to an overlapping mission")]
    PilotConflict { pilot_id: String },

    #[error("drone {drone_id} is committed to an overlapping mission")]
    DroneConflict { drone_id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Validates a (mission, pilot, drone) triple against a snapshot.
///
/// Returns the plan to apply, or `None` when the triple is already fully
/// applied and there is nothing to do.
///
/// The snapshot must be freshly loaded — validating against the snapshot
/// that produced the candidate list would re-open the double-booking race.
pub fn validate(
    snapshot: &Snapshot,
    project_id: &str,
    pilot_id: &str,
    drone_id: &str,
) -> Result<Option<AssignmentPlan>, ConfirmError> {
    let mission = snapshot
        .mission(project_id)
        .ok_or_else(|| ConfirmError::UnknownMission(project_id.to_string()))?;
    let pilot = snapshot
        .pilot(pilot_id)
        .ok_or_else(|| ConfirmError::UnknownPilot(pilot_id.to_string()))?;
    let drone = snapshot
        .drone(drone_id)
        .ok_or_else(|| ConfirmError::UnknownDrone(drone_id.to_string()))?;

    let applied_to_mission = mission
        .current_assignment
        .as_ref()
        .is_some_and(|a| a.pilot_id == pilot_id && a.drone_id == drone_id);
    let pilot_committed = pilot.status == PilotStatus::Assigned
        && pilot.current_assignment.as_deref() == Some(project_id);
    let drone_committed = drone.status == DroneStatus::Assigned
        && drone.current_assignment.as_deref() == Some(project_id);

    if applied_to_mission && pilot_committed && drone_committed {
        return Ok(None);
    }

    let (start, end) = mission_dates(mission.start_date, mission.end_date, project_id)?;

    // A resource already committed to this very mission is re-confirmable
    // (that's how a partial application gets completed); anything else must
    // be Available.
    if !pilot_committed && pilot.status != PilotStatus::Available {
        return Err(ConfirmError::PilotUnavailable {
            pilot_id: pilot_id.to_string(),
            status: pilot.status.as_str().to_string(),
        });
    }
    if !drone_committed && drone.status != DroneStatus::Available {
        return Err(ConfirmError::DroneUnavailable {
            drone_id: drone_id.to_string(),
            status: drone.status.as_str().to_string(),
        });
    }

    // Fresh conflict re-check against committed state.
    if conflict::has_conflict(
        pilot_id,
        EntityKind::Pilot,
        &snapshot.missions,
        project_id,
        start,
        end,
    ) {
        return Err(ConfirmError::PilotConflict {
            pilot_id: pilot_id.to_string(),
        });
    }
    if conflict::has_conflict(
        drone_id,
        EntityKind::Drone,
        &snapshot.missions,
        project_id,
        start,
        end,
    ) {
        return Err(ConfirmError::DroneConflict {
            drone_id: drone_id.to_string(),
        });
    }

    Ok(Some(AssignmentPlan {
        project_id: project_id.to_string(),
        pilot_id: pilot_id.to_string(),
        drone_id: drone_id.to_string(),
    }))
}

/// Confirms a candidate: loads a fresh snapshot, validates, applies.
pub fn confirm(
    storage: &mut Storage,
    project_id: &str,
    pilot_id: &str,
    drone_id: &str,
) -> Result<Confirmation, ConfirmError> {
    let snapshot = storage.snapshot()?;
    match validate(&snapshot, project_id, pilot_id, drone_id)? {
        None => Ok(Confirmation::AlreadyApplied),
        Some(plan) => {
            storage.apply_assignment(&plan)?;
            Ok(Confirmation::Applied)
        }
    }
}

fn mission_dates(
    start: Option<Date>,
    end: Option<Date>,
    project_id: &str,
) -> Result<(Date, Date), ConfirmError> {
    match (start, end) {
        (Some(s), Some(e)) => Ok((s, e)),
        _ => Err(ConfirmError::MissingDates(project_id.to_string())),
    }
}

// ── Audit & repair ──

/// A detected breach of the three-entity assignment invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// A pilot is marked assigned (or carries an assignment) but no mission
    /// references them back.
    PilotDangling { pilot_id: String },

    /// A drone is marked assigned (or carries an assignment) but no mission
    /// references it back.
    DroneDangling { drone_id: String },

    /// A mission references a pilot whose row is not committed to it.
    PilotNotCommitted { pilot_id: String, project_id: String },

    /// A mission references a drone whose row is not committed to it.
    DroneNotCommitted { drone_id: String, project_id: String },

    /// A mission references a pilot or drone that does not exist.
    UnknownResource { project_id: String },
}

/// A keyed corrective update, applied transactionally by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// Pilot back to Available with no assignment.
    ReleasePilot { pilot_id: String },

    /// Drone back to Available with no assignment.
    ReleaseDrone { drone_id: String },

    /// Pilot committed to the mission that references them.
    CommitPilot { pilot_id: String, project_id: String },

    /// Drone committed to the mission that references it.
    CommitDrone { drone_id: String, project_id: String },

    /// Mission assignment cleared (its reference points at nothing real).
    ClearMission { project_id: String },
}

impl Inconsistency {
    /// The corrective update for this inconsistency.
    pub fn repair(&self) -> Repair {
        match self {
            Self::PilotDangling { pilot_id } => Repair::ReleasePilot {
                pilot_id: pilot_id.clone(),
            },
            Self::DroneDangling { drone_id } => Repair::ReleaseDrone {
                drone_id: drone_id.clone(),
            },
            Self::PilotNotCommitted {
                pilot_id,
                project_id,
            } => Repair::CommitPilot {
                pilot_id: pilot_id.clone(),
                project_id: project_id.clone(),
            },
            Self::DroneNotCommitted {
                drone_id,
                project_id,
            } => Repair::CommitDrone {
                drone_id: drone_id.clone(),
                project_id: project_id.clone(),
            },
            Self::UnknownResource { project_id } => Repair::ClearMission {
                project_id: project_id.clone(),
            },
        }
    }
}

/// Scans a snapshot for partial assignment state.
///
/// A partial application (pilot marked assigned, mission never updated, or
/// any other one-or-two-of-three outcome) violates the confirmation
/// invariant; this makes it detectable, and [`Inconsistency::repair`] makes
/// it repairable.
pub fn audit(snapshot: &Snapshot) -> Vec<Inconsistency> {
    let mut findings = Vec::new();

    for pilot in &snapshot.pilots {
        let engaged =
            pilot.status == PilotStatus::Assigned || pilot.current_assignment.is_some();
        if !engaged {
            continue;
        }
        let referenced_back = pilot.current_assignment.as_deref().is_some_and(|project| {
            snapshot.mission(project).is_some_and(|m| {
                m.current_assignment
                    .as_ref()
                    .is_some_and(|a| a.pilot_id == pilot.pilot_id)
            })
        });
        if !referenced_back {
            findings.push(Inconsistency::PilotDangling {
                pilot_id: pilot.pilot_id.clone(),
            });
        }
    }

    for drone in &snapshot.drones {
        let engaged =
            drone.status == DroneStatus::Assigned || drone.current_assignment.is_some();
        if !engaged {
            continue;
        }
        let referenced_back = drone.current_assignment.as_deref().is_some_and(|project| {
            snapshot.mission(project).is_some_and(|m| {
                m.current_assignment
                    .as_ref()
                    .is_some_and(|a| a.drone_id == drone.drone_id)
            })
        });
        if !referenced_back {
            findings.push(Inconsistency::DroneDangling {
                drone_id: drone.drone_id.clone(),
            });
        }
    }

    for mission in &snapshot.missions {
        let Some(assignment) = &mission.current_assignment else {
            continue;
        };
        let (Some(pilot), Some(drone)) = (
            snapshot.pilot(&assignment.pilot_id),
            snapshot.drone(&assignment.drone_id),
        ) else {
            findings.push(Inconsistency::UnknownResource {
                project_id: mission.project_id.clone(),
            });
            continue;
        };
        if pilot.status != PilotStatus::Assigned
            || pilot.current_assignment.as_deref() != Some(mission.project_id.as_str())
        {
            findings.push(Inconsistency::PilotNotCommitted {
                pilot_id: pilot.pilot_id.clone(),
                project_id: mission.project_id.clone(),
            });
        }
        if drone.status != DroneStatus::Assigned
            || drone.current_assignment.as_deref() != Some(mission.project_id.as_str())
        {
            findings.push(Inconsistency::DroneNotCommitted {
                drone_id: drone.drone_id.clone(),
                project_id: mission.project_id.clone(),
            });
        }
    }

    findings
}
