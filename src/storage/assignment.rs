//! The assignment writer: transactional application of confirmation plans
//! and repair batches.
//!
//! All three row updates land in one transaction; a failure partway rolls
//! the whole confirmation back, so the store never holds a one-or-two-of-
//! three application from this writer.

use crate::confirm::{AssignmentPlan, Repair};
use crate::model::{DroneStatus, PilotStatus};

use super::{Result, Storage, StorageError};

impl Storage {
    /// Applies a confirmation plan: pilot, drone, and mission rows updated
    /// by key, atomically.
    pub fn apply_assignment(&mut self, plan: &AssignmentPlan) -> Result<()> {
        let tx = self.conn.transaction()?;

        let rows = tx.execute(
            "UPDATE pilots SET status = ?1, current_assignment = ?2 WHERE pilot_id = ?3",
            rusqlite::params![
                PilotStatus::Assigned.as_str(),
                &plan.project_id,
                &plan.pilot_id
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::PilotNotFound(plan.pilot_id.clone()));
        }

        let rows = tx.execute(
            "UPDATE drones SET status = ?1, current_assignment = ?2 WHERE drone_id = ?3",
            rusqlite::params![
                DroneStatus::Assigned.as_str(),
                &plan.project_id,
                &plan.drone_id
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::DroneNotFound(plan.drone_id.clone()));
        }

        let rows = tx.execute(
            "UPDATE missions SET current_assignment = ?1 WHERE project_id = ?2",
            rusqlite::params![plan.mission_field(), &plan.project_id],
        )?;
        if rows == 0 {
            return Err(StorageError::MissionNotFound(plan.project_id.clone()));
        }

        tx.commit()?;
        Ok(())
    }

    /// Applies a batch of corrective updates atomically.
    pub fn apply_repairs(&mut self, repairs: &[Repair]) -> Result<()> {
        let tx = self.conn.transaction()?;

        for repair in repairs {
            let rows = match repair {
                Repair::ReleasePilot { pilot_id } => tx.execute(
                    "UPDATE pilots SET status = ?1, current_assignment = '' WHERE pilot_id = ?2",
                    rusqlite::params![PilotStatus::Available.as_str(), pilot_id],
                )?,
                Repair::ReleaseDrone { drone_id } => tx.execute(
                    "UPDATE drones SET status = ?1, current_assignment = '' WHERE drone_id = ?2",
                    rusqlite::params![DroneStatus::Available.as_str(), drone_id],
                )?,
                Repair::CommitPilot {
                    pilot_id,
                    project_id,
                } => tx.execute(
                    "UPDATE pilots SET status = ?1, current_assignment = ?2 WHERE pilot_id = ?3",
                    rusqlite::params![PilotStatus::Assigned.as_str(), project_id, pilot_id],
                )?,
                Repair::CommitDrone {
                    drone_id,
                    project_id,
                } => tx.execute(
                    "UPDATE drones SET status = ?1, current_assignment = ?2 WHERE drone_id = ?3",
                    rusqlite::params![DroneStatus::Assigned.as_str(), project_id, drone_id],
                )?,
                Repair::ClearMission { project_id } => tx.execute(
                    "UPDATE missions SET current_assignment = '' WHERE project_id = ?1",
                    rusqlite::params![project_id],
                )?,
            };
            if rows == 0 {
                return Err(repair_target_missing(repair));
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn repair_target_missing(repair: &Repair) -> StorageError {
    match repair {
        Repair::ReleasePilot { pilot_id } | Repair::CommitPilot { pilot_id, .. } => {
            StorageError::PilotNotFound(pilot_id.clone())
        }
        Repair::ReleaseDrone { drone_id } | Repair::CommitDrone { drone_id, .. } => {
            StorageError::DroneNotFound(drone_id.clone())
        }
        Repair::ClearMission { project_id } => StorageError::MissionNotFound(project_id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;
    use rust_decimal::Decimal;

    use crate::model::{Drone, Mission, Pilot, Priority};

    fn sample_plan() -> AssignmentPlan {
        AssignmentPlan {
            project_id: "M-1".into(),
            pilot_id: "P-1".into(),
            drone_id: "D-1".into(),
        }
    }

    fn seeded_storage() -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .upsert_mission(&Mission {
                project_id: "M-1".into(),
                location: "Delhi".into(),
                start_date: Some(date(2025, 3, 10)),
                end_date: Some(date(2025, 3, 11)),
                budget: Some(Decimal::from(10000)),
                priority: Priority::Normal,
                required_certs: String::new(),
                required_skills: "thermal".into(),
                weather_forecast: "clear".into(),
                current_assignment: None,
            })
            .unwrap();
        storage
            .upsert_pilot(&Pilot {
                pilot_id: "P-1".into(),
                location: "Delhi".into(),
                status: PilotStatus::Available,
                certifications: String::new(),
                skills: "thermal".into(),
                daily_rate: Some(Decimal::from(4000)),
                current_assignment: None,
            })
            .unwrap();
        storage
            .upsert_drone(&Drone {
                drone_id: "D-1".into(),
                location: "Delhi".into(),
                status: DroneStatus::Available,
                capabilities: String::new(),
                weather_resistance: "IP43".into(),
                maintenance_due: None,
                current_assignment: None,
            })
            .unwrap();
        storage
    }

    #[test]
    fn apply_assignment_updates_all_three_rows() {
        let mut storage = seeded_storage();
        storage.apply_assignment(&sample_plan()).unwrap();

        assert_eq!(
            storage.load_pilot("P-1").unwrap().status,
            PilotStatus::Assigned
        );
        assert_eq!(
            storage.load_drone("D-1").unwrap().status,
            DroneStatus::Assigned
        );
        assert_eq!(
            storage
                .load_mission("M-1")
                .unwrap()
                .current_assignment
                .unwrap()
                .to_field(),
            "P-1 | D-1"
        );
    }

    #[test]
    fn missing_drone_rolls_back_the_pilot_update() {
        let mut storage = seeded_storage();
        let mut plan = sample_plan();
        plan.drone_id = "D-404".into();

        let err = storage.apply_assignment(&plan).unwrap_err();
        assert!(matches!(err, StorageError::DroneNotFound(_)));

        // The pilot leg of the transaction was rolled back.
        assert_eq!(
            storage.load_pilot("P-1").unwrap().status,
            PilotStatus::Available
        );
        assert_eq!(storage.load_mission("M-1").unwrap().current_assignment, None);
    }

    #[test]
    fn repairs_apply_atomically() {
        let mut storage = seeded_storage();
        storage.apply_assignment(&sample_plan()).unwrap();

        storage
            .apply_repairs(&[
                Repair::ReleasePilot {
                    pilot_id: "P-1".into(),
                },
                Repair::ReleaseDrone {
                    drone_id: "D-1".into(),
                },
                Repair::ClearMission {
                    project_id: "M-1".into(),
                },
            ])
            .unwrap();

        assert_eq!(
            storage.load_pilot("P-1").unwrap().status,
            PilotStatus::Available
        );
        assert_eq!(storage.load_drone("D-1").unwrap().current_assignment, None);
        assert_eq!(storage.load_mission("M-1").unwrap().current_assignment, None);
    }

    #[test]
    fn repair_batch_with_missing_target_rolls_back() {
        let mut storage = seeded_storage();
        storage.apply_assignment(&sample_plan()).unwrap();

        let err = storage
            .apply_repairs(&[
                Repair::ReleasePilot {
                    pilot_id: "P-1".into(),
                },
                Repair::ReleaseDrone {
                    drone_id: "D-404".into(),
                },
            ])
            .unwrap_err();
        assert!(matches!(err, StorageError::DroneNotFound(_)));

        // First repair rolled back with the batch.
        assert_eq!(
            storage.load_pilot("P-1").unwrap().status,
            PilotStatus::Assigned
        );
    }
}
