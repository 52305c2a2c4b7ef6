//! Drone table: upsert, load, list.

use rusqlite::Row;

use crate::model::{Drone, DroneStatus};

use super::{Result, Storage, StorageError, parse_date_column};

impl Storage {
    /// Inserts or replaces a drone, keyed by drone id.
    pub fn upsert_drone(&self, drone: &Drone) -> Result<()> {
        self.conn.execute(
            "INSERT INTO drones (drone_id, location, status, capabilities,
                                 weather_resistance, maintenance_due, current_assignment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (drone_id) DO UPDATE SET
                 location = excluded.location,
                 status = excluded.status,
                 capabilities = excluded.capabilities,
                 weather_resistance = excluded.weather_resistance,
                 maintenance_due = excluded.maintenance_due,
                 current_assignment = excluded.current_assignment",
            rusqlite::params![
                &drone.drone_id,
                &drone.location,
                drone.status.as_str(),
                &drone.capabilities,
                &drone.weather_resistance,
                drone.maintenance_due.map(|d| d.to_string()),
                drone.current_assignment.as_deref().unwrap_or(""),
            ],
        )?;
        Ok(())
    }

    /// Loads a single drone by id.
    pub fn load_drone(&self, drone_id: &str) -> Result<Drone> {
        self.conn
            .query_row(
                "SELECT drone_id, location, status, capabilities, weather_resistance,
                        maintenance_due, current_assignment
                 FROM drones WHERE drone_id = ?1",
                [drone_id],
                drone_columns,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::DroneNotFound(drone_id.to_string())
                }
                e => e.into(),
            })
            .and_then(drone_from_columns)
    }

    /// Lists all drones, ordered by id.
    pub fn list_drones(&self) -> Result<Vec<Drone>> {
        let mut stmt = self.conn.prepare(
            "SELECT drone_id, location, status, capabilities, weather_resistance,
                    maintenance_due, current_assignment
             FROM drones ORDER BY drone_id",
        )?;
        let rows = stmt.query_map([], drone_columns)?;
        let mut drones = Vec::new();
        for row in rows {
            drones.push(drone_from_columns(row?)?);
        }
        Ok(drones)
    }
}

type DroneColumns = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
);

fn drone_columns(row: &Row<'_>) -> rusqlite::Result<DroneColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn drone_from_columns(columns: DroneColumns) -> Result<Drone> {
    let (
        drone_id,
        location,
        status,
        capabilities,
        weather_resistance,
        maintenance_due,
        current_assignment,
    ) = columns;
    let status = DroneStatus::parse(&status)
        .ok_or_else(|| StorageError::Corrupt(format!("unknown drone status: {status}")))?;
    Ok(Drone {
        drone_id,
        location,
        status,
        capabilities,
        weather_resistance,
        maintenance_due: parse_date_column(maintenance_due, "maintenance_due")?,
        current_assignment: (!current_assignment.is_empty()).then_some(current_assignment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    fn sample_drone() -> Drone {
        Drone {
            drone_id: "D-1".into(),
            location: "Delhi".into(),
            status: DroneStatus::Available,
            capabilities: "thermal camera".into(),
            weather_resistance: "IP43".into(),
            maintenance_due: Some(date(2025, 4, 1)),
            current_assignment: None,
        }
    }

    #[test]
    fn upsert_and_load_drone() {
        let storage = Storage::open_in_memory().unwrap();
        storage.upsert_drone(&sample_drone()).unwrap();

        let loaded = storage.load_drone("D-1").unwrap();
        assert_eq!(loaded.status, DroneStatus::Available);
        assert_eq!(loaded.maintenance_due, Some(date(2025, 4, 1)));
    }

    #[test]
    fn load_nonexistent_drone_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let err = storage.load_drone("D-404").unwrap_err();
        assert!(matches!(err, StorageError::DroneNotFound(_)));
    }

    #[test]
    fn unscheduled_maintenance_round_trips_as_none() {
        let storage = Storage::open_in_memory().unwrap();
        let mut drone = sample_drone();
        drone.maintenance_due = None;
        storage.upsert_drone(&drone).unwrap();

        assert_eq!(storage.load_drone("D-1").unwrap().maintenance_due, None);
    }

    #[test]
    fn corrupt_status_is_surfaced() {
        let storage = Storage::open_in_memory().unwrap();
        storage.upsert_drone(&sample_drone()).unwrap();
        storage
            .conn
            .execute("UPDATE drones SET status = 'vaporized'", [])
            .unwrap();

        let err = storage.load_drone("D-1").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
