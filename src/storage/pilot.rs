//! Pilot table: upsert, load, list.

use rusqlite::Row;

use crate::model::{Pilot, PilotStatus};

use super::{Result, Storage, StorageError, parse_money_column};

impl Storage {
    /// Inserts or replaces a pilot, keyed by pilot id.
    pub fn upsert_pilot(&self, pilot: &Pilot) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pilots (pilot_id, location, status, certifications, skills,
                                 daily_rate, current_assignment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (pilot_id) DO UPDATE SET
                 location = excluded.location,
                 status = excluded.status,
                 certifications = excluded.certifications,
                 skills = excluded.skills,
                 daily_rate = excluded.daily_rate,
                 current_assignment = excluded.current_assignment",
            rusqlite::params![
                &pilot.pilot_id,
                &pilot.location,
                pilot.status.as_str(),
                &pilot.certifications,
                &pilot.skills,
                pilot.daily_rate.map(|r| r.to_string()),
                pilot.current_assignment.as_deref().unwrap_or(""),
            ],
        )?;
        Ok(())
    }

    /// Loads a single pilot by id.
    pub fn load_pilot(&self, pilot_id: &str) -> Result<Pilot> {
        self.conn
            .query_row(
                "SELECT pilot_id, location, status, certifications, skills,
                        daily_rate, current_assignment
                 FROM pilots WHERE pilot_id = ?1",
                [pilot_id],
                pilot_columns,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::PilotNotFound(pilot_id.to_string())
                }
                e => e.into(),
            })
            .and_then(pilot_from_columns)
    }

    /// Lists all pilots, ordered by id.
    pub fn list_pilots(&self) -> Result<Vec<Pilot>> {
        let mut stmt = self.conn.prepare(
            "SELECT pilot_id, location, status, certifications, skills,
                    daily_rate, current_assignment
             FROM pilots ORDER BY pilot_id",
        )?;
        let rows = stmt.query_map([], pilot_columns)?;
        let mut pilots = Vec::new();
        for row in rows {
            pilots.push(pilot_from_columns(row?)?);
        }
        Ok(pilots)
    }
}

type PilotColumns = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
);

fn pilot_columns(row: &Row<'_>) -> rusqlite::Result<PilotColumns> {
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

fn pilot_from_columns(columns: PilotColumns) -> Result<Pilot> {
    let (pilot_id, location, status, certifications, skills, daily_rate, current_assignment) =
        columns;
    let status = PilotStatus::parse(&status)
        .ok_or_else(|| StorageError::Corrupt(format!("unknown pilot status: {status}")))?;
    Ok(Pilot {
        pilot_id,
        location,
        status,
        certifications,
        skills,
        daily_rate: parse_money_column(daily_rate, "daily_rate")?,
        current_assignment: (!current_assignment.is_empty()).then_some(current_assignment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;

    fn sample_pilot() -> Pilot {
        Pilot {
            pilot_id: "P-1".into(),
            location: "Delhi".into(),
            status: PilotStatus::Available,
            certifications: "Part107".into(),
            skills: "thermal,mapping".into(),
            daily_rate: Some(Decimal::from(4000)),
            current_assignment: None,
        }
    }

    #[test]
    fn upsert_and_load_pilot() {
        let storage = Storage::open_in_memory().unwrap();
        storage.upsert_pilot(&sample_pilot()).unwrap();

        let loaded = storage.load_pilot("P-1").unwrap();
        assert_eq!(loaded.status, PilotStatus::Available);
        assert_eq!(loaded.daily_rate, Some(Decimal::from(4000)));
        assert_eq!(loaded.current_assignment, None);
    }

    #[test]
    fn load_nonexistent_pilot_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let err = storage.load_pilot("P-404").unwrap_err();
        assert!(matches!(err, StorageError::PilotNotFound(_)));
    }

    #[test]
    fn assignment_round_trips() {
        let storage = Storage::open_in_memory().unwrap();
        let mut pilot = sample_pilot();
        pilot.status = PilotStatus::Assigned;
        pilot.current_assignment = Some("M-1".into());
        storage.upsert_pilot(&pilot).unwrap();

        let loaded = storage.load_pilot("P-1").unwrap();
        assert_eq!(loaded.status, PilotStatus::Assigned);
        assert_eq!(loaded.current_assignment.as_deref(), Some("M-1"));
    }

    #[test]
    fn missing_rate_round_trips_as_none() {
        let storage = Storage::open_in_memory().unwrap();
        let mut pilot = sample_pilot();
        pilot.daily_rate = None;
        storage.upsert_pilot(&pilot).unwrap();

        assert_eq!(storage.load_pilot("P-1").unwrap().daily_rate, None);
    }
}
