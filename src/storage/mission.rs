//! Mission table: upsert, load, list.

use rusqlite::Row;

use crate::model::{Assignment, Mission, Priority};

use super::{Result, Storage, StorageError, parse_date_column, parse_money_column};

impl Storage {
    /// Inserts or replaces a mission, keyed by project id.
    pub fn upsert_mission(&self, mission: &Mission) -> Result<()> {
        self.conn.execute(
            "INSERT INTO missions (project_id, location, start_date, end_date, budget,
                                   priority, required_certs, required_skills,
                                   weather_forecast, current_assignment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (project_id) DO UPDATE SET
                 location = excluded.location,
                 start_date = excluded.start_date,
                 end_date = excluded.end_date,
                 budget = excluded.budget,
                 priority = excluded.priority,
                 required_certs = excluded.required_certs,
                 required_skills = excluded.required_skills,
                 weather_forecast = excluded.weather_forecast,
                 current_assignment = excluded.current_assignment",
            rusqlite::params![
                &mission.project_id,
                &mission.location,
                mission.start_date.map(|d| d.to_string()),
                mission.end_date.map(|d| d.to_string()),
                mission.budget.map(|b| b.to_string()),
                mission.priority.as_str(),
                &mission.required_certs,
                &mission.required_skills,
                &mission.weather_forecast,
                assignment_field(mission.current_assignment.as_ref()),
            ],
        )?;
        Ok(())
    }

    /// Loads a single mission by project id.
    pub fn load_mission(&self, project_id: &str) -> Result<Mission> {
        self.conn
            .query_row(
                "SELECT project_id, location, start_date, end_date, budget, priority,
                        required_certs, required_skills, weather_forecast, current_assignment
                 FROM missions WHERE project_id = ?1",
                [project_id],
                mission_columns,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::MissionNotFound(project_id.to_string())
                }
                e => e.into(),
            })
            .and_then(mission_from_columns)
    }

    /// Lists all missions, ordered by project id.
    pub fn list_missions(&self) -> Result<Vec<Mission>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id, location, start_date, end_date, budget, priority,
                    required_certs, required_skills, weather_forecast, current_assignment
             FROM missions ORDER BY project_id",
        )?;
        let rows = stmt.query_map([], mission_columns)?;
        let mut missions = Vec::new();
        for row in rows {
            missions.push(mission_from_columns(row?)?);
        }
        Ok(missions)
    }
}

type MissionColumns = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
    String,
    String,
);

fn mission_columns(row: &Row<'_>) -> rusqlite::Result<MissionColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn mission_from_columns(columns: MissionColumns) -> Result<Mission> {
    let (
        project_id,
        location,
        start_date,
        end_date,
        budget,
        priority,
        required_certs,
        required_skills,
        weather_forecast,
        current_assignment,
    ) = columns;
    Ok(Mission {
        project_id,
        location,
        start_date: parse_date_column(start_date, "start_date")?,
        end_date: parse_date_column(end_date, "end_date")?,
        budget: parse_money_column(budget, "budget")?,
        priority: Priority::parse(&priority),
        required_certs,
        required_skills,
        weather_forecast,
        current_assignment: Assignment::parse(&current_assignment),
    })
}

/// The persisted assignment column: the pipe format, or empty when
/// unassigned. Downstream readers depend on this exact layout.
pub(super) fn assignment_field(assignment: Option<&Assignment>) -> String {
    assignment.map(Assignment::to_field).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;
    use rust_decimal::Decimal;

    fn sample_mission() -> Mission {
        Mission {
            project_id: "M-1".into(),
            location: "Delhi".into(),
            start_date: Some(date(2025, 3, 10)),
            end_date: Some(date(2025, 3, 11)),
            budget: Some(Decimal::from(10000)),
            priority: Priority::Urgent,
            required_certs: "Part107".into(),
            required_skills: "thermal,mapping".into(),
            weather_forecast: "clear".into(),
            current_assignment: None,
        }
    }

    #[test]
    fn upsert_and_load_mission() {
        let storage = Storage::open_in_memory().unwrap();
        let mission = sample_mission();

        storage.upsert_mission(&mission).unwrap();
        let loaded = storage.load_mission("M-1").unwrap();

        assert_eq!(loaded.project_id, "M-1");
        assert_eq!(loaded.start_date, Some(date(2025, 3, 10)));
        assert_eq!(loaded.budget, Some(Decimal::from(10000)));
        assert_eq!(loaded.priority, Priority::Urgent);
        assert_eq!(loaded.current_assignment, None);
    }

    #[test]
    fn upsert_replaces_by_key() {
        let storage = Storage::open_in_memory().unwrap();
        let mut mission = sample_mission();
        storage.upsert_mission(&mission).unwrap();

        mission.location = "Mumbai".into();
        storage.upsert_mission(&mission).unwrap();

        let missions = storage.list_missions().unwrap();
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].location, "Mumbai");
    }

    #[test]
    fn load_nonexistent_mission_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let err = storage.load_mission("M-404").unwrap_err();
        assert!(matches!(err, StorageError::MissionNotFound(_)));
    }

    #[test]
    fn assignment_round_trips_pipe_format() {
        let storage = Storage::open_in_memory().unwrap();
        let mut mission = sample_mission();
        mission.current_assignment = Some(Assignment {
            pilot_id: "P-1".into(),
            drone_id: "D-1".into(),
        });
        storage.upsert_mission(&mission).unwrap();

        let raw: String = storage
            .conn
            .query_row(
                "SELECT current_assignment FROM missions WHERE project_id = 'M-1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, "P-1 | D-1");

        let loaded = storage.load_mission("M-1").unwrap();
        assert_eq!(loaded.current_assignment, mission.current_assignment);
    }

    #[test]
    fn list_missions_ordered_by_id() {
        let storage = Storage::open_in_memory().unwrap();
        let mut m2 = sample_mission();
        m2.project_id = "M-2".into();
        storage.upsert_mission(&m2).unwrap();
        storage.upsert_mission(&sample_mission()).unwrap();

        let ids: Vec<String> = storage
            .list_missions()
            .unwrap()
            .into_iter()
            .map(|m| m.project_id)
            .collect();
        assert_eq!(ids, vec!["M-1", "M-2"]);
    }

    #[test]
    fn missing_dates_survive_round_trip() {
        let storage = Storage::open_in_memory().unwrap();
        let mut mission = sample_mission();
        mission.start_date = None;
        mission.budget = None;
        storage.upsert_mission(&mission).unwrap();

        let loaded = storage.load_mission("M-1").unwrap();
        assert_eq!(loaded.start_date, None);
        assert_eq!(loaded.budget, None);
    }
}
