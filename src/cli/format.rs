//! Output formatting for CLI display.

use rust_decimal::Decimal;

use crate::model::{Assignment, Candidate, Drone, Mission, Pilot};

/// Header matching [`format_candidate`]'s columns.
pub(super) fn candidate_header() -> String {
    format!(
        "{:<10} {:<10} {:>5} {:>12}  {}",
        "pilot", "drone", "skill", "cost", "flags"
    )
}

/// One candidate as a table row: ids, score, cost, and active flags.
pub(super) fn format_candidate(candidate: &Candidate) -> String {
    format!(
        "{:<10} {:<10} {:>5} {:>12}  {}",
        candidate.pilot_id,
        candidate.drone_id,
        candidate.skill_score,
        format_cost(candidate.mission_cost),
        format_flags(candidate),
    )
}

fn format_cost(cost: Option<Decimal>) -> String {
    cost.map_or_else(|| "?".to_string(), |c| c.to_string())
}

/// The flags that are actually raised, comma-separated; "-" when clean.
fn format_flags(candidate: &Candidate) -> String {
    let mut flags = Vec::new();
    if candidate.budget_warning {
        flags.push("over-budget");
    }
    if candidate.pilot_conflict {
        flags.push("pilot-conflict");
    }
    if candidate.drone_conflict {
        flags.push("drone-conflict");
    }
    if candidate.weather_risk {
        flags.push("weather");
    }
    if candidate.maintenance_risk {
        flags.push("maintenance");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(", ")
    }
}

/// One audit finding as a human-readable line.
pub(super) fn format_inconsistency(finding: &crate::confirm::Inconsistency) -> String {
    use crate::confirm::Inconsistency;
    match finding {
        Inconsistency::PilotDangling { pilot_id } => {
            format!("pilot {pilot_id} is marked assigned but no mission references them")
        }
        Inconsistency::DroneDangling { drone_id } => {
            format!("drone {drone_id} is marked assigned but no mission references it")
        }
        Inconsistency::PilotNotCommitted {
            pilot_id,
            project_id,
        } => format!("mission {project_id} references pilot {pilot_id}, who is not committed to it"),
        Inconsistency::DroneNotCommitted {
            drone_id,
            project_id,
        } => format!("mission {project_id} references drone {drone_id}, which is not committed to it"),
        Inconsistency::UnknownResource { project_id } => {
            format!("mission {project_id} references a pilot or drone that does not exist")
        }
    }
}

/// One mission as a summary line.
pub(super) fn format_mission(mission: &Mission) -> String {
    let dates = match (mission.start_date, mission.end_date) {
        (Some(s), Some(e)) => format!("{s} → {e}"),
        _ => "dates unknown".to_string(),
    };
    let assignment = mission
        .current_assignment
        .as_ref()
        .map_or_else(|| "unassigned".to_string(), Assignment::to_field);
    format!(
        "{:<10} [{}] {:<12} {}  ({})",
        mission.project_id,
        mission.priority.as_str(),
        mission.location,
        dates,
        assignment,
    )
}

/// One pilot as a summary line.
pub(super) fn format_pilot(pilot: &Pilot) -> String {
    format!(
        "{:<10} [{}] {:<12} rate {:>8}  skills: {}",
        pilot.pilot_id,
        pilot.status.as_str(),
        pilot.location,
        format_cost(pilot.daily_rate),
        pilot.skills,
    )
}

/// One drone as a summary line.
pub(super) fn format_drone(drone: &Drone) -> String {
    let due = drone
        .maintenance_due
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        "{:<10} [{}] {:<12} {:<8} due {}  caps: {}",
        drone.drone_id,
        drone.status.as_str(),
        drone.location,
        drone.weather_resistance,
        due,
        drone.capabilities,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candidate() -> Candidate {
        Candidate {
            pilot_id: "P-1".into(),
            drone_id: "D-1".into(),
            skill_score: 2,
            mission_cost: Some(Decimal::from(8000)),
            budget_warning: false,
            pilot_conflict: false,
            drone_conflict: false,
            weather_risk: false,
            maintenance_risk: false,
        }
    }

    #[test]
    fn clean_candidate_shows_dash_for_flags() {
        let line = format_candidate(&sample_candidate());
        assert!(line.contains("P-1"));
        assert!(line.contains("8000"));
        assert!(line.trim_end().ends_with('-'));
    }

    #[test]
    fn raised_flags_are_listed() {
        let mut candidate = sample_candidate();
        candidate.budget_warning = true;
        candidate.weather_risk = true;
        let line = format_candidate(&candidate);
        assert!(line.contains("over-budget, weather"));
    }

    #[test]
    fn indeterminate_cost_renders_as_question_mark() {
        let mut candidate = sample_candidate();
        candidate.mission_cost = None;
        assert!(format_candidate(&candidate).contains('?'));
    }
}
