//! Double-booking detection against committed assignments.
//!
//! A conflict exists when a resource is already committed to a *different*
//! mission whose date range overlaps the candidate mission's. Only committed
//! state is consulted: two candidates in the same result list can each be
//! conflict-free yet mutually exclusive, which is why confirmation re-runs
//! this check against a fresh snapshot.

use jiff::civil::Date;

use crate::model::Mission;

/// Which role a resource plays in an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Pilot,
    Drone,
}

/// Closed-interval overlap: both ranges include their endpoints, so a
/// shared boundary day counts as overlap.
pub fn overlapping(s1: Date, e1: Date, s2: Date, e2: Date) -> bool {
    s1.max(s2) <= e1.min(e2)
}

/// True when `entity_id` is committed (in the given role) to a mission other
/// than `excluding_project_id` whose dates overlap `[start, end]`.
///
/// Committed missions with unparseable dates are skipped: they are
/// ineligible for overlap comparison, not silently conflict-free by fiat.
pub fn has_conflict(
    entity_id: &str,
    kind: EntityKind,
    missions: &[Mission],
    excluding_project_id: &str,
    start: Date,
    end: Date,
) -> bool {
    missions
        .iter()
        .filter(|m| m.project_id != excluding_project_id)
        .filter(|m| {
            m.current_assignment.as_ref().is_some_and(|a| match kind {
                EntityKind::Pilot => a.pilot_id == entity_id,
                EntityKind::Drone => a.drone_id == entity_id,
            })
        })
        .any(|m| match (m.start_date, m.end_date) {
            (Some(s), Some(e)) => overlapping(start, end, s, e),
            _ => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    use crate::model::{Assignment, Priority};

    fn committed_mission(project_id: &str, pilot_id: &str, drone_id: &str) -> Mission {
        Mission {
            project_id: project_id.into(),
            location: "Delhi".into(),
            start_date: Some(date(2025, 3, 1)),
            end_date: Some(date(2025, 3, 5)),
            budget: None,
            priority: Priority::Normal,
            required_certs: String::new(),
            required_skills: String::new(),
            weather_forecast: String::new(),
            current_assignment: Some(Assignment {
                pilot_id: pilot_id.into(),
                drone_id: drone_id.into(),
            }),
        }
    }

    #[test]
    fn overlap_is_inclusive_and_symmetric() {
        let d = date;
        // A single-day mission overlaps itself.
        assert!(overlapping(d(2025, 3, 1), d(2025, 3, 1), d(2025, 3, 1), d(2025, 3, 1)));
        // [1,5] and [6,10] are disjoint.
        assert!(!overlapping(d(2025, 3, 1), d(2025, 3, 5), d(2025, 3, 6), d(2025, 3, 10)));
        // [1,5] and [5,10] share a boundary day.
        assert!(overlapping(d(2025, 3, 1), d(2025, 3, 5), d(2025, 3, 5), d(2025, 3, 10)));
        assert!(overlapping(d(2025, 3, 5), d(2025, 3, 10), d(2025, 3, 1), d(2025, 3, 5)));
    }

    #[test]
    fn committed_overlapping_mission_conflicts() {
        let missions = vec![committed_mission("M-1", "P-1", "D-1")];
        assert!(has_conflict(
            "P-1",
            EntityKind::Pilot,
            &missions,
            "M-2",
            date(2025, 3, 5),
            date(2025, 3, 8),
        ));
        assert!(has_conflict(
            "D-1",
            EntityKind::Drone,
            &missions,
            "M-2",
            date(2025, 3, 5),
            date(2025, 3, 8),
        ));
    }

    #[test]
    fn disjoint_dates_do_not_conflict() {
        let missions = vec![committed_mission("M-1", "P-1", "D-1")];
        assert!(!has_conflict(
            "P-1",
            EntityKind::Pilot,
            &missions,
            "M-2",
            date(2025, 3, 6),
            date(2025, 3, 8),
        ));
    }

    #[test]
    fn same_mission_is_excluded() {
        let missions = vec![committed_mission("M-1", "P-1", "D-1")];
        assert!(!has_conflict(
            "P-1",
            EntityKind::Pilot,
            &missions,
            "M-1",
            date(2025, 3, 1),
            date(2025, 3, 5),
        ));
    }

    #[test]
    fn role_is_matched_exactly_not_by_substring() {
        // "P-1" must not match a committed "P-10", and a pilot id must not
        // match the drone slot.
        let missions = vec![committed_mission("M-1", "P-10", "D-1")];
        assert!(!has_conflict(
            "P-1",
            EntityKind::Pilot,
            &missions,
            "M-2",
            date(2025, 3, 1),
            date(2025, 3, 5),
        ));
        assert!(!has_conflict(
            "D-1",
            EntityKind::Pilot,
            &missions,
            "M-2",
            date(2025, 3, 1),
            date(2025, 3, 5),
        ));
    }

    #[test]
    fn committed_mission_without_dates_is_skipped() {
        let mut mission = committed_mission("M-1", "P-1", "D-1");
        mission.start_date = None;
        assert!(!has_conflict(
            "P-1",
            EntityKind::Pilot,
            &[mission],
            "M-2",
            date(2025, 3, 1),
            date(2025, 3, 5),
        ));
    }

    #[test]
    fn unassigned_missions_never_conflict() {
        let mut mission = committed_mission("M-1", "P-1", "D-1");
        mission.current_assignment = None;
        assert!(!has_conflict(
            "P-1",
            EntityKind::Pilot,
            &[mission],
            "M-2",
            date(2025, 3, 1),
            date(2025, 3, 5),
        ));
    }
}
