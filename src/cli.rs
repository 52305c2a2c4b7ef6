//! CLI interface for Sortie.
//!
//! Non-interactive subcommands mirroring the coordinator's workflow: feed
//! the store, query the roster and fleet, rank candidates for a mission,
//! and confirm an assignment. Data goes to stdout, status lines to stderr.
//!
//! Record import takes JSON arrays of raw rows (every field a string, as a
//! sheet export produces); the normalizer coerces dates and amounts and
//! refuses rows it cannot classify.

mod format;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jiff::Timestamp;

use crate::config::Config;
use crate::engine::{self, Snapshot};
use crate::model::{DroneStatus, PilotStatus, Priority};
use crate::storage::Storage;
use crate::{confirm, ingest};

use format::{
    candidate_header, format_candidate, format_drone, format_inconsistency, format_mission,
    format_pilot,
};

/// Sortie — match pilots and drones to missions.
#[derive(Debug, Parser)]
#[command(name = "sortie", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: staffing a mission
  1. sortie import --missions missions.json --pilots pilots.json --drones drones.json
  2. sortie match M-042
     -> ranked (pilot, drone) pairs with cost and risk flags
  3. sortie confirm M-042 P-007 D-003
     -> re-checks conflicts against live state, then commits all three rows

Queries:
  sortie dashboard
  sortie pilots --skill thermal --location Delhi --status Available
  sortie drones --capability lidar --status Maintenance
  sortie urgent";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import raw records (JSON arrays of string rows), upserting by id.
    Import {
        /// Mission rows.
        #[arg(long)]
        missions: Option<PathBuf>,

        /// Pilot roster rows.
        #[arg(long)]
        pilots: Option<PathBuf>,

        /// Drone fleet rows.
        #[arg(long)]
        drones: Option<PathBuf>,
    },

    /// Show active assignments, the pilot roster, and the drone fleet.
    Dashboard,

    /// Query the pilot roster.
    Pilots {
        /// Substring match (case-insensitive) against pilot skills.
        #[arg(long)]
        skill: Option<String>,

        /// Substring match (case-insensitive) against pilot location.
        #[arg(long)]
        location: Option<String>,

        /// Exact status: Available, Assigned, or "On Leave".
        #[arg(long)]
        status: Option<String>,
    },

    /// Query the drone fleet.
    Drones {
        /// Substring match (case-insensitive) against drone capabilities.
        #[arg(long)]
        capability: Option<String>,

        /// Substring match (case-insensitive) against drone location.
        #[arg(long)]
        location: Option<String>,

        /// Exact status: Available, Assigned, or Maintenance.
        #[arg(long)]
        status: Option<String>,
    },

    /// Rank eligible (pilot, drone) pairs for a mission.
    ///
    /// The list is a report of options with risk annotations; nothing is
    /// written. An empty list means no viable pairing exists right now.
    Match {
        /// Mission project id.
        project_id: String,

        /// Emit candidates as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List urgent missions, each with its ranked candidates.
    Urgent,

    /// Confirm an assignment: re-check conflicts against live state, then
    /// update pilot, drone, and mission rows in one transaction.
    Confirm {
        /// Mission project id.
        project_id: String,

        /// Pilot id.
        pilot_id: String,

        /// Drone id.
        drone_id: String,
    },

    /// Detect (and unless --dry-run, repair) partial assignment state.
    Repair {
        /// Report inconsistencies without writing anything.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, mut storage: Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Import {
            missions,
            pilots,
            drones,
        } => cmd_import(
            &storage,
            missions.as_deref(),
            pilots.as_deref(),
            drones.as_deref(),
        ),
        Command::Dashboard => cmd_dashboard(&storage),
        Command::Pilots {
            skill,
            location,
            status,
        } => cmd_pilots(
            &storage,
            skill.as_deref(),
            location.as_deref(),
            status.as_deref(),
        ),
        Command::Drones {
            capability,
            location,
            status,
        } => cmd_drones(
            &storage,
            capability.as_deref(),
            location.as_deref(),
            status.as_deref(),
        ),
        Command::Match { project_id, json } => cmd_match(config, &storage, &project_id, json),
        Command::Urgent => cmd_urgent(&storage),
        Command::Confirm {
            project_id,
            pilot_id,
            drone_id,
        } => cmd_confirm(&mut storage, &project_id, &pilot_id, &drone_id),
        Command::Repair { dry_run } => cmd_repair(&mut storage, dry_run),
    }
}

fn cmd_import(
    storage: &Storage,
    missions: Option<&Path>,
    pilots: Option<&Path>,
    drones: Option<&Path>,
) -> Result<(), String> {
    if missions.is_none() && pilots.is_none() && drones.is_none() {
        return Err("specify at least one of --missions, --pilots, --drones".to_string());
    }

    if let Some(path) = missions {
        let raw: Vec<ingest::RawMission> = read_rows(path)?;
        for (index, row) in raw.iter().enumerate() {
            let mission = ingest::mission(row, index).map_err(|e| e.to_string())?;
            storage
                .upsert_mission(&mission)
                .map_err(|e| format!("failed to store mission {}: {e}", mission.project_id))?;
        }
        eprintln!("Imported {} mission(s)", raw.len());
    }

    if let Some(path) = pilots {
        let raw: Vec<ingest::RawPilot> = read_rows(path)?;
        for (index, row) in raw.iter().enumerate() {
            let pilot = ingest::pilot(row, index).map_err(|e| e.to_string())?;
            storage
                .upsert_pilot(&pilot)
                .map_err(|e| format!("failed to store pilot {}: {e}", pilot.pilot_id))?;
        }
        eprintln!("Imported {} pilot(s)", raw.len());
    }

    if let Some(path) = drones {
        let raw: Vec<ingest::RawDrone> = read_rows(path)?;
        for (index, row) in raw.iter().enumerate() {
            let drone = ingest::drone(row, index).map_err(|e| e.to_string())?;
            storage
                .upsert_drone(&drone)
                .map_err(|e| format!("failed to store drone {}: {e}", drone.drone_id))?;
        }
        eprintln!("Imported {} drone(s)", raw.len());
    }

    Ok(())
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("invalid rows in {}: {e}", path.display()))
}

fn cmd_dashboard(storage: &Storage) -> Result<(), String> {
    let snapshot = load_snapshot(storage)?;

    println!("Active assignments");
    let active: Vec<_> = snapshot
        .missions
        .iter()
        .filter(|m| m.current_assignment.is_some())
        .collect();
    if active.is_empty() {
        println!("  (none)");
    }
    for mission in active {
        println!("  {}", format_mission(mission));
    }

    println!("\nPilot roster");
    for pilot in &snapshot.pilots {
        println!("  {}", format_pilot(pilot));
    }

    println!("\nDrone fleet");
    for drone in &snapshot.drones {
        println!("  {}", format_drone(drone));
    }

    Ok(())
}

fn cmd_pilots(
    storage: &Storage,
    skill: Option<&str>,
    location: Option<&str>,
    status: Option<&str>,
) -> Result<(), String> {
    let status = status
        .map(|s| PilotStatus::parse(s).ok_or_else(|| format!("unknown pilot status: {s}")))
        .transpose()?;
    let snapshot = load_snapshot(storage)?;

    let matched = snapshot.pilots.iter().filter(|p| {
        skill.is_none_or(|s| contains_ci(&p.skills, s))
            && location.is_none_or(|l| contains_ci(&p.location, l))
            && status.is_none_or(|st| p.status == st)
    });

    let mut any = false;
    for pilot in matched {
        println!("{}", format_pilot(pilot));
        any = true;
    }
    if !any {
        println!("No matching pilots");
    }
    Ok(())
}

fn cmd_drones(
    storage: &Storage,
    capability: Option<&str>,
    location: Option<&str>,
    status: Option<&str>,
) -> Result<(), String> {
    let status = status
        .map(|s| DroneStatus::parse(s).ok_or_else(|| format!("unknown drone status: {s}")))
        .transpose()?;
    let snapshot = load_snapshot(storage)?;

    let matched = snapshot.drones.iter().filter(|d| {
        capability.is_none_or(|c| contains_ci(&d.capabilities, c))
            && location.is_none_or(|l| contains_ci(&d.location, l))
            && status.is_none_or(|st| d.status == st)
    });

    let mut any = false;
    for drone in matched {
        println!("{}", format_drone(drone));
        any = true;
    }
    if !any {
        println!("No matching drones");
    }
    Ok(())
}

fn cmd_match(
    config: &Config,
    storage: &Storage,
    project_id: &str,
    json: bool,
) -> Result<(), String> {
    let snapshot = load_snapshot(storage)?;
    let mission = snapshot
        .mission(project_id)
        .ok_or_else(|| format!("mission not found: {project_id}"))?;

    let candidates = engine::match_mission(mission, &snapshot).map_err(|e| e.to_string())?;

    // The snapshot is loaded per invocation, so this fires only when the
    // match evaluation itself outlasts the bound. Results printed after
    // that point describe store state older than the operator expects.
    if snapshot.is_stale(config.max_snapshot_age_seconds, Timestamp::now()) {
        eprintln!(
            "Warning: snapshot is older than {}s; re-run before confirming",
            config.max_snapshot_age_seconds
        );
    }

    if json {
        let out = serde_json::to_string_pretty(&candidates)
            .map_err(|e| format!("failed to serialize candidates: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    eprintln!("Mission {}", format_mission(mission));
    if candidates.is_empty() {
        println!("No valid options found");
        return Ok(());
    }
    println!("{}", candidate_header());
    for candidate in &candidates {
        println!("{}", format_candidate(candidate));
    }
    Ok(())
}

fn cmd_urgent(storage: &Storage) -> Result<(), String> {
    let snapshot = load_snapshot(storage)?;
    let urgent: Vec<_> = snapshot
        .missions
        .iter()
        .filter(|m| m.priority == Priority::Urgent)
        .collect();

    if urgent.is_empty() {
        println!("No urgent missions");
        return Ok(());
    }

    for mission in urgent {
        println!("{}", format_mission(mission));
        match engine::match_mission(mission, &snapshot) {
            Ok(candidates) if candidates.is_empty() => println!("  no valid options"),
            Ok(candidates) => {
                println!("  {}", candidate_header());
                for candidate in &candidates {
                    println!("  {}", format_candidate(candidate));
                }
            }
            Err(e) => println!("  cannot evaluate: {e}"),
        }
        println!();
    }
    Ok(())
}

fn cmd_confirm(
    storage: &mut Storage,
    project_id: &str,
    pilot_id: &str,
    drone_id: &str,
) -> Result<(), String> {
    match confirm::confirm(storage, project_id, pilot_id, drone_id) {
        Ok(confirm::Confirmation::Applied) => {
            eprintln!("Assigned {pilot_id} and {drone_id} to {project_id}");
            Ok(())
        }
        Ok(confirm::Confirmation::AlreadyApplied) => {
            eprintln!("Already assigned; nothing to do");
            Ok(())
        }
        Err(e) => Err(format!("confirmation rejected: {e}")),
    }
}

fn cmd_repair(storage: &mut Storage, dry_run: bool) -> Result<(), String> {
    let snapshot = load_snapshot(storage)?;
    let findings = confirm::audit(&snapshot);

    if findings.is_empty() {
        println!("No inconsistencies found");
        return Ok(());
    }

    for finding in &findings {
        println!("{}", format_inconsistency(finding));
    }
    if dry_run {
        eprintln!(
            "{} inconsistency(ies); not repaired (--dry-run)",
            findings.len()
        );
        return Ok(());
    }

    let repairs: Vec<_> = findings.iter().map(confirm::Inconsistency::repair).collect();
    storage
        .apply_repairs(&repairs)
        .map_err(|e| format!("repair failed: {e}"))?;
    eprintln!("Repaired {} inconsistency(ies)", findings.len());
    Ok(())
}

fn load_snapshot(storage: &Storage) -> Result<Snapshot, String> {
    storage
        .snapshot()
        .map_err(|e| format!("failed to read records: {e}"))
}

/// Case-insensitive substring match, the query convention for free-text
/// catalog fields.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
