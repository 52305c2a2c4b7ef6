//! Core data model for Sortie.
//!
//! These types are the post-normalization records the engine reads:
//! missions, pilots, drones, and the derived candidate pairings.

mod candidate;
mod drone;
mod mission;
mod pilot;

pub use candidate::Candidate;
pub use drone::{Drone, DroneStatus};
pub use mission::{Assignment, Mission, Priority};
pub use pilot::{Pilot, PilotStatus};
