//! Placement readiness engine for campus placement drives.
//!
//! The `readiness` module holds the scoring, caching, matching, and cohort
//! analytics core along with its HTTP router; `roster` parses placement cell
//! CSV exports; `config`, `telemetry`, and `error` carry the runtime wiring
//! binaries embed.

pub mod config;
pub mod error;
pub mod readiness;
pub mod roster;
pub mod telemetry;
