//! # duskr library
//!
//! Internal library for the duskr binary.
//!
//! duskr walks a group of networked smart lamps through an evening schedule
//! anchored on the local sunset: warm light shortly before sunset, dimmer
//! light at night, lights off after midnight, and a restore of the original
//! lamp states on shutdown.
//!
//! ## Architecture
//!
//! - **Core**: `timeline` (ordered event queue with an interruptible blocking
//!   wait), `schedule` (daily refill from sunset data), `scheduler` (the main
//!   wait/trigger/refill loop)
//! - **Domain**: `lamp` (target states and flash-avoiding transitions),
//!   `snapshot` (save/restore of pre-run device state)
//! - **Collaborators**: `sunset` (sunrise-sunset.org client with a fixed local
//!   fallback), `device` (adapter trait and group assembly), `sim` (in-memory
//!   adapter for development and tests)
//! - **Infrastructure**: signal handling, configuration, logging, CLI parsing

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod config;
pub mod constants;
pub mod device;
pub mod lamp;
pub mod schedule;
pub mod scheduler;
pub mod signals;
pub mod sim;
pub mod snapshot;
pub mod sunset;
pub mod timeline;
pub mod utils;
