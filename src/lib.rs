//! Quest recording sync.
//!
//! Pulls OpenQuestCapture session folders from a USB-attached Quest headset
//! over adb, then prunes sessions from the device once a local copy is
//! confirmed. The durable record of "what has been synced" is the local
//! directory tree itself; every run recomputes its plan from a fresh remote
//! listing and local inventory, so re-running is always safe.
//!
//! # Architecture
//!
//! - **cli**: flag surface and deletion-policy resolution
//! - **device**: transport trait over the adb bridge, plus the real adapter
//! - **sessions**: session naming rule and local inventory snapshot
//! - **sync**: pure planner and the continue-on-failure executor
//! - **run**: preflight checks, pipeline sequencing, summary, exit mapping

pub mod cli;
pub mod device;
pub mod run;
pub mod sessions;
pub mod sync;

pub use cli::Cli;
pub use run::{run, run_with_transport};
