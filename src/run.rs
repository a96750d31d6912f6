//! Top-level run orchestration.
//!
//! A single linear pipeline: preflight, snapshot, plan, pull, delete,
//! summarize. Everything is recomputed fresh each run; the local directory
//! tree is the only durable record of what has been synced, which makes
//! re-running after a partial failure the natural retry path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::device::adb::AdbTransport;
use crate::device::{DeviceTransport, TransportError};
use crate::sessions;
use crate::sync::{RunOutcome, SyncExecutor, delete_candidates, plan};

/// Run the sync pipeline with the real adb transport.
///
/// Returns the process exit code: 0 for success (including nothing to do),
/// 1 when any session failed to pull or delete. Precondition failures come
/// back as `Err` and are mapped to exit 1 by `main`.
pub fn run(cli: &Cli) -> Result<u8> {
    let transport = AdbTransport::new(cli.dry_run);
    run_with_transport(cli, &transport)
}

/// Pipeline body, generic over the transport so tests can script one.
pub fn run_with_transport<T: DeviceTransport>(cli: &Cli, transport: &T) -> Result<u8> {
    let local_dir = resolve_local_dir(&cli.local_dir);
    std::fs::create_dir_all(&local_dir)
        .with_context(|| format!("failed to create {}", local_dir.display()))?;

    if !transport.is_available() {
        return Err(TransportError::AdbMissing.into());
    }
    let serial = connected_serial(transport)?;
    println!("Using device: {serial}");
    println!("Local directory: {}", local_dir.display());

    let entries = transport.list_remote_entries(&cli.device_dir)?;
    let remote = sessions::filter_sessions(entries);
    if remote.is_empty() {
        println!("No recording sessions found on the device.");
        return Ok(0);
    }

    let local_before = sessions::list_local_sessions(&local_dir)
        .with_context(|| format!("failed to read {}", local_dir.display()))?;
    let plan = plan(&remote, &local_before);

    println!("Device sessions: {}", remote.len());
    println!("New sessions to pull: {}", plan.new_sessions.len());
    println!("Already local sessions: {}", plan.old_sessions.len());

    let executor = SyncExecutor::new(transport, &cli.device_dir, &local_dir, cli.dry_run);
    let mut outcome = RunOutcome::default();
    executor.pull_all(&plan.new_sessions, &mut outcome);

    let policy = cli.delete_policy();
    if cli.no_delete {
        println!("Deletion disabled (--no-delete).");
    }
    let candidates = delete_candidates(policy, &plan, &outcome.pulled_ok);
    executor.delete_all(&candidates, &mut outcome);

    print_summary(&outcome);
    Ok(if outcome.failed() { 1 } else { 0 })
}

/// Pick the device to sync from, failing loudly on the unauthorized case.
///
/// A connected-but-unauthorized headset needs the operator to accept the USB
/// debugging prompt, which deserves a different message than "no device".
/// With several connected devices the first serial wins.
fn connected_serial<T: DeviceTransport>(transport: &T) -> Result<String, TransportError> {
    let devices = transport.list_devices()?;
    if let Some(serial) = devices.connected.first() {
        return Ok(serial.clone());
    }
    if devices.unauthorized.is_empty() {
        Err(TransportError::NoDevice)
    } else {
        Err(TransportError::DeviceUnauthorized)
    }
}

/// Expand a leading `~` and make the path absolute.
fn resolve_local_dir(local_dir: &Path) -> PathBuf {
    let expanded = expand_tilde(local_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = s.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

/// Final report. Every count is printed even when zero, so "nothing failed"
/// is stated rather than implied, and failed sessions are listed by id.
fn print_summary(outcome: &RunOutcome) {
    println!();
    println!("Summary:");
    println!("  pulled:        {}", outcome.pulled_ok.len());
    println!("  pull failed:   {}", outcome.pull_failed.len());
    println!("  deleted:       {}", outcome.deleted_ok.len());
    println!("  delete failed: {}", outcome.delete_failed.len());
    if !outcome.pull_failed.is_empty() {
        eprintln!("Failed pulls: {}", outcome.pull_failed.join(", "));
    }
    if !outcome.delete_failed.is_empty() {
        eprintln!("Failed deletes: {}", outcome.delete_failed.join(", "));
    }
}
