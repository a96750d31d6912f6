//! Device transport layer.
//!
//! Everything that touches the headset goes through the [`DeviceTransport`]
//! trait so the planner, executor, and orchestrator can be exercised against a
//! scripted fake with no device or adb binary present. The real implementation
//! is [`adb::AdbTransport`], which shells out to the `adb` CLI.
//!
//! Failure signaling has two tiers. Preflight problems (adb missing, no
//! device, device unauthorized) and listing failures are [`TransportError`]s
//! that abort the run. Per-session pull/delete failures are also returned as
//! `Err`, but the executor absorbs them into outcome lists and keeps going:
//! one bad session must never block the rest.

pub mod adb;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from the device bridge.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("adb was not found in PATH")]
    AdbMissing,

    #[error("no adb device detected")]
    NoDevice,

    #[error(
        "device is connected but unauthorized; put on the headset and allow USB debugging"
    )]
    DeviceUnauthorized,

    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("command failed ({status}): {command}\n{details}")]
    CommandFailed {
        command: String,
        status: i32,
        details: String,
    },

    #[error("pull reported success but {0} was not created")]
    PullIncomplete(PathBuf),
}

/// Serials reported by device enumeration, split by authorization state.
#[derive(Debug, Clone, Default)]
pub struct DeviceList {
    pub connected: Vec<String>,
    pub unauthorized: Vec<String>,
}

/// Minimal capability surface the sync pipeline needs from the device bridge.
pub trait DeviceTransport {
    /// Whether the bridge executable is reachable at all.
    fn is_available(&self) -> bool;

    /// Enumerate attached devices.
    fn list_devices(&self) -> Result<DeviceList, TransportError>;

    /// List raw entry names under `remote_dir`, one per line, unfiltered.
    fn list_remote_entries(&self, remote_dir: &str) -> Result<Vec<String>, TransportError>;

    /// Copy the remote directory `remote_path` into `local_dir`.
    ///
    /// Success requires both a zero exit status and `local_dir/<session>`
    /// existing afterwards; a bridge that claims success without creating the
    /// directory is reported as [`TransportError::PullIncomplete`].
    fn pull_dir(
        &self,
        session: &str,
        remote_path: &str,
        local_dir: &Path,
    ) -> Result<(), TransportError>;

    /// Recursively delete `remote_path` on the device.
    fn delete_remote_dir(&self, remote_path: &str) -> Result<(), TransportError>;
}
