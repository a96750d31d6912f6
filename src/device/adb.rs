//! The real adb-backed transport.
//!
//! Each operation wraps one `adb` invocation with `std::process::Command`,
//! captures output, and maps a nonzero exit status to
//! [`TransportError::CommandFailed`] carrying the trimmed stderr (falling back
//! to stdout, since adb writes some errors there). One command runs at a
//! time; each blocks until the tool exits. No timeouts are imposed, so a hung
//! adb hangs the run.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Output};

use super::{DeviceList, DeviceTransport, TransportError};

/// Transport over the `adb` CLI.
pub struct AdbTransport {
    /// With dry-run set, pull/delete only print intent and report success.
    dry_run: bool,
}

impl AdbTransport {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Run an adb subcommand, failing on a nonzero exit status.
    ///
    /// Arguments are passed through as `OsStr` so non-UTF-8 paths reach adb
    /// unmangled; the lossy rendering is only for diagnostics.
    fn run_checked<I, S>(&self, args: I) -> Result<Output, TransportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command = std::iter::once("adb".to_string())
            .chain(args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(command = %command, "running adb");

        let output = Command::new("adb")
            .args(&args)
            .output()
            .map_err(|source| TransportError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Err(TransportError::CommandFailed {
                command,
                status: output.status.code().unwrap_or(-1),
                details: if stderr.is_empty() { stdout } else { stderr },
            });
        }
        Ok(output)
    }
}

impl DeviceTransport for AdbTransport {
    fn is_available(&self) -> bool {
        which::which("adb").is_ok()
    }

    fn list_devices(&self) -> Result<DeviceList, TransportError> {
        let output = self.run_checked(&["devices"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_device_table(&stdout))
    }

    fn list_remote_entries(&self, remote_dir: &str) -> Result<Vec<String>, TransportError> {
        let output = self.run_checked(&["shell", "ls", "-1", remote_dir])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(|raw| raw.trim_end_matches('\r').trim().to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }

    fn pull_dir(
        &self,
        session: &str,
        remote_path: &str,
        local_dir: &Path,
    ) -> Result<(), TransportError> {
        if self.dry_run {
            println!("[DRY-RUN] pull {} -> {}", remote_path, local_dir.display());
            return Ok(());
        }

        self.run_checked([
            OsStr::new("pull"),
            OsStr::new(remote_path),
            local_dir.as_os_str(),
        ])?;

        // adb pull can exit zero without materializing anything (e.g. an
        // empty or vanished remote directory); treat that as a failed pull.
        let local_session_dir = local_dir.join(session);
        if !local_session_dir.is_dir() {
            return Err(TransportError::PullIncomplete(local_session_dir));
        }
        Ok(())
    }

    fn delete_remote_dir(&self, remote_path: &str) -> Result<(), TransportError> {
        if self.dry_run {
            println!("[DRY-RUN] delete {remote_path}");
            return Ok(());
        }
        self.run_checked(&["shell", "rm", "-rf", remote_path])?;
        Ok(())
    }
}

/// Parse `adb devices` output into connected/unauthorized serial lists.
///
/// The first line is a header. Each following non-blank line carries at least
/// a serial and a state token; states other than `device` and `unauthorized`
/// (e.g. `offline`) are ignored, as are malformed rows.
fn parse_device_table(output: &str) -> DeviceList {
    let mut list = DeviceList::default();
    for line in output.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(serial), Some(state)) = (parts.next(), parts.next()) else {
            continue;
        };
        match state {
            "device" => list.connected.push(serial.to_string()),
            "unauthorized" => list.unauthorized.push(serial.to_string()),
            _ => {}
        }
    }
    list
}
