//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::sync::DeletePolicy;

/// Device recordings directory for the OpenQuestCapture app.
pub const DEFAULT_DEVICE_DIR: &str =
    "/sdcard/Android/data/com.samusynth.OpenQuestCapture/files";

/// Fetch new OpenQuestCapture recordings from the Quest and prune recordings
/// that are now safely stored locally.
#[derive(Parser, Debug)]
#[command(name = "qrsync", version, about)]
pub struct Cli {
    /// Device recordings directory.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DEVICE_DIR)]
    pub device_dir: String,

    /// Local recordings directory (created if missing).
    #[arg(long, value_name = "PATH", default_value = "recordings")]
    pub local_dir: PathBuf,

    /// Print actions without pulling or deleting.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not delete any recordings from the device.
    #[arg(long)]
    pub no_delete: bool,

    /// Delete only sessions that already existed locally before this run.
    /// By default, newly pulled sessions are also deleted from the device.
    #[arg(long)]
    pub delete_old_only: bool,
}

impl Cli {
    /// Flag precedence: --no-delete wins over --delete-old-only.
    pub fn delete_policy(&self) -> DeletePolicy {
        if self.no_delete {
            DeletePolicy::Disabled
        } else if self.delete_old_only {
            DeletePolicy::OldOnly
        } else {
            DeletePolicy::LocalAfterRun
        }
    }
}
