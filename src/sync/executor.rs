//! Applies a plan against the transport, one session at a time.
//!
//! Strictly sequential: the pull phase runs to completion before the delete
//! phase starts, and within each phase sessions go in ascending order. A
//! failed session is recorded and skipped past, never retried and never
//! allowed to abort the remaining sessions; re-running the tool is the retry
//! mechanism.

use std::path::{Path, PathBuf};

use crate::device::DeviceTransport;

/// Per-session outcomes of one run, four disjoint lists.
///
/// A pull candidate lands in exactly one of `pulled_ok`/`pull_failed`; a
/// delete candidate in exactly one of `deleted_ok`/`delete_failed`.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub pulled_ok: Vec<String>,
    pub pull_failed: Vec<String>,
    pub deleted_ok: Vec<String>,
    pub delete_failed: Vec<String>,
}

impl RunOutcome {
    /// True iff any pull or delete failed; maps to exit status 1.
    pub fn failed(&self) -> bool {
        !self.pull_failed.is_empty() || !self.delete_failed.is_empty()
    }
}

/// Drives pull and delete operations for one run.
pub struct SyncExecutor<'a, T: DeviceTransport> {
    transport: &'a T,
    device_dir: &'a str,
    local_dir: PathBuf,
    /// In dry-run the transport prints `[DRY-RUN]` intent lines itself, so
    /// the per-session framing lines are suppressed here.
    dry_run: bool,
}

impl<'a, T: DeviceTransport> SyncExecutor<'a, T> {
    pub fn new(transport: &'a T, device_dir: &'a str, local_dir: &Path, dry_run: bool) -> Self {
        Self {
            transport,
            device_dir,
            local_dir: local_dir.to_path_buf(),
            dry_run,
        }
    }

    fn remote_path(&self, session: &str) -> String {
        format!("{}/{}", self.device_dir, session)
    }

    /// Pull every session in order, classifying into the outcome lists.
    pub fn pull_all(&self, sessions: &[String], outcome: &mut RunOutcome) {
        for session in sessions {
            let remote = self.remote_path(session);
            if !self.dry_run {
                println!("Pulling {session}...");
            }
            match self.transport.pull_dir(session, &remote, &self.local_dir) {
                Ok(()) => {
                    if !self.dry_run {
                        println!("  [OK]");
                    }
                    outcome.pulled_ok.push(session.clone());
                }
                Err(e) => {
                    eprintln!("  [FAIL] pull {session}: {e}");
                    tracing::warn!(session = %session, error = %e, "pull failed");
                    outcome.pull_failed.push(session.clone());
                }
            }
        }
    }

    /// Delete every candidate in order, same continue-on-failure discipline.
    pub fn delete_all(&self, sessions: &[String], outcome: &mut RunOutcome) {
        for session in sessions {
            let remote = self.remote_path(session);
            match self.transport.delete_remote_dir(&remote) {
                Ok(()) => {
                    if !self.dry_run {
                        println!("Deleted {session}");
                    }
                    outcome.deleted_ok.push(session.clone());
                }
                Err(e) => {
                    eprintln!("  [FAIL] delete {session}: {e}");
                    tracing::warn!(session = %session, error = %e, "delete failed");
                    outcome.delete_failed.push(session.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::FakeTransport;
    use crate::sync::planner::{DeletePolicy, delete_candidates, plan};

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    const DEVICE_DIR: &str = "/sdcard/Android/data/com.samusynth.OpenQuestCapture/files";

    #[test]
    fn test_pull_all_continues_past_failures() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut transport = FakeTransport::new(&[]);
        transport.failing_pulls.insert("20240102_110000".to_string());

        let executor = SyncExecutor::new(&transport, DEVICE_DIR, tmp.path(), false);
        let mut outcome = RunOutcome::default();
        executor.pull_all(
            &ids(&["20240101_100000", "20240102_110000", "20240103_120000"]),
            &mut outcome,
        );

        assert_eq!(outcome.pulled_ok, ids(&["20240101_100000", "20240103_120000"]));
        assert_eq!(outcome.pull_failed, ids(&["20240102_110000"]));
        assert!(outcome.failed());
        // The failure did not stop the third pull.
        assert_eq!(
            transport.calls(),
            vec![
                "pull 20240101_100000",
                "pull 20240102_110000",
                "pull 20240103_120000",
            ]
        );
        // Successful pulls materialized local directories.
        assert!(tmp.path().join("20240101_100000").is_dir());
        assert!(!tmp.path().join("20240102_110000").exists());
    }

    #[test]
    fn test_silent_noop_pull_counts_as_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut transport = FakeTransport::new(&[]);
        transport.silent_pulls.insert("20240101_100000".to_string());

        let executor = SyncExecutor::new(&transport, DEVICE_DIR, tmp.path(), false);
        let mut outcome = RunOutcome::default();
        executor.pull_all(&ids(&["20240101_100000"]), &mut outcome);

        assert!(outcome.pulled_ok.is_empty());
        assert_eq!(outcome.pull_failed, ids(&["20240101_100000"]));
    }

    #[test]
    fn test_delete_all_continues_past_failures() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut transport = FakeTransport::new(&[]);
        transport
            .failing_deletes
            .insert("20240101_100000".to_string());

        let executor = SyncExecutor::new(&transport, DEVICE_DIR, tmp.path(), false);
        let mut outcome = RunOutcome::default();
        executor.delete_all(&ids(&["20240101_100000", "20240102_110000"]), &mut outcome);

        assert_eq!(outcome.deleted_ok, ids(&["20240102_110000"]));
        assert_eq!(outcome.delete_failed, ids(&["20240101_100000"]));
        assert!(outcome.failed());
    }

    #[test]
    fn test_failed_pull_is_never_deleted_under_default_policy() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut transport = FakeTransport::new(&[]);
        transport.failing_pulls.insert("20240102_110000".to_string());

        let remote = ids(&["20240101_100000", "20240102_110000"]);
        let plan = plan(&remote, &Default::default());

        let executor = SyncExecutor::new(&transport, DEVICE_DIR, tmp.path(), false);
        let mut outcome = RunOutcome::default();
        executor.pull_all(&plan.new_sessions, &mut outcome);

        let candidates =
            delete_candidates(DeletePolicy::LocalAfterRun, &plan, &outcome.pulled_ok);
        executor.delete_all(&candidates, &mut outcome);

        assert_eq!(outcome.deleted_ok, ids(&["20240101_100000"]));
        assert!(!transport
            .calls()
            .iter()
            .any(|c| c == "delete 20240102_110000"));
    }

    #[test]
    fn test_pull_phase_fully_precedes_delete_phase() {
        let tmp = tempfile::TempDir::new().unwrap();
        let transport = FakeTransport::new(&[]);
        let sessions = ids(&["20240101_100000", "20240102_110000"]);

        let executor = SyncExecutor::new(&transport, DEVICE_DIR, tmp.path(), false);
        let mut outcome = RunOutcome::default();
        executor.pull_all(&sessions, &mut outcome);
        executor.delete_all(&outcome.pulled_ok.clone(), &mut outcome);

        assert_eq!(
            transport.calls(),
            vec![
                "pull 20240101_100000",
                "pull 20240102_110000",
                "delete 20240101_100000",
                "delete 20240102_110000",
            ]
        );
    }

    #[test]
    fn test_dry_run_classifies_without_touching_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut transport = FakeTransport::new(&[]);
        transport.dry_run = true;

        let executor = SyncExecutor::new(&transport, DEVICE_DIR, tmp.path(), true);
        let mut outcome = RunOutcome::default();
        executor.pull_all(&ids(&["20240101_100000"]), &mut outcome);
        executor.delete_all(&outcome.pulled_ok.clone(), &mut outcome);

        // Simulated operations count as successes but leave no trace.
        assert_eq!(outcome.pulled_ok, ids(&["20240101_100000"]));
        assert_eq!(outcome.deleted_ok, ids(&["20240101_100000"]));
        assert!(!outcome.failed());
        assert!(!tmp.path().join("20240101_100000").exists());
    }

    #[test]
    fn test_outcome_failed_flag() {
        let mut outcome = RunOutcome::default();
        assert!(!outcome.failed());
        outcome.delete_failed.push("20240101_100000".to_string());
        assert!(outcome.failed());
    }
}
