//! Pure planning logic: which sessions to pull, which to delete.
//!
//! Everything here is a function of the two start-of-run snapshots plus the
//! deletion policy. No I/O, no hidden state, so re-planning from the same
//! snapshots always yields the same plan.

use std::collections::BTreeSet;

/// What may be deleted from the device after the pull phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// `--no-delete`: never delete anything.
    Disabled,
    /// `--delete-old-only`: only sessions that were already local before
    /// this run.
    OldOnly,
    /// Default: every session with a confirmed local copy after the pull
    /// phase, i.e. already-local ones plus successfully pulled ones.
    LocalAfterRun,
}

/// The pull-phase plan derived from the remote and local snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// On the device but not local: pull these, ascending.
    pub new_sessions: Vec<String>,
    /// On the device and already local, ascending.
    pub old_sessions: Vec<String>,
}

/// Partition the remote sessions against the local inventory snapshot.
///
/// `remote` is expected in ascending order (the listing layer sorts it);
/// order is preserved, so both output lists are chronological.
pub fn plan(remote: &[String], local_before: &BTreeSet<String>) -> SyncPlan {
    let (old_sessions, new_sessions) = remote
        .iter()
        .cloned()
        .partition(|s| local_before.contains(s));
    SyncPlan {
        new_sessions,
        old_sessions,
    }
}

/// Compute the deletion candidate set for a policy.
///
/// Under the default policy only `pulled_ok` joins the old sessions; sessions
/// whose pull failed have no confirmed local copy and must stay on the
/// device. First-seen order is preserved, duplicates dropped.
pub fn delete_candidates(
    policy: DeletePolicy,
    plan: &SyncPlan,
    pulled_ok: &[String],
) -> Vec<String> {
    match policy {
        DeletePolicy::Disabled => Vec::new(),
        DeletePolicy::OldOnly => plan.old_sessions.clone(),
        DeletePolicy::LocalAfterRun => {
            let mut seen: BTreeSet<&str> = BTreeSet::new();
            plan.old_sessions
                .iter()
                .chain(pulled_ok)
                .filter(|s| seen.insert(s.as_str()))
                .cloned()
                .collect()
        }
    }
}
