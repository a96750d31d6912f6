//! Session identifiers and the local recording inventory.
//!
//! A recording session is a single folder named with a fixed-width
//! `YYYYMMDD_HHMMSS` token. Because the token is zero-padded, lexicographic
//! order is chronological order, so sorted listings need no extra parsing.
//! Anything on the device or in the local directory that does not match the
//! token exactly (stray files, partial transfers, unrelated folders) is
//! invisible to the sync logic: never pulled, never deleted.

use std::collections::BTreeSet;
use std::path::Path;

/// True iff `s` is exactly 8 ASCII digits, an underscore, then 6 ASCII digits.
pub fn is_valid_session_id(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 15
        && b[..8].iter().all(u8::is_ascii_digit)
        && b[8] == b'_'
        && b[9..].iter().all(u8::is_ascii_digit)
}

/// Filter raw listing entries down to valid session ids, sorted ascending.
pub fn filter_sessions<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sessions: Vec<String> = names
        .into_iter()
        .filter(|n| is_valid_session_id(n.as_ref()))
        .map(|n| n.as_ref().to_string())
        .collect();
    sessions.sort();
    sessions
}

/// Snapshot the session ids already materialized under `local_dir`.
///
/// A missing directory is an empty inventory, not an error: the first run has
/// nothing local yet. Only direct children that are directories with valid
/// session names count.
pub fn list_local_sessions(local_dir: &Path) -> std::io::Result<BTreeSet<String>> {
    let mut sessions = BTreeSet::new();
    if !local_dir.exists() {
        return Ok(sessions);
    }
    for entry in std::fs::read_dir(local_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if let Some(name) = name.to_str()
            && is_valid_session_id(name)
        {
            sessions.insert(name.to_string());
        }
    }
    Ok(sessions)
}
