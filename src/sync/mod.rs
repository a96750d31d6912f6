//! Sync pipeline: plan, then apply.
//!
//! The pipeline works from two snapshots taken at the start of the run, the
//! remote listing and the local inventory. Neither is re-queried after pulls
//! or deletes; the plan is computed once and applied. The subtlety worth
//! keeping in mind: under the default policy the deletion set is built from
//! the sessions that were *actually* pulled this run, not from everything the
//! plan intended to pull, so a failed pull can never lead to a deleted
//! original.
//!
//! - **planner**: pure set arithmetic over the two snapshots
//! - **executor**: drives the transport over the plan, continue-on-failure

pub mod executor;
pub mod planner;

pub use executor::{RunOutcome, SyncExecutor};
pub use planner::{DeletePolicy, SyncPlan, delete_candidates, plan};
