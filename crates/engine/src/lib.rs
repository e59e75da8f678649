mod policy;
mod report;
mod walk;

pub use policy::{CreateTimeRepair, Policy, Reconciled};
pub use report::{EntryReport, Reporter, UpdateStatus, WalkSummary};
pub use walk::TreeWalker;
