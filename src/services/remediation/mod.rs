//! The remediation engine: orchestrator, mutation pipeline, strategies, and
//! the reconciliation state machine.

pub mod engine;
pub mod pipeline;
pub mod reconcile;
pub mod strategies;

pub use engine::{EngineSettings, RemediationEngine};
pub use pipeline::{GroupRun, OptimisticConvergence};
pub use reconcile::{match_fixes_to_issues, IssueTransition, ReconcilePlan};
