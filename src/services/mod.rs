pub mod html_edit;
pub mod keywords;
pub mod reanalysis;
pub mod remediation;
pub mod run_log;

pub use reanalysis::ScoreReanalyzer;
pub use remediation::{EngineSettings, RemediationEngine};
pub use run_log::RunLog;
