//! Per-run log collector.
//!
//! Each engine invocation owns one `RunLog` value, threaded explicitly
//! through the calls that contribute to it and returned inside the result's
//! `detailed_log`. Entries are mirrored to `tracing` as they are appended.
//! Because the collector is a value, concurrent engine invocations cannot
//! interleave their logs.

use tracing::{info, warn};

/// Ordered log lines for one remediation run.
#[derive(Debug, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an informational line.
    pub fn add(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!(target: "sitemender::run", "{line}");
        self.lines.push(line);
    }

    /// Append a warning line, prefixed so it stands out in the result.
    pub fn warn(&mut self, line: impl Into<String>) {
        let line = line.into();
        warn!(target: "sitemender::run", "{line}");
        self.lines.push(format!("WARNING: {line}"));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the collector into the result's `detailed_log`.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_and_marks_warnings() {
        let mut log = RunLog::new();
        log.add("first");
        log.warn("second");
        log.add("third");
        assert_eq!(
            log.into_lines(),
            vec!["first", "WARNING: second", "third"]
        );
    }
}
