use serde::{Deserialize, Serialize};

/// Outcome classification for a single endpoint check.
///
/// Ordered by where in the request lifecycle the failure happened:
/// transport, HTTP/JSON layer, contract itself, or an upstream check
/// that never produced the input this one needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Passed,
    NetworkError,
    ProtocolError,
    ContractViolation,
    DependencyUnmet,
}

impl CheckStatus {
    pub fn is_pass(self) -> bool {
        matches!(self, CheckStatus::Passed)
    }
}

/// Recorded outcome of one endpoint check.
///
/// `detail` is always populated on failure. `extracted` carries an
/// identifier a downstream check consumes (resume id, order id, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
    pub elapsed_ms: u64,
    pub extracted: Option<String>,
}

/// Ordered accumulator for one probe run. Threaded explicitly through
/// the orchestrator; there is no process-global result state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteRun {
    pub results: Vec<CheckResult>,
}

impl SuiteRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// True only for a non-empty run where every check passed.
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.failed() == 0
    }

    pub fn find(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }
}
