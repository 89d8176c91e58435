//! Design-rule checks and the engine that runs them.
//!
//! Every check implements [`Check`] and reports through a [`FindingsSink`],
//! so checkers never construct [`Finding`] records directly. The sink stamps
//! the producing check's id, which lets a [`FindingBoard`] replace exactly one
//! producer's findings on re-run while leaving the others untouched.

pub mod polarity;
pub mod ports;
pub mod refine;
pub mod unused;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::Circuit;

pub use polarity::PolarityCheck;
pub use ports::PortConnectionCheck;
pub use refine::RefinementCheck;
pub use unused::UnusedPortCheck;

/// How serious a finding is.
///
/// Ordered from least to most severe, so threshold comparisons can use `>=`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single design-rule finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Id of the check that produced this finding.
    pub check_id: String,
    pub severity: Severity,
    /// Where in the circuit the problem sits, e.g. `"led1.anode->GND"`.
    pub location: String,
    pub message: String,
}

/// Receiver for check output.
///
/// Checks stay agnostic of how findings are stored or rendered; they only
/// know how to describe a problem.
pub trait FindingsSink {
    fn report(&mut self, location: &str, message: &str, severity: Severity);
}

/// A [`FindingsSink`] that collects findings for one producing check.
#[derive(Debug, Clone)]
pub struct FindingLog {
    check_id: String,
    findings: Vec<Finding>,
}

impl FindingLog {
    pub fn new(check_id: impl Into<String>) -> Self {
        Self {
            check_id: check_id.into(),
            findings: Vec::new(),
        }
    }

    pub fn check_id(&self) -> &str {
        &self.check_id
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

impl FindingsSink for FindingLog {
    fn report(&mut self, location: &str, message: &str, severity: Severity) {
        self.findings.push(Finding {
            check_id: self.check_id.clone(),
            severity,
            location: location.to_string(),
            message: message.to_string(),
        });
    }
}

/// Findings grouped by producing check, with per-producer replacement.
///
/// Re-running one check replaces only that check's findings; everything the
/// other checks reported earlier stays in place. Producers keep their first
/// registration order across replacements.
#[derive(Debug, Clone, Default)]
pub struct FindingBoard {
    entries: Vec<(String, Vec<Finding>)>,
}

impl FindingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the findings of one producer, keeping all other producers.
    pub fn replace(&mut self, check_id: &str, findings: Vec<Finding>) {
        match self.entries.iter_mut().find(|(id, _)| id == check_id) {
            Some((_, slot)) => *slot = findings,
            None => self.entries.push((check_id.to_string(), findings)),
        }
    }

    /// Drop one producer's findings entirely.
    pub fn clear_producer(&mut self, check_id: &str) {
        self.entries.retain(|(id, _)| id != check_id);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All findings, grouped by producer in first-registration order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.entries.iter().flat_map(|(_, findings)| findings)
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, findings)| findings.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single design-rule check over a circuit snapshot.
pub trait Check: Send + Sync {
    /// Stable id used for findings attribution and check selection.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Inspect the circuit and report findings into `sink`.
    fn run(&self, circuit: &Circuit, sink: &mut dyn FindingsSink);
}

/// Runs a fixed set of checks over a circuit snapshot.
pub struct CheckEngine {
    checks: Vec<Arc<dyn Check>>,
}

impl CheckEngine {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Engine with the built-in check set in its canonical order.
    pub fn with_default_checks() -> Self {
        let mut engine = Self::new();
        engine.add_check(Arc::new(PortConnectionCheck));
        engine.add_check(Arc::new(PolarityCheck));
        engine.add_check(Arc::new(UnusedPortCheck));
        engine.add_check(Arc::new(RefinementCheck::new()));
        engine
    }

    pub fn add_check(&mut self, check: Arc<dyn Check>) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Arc<dyn Check>] {
        &self.checks
    }

    /// Run every check in registration order and collect the findings.
    pub fn analyze(&self, circuit: &Circuit) -> Vec<Finding> {
        let mut findings = Vec::new();
        for check in &self.checks {
            let mut log = FindingLog::new(check.id());
            check.run(circuit, &mut log);
            findings.extend(log.into_findings());
        }
        findings
    }

    /// Run every check and publish each one's findings onto `board`,
    /// replacing what that check reported before.
    pub fn analyze_into(&self, circuit: &Circuit, board: &mut FindingBoard) {
        for check in &self.checks {
            let mut log = FindingLog::new(check.id());
            check.run(circuit, &mut log);
            board.replace(check.id(), log.into_findings());
        }
    }
}

impl Default for CheckEngine {
    fn default() -> Self {
        Self::with_default_checks()
    }
}
