//! Core analysis logic shared by library consumers and the CLI.
//! No rendering or process-exit concerns here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::load_profiles_from_file;
use crate::checks::refine::McuRefiner;
use crate::checks::{
    Check, CheckEngine, Finding, PolarityCheck, PortConnectionCheck, RefinementCheck, Severity,
    UnusedPortCheck,
};
use crate::model::doc::CircuitDoc;
use crate::model::{Circuit, ModelError};

#[derive(Debug, thiserror::Error)]
pub enum SchemlintError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Model(#[from] ModelError),
}

/// Options for analysis runs.
#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    /// Check ids to run; empty selects every built-in check.
    pub checks: Vec<String>,
    /// Replacement microcontroller catalog file, if any.
    pub catalog: Option<PathBuf>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            checks: vec![],
            catalog: None,
        }
    }
}

/// Per-file analysis result with findings and counts.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub file: PathBuf,
    /// Name of the analyzed circuit.
    pub circuit: String,
    pub findings: Vec<Finding>,
    pub stats: AnalysisStats,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisStats {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl AnalysisReport {
    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn has_warnings_or_errors(&self) -> bool {
        self.stats.errors > 0 || self.stats.warnings > 0
    }

    pub fn total_findings(&self) -> usize {
        self.stats.errors + self.stats.warnings + self.stats.infos
    }
}

fn findings_to_stats(findings: &[Finding]) -> AnalysisStats {
    let mut errors = 0;
    let mut warnings = 0;
    let mut infos = 0;
    for finding in findings {
        match finding.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
            Severity::Info => infos += 1,
        }
    }
    AnalysisStats {
        errors,
        warnings,
        infos,
    }
}

/// Parse a circuit document from a JSON file and resolve it into a circuit.
pub fn load_circuit(path: &Path) -> Result<Circuit, SchemlintError> {
    let content = std::fs::read_to_string(path)?;
    let doc: CircuitDoc = serde_json::from_str(&content)
        .map_err(|e| SchemlintError::Parse(e.to_string()))?;
    Ok(doc.resolve()?)
}

/// Recursively discover circuit documents (`.ckt`) in a directory.
pub fn discover_circuit_files(dir: &Path) -> Result<Vec<PathBuf>, SchemlintError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), SchemlintError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" || name == "build" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if ext == "ckt" {
                    files.push(path);
                }
            }
        }
    }
    Ok(())
}

/// Core analysis API shared by library consumers and the CLI.
pub struct SchemlintCore;

impl SchemlintCore {
    /// Analyze an in-memory circuit with the checks selected by `options`.
    pub fn analyze_circuit(
        circuit: &Circuit,
        options: &AnalysisOptions,
    ) -> Result<Vec<Finding>, SchemlintError> {
        let engine = build_engine(options)?;
        Ok(engine.analyze(circuit))
    }

    /// Analyze a single circuit document file.
    pub fn analyze_file(
        path: &Path,
        options: AnalysisOptions,
    ) -> Result<AnalysisReport, SchemlintError> {
        let circuit = load_circuit(path)?;
        tracing::info!("Analyzing circuit {} from {:?}", circuit.name(), path);

        let findings = Self::analyze_circuit(&circuit, &options)?;
        let stats = findings_to_stats(&findings);
        Ok(AnalysisReport {
            file: path.to_path_buf(),
            circuit: circuit.name().to_string(),
            findings,
            stats,
        })
    }

    /// Analyze every circuit document in a directory tree.
    pub fn analyze_project(
        dir: &Path,
        options: AnalysisOptions,
    ) -> Result<Vec<AnalysisReport>, SchemlintError> {
        let files = discover_circuit_files(dir)?;
        let mut reports = Vec::new();
        for path in files {
            reports.push(Self::analyze_file(&path, options.clone())?);
        }
        Ok(reports)
    }
}

fn build_engine(options: &AnalysisOptions) -> Result<CheckEngine, SchemlintError> {
    let refine_check = match &options.catalog {
        Some(path) => {
            let profiles = load_profiles_from_file(path).map_err(SchemlintError::Parse)?;
            RefinementCheck::with_refiner(McuRefiner::with_catalog(profiles))
        }
        None => RefinementCheck::new(),
    };

    let all: Vec<Arc<dyn Check>> = vec![
        Arc::new(PortConnectionCheck),
        Arc::new(PolarityCheck),
        Arc::new(UnusedPortCheck),
        Arc::new(refine_check),
    ];

    for id in &options.checks {
        if !all.iter().any(|check| check.id() == id) {
            tracing::warn!("Unknown check id: {}", id);
        }
    }

    let mut engine = CheckEngine::new();
    for check in all {
        if options.checks.is_empty() || options.checks.iter().any(|id| id == check.id()) {
            engine.add_check(check);
        }
    }
    Ok(engine)
}
