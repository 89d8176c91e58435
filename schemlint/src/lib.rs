//! Schemlint - design-rule analysis for schematic circuit models
//!
//! This library checks circuit documents for common modelling mistakes:
//! port connections with mismatched protocols or incomplete role wiring,
//! possible reversed-polarity connections, unused ports, and generic
//! microcontrollers that can be refined to concrete models.
//!
//! # Quick Start
//!
//! ```no_run
//! use schemlint::{AnalysisOptions, SchemlintCore};
//! use std::path::Path;
//!
//! let options = AnalysisOptions::default();
//! let report = SchemlintCore::analyze_file(
//!     Path::new("blinker.ckt"),
//!     options,
//! ).unwrap();
//!
//! for finding in &report.findings {
//!     println!("{}: {} ({})", finding.severity, finding.message, finding.location);
//! }
//! ```
//!
//! # Features
//!
//! - **Port connection checking**: protocol agreement and role completeness
//! - **Polarity hazard detection**: direct, through serial-impedance parts,
//!   and through flattened named nets
//! - **Microcontroller refinement**: usage-derived requirements matched
//!   against a capability catalog

pub mod catalog;
pub mod checks;
pub mod core;
pub mod graph;
pub mod model;
pub mod query;

// Re-export main types
pub use crate::core::{
    discover_circuit_files, load_circuit, AnalysisOptions, AnalysisReport, AnalysisStats,
    SchemlintCore, SchemlintError,
};
pub use catalog::McuProfile;
pub use checks::refine::{McuRefiner, RefinementReport, RefinementSuggestion};
pub use checks::{Check, CheckEngine, Finding, FindingBoard, FindingLog, FindingsSink, Severity};
pub use graph::CircuitGraph;
pub use model::{Circuit, ModelError, PartKind, Polarity};

/// Parse a circuit document from a JSON string (convenience wrapper).
pub fn parse_circuit(json: &str) -> Result<Circuit, SchemlintError> {
    let doc: model::doc::CircuitDoc =
        serde_json::from_str(json).map_err(|e| SchemlintError::Parse(e.to_string()))?;
    Ok(doc.resolve()?)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AnalysisOptions, AnalysisReport, AnalysisStats, Circuit, Finding, SchemlintCore,
        SchemlintError, Severity,
    };
}
