//! Simple analysis example: analyze a circuit document and print results.

use schemlint::prelude::*;
use std::path::Path;

fn main() -> Result<(), SchemlintError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "schemlint/tests/fixtures/ports_mismatch.ckt".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_check [path/to/file.ckt]");
        std::process::exit(1);
    }

    let report = SchemlintCore::analyze_file(path, AnalysisOptions::default())?;

    println!("Analysis results for: {}", report.file.display());
    println!("Circuit: {}", report.circuit);
    println!("Total findings: {}", report.total_findings());
    println!();

    if report.stats.errors > 0 {
        println!("Errors:");
        for finding in report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
        {
            println!("  - {}", finding.message);
            println!("    Location: {}", finding.location);
        }
    }

    if report.has_errors() {
        println!("\nAnalysis failed (errors found).");
        std::process::exit(1);
    }

    println!("\nAnalysis passed (no errors).");
    Ok(())
}
