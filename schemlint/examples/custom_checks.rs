//! Example: using CheckEngine with a custom check (without SchemlintCore).
//! Run with: cargo run --example custom_checks [path/to/file.ckt]

use std::path::Path;
use std::sync::Arc;

use schemlint::checks::{Check, FindingsSink};
use schemlint::{load_circuit, CheckEngine, Circuit, Severity};

/// Flags part names containing upper-case letters.
struct LowercaseNamesCheck;

impl Check for LowercaseNamesCheck {
    fn id(&self) -> &str {
        "lowercase_names"
    }

    fn name(&self) -> &str {
        "Lowercase Part Names"
    }

    fn run(&self, circuit: &Circuit, sink: &mut dyn FindingsSink) {
        for (_, part) in circuit.parts() {
            if part.name.chars().any(|c| c.is_ascii_uppercase()) {
                sink.report(
                    &part.name,
                    &format!("Part name {} should be lower-case", part.name),
                    Severity::Info,
                );
            }
        }
    }
}

fn main() -> Result<(), schemlint::SchemlintError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "schemlint/tests/fixtures/ports_mismatch.ckt".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_checks [path/to/file.ckt]");
        std::process::exit(1);
    }

    let circuit = load_circuit(path)?;
    let mut engine = CheckEngine::with_default_checks();
    engine.add_check(Arc::new(LowercaseNamesCheck));
    let findings = engine.analyze(&circuit);

    println!(
        "Custom analysis found {} findings for {}",
        findings.len(),
        path.display()
    );
    for finding in &findings {
        println!("  [{}] {} ({})", finding.severity, finding.message, finding.location);
    }

    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
