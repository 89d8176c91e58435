//! Schemlint CLI - circuit design-rule analysis from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use schemlint::catalog::load_profiles_from_file;
use schemlint::checks::refine::McuRefiner;
use schemlint::{AnalysisOptions, AnalysisReport, Finding, SchemlintCore, Severity};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "schemlint")]
#[command(about = "Design-rule analysis for schematic circuit documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single circuit document
    Check {
        /// Path to .ckt file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if findings exist at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Run only the named checks (repeatable)
        #[arg(long = "check", value_name = "ID")]
        checks: Vec<String>,

        /// Microcontroller catalog JSON replacing the embedded one
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },

    /// Analyze all circuit documents in a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if findings exist at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Run only the named checks (repeatable)
        #[arg(long = "check", value_name = "ID")]
        checks: Vec<String>,

        /// Microcontroller catalog JSON replacing the embedded one
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },

    /// Suggest concrete models for generic microcontrollers
    Refine {
        /// Path to .ckt file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Microcontroller catalog JSON replacing the embedded one
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available checks
    Checks {
        /// Show detailed check descriptions
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
    Info,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            fail_on,
            checks,
            catalog,
        } => handle_check(&file, format, fail_on, checks, catalog),
        Commands::Project {
            dir,
            format,
            fail_on,
            checks,
            catalog,
        } => handle_project(&dir, format, fail_on, checks, catalog),
        Commands::Refine {
            file,
            catalog,
            json,
        } => handle_refine(&file, catalog, json),
        Commands::Checks { verbose } => {
            handle_checks(verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn handle_check(
    file: &PathBuf,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    checks: Vec<String>,
    catalog: Option<PathBuf>,
) -> i32 {
    if file.extension().and_then(|s| s.to_str()) != Some("ckt") {
        eprintln!("Error: File must be a .ckt circuit document");
        return 1;
    }

    let options = AnalysisOptions { checks, catalog };

    match SchemlintCore::analyze_file(file, options) {
        Ok(report) => {
            output_reports(&[report.clone()], &format);
            if let Some(severity) = fail_on {
                if should_fail(&report, &severity) {
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_project(
    dir: &PathBuf,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    checks: Vec<String>,
    catalog: Option<PathBuf>,
) -> i32 {
    let options = AnalysisOptions { checks, catalog };

    match SchemlintCore::analyze_project(dir, options) {
        Ok(reports) => {
            output_reports(&reports, &format);
            if let Some(severity) = fail_on {
                for report in &reports {
                    if should_fail(report, &severity) {
                        return 1;
                    }
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_refine(file: &PathBuf, catalog: Option<PathBuf>, json: bool) -> i32 {
    let circuit = match schemlint::load_circuit(file) {
        Ok(circuit) => circuit,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let refiner = match catalog {
        Some(path) => match load_profiles_from_file(&path) {
            Ok(profiles) => McuRefiner::with_catalog(profiles),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => McuRefiner::new(),
    };

    let report = refiner.refine(&circuit);
    if json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        print!("{}", report.render());
    }
    0
}

fn should_fail(report: &AnalysisReport, severity: &FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Error => report.stats.errors > 0,
        FailOnSeverity::Warning => report.has_warnings_or_errors(),
        FailOnSeverity::Info => report.total_findings() > 0,
    }
}

fn output_reports(reports: &[AnalysisReport], format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(reports),
        OutputFormat::Json => output_json(reports),
        OutputFormat::Github => output_github(reports),
    }
}

fn output_human(reports: &[AnalysisReport]) {
    for report in reports {
        println!("\nFile: {} (circuit {})", report.file.display(), report.circuit);
        println!("{}", "─".repeat(60));

        if report.total_findings() == 0 {
            println!("  No findings");
            continue;
        }

        let errors: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        let warnings: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .collect();
        let infos: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .collect();

        if !errors.is_empty() {
            println!("\n  ERRORS:");
            for finding in errors {
                println!("    - {}", finding.message);
                println!("      Location: {}", finding.location);
            }
        }
        if !warnings.is_empty() {
            println!("\n  WARNINGS:");
            for finding in warnings {
                println!("    - {}", finding.message);
                println!("      Location: {}", finding.location);
            }
        }
        if !infos.is_empty() {
            println!("\n  INFO:");
            for finding in infos {
                println!("    - {}", finding.message);
            }
        }

        println!("\n  Summary:");
        println!("    Errors:   {}", report.stats.errors);
        println!("    Warnings: {}", report.stats.warnings);
        println!("    Info:     {}", report.stats.infos);
    }
}

fn output_json(reports: &[AnalysisReport]) {
    let output = serde_json::json!({
        "results": reports.iter().map(|r| {
            serde_json::json!({
                "file": r.file.display().to_string(),
                "circuit": r.circuit,
                "findings": r.findings,
                "stats": r.stats,
            })
        }).collect::<Vec<_>>(),
        "summary": {
            "total_files": reports.len(),
            "total_findings": reports.iter().map(|r| r.total_findings()).sum::<usize>(),
            "errors": reports.iter().map(|r| r.stats.errors).sum::<usize>(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn severity_to_github(finding: &Finding) -> &'static str {
    match finding.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}

fn output_github(reports: &[AnalysisReport]) {
    for report in reports {
        for finding in &report.findings {
            let level = severity_to_github(finding);
            println!(
                "::{} file={}::{}: {}",
                level,
                report.file.display(),
                finding.location,
                finding.message.replace('\n', " ")
            );
        }
    }
}

fn handle_checks(verbose: bool) {
    println!("Available checks:\n");

    let checks = [
        (
            "port_connections",
            "Port connection consistency",
            "Protocol agreement and role completeness across port connections",
        ),
        (
            "polarity",
            "Polarity hazards",
            "Reversed-polarity connections, directly or through resistors and named nets",
        ),
        (
            "unused_ports",
            "Unused ports",
            "Ports that take part in no port connection",
        ),
        (
            "refine_mcu",
            "Microcontroller refinement",
            "Concrete models whose capabilities cover a generic microcontroller's usage",
        ),
    ];

    for (id, short, long) in &checks {
        println!("  {}", id);
        println!("    {}", short);
        if verbose {
            println!("    {}", long);
        }
        println!();
    }
}
