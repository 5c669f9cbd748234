use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use xmlguardrs::{scan_file_with_flags, Error, ScanFlags};

#[derive(Parser)]
#[command(name = "xmlguard")]
#[command(about = "Scan XML files for ENTITY declarations before parsing them")]
#[command(version)]
struct Cli {
    /// Files to scan
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Byte-level heuristic only; never invoke the XML parser
    #[arg(long, conflicts_with = "no_heuristic")]
    heuristic_only: bool,

    /// Parser validation walk only; skip the byte-level pre-scan
    #[arg(long)]
    no_heuristic: bool,

    /// Output one JSON object per file instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct FileReport {
    path: String,
    safe: bool,
    security_violation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elements: Option<usize>,
}

struct Summary {
    flagged: bool,
    errored: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(Summary { flagged: true, .. }) => ExitCode::from(1),
        Ok(Summary { errored: true, .. }) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("xmlguard: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<Summary> {
    let mut flags = ScanFlags::NONE;
    if cli.heuristic_only {
        flags |= ScanFlags::HEURISTIC_ONLY;
    }
    if cli.no_heuristic {
        flags |= ScanFlags::NO_HEURISTIC;
    }

    let mut summary = Summary {
        flagged: false,
        errored: false,
    };

    for path in &cli.files {
        let report = scan_one(path, flags);
        summary.flagged |= report.security_violation;
        summary.errored |= !report.safe && !report.security_violation;

        if cli.json {
            let line = serde_json::to_string(&report).context("serializing report")?;
            println!("{line}");
        } else {
            print_text(&report);
        }
    }

    Ok(summary)
}

fn scan_one(path: &PathBuf, flags: ScanFlags) -> FileReport {
    let display = path.display().to_string();
    match scan_file_with_flags(path, flags) {
        Ok(doc) => FileReport {
            path: display,
            safe: true,
            security_violation: false,
            error: None,
            encoding: Some(doc.file_encoding().to_string()),
            elements: Some(doc.element_count()),
        },
        Err(err) => FileReport {
            path: display,
            safe: false,
            security_violation: matches!(err, Error::EntityDeclarationDetected),
            error: Some(err.to_string()),
            encoding: None,
            elements: None,
        },
    }
}

fn print_text(report: &FileReport) {
    if report.safe {
        println!(
            "{}: OK ({}, {} elements)",
            report.path,
            report.encoding.as_deref().unwrap_or("unknown encoding"),
            report.elements.unwrap_or(0)
        );
    } else if report.security_violation {
        println!("{}: BLOCKED - {}", report.path, report.error.as_deref().unwrap_or(""));
    } else {
        println!("{}: ERROR - {}", report.path, report.error.as_deref().unwrap_or(""));
    }
}
