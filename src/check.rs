use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

use crate::compare::{Comparison, Report};
use crate::domain::{Domain, DomainExtractor};
use crate::format::Detection;
use crate::loader;
use crate::utils::{format_number, redact_domain};
use crate::Args;

#[derive(Debug)]
pub struct CheckResult {
    pub detection: Detection,
    pub password_skipped: usize,
    pub comparison: Comparison,
}

/// Load both inputs in turn and intersect them. Either load failing ends the check.
pub fn run_check(args: &Args) -> Result<CheckResult> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "check", "Starting leak check");

    let extractor = DomainExtractor::new();
    let export = loader::load_password_export(&args.password_export, &extractor, args.format)
        .context("Error building password export domain list")?;
    let leaked = loader::load_leak_list(&args.leak_list)
        .context("Error building leaked domain list")?;

    let comparison = Comparison::new(&export.corpus.domains, &leaked.domains);

    info!(
        action = "complete",
        component = "check",
        endangered = comparison.endangered.len(),
        duration_ms = total_start_time.elapsed().as_millis(),
        "Leak check completed"
    );

    Ok(CheckResult {
        detection: export.detection,
        password_skipped: export.corpus.skipped,
        comparison,
    })
}

fn display_domain(domain: &Domain, redact: bool) -> String {
    if redact {
        redact_domain(domain.as_str())
    } else {
        domain.to_string()
    }
}

pub fn build_report(result: &CheckResult, args: &Args) -> Report {
    let mut report = result.comparison.report(!args.unsorted);
    if args.redact {
        report.endangered = report
            .endangered
            .iter()
            .map(|domain| Domain::from(redact_domain(domain.as_str())))
            .collect();
    }
    report
}

pub fn print_check_results(result: &CheckResult, args: &Args) -> Result<()> {
    if args.json {
        let report = build_report(result, args);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
        return Ok(());
    }

    let comparison = &result.comparison;
    println!("Password export format: {}", result.detection.format);
    println!(
        "Saved domains found: {} ({} entries skipped)",
        format_number(comparison.saved_count),
        format_number(result.password_skipped)
    );
    println!(
        "Leaked domains found: {}",
        format_number(comparison.leaked_count)
    );

    let endangered: Vec<Domain> = if args.unsorted {
        comparison.endangered.iter().cloned().collect()
    } else {
        comparison.sorted()
    };
    println!(
        "\n{} potentially endangered domains:",
        format_number(endangered.len())
    );
    for domain in &endangered {
        println!("- {}", display_domain(domain, args.redact));
    }
    Ok(())
}
