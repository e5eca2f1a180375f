// src/commands/convert.rs

//! Package conversion command

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use repoinit_sysusers::{ConverterConfig, PackageWalker, ScriptLedger, SystemUsersHandler};
use std::path::{Path, PathBuf};
use tracing::info;

/// Convert the system users of every package into one script
///
/// All packages share one ledger, so a folder used by several packages is
/// declared once. Entry failures are listed after the script is written
/// and make the command fail.
pub fn cmd_convert(
    config: &ConverterConfig,
    packages: &[PathBuf],
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let handler = SystemUsersHandler::new(config).context("Invalid converter configuration")?;
    let walker = PackageWalker::new(&handler);
    let mut ledger = ScriptLedger::new();
    let mut failures = Vec::new();

    for package in packages {
        let report = walker
            .walk(package, &mut ledger)
            .with_context(|| format!("Failed to walk package {}", package.display()))?;

        info!(
            "{}: {} service users declared, {} candidates skipped, {} failed",
            package.display(),
            report.declared.len(),
            report.skipped,
            report.failures.len()
        );
        failures.extend(report.failures);
    }

    let statement_count = ledger.statements().len();
    let rendered = match (format, ledger.into_section()) {
        (OutputFormat::Text, Some(section)) => section.text,
        (OutputFormat::Text, None) => String::new(),
        (OutputFormat::Json, section) => {
            let mut json = serde_json::to_string_pretty(&section)?;
            json.push('\n');
            json
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} statements to {}", statement_count, path.display());
        }
        None => print!("{}", rendered),
    }

    if failures.is_empty() {
        return Ok(());
    }

    eprintln!("Failed entries:");
    for failure in &failures {
        eprintln!("  {}", failure.message);
    }
    Err(anyhow::anyhow!("{} entries could not be converted", failures.len()))
}
