// src/commands/inspect.rs

//! Inspection commands: classify paths, decode and encode names, check scripts

use anyhow::{Context, Result};
use repoinit_sysusers::sysusers::{Classification, SystemUserClassifier};
use repoinit_sysusers::{decode, encode, parse_script, ConverterConfig, Statement};
use std::path::Path;

/// Print the classification of each path
pub fn cmd_classify(config: &ConverterConfig, paths: &[String]) -> Result<()> {
    let classifier = SystemUserClassifier::new(config);

    for path in paths {
        match classifier.classify(path) {
            Classification::Unrecognized => println!("{}: not a system user path", path),
            Classification::Recognized { ancestors, leaf } => {
                let folders = ancestors
                    .iter()
                    .map(|s| describe_segment(s))
                    .collect::<Vec<_>>()
                    .join(" / ");
                println!("{}:", path);
                println!("  folders: {}", if folders.is_empty() { "(none)".to_string() } else { folders });
                println!("  user:    {}", describe_segment(&leaf));
            }
        }
    }

    Ok(())
}

fn describe_segment(segment: &str) -> String {
    match decode(segment) {
        Ok(name) if name.as_str() == segment => segment.to_string(),
        Ok(name) => format!("{} ({})", name, segment),
        Err(e) => format!("{} [{}]", segment, e),
    }
}

/// Decode platform names
pub fn cmd_decode(segments: &[String]) -> Result<()> {
    for segment in segments {
        let name = decode(segment).with_context(|| format!("Cannot decode '{}'", segment))?;
        println!("{}", name);
    }
    Ok(())
}

/// Encode repository names
pub fn cmd_encode(names: &[String]) -> Result<()> {
    for name in names {
        println!("{}", encode(name));
    }
    Ok(())
}

/// Parse a script file and summarize it
pub fn cmd_check(script: &Path) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read {}", script.display()))?;
    let statements = parse_script(&text).with_context(|| format!("Invalid script {}", script.display()))?;

    let users = statements
        .iter()
        .filter(|s| matches!(s, Statement::CreateServiceUser { .. }))
        .count();
    println!(
        "{}: {} statements ({} paths, {} service users)",
        script.display(),
        statements.len(),
        statements.len() - users,
        users
    );
    Ok(())
}
