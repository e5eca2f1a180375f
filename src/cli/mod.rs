// src/cli/mod.rs
//! Argument parsing for the `repoinit-sysusers` binary
//!
//! Only the clap shapes live here; each subcommand maps to a `cmd_*` handler.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repoinit-sysusers")]
#[command(version)]
#[command(about = "Convert content package system users into a repoinit script", long_about = None)]
pub struct Cli {
    /// Configuration file (default: /etc/repoinit-sysusers/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format of the convert command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain repoinit script
    Text,
    /// The repoinit section as JSON
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the system users of unpacked content packages
    Convert {
        /// Package directories (each holding jcr_root/), processed in order
        #[arg(required = true)]
        packages: Vec<PathBuf>,

        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show how package paths are classified
    Classify {
        /// Package-relative paths, e.g. /jcr_root/home/users/system/a/b/.content.xml
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Decode platform names into repository names
    Decode {
        #[arg(required = true)]
        segments: Vec<String>,
    },

    /// Encode repository names into platform names
    Encode {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Check that a script file parses
    Check {
        /// Script file
        script: PathBuf,
    },
}
