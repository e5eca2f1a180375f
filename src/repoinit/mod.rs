// src/repoinit/mod.rs
//! Repoinit script generation
//!
//! Statements are accumulated in a run-scoped [`DeclarationLedger`] and
//! handed to the caller as a [`RepoinitSection`]: a text section that
//! downstream processing must not skip.

mod ledger;
mod parser;
mod statement;

pub use ledger::{record_statements, DeclarationLedger, ScriptLedger, SharedLedger};
pub use parser::{parse_script, ParseError};
pub use statement::{render, Statement, LINE_TERMINATOR};

use serde::Serialize;

/// Name of the section carrying the script
pub const SECTION_NAME: &str = "repoinit";

/// Kind of content a section carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Text,
}

/// The finished script of a run, as attached to the converter output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoinitSection {
    pub name: &'static str,
    pub kind: SectionKind,
    /// Downstream processing must not skip a required section
    pub required: bool,
    pub text: String,
}

impl RepoinitSection {
    pub fn new(text: String) -> Self {
        Self {
            name: SECTION_NAME,
            kind: SectionKind::Text,
            required: true,
            text,
        }
    }
}
