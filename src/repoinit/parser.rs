// src/repoinit/parser.rs
//! Parser for the statement subset this crate emits
//!
//! Accepts exactly the line grammar of [`Statement`]: one statement per
//! line, every line terminated, no blank lines. Used to check rendered
//! scripts and to read them back.

use super::statement::Statement;
use crate::naming::{PathError, RepositoryPath};
use thiserror::Error;

/// Errors from parsing a script
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: blank lines are not allowed")]
    BlankLine { line: usize },

    #[error("line {line}: unrecognized statement '{text}'")]
    UnknownStatement { line: usize, text: String },

    #[error("line {line}: {source}")]
    InvalidPath {
        line: usize,
        #[source]
        source: PathError,
    },

    #[error("script does not end with a line terminator")]
    MissingTerminator,
}

/// Parse a script into statements
///
/// # Examples
/// ```
/// use repoinit_sysusers::repoinit::parse_script;
///
/// let stmts = parse_script("create service user reader-service with path /home/users/system\n").unwrap();
/// assert_eq!(stmts.len(), 1);
/// assert!(parse_script("create something else\n").is_err());
/// ```
pub fn parse_script(script: &str) -> Result<Vec<Statement>, ParseError> {
    if script.is_empty() {
        return Ok(Vec::new());
    }
    if !script.ends_with('\n') {
        return Err(ParseError::MissingTerminator);
    }

    script
        .split_terminator('\n')
        .enumerate()
        .map(|(idx, text)| parse_line(idx + 1, text))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Statement, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::BlankLine { line });
    }

    let unknown = || ParseError::UnknownStatement {
        line,
        text: text.to_string(),
    };
    let parse_path = |raw: &str| {
        RepositoryPath::parse(raw).map_err(|source| ParseError::InvalidPath { line, source })
    };

    if let Some(rest) = text.strip_prefix("create path (") {
        let (node_type, path) = rest.split_once(") ").ok_or_else(unknown)?;
        if !is_token(node_type) || !is_token(path) {
            return Err(unknown());
        }
        return Ok(Statement::CreatePath {
            path: parse_path(path)?,
            node_type: node_type.to_string(),
        });
    }

    if let Some(rest) = text.strip_prefix("create service user ") {
        let (id, path) = rest.split_once(" with path ").ok_or_else(unknown)?;
        if !is_token(id) || !is_token(path) {
            return Err(unknown());
        }
        return Ok(Statement::CreateServiceUser {
            id: id.to_string(),
            path: parse_path(path)?,
        });
    }

    Err(unknown())
}

/// A single whitespace-free token
fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '(' || c == ')')
}
