// src/repoinit/statement.rs
//! Repoinit statements and their line rendering

use crate::naming::RepositoryPath;
use std::fmt;

/// Line terminator for every rendered statement
pub const LINE_TERMINATOR: &str = "\n";

/// A single repoinit statement
///
/// Rendering follows the repoinit grammar exactly:
/// - `create path (<nodeType>) <path>`
/// - `create service user <id> with path <path>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// Ensure a folder path exists, typed with a node type hint
    CreatePath {
        path: RepositoryPath,
        node_type: String,
    },
    /// Ensure a service user exists under an intermediate path
    CreateServiceUser { id: String, path: RepositoryPath },
}

impl Statement {
    /// Render the statement as one terminated script line
    pub fn to_line(&self) -> String {
        format!("{}{}", self, LINE_TERMINATOR)
    }

    /// The repository path the statement targets
    pub fn path(&self) -> &RepositoryPath {
        match self {
            Self::CreatePath { path, .. } | Self::CreateServiceUser { path, .. } => path,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreatePath { path, node_type } => {
                write!(f, "create path ({}) {}", node_type, path)
            }
            Self::CreateServiceUser { id, path } => {
                write!(f, "create service user {} with path {}", id, path)
            }
        }
    }
}

/// Render statements as a script: one terminated line each, no blank lines
pub fn render(statements: &[Statement]) -> String {
    statements.iter().map(Statement::to_line).collect()
}
