// src/sysusers/synthesizer.rs

//! Builds service user declarations from decoded path segments

use crate::config::{ConfigError, ConverterConfig};
use crate::naming::{RepositoryName, RepositoryPath};
use crate::repoinit::{render, Statement};
use thiserror::Error;

/// Separator between the decoded segments of a service user id
pub const ID_SEPARATOR: &str = "-";

/// Errors from building a declaration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("segment '{segment}' cannot be rendered in a script: {reason}")]
    UnrenderableSegment {
        segment: String,
        reason: &'static str,
    },
}

/// A service user to create, with the folder that holds it
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemUserDeclaration {
    id: String,
    intermediate_path: RepositoryPath,
    folder_node_type: String,
}

impl SystemUserDeclaration {
    /// Service user id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Folder path the user is created under
    pub fn intermediate_path(&self) -> &RepositoryPath {
        &self.intermediate_path
    }

    /// The folder statement followed by the user statement
    pub fn statements(&self) -> [Statement; 2] {
        [
            Statement::CreatePath {
                path: self.intermediate_path.clone(),
                node_type: self.folder_node_type.clone(),
            },
            Statement::CreateServiceUser {
                id: self.id.clone(),
                path: self.intermediate_path.clone(),
            },
        ]
    }

    /// Render both statements without any deduplication
    pub fn render(&self) -> String {
        render(&self.statements())
    }
}

/// Turns decoded (ancestors, leaf) pairs into declarations
#[derive(Debug, Clone)]
pub struct StatementSynthesizer {
    root: RepositoryPath,
    folder_node_type: String,
    service_suffix: String,
}

impl StatementSynthesizer {
    pub fn new(config: &ConverterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            root: config.system_users_path()?,
            folder_node_type: config.folder_node_type.clone(),
            service_suffix: config.service_suffix.clone(),
        })
    }

    /// Build the declaration for a system user
    ///
    /// The id is every decoded segment joined with `-`, as decoded, plus the
    /// service suffix. The intermediate path is the system users root plus
    /// the ancestors; with no ancestors it is the root itself.
    pub fn synthesize(
        &self,
        ancestors: &[RepositoryName],
        leaf: &RepositoryName,
    ) -> Result<SystemUserDeclaration, SynthesisError> {
        for name in ancestors.iter().chain(std::iter::once(leaf)) {
            check_renderable(name)?;
        }

        let mut id = ancestors
            .iter()
            .chain(std::iter::once(leaf))
            .map(RepositoryName::as_str)
            .collect::<Vec<_>>()
            .join(ID_SEPARATOR);
        id.push_str(&self.service_suffix);

        Ok(SystemUserDeclaration {
            id,
            intermediate_path: self.root.join(ancestors),
            folder_node_type: self.folder_node_type.clone(),
        })
    }
}

/// A name must survive as a single path segment and a single script token
fn check_renderable(name: &RepositoryName) -> Result<(), SynthesisError> {
    let reason = if name.as_str().contains('/') {
        Some("contains '/'")
    } else if name.as_str().chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if name.as_str().chars().any(|c| c == '(' || c == ')') {
        Some("contains parentheses")
    } else if name.as_str().chars().any(char::is_control) {
        Some("contains control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SynthesisError::UnrenderableSegment {
            segment: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
