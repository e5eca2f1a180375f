// src/sysusers/handler.rs

//! System user entry handler
//!
//! Runs one candidate path through classify → decode → validate →
//! synthesize → record. Everything before recording is pure, so drivers
//! may prepare many candidates in parallel and record them in order.

use super::classifier::{Classification, SystemUserClassifier};
use super::descriptor::{self, DescriptorError, PrimaryType, Validation};
use super::synthesizer::{StatementSynthesizer, SynthesisError, SystemUserDeclaration};
use crate::config::{ConfigError, ConverterConfig};
use crate::naming::{decode, DecodeError, RepositoryName};
use crate::repoinit::{record_statements, DeclarationLedger, Statement};
use std::io::{self, Read};
use thiserror::Error;
use tracing::{debug, info};

/// Per-path failures
///
/// None of these abort a run; the driver reports them and moves on.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{path}: {source}")]
    Descriptor {
        path: String,
        #[source]
        source: DescriptorError,
    },

    #[error("{path}: {source}")]
    Synthesis {
        path: String,
        #[source]
        source: SynthesisError,
    },

    #[error("{path}: failed to read descriptor: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Why a path contributed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not shaped like a system user definition
    NotSystemUserPath,
    /// A segment is not a valid platform name
    UndecodableName(DecodeError),
    /// The descriptor declares another node type
    NotSystemUser(PrimaryType),
}

/// Result of preparing a path, before anything is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preparation {
    Skipped(SkipReason),
    Ready(SystemUserDeclaration),
}

/// Result of handling a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    Skipped(SkipReason),
    /// Statements actually appended to the ledger
    Declared(Vec<Statement>),
}

/// Converts system user definitions into repoinit statements
#[derive(Debug, Clone)]
pub struct SystemUsersHandler {
    classifier: SystemUserClassifier,
    synthesizer: StatementSynthesizer,
}

impl SystemUsersHandler {
    pub fn new(config: &ConverterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: SystemUserClassifier::new(config),
            synthesizer: StatementSynthesizer::new(config)?,
        })
    }

    /// Does the path have the shape of a system user definition?
    pub fn matches(&self, path: &str) -> bool {
        self.classifier.matches(path)
    }

    pub fn classify(&self, path: &str) -> Classification {
        self.classifier.classify(path)
    }

    /// Prepare a declaration from a path and its descriptor bytes
    pub fn prepare(&self, path: &str, descriptor: &[u8]) -> Result<Preparation, HandlerError> {
        self.prepare_with(path, || Ok(descriptor.to_vec()))
    }

    /// Prepare a declaration, reading the descriptor only when needed
    ///
    /// `read` is not called for paths that are skipped before validation.
    pub fn prepare_with<F>(&self, path: &str, read: F) -> Result<Preparation, HandlerError>
    where
        F: FnOnce() -> io::Result<Vec<u8>>,
    {
        let Classification::Recognized { ancestors, leaf } = self.classifier.classify(path) else {
            return Ok(Preparation::Skipped(SkipReason::NotSystemUserPath));
        };

        let (ancestors, leaf) = match decode_segments(&ancestors, &leaf) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!("Skipping {}: {}", path, e);
                return Ok(Preparation::Skipped(SkipReason::UndecodableName(e)));
            }
        };

        let bytes = read().map_err(|source| HandlerError::Io {
            path: path.to_string(),
            source,
        })?;

        let descriptor = match descriptor::validate(&bytes).map_err(|source| HandlerError::Descriptor {
            path: path.to_string(),
            source,
        })? {
            Validation::Accept(descriptor) => descriptor,
            Validation::Reject(primary_type) => {
                debug!("Skipping {}: primary type is {}", path, primary_type);
                return Ok(Preparation::Skipped(SkipReason::NotSystemUser(primary_type)));
            }
        };

        let declaration = self
            .synthesizer
            .synthesize(&ancestors, &leaf)
            .map_err(|source| HandlerError::Synthesis {
                path: path.to_string(),
                source,
            })?;

        debug!(
            "System user {} (authorizable id: {}) at {}",
            declaration.id(),
            descriptor.authorizable_id.as_deref().unwrap_or("-"),
            declaration.intermediate_path()
        );
        Ok(Preparation::Ready(declaration))
    }

    /// Record a prepared declaration into the ledger
    pub fn record<L>(&self, preparation: Preparation, ledger: &mut L) -> HandleOutcome
    where
        L: DeclarationLedger + ?Sized,
    {
        match preparation {
            Preparation::Skipped(reason) => HandleOutcome::Skipped(reason),
            Preparation::Ready(declaration) => {
                info!(
                    "Declaring service user {} with path {}",
                    declaration.id(),
                    declaration.intermediate_path()
                );
                HandleOutcome::Declared(record_statements(ledger, declaration.statements()))
            }
        }
    }

    /// Handle a path and its descriptor bytes
    pub fn handle<L>(&self, path: &str, descriptor: &[u8], ledger: &mut L) -> Result<HandleOutcome, HandlerError>
    where
        L: DeclarationLedger + ?Sized,
    {
        let preparation = self.prepare(path, descriptor)?;
        Ok(self.record(preparation, ledger))
    }

    /// Handle a path whose descriptor is available as a byte stream
    ///
    /// The stream is only read when the path is a decodable candidate.
    pub fn handle_reader<R, L>(&self, path: &str, mut reader: R, ledger: &mut L) -> Result<HandleOutcome, HandlerError>
    where
        R: Read,
        L: DeclarationLedger + ?Sized,
    {
        let preparation = self.prepare_with(path, || {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            Ok(bytes)
        })?;
        Ok(self.record(preparation, ledger))
    }
}

fn decode_segments(
    ancestors: &[String],
    leaf: &str,
) -> Result<(Vec<RepositoryName>, RepositoryName), DecodeError> {
    let ancestors = ancestors
        .iter()
        .map(|s| decode(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((ancestors, decode(leaf)?))
}
