// src/sysusers/mod.rs
//! System user definitions in content packages
//!
//! A content package serializes each system user as a directory under
//! `/jcr_root/home/users/system` with a `.content.xml` descriptor whose
//! primary type is `rep:SystemUser`. This module recognizes those entries
//! and turns them into repoinit statements:
//!
//! ```text
//! /jcr_root/home/users/system/_my_feature/_my_user-node/.content.xml
//!   -> create path (rep:AuthorizableFolder) /home/users/system/my:feature
//!   -> create service user my:feature-my:user-node-service with path /home/users/system/my:feature
//! ```
//!
//! ## Outcomes
//!
//! | Input | Outcome |
//! |-------|---------|
//! | Path of another shape | skipped |
//! | Undecodable name segment | skipped |
//! | Descriptor of another node type | skipped |
//! | Unparseable descriptor | [`HandlerError::Descriptor`] |
//! | Name that cannot be rendered | [`HandlerError::Synthesis`] |

mod classifier;
pub mod descriptor;
mod handler;
mod synthesizer;

pub use classifier::{Classification, SystemUserClassifier, DESCRIPTOR_NAME};
pub use descriptor::{Descriptor, DescriptorError, PrimaryType, Validation};
pub use handler::{HandleOutcome, HandlerError, Preparation, SkipReason, SystemUsersHandler};
pub use synthesizer::{StatementSynthesizer, SynthesisError, SystemUserDeclaration, ID_SEPARATOR};
