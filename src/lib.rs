// src/lib.rs

//! repoinit-sysusers
//!
//! Converts the system users serialized in content packages into a repoinit
//! script that recreates them, together with their folders, in a target
//! repository.
//!
//! # Architecture
//!
//! - [`naming`]: platform-safe name encoding and repository paths
//! - [`sysusers`]: path classification, descriptor validation, statement synthesis
//! - [`repoinit`]: statements, the run-scoped ledger, script parsing
//! - [`package`]: walking unpacked packages into a ledger
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```
//! use repoinit_sysusers::{ConverterConfig, DeclarationLedger, ScriptLedger, SystemUsersHandler};
//!
//! let handler = SystemUsersHandler::new(&ConverterConfig::default()).unwrap();
//! let mut ledger = ScriptLedger::new();
//! handler
//!     .handle(
//!         "/jcr_root/home/users/system/team/reader/.content.xml",
//!         br#"<jcr:root jcr:primaryType="rep:SystemUser"/>"#,
//!         &mut ledger,
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     ledger.render_script(),
//!     "create path (rep:AuthorizableFolder) /home/users/system/team\n\
//!      create service user team-reader-service with path /home/users/system/team\n"
//! );
//! ```

pub mod config;
pub mod naming;
pub mod package;
pub mod repoinit;
pub mod sysusers;

pub use config::{ConfigError, ConverterConfig};
pub use naming::{decode, encode, DecodeError, RepositoryName, RepositoryPath};
pub use package::{PackageWalker, WalkError, WalkReport};
pub use repoinit::{parse_script, DeclarationLedger, RepoinitSection, ScriptLedger, SharedLedger, Statement};
pub use sysusers::{HandleOutcome, HandlerError, SkipReason, SystemUsersHandler};
