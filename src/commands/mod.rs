// src/commands/mod.rs
//! Command handlers for the repoinit-sysusers CLI

mod convert;
mod inspect;

pub use convert::cmd_convert;
pub use inspect::{cmd_check, cmd_classify, cmd_decode, cmd_encode};
