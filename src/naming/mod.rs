// src/naming/mod.rs
//! Repository names and their platform-safe serialization
//!
//! Content packages store repository nodes as files and directories. Names
//! that are legal in the repository but not on every filesystem are
//! serialized with the FileVault platform name format:
//!
//! | Repository name | Platform name |
//! |-----------------|---------------|
//! | `my:feature`    | `_my_feature` |
//! | `_private_data` | `__private_data` |
//! | `a*b`           | `a%2ab` |
//!
//! [`decode`] turns a platform segment back into a [`RepositoryName`];
//! [`encode`] is its inverse.

mod path;
mod platform;

pub use path::{PathError, RepositoryName, RepositoryPath};
pub use platform::{decode, encode, DecodeError};
