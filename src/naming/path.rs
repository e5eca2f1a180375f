// src/naming/path.rs
//! Repository names and absolute repository paths

use std::fmt;
use thiserror::Error;

/// Errors from parsing a repository path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("repository path must be absolute: '{0}'")]
    NotAbsolute(String),

    #[error("repository path has an empty segment: '{0}'")]
    EmptySegment(String),
}

/// A decoded repository name, optionally namespace-qualified (`prefix:local`)
///
/// Names come out of [`decode`](super::decode) and are never empty. They may
/// still hold characters that cannot appear in a path segment (an escaped
/// `/` decodes to a literal `/`); consumers that render names check for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(super) fn from_decoded(name: String) -> Self {
        Self(name)
    }

    /// Full name as it appears in the repository
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace prefix, if the name is qualified
    pub fn prefix(&self) -> Option<&str> {
        match self.0.find(':') {
            Some(idx) if idx > 0 => Some(&self.0[..idx]),
            _ => None,
        }
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &str {
        match self.0.find(':') {
            Some(idx) if idx > 0 => &self.0[idx + 1..],
            _ => &self.0,
        }
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An absolute repository path
///
/// The root path has no segments and renders as `/`.
///
/// # Examples
/// ```
/// use repoinit_sysusers::naming::RepositoryPath;
///
/// let path = RepositoryPath::parse("/home/users/system").unwrap();
/// assert_eq!(path.segments().len(), 3);
/// assert_eq!(path.to_string(), "/home/users/system");
/// assert_eq!(RepositoryPath::root().to_string(), "/");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryPath {
    segments: Vec<RepositoryName>,
}

impl RepositoryPath {
    /// The repository root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a literal (already decoded) absolute path such as `/home/users`
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| PathError::NotAbsolute(path.to_string()))?;

        if rest.is_empty() {
            return Ok(Self::root());
        }

        let segments = rest
            .split('/')
            .map(|s| {
                if s.is_empty() {
                    Err(PathError::EmptySegment(path.to_string()))
                } else {
                    Ok(RepositoryName(s.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    /// Path segments, root first
    pub fn segments(&self) -> &[RepositoryName] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append segments, returning the extended path
    pub fn join<'a, I>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a RepositoryName>,
    {
        let mut segments = self.segments.clone();
        segments.extend(names.into_iter().cloned());
        Self { segments }
    }
}

impl fmt::Display for RepositoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
