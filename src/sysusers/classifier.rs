// src/sysusers/classifier.rs

//! Path-shape classification of system user candidates
//!
//! A system user is serialized as a directory under the system users area
//! holding a `.content.xml` descriptor:
//!
//! ```text
//! /jcr_root/home/users/system/<folder>/.../<user>/.content.xml
//! ```
//!
//! This is a syntactic pre-filter only. Names are still platform-encoded
//! and the descriptor has not been looked at.

use crate::config::ConverterConfig;

/// File name of the node descriptor inside a serialized node directory
pub const DESCRIPTOR_NAME: &str = ".content.xml";

/// Result of classifying a candidate path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not shaped like a system user definition
    Unrecognized,
    /// Shaped like a system user definition
    Recognized {
        /// Encoded folder segments between the system users root and the leaf
        ancestors: Vec<String>,
        /// Encoded name of the candidate user node
        leaf: String,
    },
}

/// Splits system user candidate paths into folder segments and leaf
#[derive(Debug, Clone)]
pub struct SystemUserClassifier {
    /// `<content root><system users root>/`
    prefix: String,
    /// `/.content.xml`
    suffix: String,
}

impl SystemUserClassifier {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            prefix: format!("{}{}/", config.content_root, config.system_users_root),
            suffix: format!("/{}", DESCRIPTOR_NAME),
        }
    }

    /// Classify a package-relative path
    ///
    /// Requires the system users prefix, the descriptor suffix, and at least
    /// one non-empty segment between them. The last segment is the leaf.
    pub fn classify(&self, path: &str) -> Classification {
        let Some(middle) = path
            .strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_suffix(&self.suffix))
        else {
            return Classification::Unrecognized;
        };

        let mut segments: Vec<String> = middle.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Classification::Unrecognized;
        }

        match segments.pop() {
            Some(leaf) => Classification::Recognized {
                ancestors: segments,
                leaf,
            },
            None => Classification::Unrecognized,
        }
    }

    /// Does the path have the shape of a system user definition?
    pub fn matches(&self, path: &str) -> bool {
        self.classify(path) != Classification::Unrecognized
    }
}
