// src/naming/platform.rs
//! FileVault platform name format
//!
//! Encoding rules, applied left to right over the repository name:
//! - The first `:` becomes `_` and the whole name gets a leading `_`, as long
//!   as the colon is not the first character and no `_` or escaped character
//!   came before it.
//! - A leading `_` is doubled when the name holds more than one `_`, so the
//!   result cannot be mistaken for a namespace-qualified name.
//! - `% \ / : * ? " < > |` become `%xx` (two lowercase hex digits).
//!
//! Decoding expands the escapes first, then reinstates the namespace colon.

use super::RepositoryName;
use thiserror::Error;

/// Errors from decoding a platform name segment
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty name segment")]
    Empty,

    #[error("malformed escape sequence at byte {position} in '{segment}'")]
    MalformedEscape { segment: String, position: usize },
}

/// Characters that never appear literally in a platform name
const ESCAPED: [char; 10] = ['%', '\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Encode a repository name into its platform-safe form
///
/// # Examples
/// ```
/// use repoinit_sysusers::naming::encode;
///
/// assert_eq!(encode("my:feature"), "_my_feature");
/// assert_eq!(encode("asd-share-commons"), "asd-share-commons");
/// assert_eq!(encode("_a_b"), "__a_b");
/// assert_eq!(encode("a*b"), "a%2ab");
/// ```
pub fn encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    out.push('_');

    let mut colon_taken = false;
    let mut leading_underscore = false;
    let mut underscores = 0usize;

    for (i, c) in name.chars().enumerate() {
        match c {
            ':' if !colon_taken && i > 0 => {
                colon_taken = true;
                leading_underscore = true;
                underscores = 2;
                out.push('_');
            }
            '_' => {
                if i == 0 {
                    leading_underscore = true;
                }
                underscores += 1;
                colon_taken = true;
                out.push('_');
            }
            c if ESCAPED.contains(&c) => {
                colon_taken = true;
                out.push_str(&format!("%{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }

    if leading_underscore && underscores > 1 {
        out
    } else {
        out.split_off(1)
    }
}

/// Decode a platform name segment into a repository name
///
/// Fails on an empty segment or on a `%` that is not followed by two hex
/// digits; nothing passes through undecoded.
///
/// # Examples
/// ```
/// use repoinit_sysusers::naming::decode;
///
/// assert_eq!(decode("_my_user-node").unwrap().as_str(), "my:user-node");
/// assert_eq!(decode("__a_b").unwrap().as_str(), "_a_b");
/// assert!(decode("bad%zz").is_err());
/// ```
pub fn decode(segment: &str) -> Result<RepositoryName, DecodeError> {
    if segment.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut name = unescape(segment)?;

    if name.starts_with("__") {
        name.remove(0);
    } else if name.starts_with('_')
        && let Some(idx) = name[1..].find('_')
    {
        // idx is relative to the slice after the leading underscore
        let boundary = idx + 1;
        name.replace_range(boundary..=boundary, ":");
        name.remove(0);
    }

    Ok(RepositoryName::from_decoded(name))
}

/// Expand `%xx` escapes
fn unescape(segment: &str) -> Result<String, DecodeError> {
    let malformed = |position| DecodeError::MalformedEscape {
        segment: segment.to_string(),
        position,
    };

    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    let mut offset = 0;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);

        let hex = rest
            .get(pos + 1..pos + 3)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| malformed(offset + pos))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| malformed(offset + pos))?;
        let c = char::from_u32(code).ok_or_else(|| malformed(offset + pos))?;
        out.push(c);

        rest = &rest[pos + 3..];
        offset += pos + 3;
    }
    out.push_str(rest);

    Ok(out)
}
