// src/sysusers/descriptor.rs

//! `.content.xml` descriptor inspection
//!
//! The first element of a descriptor describes the serialized node itself.
//! Only its `jcr:primaryType` decides whether the node is a system user;
//! the rest of the document just has to be well-formed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt;
use thiserror::Error;

/// Descriptor parsing errors
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("descriptor is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed descriptor XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute in descriptor: {0}")]
    Attribute(String),

    #[error("descriptor has no root element")]
    NoRootElement,

    #[error("descriptor root element is never closed")]
    Unclosed,

    #[error("descriptor has content outside its root element")]
    ContentOutsideRoot,
}

/// Primary node types an authorizable descriptor may declare
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimaryType {
    /// `rep:SystemUser`
    SystemUser,
    /// `rep:User`
    User,
    /// `rep:Group`
    Group,
    /// `rep:AuthorizableFolder`
    AuthorizableFolder,
    /// Any other declared type
    Other(String),
    /// No `jcr:primaryType` attribute
    Untyped,
}

impl PrimaryType {
    /// Parse a `jcr:primaryType` value
    ///
    /// A `{Name}` type hint in front of the value is ignored.
    pub fn parse(value: &str) -> Self {
        let value = value.strip_prefix("{Name}").unwrap_or(value);
        match value {
            "rep:SystemUser" => Self::SystemUser,
            "rep:User" => Self::User,
            "rep:Group" => Self::Group,
            "rep:AuthorizableFolder" => Self::AuthorizableFolder,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SystemUser => "rep:SystemUser",
            Self::User => "rep:User",
            Self::Group => "rep:Group",
            Self::AuthorizableFolder => "rep:AuthorizableFolder",
            Self::Other(name) => name,
            Self::Untyped => "",
        }
    }

    pub fn is_system_user(&self) -> bool {
        matches!(self, Self::SystemUser)
    }
}

impl fmt::Display for PrimaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untyped => f.write_str("(untyped)"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// What a descriptor says about its node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub primary_type: PrimaryType,
    /// `rep:authorizableId`, if declared
    pub authorizable_id: Option<String>,
    /// `rep:principalName`, if declared
    pub principal_name: Option<String>,
}

/// Outcome of validating a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The node is a system user
    Accept(Descriptor),
    /// The node is something else; not an error
    Reject(PrimaryType),
}

/// Parse descriptor bytes
pub fn parse_descriptor(bytes: &[u8]) -> Result<Descriptor, DescriptorError> {
    let text = std::str::from_utf8(bytes)?;
    let mut reader = Reader::from_str(text);
    let mut root = None;
    let mut depth = 0usize;

    // Read to the end: exactly one root element, closed, with nothing but
    // whitespace, comments and declarations around it.
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                open_element(&mut root, depth, &e)?;
                depth += 1;
            }
            Event::Empty(e) => open_element(&mut root, depth, &e)?,
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or(DescriptorError::ContentOutsideRoot)?;
            }
            Event::Text(e) if depth == 0 => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(DescriptorError::ContentOutsideRoot);
                }
            }
            Event::CData(_) if depth == 0 => return Err(DescriptorError::ContentOutsideRoot),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(DescriptorError::Unclosed);
    }
    root.ok_or(DescriptorError::NoRootElement)
}

fn open_element(
    root: &mut Option<Descriptor>,
    depth: usize,
    element: &BytesStart<'_>,
) -> Result<(), DescriptorError> {
    match root {
        Some(_) if depth == 0 => Err(DescriptorError::ContentOutsideRoot),
        Some(_) => Ok(()),
        None => {
            *root = Some(describe(element)?);
            Ok(())
        }
    }
}

/// Accept system user descriptors, reject everything else
pub fn validate(bytes: &[u8]) -> Result<Validation, DescriptorError> {
    let descriptor = parse_descriptor(bytes)?;
    if descriptor.primary_type.is_system_user() {
        Ok(Validation::Accept(descriptor))
    } else {
        Ok(Validation::Reject(descriptor.primary_type))
    }
}

fn describe(element: &BytesStart<'_>) -> Result<Descriptor, DescriptorError> {
    let mut descriptor = Descriptor {
        primary_type: PrimaryType::Untyped,
        authorizable_id: None,
        principal_name: None,
    };

    for attr in element.attributes() {
        let attr = attr.map_err(|e| DescriptorError::Attribute(e.to_string()))?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"jcr:primaryType" => descriptor.primary_type = PrimaryType::parse(&value),
            b"rep:authorizableId" => descriptor.authorizable_id = Some(value.into_owned()),
            b"rep:principalName" => descriptor.principal_name = Some(value.into_owned()),
            _ => {}
        }
    }

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_USER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" xmlns:rep="internal"
    jcr:primaryType="rep:SystemUser"
    jcr:uuid="a9e5a0a4-5a8d-3b0c-8c3b-1f8d0b6c5b11"
    rep:authorizableId="asd-index-definition-reader"
    rep:principalName="asd-index-definition-reader"/>
"#;

    #[test]
    fn test_accepts_system_user() {
        let Validation::Accept(descriptor) = validate(SYSTEM_USER.as_bytes()).unwrap() else {
            panic!("expected system user to be accepted");
        };
        assert_eq!(descriptor.primary_type, PrimaryType::SystemUser);
        assert_eq!(
            descriptor.authorizable_id.as_deref(),
            Some("asd-index-definition-reader")
        );
        assert_eq!(
            descriptor.principal_name.as_deref(),
            Some("asd-index-definition-reader")
        );
    }

    #[test]
    fn test_rejects_other_types() {
        let user = r#"<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" jcr:primaryType="rep:User"/>"#;
        assert_eq!(validate(user.as_bytes()).unwrap(), Validation::Reject(PrimaryType::User));

        let folder = r#"<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" jcr:primaryType="sling:Folder"><child/></jcr:root>"#;
        assert_eq!(
            validate(folder.as_bytes()).unwrap(),
            Validation::Reject(PrimaryType::Other("sling:Folder".to_string()))
        );

        let untyped = r#"<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0"/>"#;
        assert_eq!(validate(untyped.as_bytes()).unwrap(), Validation::Reject(PrimaryType::Untyped));
    }

    #[test]
    fn test_only_root_element_counts() {
        let nested = r#"<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" jcr:primaryType="nt:unstructured"><user jcr:primaryType="rep:SystemUser"/></jcr:root>"#;
        assert!(matches!(validate(nested.as_bytes()).unwrap(), Validation::Reject(_)));
    }

    #[test]
    fn test_type_hint_prefix() {
        assert_eq!(PrimaryType::parse("{Name}rep:SystemUser"), PrimaryType::SystemUser);
        assert_eq!(PrimaryType::parse("rep:Group"), PrimaryType::Group);
        assert_eq!(PrimaryType::parse("rep:AuthorizableFolder").as_str(), "rep:AuthorizableFolder");
        assert_eq!(PrimaryType::Untyped.to_string(), "(untyped)");
    }

    #[test]
    fn test_malformed_descriptors_are_errors() {
        assert!(matches!(
            parse_descriptor(b"this is not xml"),
            Err(DescriptorError::ContentOutsideRoot)
        ));
        assert!(matches!(parse_descriptor(b""), Err(DescriptorError::NoRootElement)));
        assert!(matches!(parse_descriptor(b"  \n"), Err(DescriptorError::NoRootElement)));
        assert!(matches!(
            parse_descriptor(b"<jcr:root jcr:primaryType=\"rep:SystemUser\"></other>"),
            Err(DescriptorError::Xml(_))
        ));
        assert!(matches!(
            parse_descriptor(b"<jcr:root jcr:primaryType/>"),
            Err(DescriptorError::Attribute(_))
        ));
        assert!(matches!(
            parse_descriptor(&[0x3c, 0xff, 0xfe, 0x3e]),
            Err(DescriptorError::Encoding(_))
        ));
    }

    #[test]
    fn test_truncated_descriptor_is_unclosed() {
        let truncated = r#"<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" jcr:primaryType="rep:SystemUser">"#;
        assert!(matches!(validate(truncated.as_bytes()), Err(DescriptorError::Unclosed)));

        let nested = r#"<jcr:root jcr:primaryType="rep:SystemUser"><child>"#;
        assert!(matches!(parse_descriptor(nested.as_bytes()), Err(DescriptorError::Unclosed)));
    }

    #[test]
    fn test_content_outside_root_is_rejected() {
        let second_root = r#"<jcr:root jcr:primaryType="rep:SystemUser"/><other/>"#;
        assert!(matches!(
            validate(second_root.as_bytes()),
            Err(DescriptorError::ContentOutsideRoot)
        ));

        let surrounded = r#"garbage text <jcr:root jcr:primaryType="rep:SystemUser"/> more garbage"#;
        assert!(matches!(
            validate(surrounded.as_bytes()),
            Err(DescriptorError::ContentOutsideRoot)
        ));

        let trailing = r#"<jcr:root jcr:primaryType="rep:SystemUser"></jcr:root>tail"#;
        assert!(matches!(
            validate(trailing.as_bytes()),
            Err(DescriptorError::ContentOutsideRoot)
        ));
    }

    #[test]
    fn test_comments_and_whitespace_around_root_are_fine() {
        let padded = "<?xml version=\"1.0\"?>\n<!-- generated -->\n<jcr:root jcr:primaryType=\"rep:SystemUser\"/>\n\n";
        assert!(matches!(validate(padded.as_bytes()).unwrap(), Validation::Accept(_)));
    }
}
