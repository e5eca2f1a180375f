// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use repoinit_sysusers::{ConverterConfig, SystemUsersHandler};
use std::fs;
use std::path::Path;

/// Descriptor of a system user node, as FileVault serializes it.
pub const SYSTEM_USER_DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" xmlns:rep="internal"
    jcr:primaryType="rep:SystemUser"
    jcr:uuid="0b3b4d7e-3c1a-3e39-9c8e-5c3d7b2e9f10"
    rep:authorizableId="asd-index-definition-reader"
    rep:principalName="asd-index-definition-reader"/>
"#;

/// Descriptor of a regular (non-system) user node.
pub const REGULAR_USER_DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" xmlns:rep="internal"
    jcr:primaryType="rep:User"
    rep:authorizableId="asd-index-definition-invalid"
    rep:principalName="asd-index-definition-invalid"/>
"#;

/// Handler with the default layout.
pub fn default_handler() -> SystemUsersHandler {
    SystemUsersHandler::new(&ConverterConfig::default()).unwrap()
}

/// Write a file below `root`, creating parent directories.
pub fn write_entry(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative.trim_start_matches('/'));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
