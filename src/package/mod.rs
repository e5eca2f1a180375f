// src/package/mod.rs
//! Unpacked content package traversal
//!
//! Walks a package directory (the one holding `jcr_root/`), feeds every file
//! to the [`SystemUsersHandler`] and records the results into a run-scoped
//! ledger. Descriptors are read and validated in parallel; recording happens
//! afterwards in sorted path order, so the script does not depend on thread
//! scheduling.
//!
//! Failures of single entries end up in the [`WalkReport`]; only a package
//! root that cannot be walked at all fails the walk.

use crate::repoinit::{DeclarationLedger, Statement};
use crate::sysusers::{HandleOutcome, SystemUsersHandler};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Errors that stop a package walk
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("package root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A single entry that could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// Package-relative path, `/`-separated
    pub path: String,
    pub message: String,
}

/// Summary of one package walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Files seen in the package
    pub scanned: usize,
    /// Files shaped like system user definitions
    pub candidates: usize,
    /// Service user ids declared, in recording order
    pub declared: Vec<String>,
    /// Candidates that contributed nothing
    pub skipped: usize,
    pub failures: Vec<EntryFailure>,
}

impl WalkReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Walks unpacked content packages
pub struct PackageWalker<'a> {
    handler: &'a SystemUsersHandler,
}

impl<'a> PackageWalker<'a> {
    pub fn new(handler: &'a SystemUsersHandler) -> Self {
        Self { handler }
    }

    /// Convert every system user in the package into the ledger
    pub fn walk<L>(&self, package_root: &Path, ledger: &mut L) -> Result<WalkReport, WalkError>
    where
        L: DeclarationLedger + ?Sized,
    {
        if !package_root.is_dir() {
            return Err(WalkError::NotADirectory(package_root.to_path_buf()));
        }

        let (files, scan_failures) = scan_files(package_root);
        let candidates: Vec<_> = files
            .iter()
            .filter(|(path, _)| self.handler.matches(path))
            .collect();

        info!(
            "Scanning {}: {} files, {} system user candidates",
            package_root.display(),
            files.len(),
            candidates.len()
        );

        let prepared: Vec<_> = candidates
            .par_iter()
            .map(|(path, full_path)| {
                let result = self.handler.prepare_with(path, || std::fs::read(full_path));
                (path.as_str(), result)
            })
            .collect();

        let mut report = WalkReport {
            scanned: files.len(),
            candidates: candidates.len(),
            failures: scan_failures,
            ..WalkReport::default()
        };

        for (path, result) in prepared {
            match result {
                Ok(preparation) => match self.handler.record(preparation, ledger) {
                    HandleOutcome::Declared(statements) => {
                        report.declared.extend(statements.into_iter().filter_map(|s| match s {
                            Statement::CreateServiceUser { id, .. } => Some(id),
                            Statement::CreatePath { .. } => None,
                        }));
                    }
                    HandleOutcome::Skipped(reason) => {
                        debug!("Skipped {}: {:?}", path, reason);
                        report.skipped += 1;
                    }
                },
                Err(e) => {
                    warn!("Failed to convert {}", e);
                    report.failures.push(EntryFailure {
                        path: path.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Collect (package path, filesystem path) pairs, sorted by package path
///
/// Entries the walk cannot read come back as failures; everything below an
/// unreadable directory is missing from the file list.
fn scan_files(root: &Path) -> (Vec<(String, PathBuf)>, Vec<EntryFailure>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for entry in WalkDir::new(root).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = match e.path() {
                    Some(path) => package_path(root, path).unwrap_or_else(|| path.display().to_string()),
                    None => "/".to_string(),
                };
                warn!("Cannot read {} under {}: {}", path, root.display(), e);
                failures.push(EntryFailure {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        match package_path(root, entry.path()) {
            Some(path) => files.push((path, entry.path().to_path_buf())),
            None => {
                warn!("Skipping non UTF-8 path {}", entry.path().display());
                failures.push(EntryFailure {
                    path: entry.path().display().to_string(),
                    message: "path is not valid UTF-8".to_string(),
                });
            }
        }
    }

    files.sort();
    (files, failures)
}

/// `/`-separated path of a file relative to the package root, with a leading `/`
fn package_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        out.push('/');
        out.push_str(component.as_os_str().to_str()?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;
    use crate::repoinit::ScriptLedger;
    use std::fs;
    use tempfile::TempDir;

    const SYSTEM_USER: &str = r#"<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" xmlns:rep="internal" jcr:primaryType="rep:SystemUser"/>"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_package_path() {
        let root = Path::new("/tmp/pkg");
        assert_eq!(
            package_path(root, Path::new("/tmp/pkg/jcr_root/home/.content.xml")).as_deref(),
            Some("/jcr_root/home/.content.xml")
        );
        assert_eq!(package_path(root, Path::new("/elsewhere/file")), None);
    }

    #[test]
    fn test_walk_collects_system_users_in_path_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "jcr_root/home/users/system/team/zeta/.content.xml", SYSTEM_USER);
        write(dir.path(), "jcr_root/home/users/system/team/alpha/.content.xml", SYSTEM_USER);
        write(dir.path(), "jcr_root/apps/app/.content.xml", SYSTEM_USER);
        write(dir.path(), "META-INF/vault/properties.xml", "<properties/>");

        let handler = SystemUsersHandler::new(&ConverterConfig::default()).unwrap();
        let mut ledger = ScriptLedger::new();
        let report = PackageWalker::new(&handler).walk(dir.path(), &mut ledger).unwrap();

        assert_eq!(report.scanned, 4);
        assert_eq!(report.candidates, 2);
        assert_eq!(report.declared, ["team-alpha-service", "team-zeta-service"]);
        assert_eq!(report.skipped, 0);
        assert!(!report.has_failures());
        assert_eq!(ledger.statements().len(), 3);
    }

    #[test]
    fn test_walk_reports_broken_descriptors_and_continues() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "jcr_root/home/users/system/a/broken/.content.xml", "<jcr:root></oops>");
        write(dir.path(), "jcr_root/home/users/system/a/good/.content.xml", SYSTEM_USER);

        let handler = SystemUsersHandler::new(&ConverterConfig::default()).unwrap();
        let mut ledger = ScriptLedger::new();
        let report = PackageWalker::new(&handler).walk(dir.path(), &mut ledger).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "/jcr_root/home/users/system/a/broken/.content.xml");
        assert_eq!(report.declared, ["a-good-service"]);
    }

    #[test]
    fn test_walk_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let handler = SystemUsersHandler::new(&ConverterConfig::default()).unwrap();
        let mut ledger = ScriptLedger::new();
        let result = PackageWalker::new(&handler).walk(&dir.path().join("missing"), &mut ledger);
        assert!(matches!(result, Err(WalkError::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "jcr_root/home/users/system/open/reader/.content.xml", SYSTEM_USER);
        write(dir.path(), "jcr_root/home/users/system/locked/writer/.content.xml", SYSTEM_USER);
        let locked = dir.path().join("jcr_root/home/users/system/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop a privileged user
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let handler = SystemUsersHandler::new(&ConverterConfig::default()).unwrap();
        let mut ledger = ScriptLedger::new();
        let report = PackageWalker::new(&handler).walk(dir.path(), &mut ledger).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.declared, ["open-reader-service"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "/jcr_root/home/users/system/locked");
        assert!(report.has_failures());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_entry_is_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "jcr_root/home/users/system/team/reader/.content.xml", SYSTEM_USER);
        let odd = dir.path().join("jcr_root").join(OsStr::from_bytes(b"bad\xffname.xml"));
        fs::write(&odd, "<x/>").unwrap();

        let handler = SystemUsersHandler::new(&ConverterConfig::default()).unwrap();
        let mut ledger = ScriptLedger::new();
        let report = PackageWalker::new(&handler).walk(dir.path(), &mut ledger).unwrap();

        assert_eq!(report.declared, ["team-reader-service"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].message, "path is not valid UTF-8");
    }
}
