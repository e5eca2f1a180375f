// src/repoinit/ledger.rs
//! Run-scoped declaration ledger
//!
//! A ledger lives for one conversion run. It remembers which folder paths
//! already have a `create path` statement and accumulates every emitted
//! statement in first-discovery order. Nothing is ever removed.

use super::statement::{render, Statement};
use super::RepoinitSection;
use crate::naming::RepositoryPath;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::debug;

/// Storage contract for the statements of one run
pub trait DeclarationLedger {
    /// Has a `create path` statement for this path been recorded?
    fn has_created_path(&self, path: &RepositoryPath) -> bool;

    /// Remember that a `create path` statement exists for this path
    fn record_path_created(&mut self, path: RepositoryPath);

    /// Append a statement to the script
    fn append_statement(&mut self, statement: Statement);

    /// Render the accumulated script
    fn render_script(&self) -> String;
}

/// Record statements, suppressing `create path` for already-created paths
///
/// Returns the statements that were actually appended. Service user
/// statements are always appended.
pub fn record_statements<L, I>(ledger: &mut L, statements: I) -> Vec<Statement>
where
    L: DeclarationLedger + ?Sized,
    I: IntoIterator<Item = Statement>,
{
    let mut recorded = Vec::new();

    for statement in statements {
        if let Statement::CreatePath { path, .. } = &statement {
            if ledger.has_created_path(path) {
                debug!("Path {} already declared, suppressing create path", path);
                continue;
            }
            ledger.record_path_created(path.clone());
        }
        ledger.append_statement(statement.clone());
        recorded.push(statement);
    }

    recorded
}

/// Sequential in-memory ledger
#[derive(Debug, Default)]
pub struct ScriptLedger {
    created_paths: HashSet<RepositoryPath>,
    statements: Vec<Statement>,
}

impl ScriptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements recorded so far, in first-discovery order
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Close the run and expose the script as a required text section
    ///
    /// Returns `None` when nothing was recorded.
    pub fn into_section(self) -> Option<RepoinitSection> {
        if self.is_empty() {
            return None;
        }
        Some(RepoinitSection::new(self.render_script()))
    }
}

impl DeclarationLedger for ScriptLedger {
    fn has_created_path(&self, path: &RepositoryPath) -> bool {
        self.created_paths.contains(path)
    }

    fn record_path_created(&mut self, path: RepositoryPath) {
        self.created_paths.insert(path);
    }

    fn append_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    fn render_script(&self) -> String {
        render(&self.statements)
    }
}

/// Ledger that can be shared between threads
///
/// The check for an existing path and the append happen under one lock, so
/// a folder is declared at most once even with concurrent recorders.
#[derive(Debug, Default)]
pub struct SharedLedger {
    inner: Mutex<ScriptLedger>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record statements atomically, see [`record_statements`]
    pub fn record<I>(&self, statements: I) -> Vec<Statement>
    where
        I: IntoIterator<Item = Statement>,
    {
        let mut ledger = self.inner.lock();
        record_statements(&mut *ledger, statements)
    }

    pub fn render_script(&self) -> String {
        self.inner.lock().render_script()
    }

    /// Finish the run, returning the underlying sequential ledger
    pub fn into_inner(self) -> ScriptLedger {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> RepositoryPath {
        RepositoryPath::parse(p).unwrap()
    }

    fn user_statements(folder: &str, id: &str) -> Vec<Statement> {
        vec![
            Statement::CreatePath {
                path: path(folder),
                node_type: "rep:AuthorizableFolder".to_string(),
            },
            Statement::CreateServiceUser {
                id: id.to_string(),
                path: path(folder),
            },
        ]
    }

    #[test]
    fn test_record_suppresses_duplicate_paths() {
        let mut ledger = ScriptLedger::new();

        let first = record_statements(&mut ledger, user_statements("/home/users/system/a", "a-x-service"));
        let second = record_statements(&mut ledger, user_statements("/home/users/system/a", "a-y-service"));

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(matches!(second[0], Statement::CreateServiceUser { .. }));
        assert_eq!(
            ledger.render_script(),
            "create path (rep:AuthorizableFolder) /home/users/system/a\n\
             create service user a-x-service with path /home/users/system/a\n\
             create service user a-y-service with path /home/users/system/a\n"
        );
    }

    #[test]
    fn test_record_keeps_first_discovery_order() {
        let mut ledger = ScriptLedger::new();
        record_statements(&mut ledger, user_statements("/home/users/system/b", "b-service"));
        record_statements(&mut ledger, user_statements("/home/users/system/a", "a-service"));

        let ids: Vec<_> = ledger
            .statements()
            .iter()
            .filter_map(|s| match s {
                Statement::CreateServiceUser { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, ["b-service", "a-service"]);
    }

    #[test]
    fn test_empty_ledger_has_no_section() {
        let ledger = ScriptLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.render_script(), "");
        assert!(ledger.into_section().is_none());
    }

    #[test]
    fn test_into_section_is_required_text() {
        let mut ledger = ScriptLedger::new();
        record_statements(&mut ledger, user_statements("/home/users/system/a", "a-service"));

        let section = ledger.into_section().unwrap();
        assert!(section.required);
        assert_eq!(section.text.lines().count(), 2);
    }

    #[test]
    fn test_shared_ledger_declares_folder_once_across_threads() {
        let shared = SharedLedger::new();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let shared = &shared;
                scope.spawn(move || {
                    shared.record(user_statements("/home/users/system/shared", &format!("u{i}-service")));
                });
            }
        });

        let ledger = shared.into_inner();
        let create_paths = ledger
            .statements()
            .iter()
            .filter(|s| matches!(s, Statement::CreatePath { .. }))
            .count();
        assert_eq!(create_paths, 1);
        assert_eq!(ledger.statements().len(), 9);
        assert!(matches!(ledger.statements()[0], Statement::CreatePath { .. }));
    }
}
