// SPDX-License-Identifier: MIT OR Apache-2.0
//! Operators and the context menus that expose them.
//!
//! An operator is a one-shot command with a `poll` check that decides whether
//! its menu entry is enabled. Operators flagged for undo get a host undo step
//! recorded before they run.

use crate::error::MergeError;
use crate::history::HistoryError;
use crate::host::UndoHost;
use indexmap::IndexMap;

/// Context menu of the NLA editor
pub const NLA_CONTEXT_MENU: &str = "NLA_MT_context_menu";

/// Outcome of a completed operator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorResult {
    /// The operator ran to completion
    Finished,
    /// The operator did not run
    Cancelled,
}

/// Registration flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperatorOptions {
    /// Shown in the operator history
    pub register: bool,
    /// Record an undo step before running
    pub undo: bool,
}

/// Error type for operator registration and invocation
#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    /// No operator with this idname
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// An operator with this idname is already registered
    #[error("Operator already registered: {0}")]
    AlreadyRegistered(String),

    /// Undo step could not be recorded
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// The operator failed
    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),
}

/// A command that runs against a host
pub trait Operator<H> {
    /// Unique identifier, e.g. `nla_tools.nla_merge_strips`
    fn idname(&self) -> &'static str;

    /// Menu label
    fn label(&self) -> &'static str;

    /// Tooltip
    fn description(&self) -> &'static str;

    /// Registration flags
    fn options(&self) -> OperatorOptions {
        OperatorOptions::default()
    }

    /// Whether the operator can run in the current state
    fn poll(&self, host: &H) -> bool;

    /// Run the operator
    fn execute(&mut self, host: &mut H) -> Result<OperatorResult, MergeError>;
}

/// A menu item as it should be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Operator idname
    pub idname: &'static str,
    /// Menu label
    pub label: &'static str,
    /// Tooltip
    pub description: &'static str,
    /// Result of the operator's poll
    pub enabled: bool,
}

/// Registered operators and the menus they are appended to
pub struct OperatorRegistry<H> {
    operators: IndexMap<&'static str, Box<dyn Operator<H>>>,
    menus: IndexMap<&'static str, Vec<&'static str>>,
}

impl<H: UndoHost> OperatorRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            operators: IndexMap::new(),
            menus: IndexMap::new(),
        }
    }

    /// Register an operator
    pub fn register(&mut self, operator: Box<dyn Operator<H>>) -> Result<(), OperatorError> {
        let idname = operator.idname();
        if self.operators.contains_key(idname) {
            return Err(OperatorError::AlreadyRegistered(idname.to_string()));
        }
        tracing::debug!("Registered operator {idname}");
        self.operators.insert(idname, operator);
        Ok(())
    }

    /// Remove an operator and its menu entries
    pub fn unregister(&mut self, idname: &str) -> Result<(), OperatorError> {
        if self.operators.shift_remove(idname).is_none() {
            return Err(OperatorError::UnknownOperator(idname.to_string()));
        }
        for entries in self.menus.values_mut() {
            entries.retain(|e| *e != idname);
        }
        Ok(())
    }

    /// Append a registered operator to a menu
    pub fn append_to_menu(&mut self, menu: &'static str, idname: &str) -> Result<(), OperatorError> {
        let (&key, _) = self
            .operators
            .get_key_value(idname)
            .ok_or_else(|| OperatorError::UnknownOperator(idname.to_string()))?;
        let entries = self.menus.entry(menu).or_default();
        if !entries.contains(&key) {
            entries.push(key);
        }
        Ok(())
    }

    /// Whether an operator is registered
    pub fn is_registered(&self, idname: &str) -> bool {
        self.operators.contains_key(idname)
    }

    /// Entries of a menu with their enabled state
    pub fn menu_entries(&self, menu: &str, host: &H) -> Vec<MenuEntry> {
        self.menus
            .get(menu)
            .into_iter()
            .flatten()
            .filter_map(|idname| self.operators.get(idname))
            .map(|op| MenuEntry {
                idname: op.idname(),
                label: op.label(),
                description: op.description(),
                enabled: op.poll(host),
            })
            .collect()
    }

    /// Run an operator if its poll passes
    pub fn invoke(&mut self, idname: &str, host: &mut H) -> Result<OperatorResult, OperatorError> {
        let operator = self
            .operators
            .get_mut(idname)
            .ok_or_else(|| OperatorError::UnknownOperator(idname.to_string()))?;

        if !operator.poll(host) {
            tracing::debug!("{idname} is disabled in this context");
            return Ok(OperatorResult::Cancelled);
        }
        if operator.options().undo {
            host.undo_push(operator.label())?;
        }

        Ok(operator.execute(host)?)
    }
}

impl<H: UndoHost> Default for OperatorRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
        undo_steps: Vec<String>,
    }

    impl UndoHost for Counter {
        fn undo_push(&mut self, description: &str) -> Result<(), HistoryError> {
            self.undo_steps.push(description.to_string());
            Ok(())
        }
    }

    struct Increment;

    impl Operator<Counter> for Increment {
        fn idname(&self) -> &'static str {
            "test.increment"
        }

        fn label(&self) -> &'static str {
            "Increment"
        }

        fn description(&self) -> &'static str {
            "Add one below ten."
        }

        fn options(&self) -> OperatorOptions {
            OperatorOptions { register: true, undo: true }
        }

        fn poll(&self, host: &Counter) -> bool {
            host.value < 10
        }

        fn execute(&mut self, host: &mut Counter) -> Result<OperatorResult, MergeError> {
            host.value += 1;
            Ok(OperatorResult::Finished)
        }
    }

    fn registry() -> OperatorRegistry<Counter> {
        let mut registry = OperatorRegistry::new();
        registry.register(Box::new(Increment)).unwrap();
        registry.append_to_menu("TEST_MT_menu", "test.increment").unwrap();
        registry
    }

    #[test]
    fn test_invoke_records_undo() {
        let mut registry = registry();
        let mut host = Counter::default();
        let result = registry.invoke("test.increment", &mut host).unwrap();
        assert_eq!(result, OperatorResult::Finished);
        assert_eq!(host.value, 1);
        assert_eq!(host.undo_steps, ["Increment"]);
    }

    #[test]
    fn test_disabled_operator_is_cancelled() {
        let mut registry = registry();
        let mut host = Counter { value: 10, ..Default::default() };

        let entries = registry.menu_entries("TEST_MT_menu", &host);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].enabled);

        let result = registry.invoke("test.increment", &mut host).unwrap();
        assert_eq!(result, OperatorResult::Cancelled);
        assert_eq!(host.value, 10);
        assert!(host.undo_steps.is_empty());
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = registry();
        assert!(matches!(
            registry.register(Box::new(Increment)),
            Err(OperatorError::AlreadyRegistered(_))
        ));

        registry.unregister("test.increment").unwrap();
        assert!(!registry.is_registered("test.increment"));
        assert!(registry.menu_entries("TEST_MT_menu", &Counter::default()).is_empty());
        assert!(matches!(
            registry.invoke("test.increment", &mut Counter::default()),
            Err(OperatorError::UnknownOperator(_))
        ));
    }
}
