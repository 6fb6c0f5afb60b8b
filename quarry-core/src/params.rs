//! Parameter table built while compiling a token stream

use std::collections::HashMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{Value, ValueType};
use crate::variable::{Variable, VariableId};

/// Normalized declaration of one query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    /// Expected type, `None` when unconstrained
    pub type_hint: Option<ValueType>,
    /// Value used when the caller omits the argument, `None` when required
    pub default: Option<Value>,
}

impl ParameterEntry {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    fn same_definition(&self, other: &ParameterEntry) -> bool {
        self.type_hint == other.type_hint && self.default == other.default
    }
}

/// Renders like a function parameter: `name`, `id: BIGINT`, `page: INTEGER = 1`
impl Display for ParameterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(ty) = self.type_hint {
            write!(f, ": {ty}")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// Non-fatal findings recorded during compilation
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Two distinct variables share a name but not a definition.
    /// The first definition seen is kept.
    #[error("Variable '{name}' has multiple types/values: {ignored} and {kept}")]
    ConflictingParameterDefinition {
        name: String,
        kept: ParameterEntry,
        ignored: ParameterEntry,
    },
}

#[derive(Debug, Clone)]
struct Slot {
    index: usize,
    origin: VariableId,
}

/// Ordered registry of parameters.
///
/// Insertion order is positional order: the first parameter registered is
/// `$1`. Entries are never removed and never re-indexed.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    entries: Vec<ParameterEntry>,
    slots: HashMap<String, Slot>,
    diagnostics: Vec<Diagnostic>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sighting of `var` and return its 1-based position
    pub fn register(&mut self, var: &Variable) -> usize {
        if let Some(slot) = self.slots.get(var.name()) {
            let index = slot.index;
            if slot.origin != var.id() {
                let kept = &self.entries[index - 1];
                let seen = var.entry();
                if !kept.same_definition(&seen) {
                    let diagnostic = Diagnostic::ConflictingParameterDefinition {
                        name: seen.name.clone(),
                        kept: kept.clone(),
                        ignored: seen,
                    };
                    tracing::warn!(parameter = var.name(), "{diagnostic}");
                    self.diagnostics.push(diagnostic);
                }
            }
            return index;
        }

        self.entries.push(var.entry());
        let index = self.entries.len();
        self.slots.insert(
            var.name().to_string(),
            Slot {
                index,
                origin: var.id(),
            },
        );
        tracing::trace!(parameter = var.name(), index, "registered parameter");
        index
    }

    /// Position of a registered parameter
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.get(name).map(|slot| slot.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ParameterEntry] {
        &self.entries
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn into_parts(self) -> (Vec<ParameterEntry>, Vec<Diagnostic>) {
        (self.entries, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_order() {
        let mut table = ParameterTable::new();
        let a = Variable::new("a").unwrap();
        let b = Variable::new("b").unwrap();

        assert_eq!(table.register(&b), 1);
        assert_eq!(table.register(&a), 2);
        assert_eq!(table.register(&b), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of("a"), Some(2));
        assert_eq!(table.entries()[0].name, "b");
    }

    #[test]
    fn test_same_instance_never_conflicts() {
        let mut table = ParameterTable::new();
        let var = Variable::with_default("id", 1).unwrap();
        table.register(&var);
        table.register(&var.clone());
        assert!(table.diagnostics().is_empty());
    }

    #[test]
    fn test_equal_definitions_share_slot_silently() {
        let mut table = ParameterTable::new();
        table.register(&Variable::new("name").unwrap());
        assert_eq!(table.register(&Variable::new("name").unwrap()), 1);
        assert!(table.diagnostics().is_empty());
    }

    #[test]
    fn test_conflicting_definition_keeps_first() {
        let mut table = ParameterTable::new();
        table.register(&Variable::with_default("n", 1).unwrap());
        assert_eq!(table.register(&Variable::with_default("n", 2).unwrap()), 1);

        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].default, Some(Value::I32(1)));
        assert!(matches!(
            &table.diagnostics()[0],
            Diagnostic::ConflictingParameterDefinition { name, ignored, .. }
                if name == "n" && ignored.default == Some(Value::I32(2))
        ));
    }

    #[test]
    fn test_entry_display() {
        let entry = Variable::with_default("page", 1).unwrap().entry();
        assert_eq!(entry.to_string(), "page: INTEGER = 1");
        let entry = Variable::with_default("id", ()).unwrap().entry();
        assert_eq!(entry.to_string(), "id = NULL");
        let entry = Variable::with_default("id", ValueType::I64).unwrap().entry();
        assert_eq!(entry.to_string(), "id: BIGINT");
    }
}
