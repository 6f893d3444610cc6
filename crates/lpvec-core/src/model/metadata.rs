//! Names for variables and constraints.

use std::collections::{BTreeMap, HashMap};

use lpvec_expr::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

/// Two-way mapping between ids and names.
///
/// When a name is reused, lookup by name keeps returning the first id that
/// carried it.
#[derive(Debug, Clone)]
pub(crate) struct NameTable<Id> {
    by_id: BTreeMap<Id, String>,
    by_name: HashMap<String, Id>,
}

impl<Id> Default for NameTable<Id> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<Id: Copy + Ord> NameTable<Id> {
    fn insert(&mut self, id: Id, name: String) {
        if let Some(previous) = self.by_id.insert(id, name.clone()) {
            if self.by_name.get(&previous) == Some(&id) {
                self.by_name.remove(&previous);
            }
        }
        self.by_name.entry(name).or_insert(id);
    }

    fn name(&self, id: Id) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    fn id(&self, name: &str) -> Option<Id> {
        self.by_name.get(name).copied()
    }
}

impl Model {
    pub fn set_variable_name(&mut self, id: VariableId, name: String) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        self.variable_names.insert(id, name);
        Ok(())
    }

    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names.name(id)
    }

    pub fn get_variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.id(name)
    }

    pub fn set_constraint_name(
        &mut self,
        id: ConstraintId,
        name: String,
    ) -> Result<(), ModelError> {
        self.ensure_constraint_exists(id)?;
        self.constraint_names.insert(id, name);
        Ok(())
    }

    pub fn get_constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names.name(id)
    }

    pub fn get_constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        self.constraint_names.id(name)
    }
}

#[cfg(test)]
mod tests {
    use super::NameTable;
    use lpvec_expr::VariableId;

    #[test]
    fn test_rename_frees_old_name() {
        let mut table = NameTable::default();
        let x = VariableId::new(0);
        table.insert(x, "a".to_string());
        table.insert(x, "b".to_string());
        assert_eq!(table.id("a"), None);
        assert_eq!(table.id("b"), Some(x));
        assert_eq!(table.name(x), Some("b"));
    }

    #[test]
    fn test_reused_name_resolves_to_first_id() {
        let mut table = NameTable::default();
        table.insert(VariableId::new(0), "x".to_string());
        table.insert(VariableId::new(1), "x".to_string());
        assert_eq!(table.id("x"), Some(VariableId::new(0)));
        assert_eq!(table.name(VariableId::new(1)), Some("x"));
    }
}
