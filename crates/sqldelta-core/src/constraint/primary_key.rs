//! Primary key constraint model.

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::name::UnqualifiedName;

/// A table's primary key constraint: an ordered, non-empty list of column
/// names. At most one exists per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyConstraint {
    name: Option<UnqualifiedName>,
    column_names: Vec<UnqualifiedName>,
    clustered: bool,
}

impl PrimaryKeyConstraint {
    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> PrimaryKeyConstraintEditor {
        PrimaryKeyConstraintEditor::default()
    }

    /// Returns an editor pre-seeded with this constraint's state.
    #[must_use]
    pub fn edit(&self) -> PrimaryKeyConstraintEditor {
        PrimaryKeyConstraintEditor {
            name: self.name.clone(),
            column_names: self.column_names.clone(),
            clustered: self.clustered,
        }
    }

    /// The constraint name, if named.
    #[must_use]
    pub const fn name(&self) -> Option<&UnqualifiedName> {
        self.name.as_ref()
    }

    /// The ordered column names the constraint covers.
    #[must_use]
    pub fn column_names(&self) -> &[UnqualifiedName] {
        &self.column_names
    }

    /// Whether the constraint determines physical row order.
    #[must_use]
    pub const fn is_clustered(&self) -> bool {
        self.clustered
    }

    /// Whether the two constraints are structurally identical ignoring their
    /// names: same column names in the same order, same clustering.
    #[must_use]
    pub fn structurally_equals(&self, other: &Self) -> bool {
        self.clustered == other.clustered
            && self.column_names.len() == other.column_names.len()
            && self
                .column_names
                .iter()
                .zip(&other.column_names)
                .all(|(a, b)| a == b)
    }
}

/// Fluent builder for [`PrimaryKeyConstraint`] instances.
#[derive(Debug, Clone)]
pub struct PrimaryKeyConstraintEditor {
    name: Option<UnqualifiedName>,
    column_names: Vec<UnqualifiedName>,
    clustered: bool,
}

impl Default for PrimaryKeyConstraintEditor {
    fn default() -> Self {
        Self {
            name: None,
            column_names: Vec::new(),
            // Primary keys cluster by default on platforms that distinguish.
            clustered: true,
        }
    }
}

impl PrimaryKeyConstraintEditor {
    /// Sets the constraint name.
    #[must_use]
    pub fn set_name(mut self, name: Option<UnqualifiedName>) -> Self {
        self.name = name;
        self
    }

    /// Sets the ordered column names.
    #[must_use]
    pub fn set_column_names(mut self, column_names: Vec<UnqualifiedName>) -> Self {
        self.column_names = column_names;
        self
    }

    /// Sets whether the constraint is clustered.
    #[must_use]
    pub fn set_clustered(mut self, clustered: bool) -> Self {
        self.clustered = clustered;
        self
    }

    /// Validates the definition and assembles the constraint.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::ColumnsNotSet`] when no column names were
    /// provided.
    pub fn create(self) -> Result<PrimaryKeyConstraint, DefinitionError> {
        if self.column_names.is_empty() {
            return Err(DefinitionError::ColumnsNotSet {
                object: "Primary key constraint",
            });
        }

        Ok(PrimaryKeyConstraint {
            name: self.name,
            column_names: self.column_names,
            clustered: self.clustered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<UnqualifiedName> {
        values
            .iter()
            .map(|v| UnqualifiedName::unquoted(*v).unwrap())
            .collect()
    }

    #[test]
    fn columns_are_required() {
        assert_eq!(
            PrimaryKeyConstraint::editor().create().unwrap_err(),
            DefinitionError::ColumnsNotSet {
                object: "Primary key constraint"
            }
        );
    }

    #[test]
    fn clustered_by_default() {
        let pk = PrimaryKeyConstraint::editor()
            .set_column_names(names(&["id"]))
            .create()
            .unwrap();
        assert!(pk.is_clustered());
    }

    #[test]
    fn structural_equality_ignores_name_and_respects_order() {
        let a = PrimaryKeyConstraint::editor()
            .set_name(Some(UnqualifiedName::unquoted("pk_a").unwrap()))
            .set_column_names(names(&["tenant_id", "id"]))
            .create()
            .unwrap();
        let b = PrimaryKeyConstraint::editor()
            .set_name(Some(UnqualifiedName::unquoted("pk_b").unwrap()))
            .set_column_names(names(&["TENANT_ID", "ID"]))
            .create()
            .unwrap();
        let reordered = PrimaryKeyConstraint::editor()
            .set_column_names(names(&["id", "tenant_id"]))
            .create()
            .unwrap();

        assert!(a.structurally_equals(&b));
        assert!(!a.structurally_equals(&reordered));
    }

    #[test]
    fn edit_round_trip_is_structurally_equal() {
        let original = PrimaryKeyConstraint::editor()
            .set_name(Some(UnqualifiedName::unquoted("pk_users").unwrap()))
            .set_column_names(names(&["id"]))
            .set_clustered(false)
            .create()
            .unwrap();
        assert_eq!(original, original.edit().create().unwrap());
    }
}
