//! Foreign key constraint model.

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::name::{OptionallyQualifiedName, UnqualifiedName};

/// Referential action applied on update or delete of a referenced row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// No action.
    #[default]
    NoAction,
    /// Restrict the operation.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set the referencing columns to NULL.
    SetNull,
    /// Set the referencing columns to their defaults.
    SetDefault,
}

impl ReferentialAction {
    /// Whether two actions are semantically identical for comparison
    /// purposes. RESTRICT and NO ACTION differ only in check timing, not in
    /// effect, and compare as equal.
    #[must_use]
    pub fn equivalent_to(self, other: Self) -> bool {
        let fold = |action: Self| match action {
            Self::Restrict => Self::NoAction,
            other => other,
        };
        fold(self) == fold(other)
    }
}

/// Foreign key match type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    /// MATCH SIMPLE.
    #[default]
    Simple,
    /// MATCH FULL.
    Full,
    /// MATCH PARTIAL.
    Partial,
}

/// Whether constraint enforcement can be postponed to transaction commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deferrability {
    /// Enforced immediately, cannot be deferred.
    #[default]
    NotDeferrable,
    /// Can be deferred, enforced immediately by default.
    Deferrable,
    /// Can be deferred, deferred by default.
    Deferred,
}

/// A foreign key constraint: ordered referencing columns, a referenced table,
/// and referenced columns of the same arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    name: Option<UnqualifiedName>,
    referencing_column_names: Vec<UnqualifiedName>,
    referenced_table_name: OptionallyQualifiedName,
    referenced_column_names: Vec<UnqualifiedName>,
    match_type: MatchType,
    on_update: ReferentialAction,
    on_delete: ReferentialAction,
    deferrability: Deferrability,
}

impl ForeignKeyConstraint {
    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> ForeignKeyConstraintEditor {
        ForeignKeyConstraintEditor::default()
    }

    /// Returns an editor pre-seeded with this constraint's state.
    #[must_use]
    pub fn edit(&self) -> ForeignKeyConstraintEditor {
        ForeignKeyConstraintEditor {
            name: self.name.clone(),
            referencing_column_names: self.referencing_column_names.clone(),
            referenced_table_name: Some(self.referenced_table_name.clone()),
            referenced_column_names: self.referenced_column_names.clone(),
            match_type: self.match_type,
            on_update: self.on_update,
            on_delete: self.on_delete,
            deferrability: self.deferrability,
        }
    }

    /// The constraint name, if named.
    #[must_use]
    pub const fn name(&self) -> Option<&UnqualifiedName> {
        self.name.as_ref()
    }

    /// The ordered referencing (local) column names.
    #[must_use]
    pub fn referencing_column_names(&self) -> &[UnqualifiedName] {
        &self.referencing_column_names
    }

    /// The referenced table name.
    #[must_use]
    pub const fn referenced_table_name(&self) -> &OptionallyQualifiedName {
        &self.referenced_table_name
    }

    /// The ordered referenced column names.
    #[must_use]
    pub fn referenced_column_names(&self) -> &[UnqualifiedName] {
        &self.referenced_column_names
    }

    /// The match type.
    #[must_use]
    pub const fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// The ON UPDATE action.
    #[must_use]
    pub const fn on_update(&self) -> ReferentialAction {
        self.on_update
    }

    /// The ON DELETE action.
    #[must_use]
    pub const fn on_delete(&self) -> ReferentialAction {
        self.on_delete
    }

    /// The deferrability mode.
    #[must_use]
    pub const fn deferrability(&self) -> Deferrability {
        self.deferrability
    }

    /// Replaces the constraint name. Used by the table editor when assigning
    /// generated names to anonymous constraints.
    pub(crate) fn with_name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    /// Whether the two constraints are structurally identical ignoring their
    /// names. Foreign key identity for diffing purposes is structural, not
    /// nominal: referencing columns, referenced table and columns, match
    /// type, actions (RESTRICT and NO ACTION treated as equal), and
    /// deferrability.
    #[must_use]
    pub fn structurally_equals(&self, other: &Self) -> bool {
        self.referencing_column_names == other.referencing_column_names
            && self.referenced_table_name == other.referenced_table_name
            && self.referenced_column_names == other.referenced_column_names
            && self.match_type == other.match_type
            && self.on_update.equivalent_to(other.on_update)
            && self.on_delete.equivalent_to(other.on_delete)
            && self.deferrability == other.deferrability
    }
}

/// Fluent builder for [`ForeignKeyConstraint`] instances.
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyConstraintEditor {
    name: Option<UnqualifiedName>,
    referencing_column_names: Vec<UnqualifiedName>,
    referenced_table_name: Option<OptionallyQualifiedName>,
    referenced_column_names: Vec<UnqualifiedName>,
    match_type: MatchType,
    on_update: ReferentialAction,
    on_delete: ReferentialAction,
    deferrability: Deferrability,
}

impl ForeignKeyConstraintEditor {
    /// Sets the constraint name.
    #[must_use]
    pub fn set_name(mut self, name: Option<UnqualifiedName>) -> Self {
        self.name = name;
        self
    }

    /// Sets the ordered referencing (local) column names.
    #[must_use]
    pub fn set_referencing_column_names(mut self, names: Vec<UnqualifiedName>) -> Self {
        self.referencing_column_names = names;
        self
    }

    /// Sets the referenced table name.
    #[must_use]
    pub fn set_referenced_table_name(mut self, name: OptionallyQualifiedName) -> Self {
        self.referenced_table_name = Some(name);
        self
    }

    /// Sets the ordered referenced column names.
    #[must_use]
    pub fn set_referenced_column_names(mut self, names: Vec<UnqualifiedName>) -> Self {
        self.referenced_column_names = names;
        self
    }

    /// Sets the match type.
    #[must_use]
    pub fn set_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub fn set_on_update_action(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub fn set_on_delete_action(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Sets the deferrability mode.
    #[must_use]
    pub fn set_deferrability(mut self, deferrability: Deferrability) -> Self {
        self.deferrability = deferrability;
        self
    }

    /// Validates the definition and assembles the constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the referencing columns, referenced
    /// table, or referenced columns are missing, or when the referencing and
    /// referenced column lists differ in length.
    pub fn create(self) -> Result<ForeignKeyConstraint, DefinitionError> {
        if self.referencing_column_names.is_empty() {
            return Err(DefinitionError::ReferencingColumnNamesNotSet);
        }
        let referenced_table_name = self
            .referenced_table_name
            .ok_or(DefinitionError::ReferencedTableNameNotSet)?;
        if self.referenced_column_names.is_empty() {
            return Err(DefinitionError::ReferencedColumnNamesNotSet);
        }
        if self.referencing_column_names.len() != self.referenced_column_names.len() {
            return Err(DefinitionError::ColumnArityMismatch {
                referencing: self.referencing_column_names.len(),
                referenced: self.referenced_column_names.len(),
            });
        }

        Ok(ForeignKeyConstraint {
            name: self.name,
            referencing_column_names: self.referencing_column_names,
            referenced_table_name,
            referenced_column_names: self.referenced_column_names,
            match_type: self.match_type,
            on_update: self.on_update,
            on_delete: self.on_delete,
            deferrability: self.deferrability,
        })
    }
}
