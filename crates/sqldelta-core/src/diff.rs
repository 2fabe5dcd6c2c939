//! Diff value objects: what changed between two snapshots.
//!
//! All diff types are owning value objects created fresh by each comparator
//! call and never mutated afterward. They are consumed by a DDL generator
//! (out of scope here) or discarded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::casemap::CaseInsensitiveMap;
use crate::column::Column;
use crate::constraint::{ForeignKeyConstraint, PrimaryKeyConstraint};
use crate::index::Index;
use crate::name::UnqualifiedName;
use crate::sequence::Sequence;
use crate::table::Table;
use crate::view::View;

/// A column attribute that differs between the old and new column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ChangedProperty {
    /// The semantic type token.
    Type,
    /// Declared length.
    Length,
    /// Declared precision.
    Precision,
    /// Declared scale.
    Scale,
    /// Fixed-width flag.
    Fixed,
    /// Unsigned flag.
    Unsigned,
    /// NOT NULL requirement.
    NotNull,
    /// Default value.
    Default,
    /// Auto-increment flag.
    AutoIncrement,
    /// Comment text.
    Comment,
    /// The column name.
    Name,
    /// One of the diff-relevant platform options.
    PlatformOptions,
}

/// The difference between an old and a new version of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDiff {
    /// The column as it exists in the old table.
    pub old_column: Column,
    /// The column as it exists in the new table.
    pub new_column: Column,
    /// The attributes that differ.
    pub changed_properties: BTreeSet<ChangedProperty>,
}

impl ColumnDiff {
    /// Creates a column diff.
    #[must_use]
    pub const fn new(
        old_column: Column,
        new_column: Column,
        changed_properties: BTreeSet<ChangedProperty>,
    ) -> Self {
        Self {
            old_column,
            new_column,
            changed_properties,
        }
    }

    /// Whether the given attribute changed.
    #[must_use]
    pub fn has_changed(&self, property: ChangedProperty) -> bool {
        self.changed_properties.contains(&property)
    }

    /// Whether the semantic type changed.
    #[must_use]
    pub fn has_type_changed(&self) -> bool {
        self.has_changed(ChangedProperty::Type)
    }

    /// Whether the column was renamed.
    #[must_use]
    pub fn has_name_changed(&self) -> bool {
        self.has_changed(ChangedProperty::Name)
    }

    /// Whether the comment changed.
    #[must_use]
    pub fn has_comment_changed(&self) -> bool {
        self.has_changed(ChangedProperty::Comment)
    }

    /// Whether the auto-increment flag changed.
    #[must_use]
    pub fn has_autoincrement_changed(&self) -> bool {
        self.has_changed(ChangedProperty::AutoIncrement)
    }
}

/// How the primary key constraint changed between two tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimaryKeyChange {
    /// The new table gained a primary key.
    Added(PrimaryKeyConstraint),
    /// The new table lost its primary key.
    Dropped(PrimaryKeyConstraint),
    /// The primary key changed columns, order, or clustering.
    Altered {
        /// The old constraint.
        old: PrimaryKeyConstraint,
        /// The new constraint.
        new: PrimaryKeyConstraint,
    },
}

/// The structural difference between two versions of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDiff {
    /// The old (base) table the diff was computed against.
    pub table: Table,
    /// Columns present only in the new table.
    pub added_columns: Vec<Column>,
    /// Columns present only in the old table.
    pub dropped_columns: Vec<Column>,
    /// Columns present in both tables with attribute differences. Renamed
    /// columns appear here as well, as rename-only entries.
    pub changed_columns: Vec<ColumnDiff>,
    /// Renamed columns, keyed by the old name.
    pub renamed_columns: CaseInsensitiveMap<Column>,
    /// Indexes present only in the new table.
    pub added_indexes: Vec<Index>,
    /// Indexes present only in the old table.
    pub dropped_indexes: Vec<Index>,
    /// Renamed indexes, keyed by the old name.
    pub renamed_indexes: CaseInsensitiveMap<Index>,
    /// Same-name indexes whose definition changed, reported as the
    /// replacement index (legacy behavior, see `ComparatorConfig`).
    pub modified_indexes: Vec<Index>,
    /// Foreign keys present only in the new table (structurally).
    pub added_foreign_keys: Vec<ForeignKeyConstraint>,
    /// Foreign keys present only in the old table (structurally).
    pub dropped_foreign_keys: Vec<ForeignKeyConstraint>,
    /// Primary key change, if any.
    pub primary_key_change: Option<PrimaryKeyChange>,
}

impl TableDiff {
    /// Creates an empty diff against the given base table.
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self {
            table,
            added_columns: Vec::new(),
            dropped_columns: Vec::new(),
            changed_columns: Vec::new(),
            renamed_columns: CaseInsensitiveMap::new(),
            added_indexes: Vec::new(),
            dropped_indexes: Vec::new(),
            renamed_indexes: CaseInsensitiveMap::new(),
            modified_indexes: Vec::new(),
            added_foreign_keys: Vec::new(),
            dropped_foreign_keys: Vec::new(),
            primary_key_change: None,
        }
    }

    /// Whether the diff carries no changes at all. Used as the signal to
    /// skip issuing any alteration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_columns.is_empty()
            && self.dropped_columns.is_empty()
            && self.changed_columns.is_empty()
            && self.renamed_columns.is_empty()
            && self.added_indexes.is_empty()
            && self.dropped_indexes.is_empty()
            && self.renamed_indexes.is_empty()
            && self.modified_indexes.is_empty()
            && self.added_foreign_keys.is_empty()
            && self.dropped_foreign_keys.is_empty()
            && self.primary_key_change.is_none()
    }
}

/// The structural difference between two schema snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDiff {
    /// Namespaces present only in the new schema.
    pub created_schemas: Vec<UnqualifiedName>,
    /// Namespaces present only in the old schema.
    pub dropped_schemas: Vec<UnqualifiedName>,
    /// Tables present only in the new schema.
    pub created_tables: Vec<Table>,
    /// Tables present in both schemas with non-empty table diffs.
    pub altered_tables: Vec<TableDiff>,
    /// Tables present only in the old schema.
    pub dropped_tables: Vec<Table>,
    /// Sequences present only in the new schema.
    pub created_sequences: Vec<Sequence>,
    /// Sequences present in both schemas with changed allocation size or
    /// initial value, reported as the new sequence.
    pub altered_sequences: Vec<Sequence>,
    /// Sequences present only in the old schema.
    pub dropped_sequences: Vec<Sequence>,
    /// Views present only in the new schema, including replacements for
    /// views whose defining query changed.
    pub created_views: Vec<View>,
    /// Views present only in the old schema, including old versions of
    /// views whose defining query changed.
    pub dropped_views: Vec<View>,
}

impl SchemaDiff {
    /// Whether the diff carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created_schemas.is_empty()
            && self.dropped_schemas.is_empty()
            && self.created_tables.is_empty()
            && self.altered_tables.is_empty()
            && self.dropped_tables.is_empty()
            && self.created_sequences.is_empty()
            && self.altered_sequences.is_empty()
            && self.dropped_sequences.is_empty()
            && self.created_views.is_empty()
            && self.dropped_views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;
    use crate::name::OptionallyQualifiedName;

    fn column(name: &str) -> Column {
        Column::editor()
            .set_name(UnqualifiedName::unquoted(name).unwrap())
            .set_type(ColumnType::Integer)
            .create()
            .unwrap()
    }

    fn table(name: &str) -> Table {
        Table::editor()
            .set_name(OptionallyQualifiedName::unquoted(name, None).unwrap())
            .add_column(column("id"))
            .create()
            .unwrap()
    }

    #[test]
    fn fresh_table_diff_is_empty() {
        assert!(TableDiff::new(table("users")).is_empty());
    }

    #[test]
    fn any_collection_makes_the_diff_non_empty() {
        let mut diff = TableDiff::new(table("users"));
        diff.added_columns.push(column("email"));
        assert!(!diff.is_empty());

        let mut diff = TableDiff::new(table("users"));
        diff.renamed_columns.insert("old_name", column("new_name"));
        assert!(!diff.is_empty());

        let mut diff = TableDiff::new(table("users"));
        diff.primary_key_change = Some(PrimaryKeyChange::Added(
            PrimaryKeyConstraint::editor()
                .set_column_names(vec![UnqualifiedName::unquoted("id").unwrap()])
                .create()
                .unwrap(),
        ));
        assert!(!diff.is_empty());
    }

    #[test]
    fn column_diff_query_methods() {
        let diff = ColumnDiff::new(
            column("a"),
            column("b"),
            [ChangedProperty::Name, ChangedProperty::Comment]
                .into_iter()
                .collect(),
        );
        assert!(diff.has_name_changed());
        assert!(diff.has_comment_changed());
        assert!(!diff.has_type_changed());
        assert!(!diff.has_autoincrement_changed());
    }

    #[test]
    fn schema_diff_default_is_empty() {
        assert!(SchemaDiff::default().is_empty());
    }

    #[test]
    fn schema_diff_serializes() {
        let diff = SchemaDiff {
            created_tables: vec![table("users")],
            ..SchemaDiff::default()
        };
        let json = serde_json::to_string(&diff).unwrap();
        let restored: SchemaDiff = serde_json::from_str(&json).unwrap();
        assert_eq!(diff, restored);
    }
}
