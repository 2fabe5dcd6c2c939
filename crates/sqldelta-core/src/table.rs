//! Table model: the aggregate of columns, indexes, and constraints.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::casemap::CaseInsensitiveMap;
use crate::column::Column;
use crate::constraint::{ForeignKeyConstraint, PrimaryKeyConstraint, UniqueConstraint};
use crate::error::DefinitionError;
use crate::index::Index;
use crate::name::{OptionallyQualifiedName, UnqualifiedName};

/// Storage options carried by a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Storage engine (e.g. InnoDB).
    pub engine: Option<String>,
    /// Default character set.
    pub charset: Option<String>,
    /// Default collation.
    pub collation: Option<String>,
    /// Table comment.
    pub comment: Option<String>,
    /// Row storage format.
    pub row_format: Option<String>,
    /// Raw creation options.
    pub create_options: Option<String>,
    /// Auto-increment start value.
    pub auto_increment: Option<u64>,
    /// Anything platform-specific that has no dedicated field.
    pub extra: BTreeMap<String, String>,
}

/// Platform parameters used for managing objects scoped to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfiguration {
    max_identifier_length: usize,
}

impl TableConfiguration {
    /// Creates a configuration with the given maximum identifier length.
    #[must_use]
    pub const fn new(max_identifier_length: usize) -> Self {
        Self {
            max_identifier_length,
        }
    }

    /// The maximum length of identifiers generated for objects scoped to the
    /// table.
    #[must_use]
    pub const fn max_identifier_length(&self) -> usize {
        self.max_identifier_length
    }
}

impl Default for TableConfiguration {
    fn default() -> Self {
        Self::new(63)
    }
}

/// A table: name, ordered columns, indexes, at most one primary key
/// constraint, unique constraints, foreign keys, and storage options.
///
/// Immutable after construction; build through [`Table::editor`] and derive
/// modified copies through [`Table::edit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: OptionallyQualifiedName,
    columns: CaseInsensitiveMap<Column>,
    indexes: CaseInsensitiveMap<Index>,
    primary_key: Option<PrimaryKeyConstraint>,
    unique_constraints: CaseInsensitiveMap<UniqueConstraint>,
    foreign_keys: CaseInsensitiveMap<ForeignKeyConstraint>,
    options: TableOptions,
    configuration: TableConfiguration,
}

impl Table {
    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> TableEditor {
        TableEditor::default()
    }

    /// Returns an editor pre-seeded with this table's state.
    #[must_use]
    pub fn edit(&self) -> TableEditor {
        TableEditor {
            name: Some(self.name.clone()),
            columns: self.columns.values().cloned().collect(),
            indexes: self.indexes.values().cloned().collect(),
            primary_key: self.primary_key.clone(),
            unique_constraints: self.unique_constraints.values().cloned().collect(),
            foreign_keys: self.foreign_keys.values().cloned().collect(),
            options: self.options.clone(),
            configuration: self.configuration,
        }
    }

    /// The table name.
    #[must_use]
    pub const fn name(&self) -> &OptionallyQualifiedName {
        &self.name
    }

    /// The columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Looks up a column by name, case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Whether a column with the given name exists, case-insensitively.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// The indexes in declaration order.
    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.values()
    }

    /// Looks up an index by name, case-insensitively.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.get(name)
    }

    /// The primary key constraint, if one exists.
    #[must_use]
    pub const fn primary_key(&self) -> Option<&PrimaryKeyConstraint> {
        self.primary_key.as_ref()
    }

    /// The unique constraints in declaration order.
    pub fn unique_constraints(&self) -> impl Iterator<Item = &UniqueConstraint> {
        self.unique_constraints.values()
    }

    /// The foreign key constraints in declaration order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKeyConstraint> {
        self.foreign_keys.values()
    }

    /// Looks up a foreign key by name, case-insensitively.
    #[must_use]
    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKeyConstraint> {
        self.foreign_keys.get(name)
    }

    /// The table's storage options.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// The table-scoped platform configuration.
    #[must_use]
    pub const fn configuration(&self) -> &TableConfiguration {
        &self.configuration
    }
}

/// Fluent builder for [`Table`] instances. The only construction path that
/// guarantees table-local invariants: unique column names, unique
/// index/constraint names, and deterministic names for anonymous objects.
#[derive(Debug, Clone, Default)]
pub struct TableEditor {
    name: Option<OptionallyQualifiedName>,
    columns: Vec<Column>,
    indexes: Vec<Index>,
    primary_key: Option<PrimaryKeyConstraint>,
    unique_constraints: Vec<UniqueConstraint>,
    foreign_keys: Vec<ForeignKeyConstraint>,
    options: TableOptions,
    configuration: TableConfiguration,
}

impl TableEditor {
    /// Sets the table name.
    #[must_use]
    pub fn set_name(mut self, name: OptionallyQualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Replaces the column list.
    #[must_use]
    pub fn set_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Appends an index.
    #[must_use]
    pub fn add_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Sets or clears the primary key constraint.
    #[must_use]
    pub fn set_primary_key_constraint(
        mut self,
        primary_key: Option<PrimaryKeyConstraint>,
    ) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Appends a unique constraint.
    #[must_use]
    pub fn add_unique_constraint(mut self, constraint: UniqueConstraint) -> Self {
        self.unique_constraints.push(constraint);
        self
    }

    /// Appends a foreign key constraint.
    #[must_use]
    pub fn add_foreign_key_constraint(mut self, constraint: ForeignKeyConstraint) -> Self {
        self.foreign_keys.push(constraint);
        self
    }

    /// Sets the storage options.
    #[must_use]
    pub fn set_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the table-scoped platform configuration.
    #[must_use]
    pub fn set_configuration(mut self, configuration: TableConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Validates the definition and assembles the table.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the name is missing or a column,
    /// index, or constraint name is duplicated within the table.
    pub fn create(self) -> Result<Table, DefinitionError> {
        let name = self
            .name
            .ok_or(DefinitionError::NameNotSet { object: "Table" })?;
        let table_key = name.normalized();
        let max_length = self.configuration.max_identifier_length();

        let mut columns = CaseInsensitiveMap::new();
        for column in self.columns {
            let spelling = column.name().to_string();
            if columns.insert(spelling.clone(), column).is_some() {
                return Err(DefinitionError::DuplicateColumn {
                    table: table_key,
                    column: spelling,
                });
            }
        }

        let mut indexes = CaseInsensitiveMap::new();
        for index in self.indexes {
            let index = match index.name() {
                Some(_) => index,
                None => {
                    let generated =
                        generated_name(&table_key, &index.unquoted_columns(), "idx", max_length);
                    index.with_name(generated)
                }
            };
            let spelling = index
                .name()
                .map(ToString::to_string)
                .unwrap_or_default();
            if indexes.insert(spelling.clone(), index).is_some() {
                return Err(DefinitionError::DuplicateIndex {
                    table: table_key,
                    index: spelling,
                });
            }
        }

        let mut unique_constraints = CaseInsensitiveMap::new();
        for constraint in self.unique_constraints {
            let constraint = match constraint.name() {
                Some(_) => constraint,
                None => {
                    let generated = generated_name(
                        &table_key,
                        &constraint.unquoted_columns(),
                        "uniq",
                        max_length,
                    );
                    constraint.with_name(generated)
                }
            };
            let spelling = constraint
                .name()
                .map(ToString::to_string)
                .unwrap_or_default();
            if unique_constraints
                .insert(spelling.clone(), constraint)
                .is_some()
            {
                return Err(DefinitionError::DuplicateConstraint {
                    table: table_key,
                    constraint: spelling,
                });
            }
        }

        let mut foreign_keys = CaseInsensitiveMap::new();
        for constraint in self.foreign_keys {
            let constraint = match constraint.name() {
                Some(_) => constraint,
                None => {
                    let referencing: Vec<String> = constraint
                        .referencing_column_names()
                        .iter()
                        .map(|column| column.normalized())
                        .collect();
                    let parts: Vec<&str> =
                        referencing.iter().map(String::as_str).collect();
                    let generated = generated_name(&table_key, &parts, "fk", max_length);
                    constraint.with_name(generated)
                }
            };
            let spelling = constraint
                .name()
                .map(ToString::to_string)
                .unwrap_or_default();
            if foreign_keys.insert(spelling.clone(), constraint).is_some() {
                return Err(DefinitionError::DuplicateConstraint {
                    table: table_key,
                    constraint: spelling,
                });
            }
        }

        Ok(Table {
            name,
            columns,
            indexes,
            primary_key: self.primary_key,
            unique_constraints,
            foreign_keys,
            options: self.options,
            configuration: self.configuration,
        })
    }
}

/// Derives a deterministic name for an anonymous table-scoped object from
/// the table name and the covered column names, truncated to the platform
/// maximum identifier length.
fn generated_name<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    prefix: &str,
    max_length: usize,
) -> UnqualifiedName {
    let mut hasher = Sha256::new();
    hasher.update(table.as_bytes());
    for column in columns {
        hasher.update([0u8]);
        hasher.update(column.as_ref().to_lowercase().as_bytes());
    }
    let digest = hasher.finalize();

    let mut name = format!("{prefix}_");
    for byte in &digest[..6] {
        let _ = write!(name, "{byte:02x}");
    }
    name.truncate(max_length);

    UnqualifiedName::unquoted(name).expect("generated names are never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;
    use crate::index::{IndexOptions, IndexedColumn};

    fn column(name: &str) -> Column {
        Column::editor()
            .set_name(UnqualifiedName::unquoted(name).unwrap())
            .set_type(ColumnType::Integer)
            .create()
            .unwrap()
    }

    fn table_name(name: &str) -> OptionallyQualifiedName {
        OptionallyQualifiedName::unquoted(name, None).unwrap()
    }

    #[test]
    fn name_is_required() {
        assert_eq!(
            Table::editor().create().unwrap_err(),
            DefinitionError::NameNotSet { object: "Table" }
        );
    }

    #[test]
    fn duplicate_columns_rejected_case_insensitively() {
        let result = Table::editor()
            .set_name(table_name("users"))
            .add_column(column("id"))
            .add_column(column("ID"))
            .create();
        assert!(matches!(
            result,
            Err(DefinitionError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn column_lookup_is_case_insensitive_and_case_preserving() {
        let table = Table::editor()
            .set_name(table_name("users"))
            .add_column(column("CreatedAt"))
            .create()
            .unwrap();
        let found = table.column("createdat").unwrap();
        assert_eq!(found.name().identifier().value(), "CreatedAt");
    }

    #[test]
    fn anonymous_indexes_get_deterministic_names() {
        let build = || {
            Table::editor()
                .set_name(table_name("users"))
                .add_column(column("email"))
                .add_index(Index::new(None, &["email"], IndexOptions::default()))
                .create()
                .unwrap()
        };
        let a = build();
        let b = build();

        let name_a = a.indexes().next().unwrap().name().unwrap().to_string();
        let name_b = b.indexes().next().unwrap().name().unwrap().to_string();
        assert_eq!(name_a, name_b);
        assert!(name_a.starts_with("idx_"), "got {name_a}");
    }

    #[test]
    fn generated_names_respect_the_identifier_length_limit() {
        let table = Table::editor()
            .set_name(table_name("users"))
            .set_configuration(TableConfiguration::new(8))
            .add_column(column("email"))
            .add_index(Index::new(None, &["email"], IndexOptions::default()))
            .create()
            .unwrap();
        let name = table.indexes().next().unwrap().name().unwrap().to_string();
        assert!(name.len() <= 8, "got {name}");
    }

    #[test]
    fn duplicate_index_names_rejected() {
        let index = || {
            Index::editor()
                .set_name(UnqualifiedName::unquoted("idx_email").unwrap())
                .set_columns(vec![IndexedColumn::new(
                    UnqualifiedName::unquoted("email").unwrap(),
                    None,
                )])
                .create()
                .unwrap()
        };
        let result = Table::editor()
            .set_name(table_name("users"))
            .add_column(column("email"))
            .add_index(index())
            .add_index(index())
            .create();
        assert!(matches!(result, Err(DefinitionError::DuplicateIndex { .. })));
    }

    #[test]
    fn anonymous_foreign_keys_get_prefixed_names() {
        let fk = ForeignKeyConstraint::editor()
            .set_referencing_column_names(vec![UnqualifiedName::unquoted("parent_id").unwrap()])
            .set_referenced_table_name(table_name("parent"))
            .set_referenced_column_names(vec![UnqualifiedName::unquoted("id").unwrap()])
            .create()
            .unwrap();
        let table = Table::editor()
            .set_name(table_name("children"))
            .add_column(column("parent_id"))
            .add_foreign_key_constraint(fk)
            .create()
            .unwrap();
        let name = table
            .foreign_keys()
            .next()
            .unwrap()
            .name()
            .unwrap()
            .to_string();
        assert!(name.starts_with("fk_"), "got {name}");
        assert!(table.foreign_key(&name).is_some());
    }

    #[test]
    fn edit_round_trip_is_structurally_equal() {
        let pk = PrimaryKeyConstraint::editor()
            .set_column_names(vec![UnqualifiedName::unquoted("id").unwrap()])
            .create()
            .unwrap();
        let original = Table::editor()
            .set_name(table_name("users"))
            .add_column(column("id"))
            .add_column(column("email"))
            .set_primary_key_constraint(Some(pk))
            .set_options(TableOptions {
                engine: Some("InnoDB".into()),
                ..TableOptions::default()
            })
            .create()
            .unwrap();
        assert_eq!(original, original.edit().create().unwrap());
    }
}
