//! Schema model: a namespace-aware collection of tables, sequences, and
//! views.

use serde::{Deserialize, Serialize};

use crate::casemap::{normalize_key, CaseInsensitiveMap};
use crate::diagnostics::{Warning, WarningCode};
use crate::error::DefinitionError;
use crate::name::{parse_optionally_qualified, OptionallyQualifiedName, UnqualifiedName};
use crate::sequence::Sequence;
use crate::table::{Table, TableOptions};
use crate::view::View;

/// Schema-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// The namespace unqualified object names implicitly belong to.
    pub default_namespace: Option<UnqualifiedName>,
    /// Maximum identifier length on the target platform.
    pub max_identifier_length: usize,
    /// Options applied to tables that do not declare their own.
    pub default_table_options: TableOptions,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            default_namespace: None,
            max_identifier_length: 63,
            default_table_options: TableOptions::default(),
        }
    }
}

/// A schema snapshot.
///
/// Object lookups are case-insensitive and namespace-aware: an unqualified
/// lookup implicitly matches an object qualified with the schema's default
/// namespace, and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    tables: CaseInsensitiveMap<Table>,
    sequences: CaseInsensitiveMap<Sequence>,
    views: CaseInsensitiveMap<View>,
    namespaces: Vec<UnqualifiedName>,
    config: SchemaConfig,
    warnings: Vec<Warning>,
}

impl Schema {
    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> SchemaEditor {
        SchemaEditor::default()
    }

    /// Returns an editor pre-seeded with this schema's state.
    #[must_use]
    pub fn edit(&self) -> SchemaEditor {
        SchemaEditor {
            config: self.config.clone(),
            namespaces: self.namespaces.clone(),
            tables: self.tables.values().cloned().collect(),
            sequences: self.sequences.values().cloned().collect(),
            views: self.views.values().cloned().collect(),
        }
    }

    /// The tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Looks up a table by name, case-insensitively and
    /// default-namespace-aware.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(&self.resolve_raw(name))
    }

    /// Whether a table with the given name exists.
    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// The sequences in declaration order.
    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.values()
    }

    /// Looks up a sequence by name, case-insensitively and
    /// default-namespace-aware.
    #[must_use]
    pub fn sequence(&self, name: &str) -> Option<&Sequence> {
        self.sequences.get(&self.resolve_raw(name))
    }

    /// The views in declaration order.
    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// Looks up a view by name, case-insensitively and
    /// default-namespace-aware.
    #[must_use]
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.get(&self.resolve_raw(name))
    }

    /// The namespaces, explicit and implied by object qualifiers, in first
    /// occurrence order.
    #[must_use]
    pub fn namespaces(&self) -> &[UnqualifiedName] {
        &self.namespaces
    }

    /// Whether the given namespace exists, case-insensitively.
    #[must_use]
    pub fn has_namespace(&self, name: &str) -> bool {
        let needle = normalize_key(name);
        self.namespaces
            .iter()
            .any(|namespace| namespace.normalized() == needle)
    }

    /// The schema configuration.
    #[must_use]
    pub const fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Compatibility warnings recorded while the schema was assembled.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Resolves a name to the fully qualified lookup key used internally:
    /// the qualifier (or the default namespace, when configured) plus the
    /// object name, both normalized.
    #[must_use]
    pub fn resolve_name(&self, name: &OptionallyQualifiedName) -> String {
        resolve_key(name, self.config.default_namespace.as_ref())
    }

    fn resolve_raw(&self, raw: &str) -> String {
        parse_optionally_qualified(raw).map_or_else(
            |_| normalize_key(raw),
            |name| self.resolve_name(&name),
        )
    }
}

fn resolve_key(
    name: &OptionallyQualifiedName,
    default_namespace: Option<&UnqualifiedName>,
) -> String {
    match (name.qualifier(), default_namespace) {
        (Some(qualifier), _) => {
            format!("{}.{}", qualifier.normalized(), name.name().normalized())
        }
        (None, Some(namespace)) => {
            format!("{}.{}", namespace.normalized(), name.name().normalized())
        }
        (None, None) => name.name().normalized(),
    }
}

/// Fluent builder for [`Schema`] instances: the construction path that
/// enforces global name uniqueness and records qualification-consistency
/// warnings.
#[derive(Debug, Clone, Default)]
pub struct SchemaEditor {
    config: SchemaConfig,
    namespaces: Vec<UnqualifiedName>,
    tables: Vec<Table>,
    sequences: Vec<Sequence>,
    views: Vec<View>,
}

impl SchemaEditor {
    /// Sets the schema configuration.
    #[must_use]
    pub fn set_config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    /// Declares a namespace explicitly.
    #[must_use]
    pub fn add_namespace(mut self, namespace: UnqualifiedName) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Appends a table.
    #[must_use]
    pub fn add_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Appends a sequence.
    #[must_use]
    pub fn add_sequence(mut self, sequence: Sequence) -> Self {
        self.sequences.push(sequence);
        self
    }

    /// Appends a view.
    #[must_use]
    pub fn add_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// Validates the definition and assembles the schema.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateObject`] when two same-kind
    /// objects resolve to the same fully qualified name.
    pub fn create(self) -> Result<Schema, DefinitionError> {
        let default_namespace = self.config.default_namespace.clone();
        let mut namespaces: Vec<UnqualifiedName> = Vec::new();
        let mut register_namespace = |namespace: UnqualifiedName| {
            let key = namespace.normalized();
            if !namespaces.iter().any(|existing| existing.normalized() == key) {
                namespaces.push(namespace);
            }
        };

        // The default namespace exists by definition once configured;
        // unqualified objects live in it.
        if let Some(namespace) = default_namespace.clone() {
            register_namespace(namespace);
        }

        for namespace in self.namespaces {
            register_namespace(namespace);
        }

        let mut warnings = Vec::new();

        let mut tables = CaseInsensitiveMap::new();
        let mut qualification = QualificationTracker::new("table", default_namespace.is_some());
        for table in self.tables {
            let name = table.name().clone();
            if let Some(qualifier) = name.qualifier() {
                register_namespace(UnqualifiedName::new(qualifier.clone()));
            }
            qualification.observe(&name, &mut warnings);

            let key = resolve_key(&name, default_namespace.as_ref());
            if tables.insert(key.clone(), table).is_some() {
                return Err(DefinitionError::DuplicateObject {
                    kind: "table",
                    name: key,
                });
            }
        }

        let mut sequences = CaseInsensitiveMap::new();
        let mut qualification =
            QualificationTracker::new("sequence", default_namespace.is_some());
        for sequence in self.sequences {
            let name = sequence.name().clone();
            if let Some(qualifier) = name.qualifier() {
                register_namespace(UnqualifiedName::new(qualifier.clone()));
            }
            qualification.observe(&name, &mut warnings);

            let key = resolve_key(&name, default_namespace.as_ref());
            if sequences.insert(key.clone(), sequence).is_some() {
                return Err(DefinitionError::DuplicateObject {
                    kind: "sequence",
                    name: key,
                });
            }
        }

        let mut views = CaseInsensitiveMap::new();
        for view in self.views {
            let name = view.name().clone();
            if let Some(qualifier) = name.qualifier() {
                register_namespace(UnqualifiedName::new(qualifier.clone()));
            }

            let key = resolve_key(&name, default_namespace.as_ref());
            if views.insert(key.clone(), view).is_some() {
                return Err(DefinitionError::DuplicateObject {
                    kind: "view",
                    name: key,
                });
            }
        }

        Ok(Schema {
            tables,
            sequences,
            views,
            namespaces,
            config: self.config,
            warnings,
        })
    }
}

/// Tracks whether qualified and unqualified names of one object kind are
/// being mixed. Without a default namespace there is no way to interpret the
/// unqualified ones consistently, so mixing is flagged; this stays a
/// backward-compatibility warning, never a hard error.
struct QualificationTracker {
    kind: &'static str,
    has_default_namespace: bool,
    first_qualified: Option<bool>,
}

impl QualificationTracker {
    const fn new(kind: &'static str, has_default_namespace: bool) -> Self {
        Self {
            kind,
            has_default_namespace,
            first_qualified: None,
        }
    }

    fn observe(&mut self, name: &OptionallyQualifiedName, warnings: &mut Vec<Warning>) {
        if self.has_default_namespace {
            return;
        }
        let qualified = name.qualifier().is_some();
        match self.first_qualified {
            None => self.first_qualified = Some(qualified),
            Some(first) if first != qualified => {
                warnings.push(Warning::emit(
                    WarningCode::MixedNameQualification,
                    format!(
                        "{} '{name}' mixes qualified and unqualified naming \
                         without a configured default namespace",
                        self.kind
                    ),
                ));
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, ColumnType};

    fn table(name: &str, qualifier: Option<&str>) -> Table {
        Table::editor()
            .set_name(OptionallyQualifiedName::unquoted(name, qualifier).unwrap())
            .add_column(
                Column::editor()
                    .set_name(crate::name::UnqualifiedName::unquoted("id").unwrap())
                    .set_type(ColumnType::Integer)
                    .create()
                    .unwrap(),
            )
            .create()
            .unwrap()
    }

    #[test]
    fn duplicate_tables_rejected() {
        let result = Schema::editor()
            .add_table(table("users", None))
            .add_table(table("USERS", None))
            .create();
        assert_eq!(
            result.unwrap_err(),
            DefinitionError::DuplicateObject {
                kind: "table",
                name: "users".into(),
            }
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let schema = Schema::editor()
            .add_table(table("Users", None))
            .create()
            .unwrap();
        assert!(schema.has_table("users"));
        assert!(schema.has_table("USERS"));
    }

    #[test]
    fn unqualified_lookup_matches_default_namespace() {
        let schema = Schema::editor()
            .set_config(SchemaConfig {
                default_namespace: Some(UnqualifiedName::unquoted("public").unwrap()),
                ..SchemaConfig::default()
            })
            .add_table(table("users", Some("public")))
            .create()
            .unwrap();

        assert!(schema.has_table("users"));
        assert!(schema.has_table("public.users"));
        assert!(!schema.has_table("other.users"));
    }

    #[test]
    fn qualified_lookup_matches_unqualified_object_under_default_namespace() {
        let schema = Schema::editor()
            .set_config(SchemaConfig {
                default_namespace: Some(UnqualifiedName::unquoted("public").unwrap()),
                ..SchemaConfig::default()
            })
            .add_table(table("users", None))
            .create()
            .unwrap();

        assert!(schema.has_table("public.users"));
    }

    #[test]
    fn qualifiers_imply_namespaces() {
        let schema = Schema::editor()
            .add_table(table("users", Some("app")))
            .create()
            .unwrap();
        assert!(schema.has_namespace("app"));
        assert!(schema.has_namespace("APP"));
        assert!(!schema.has_namespace("public"));
    }

    #[test]
    fn mixed_qualification_warns_but_succeeds() {
        let schema = Schema::editor()
            .add_table(table("users", Some("app")))
            .add_table(table("orders", None))
            .create()
            .unwrap();

        assert_eq!(schema.warnings().len(), 1);
        assert_eq!(
            schema.warnings()[0].code,
            WarningCode::MixedNameQualification
        );
        assert!(schema.has_table("app.users"));
        assert!(schema.has_table("orders"));
    }

    #[test]
    fn mixed_qualification_is_fine_with_a_default_namespace() {
        let schema = Schema::editor()
            .set_config(SchemaConfig {
                default_namespace: Some(UnqualifiedName::unquoted("app").unwrap()),
                ..SchemaConfig::default()
            })
            .add_table(table("users", Some("app")))
            .add_table(table("orders", None))
            .create()
            .unwrap();
        assert!(schema.warnings().is_empty());
    }

    #[test]
    fn edit_round_trip_is_structurally_equal() {
        let schema = Schema::editor()
            .add_namespace(UnqualifiedName::unquoted("app").unwrap())
            .add_table(table("users", Some("app")))
            .add_sequence(
                Sequence::editor()
                    .set_name(OptionallyQualifiedName::unquoted("users_id_seq", Some("app")).unwrap())
                    .create()
                    .unwrap(),
            )
            .create()
            .unwrap();
        assert_eq!(schema, schema.edit().create().unwrap());
    }
}
