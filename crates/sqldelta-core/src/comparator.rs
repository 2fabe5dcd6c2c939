//! The comparator: computes structural diffs between schema snapshots.
//!
//! Structural mismatches are never errors; they are represented in the
//! returned diff. Rename detection pairs unmatched dropped and added objects
//! whose definitions are identical apart from the name, and declines to
//! infer anything when the pairing is ambiguous.

use std::collections::BTreeSet;

use crate::column::Column;
use crate::diff::{ChangedProperty, ColumnDiff, PrimaryKeyChange, SchemaDiff, TableDiff};
use crate::index::Index;
use crate::platform::{ComparatorPlatform, GenericPlatform};
use crate::schema::Schema;
use crate::table::Table;

/// Comparator behavior switches.
///
/// The `report_modified_indexes` switch preserves a legacy reporting shape:
/// a same-name index whose definition changed surfaces as a "modified index"
/// instead of a drop and an add.
#[derive(Debug, Clone, Copy)]
pub struct ComparatorConfig {
    detect_renamed_columns: bool,
    detect_renamed_indexes: bool,
    report_modified_indexes: bool,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            detect_renamed_columns: true,
            detect_renamed_indexes: true,
            report_modified_indexes: true,
        }
    }
}

impl ComparatorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with column rename detection switched.
    #[must_use]
    pub const fn with_detect_renamed_columns(mut self, detect: bool) -> Self {
        self.detect_renamed_columns = detect;
        self
    }

    /// Whether column rename detection is enabled.
    #[must_use]
    pub const fn detect_renamed_columns(&self) -> bool {
        self.detect_renamed_columns
    }

    /// Returns a copy with index rename detection switched.
    #[must_use]
    pub const fn with_detect_renamed_indexes(mut self, detect: bool) -> Self {
        self.detect_renamed_indexes = detect;
        self
    }

    /// Whether index rename detection is enabled.
    #[must_use]
    pub const fn detect_renamed_indexes(&self) -> bool {
        self.detect_renamed_indexes
    }

    /// Returns a copy with modified-index reporting switched.
    #[must_use]
    pub const fn with_report_modified_indexes(mut self, report: bool) -> Self {
        self.report_modified_indexes = report;
        self
    }

    /// Whether same-name index changes are reported as modified indexes.
    #[must_use]
    pub const fn report_modified_indexes(&self) -> bool {
        self.report_modified_indexes
    }
}

/// Compares two schema or table snapshots and produces a structural diff.
///
/// Holds no state across calls beyond its configuration, so one instance can
/// be shared and reused across concurrent diff computations.
#[derive(Debug, Clone, Default)]
pub struct Comparator<P = GenericPlatform> {
    platform: P,
    config: ComparatorConfig,
}

impl Comparator {
    /// Creates a comparator with platform-neutral behavior and the default
    /// configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(GenericPlatform)
    }
}

impl<P: ComparatorPlatform> Comparator<P> {
    /// Creates a comparator with the given platform quirks.
    #[must_use]
    pub fn with_platform(platform: P) -> Self {
        Self {
            platform,
            config: ComparatorConfig::default(),
        }
    }

    /// Returns a copy with the given configuration.
    #[must_use]
    pub fn with_config(mut self, config: ComparatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Compares two tables and reports what changed from `old_table` to
    /// `new_table`.
    #[must_use]
    pub fn compare_tables(&self, old_table: &Table, new_table: &Table) -> TableDiff {
        let mut diff = TableDiff::new(old_table.clone());

        self.diff_columns(old_table, new_table, &mut diff);
        self.diff_indexes(old_table, new_table, &mut diff);
        Self::diff_foreign_keys(old_table, new_table, &mut diff);
        Self::diff_primary_key(old_table, new_table, &mut diff);

        diff
    }

    /// Compares two schemas table-by-table, plus sequences, views, and
    /// namespaces.
    #[must_use]
    pub fn compare_schemas(&self, old_schema: &Schema, new_schema: &Schema) -> SchemaDiff {
        let mut diff = SchemaDiff::default();

        // Namespaces are plain sets; qualifiers already implied membership
        // when each schema was assembled.
        for namespace in new_schema.namespaces() {
            if !old_schema.has_namespace(&namespace.normalized()) {
                diff.created_schemas.push(namespace.clone());
            }
        }
        for namespace in old_schema.namespaces() {
            if !new_schema.has_namespace(&namespace.normalized()) {
                diff.dropped_schemas.push(namespace.clone());
            }
        }

        for old_table in old_schema.tables() {
            let key = old_schema.resolve_name(old_table.name());
            match new_schema.table(&key) {
                Some(new_table) => {
                    let table_diff = self.compare_tables(old_table, new_table);
                    if !table_diff.is_empty() {
                        diff.altered_tables.push(table_diff);
                    }
                }
                None => diff.dropped_tables.push(old_table.clone()),
            }
        }
        for new_table in new_schema.tables() {
            let key = new_schema.resolve_name(new_table.name());
            if old_schema.table(&key).is_none() {
                diff.created_tables.push(new_table.clone());
            }
        }

        for old_sequence in old_schema.sequences() {
            let key = old_schema.resolve_name(old_sequence.name());
            match new_schema.sequence(&key) {
                Some(new_sequence) => {
                    if old_sequence.allocation_size() != new_sequence.allocation_size()
                        || old_sequence.initial_value() != new_sequence.initial_value()
                    {
                        diff.altered_sequences.push(new_sequence.clone());
                    }
                }
                None => diff.dropped_sequences.push(old_sequence.clone()),
            }
        }
        for new_sequence in new_schema.sequences() {
            let key = new_schema.resolve_name(new_sequence.name());
            if old_schema.sequence(&key).is_none() {
                diff.created_sequences.push(new_sequence.clone());
            }
        }

        for old_view in old_schema.views() {
            let key = old_schema.resolve_name(old_view.name());
            match new_schema.view(&key) {
                // A changed defining query is a drop plus a create; views
                // have no alterable identity beyond their name.
                Some(new_view) if new_view.sql() == old_view.sql() => {}
                Some(new_view) => {
                    diff.dropped_views.push(old_view.clone());
                    diff.created_views.push(new_view.clone());
                }
                None => diff.dropped_views.push(old_view.clone()),
            }
        }
        for new_view in new_schema.views() {
            let key = new_schema.resolve_name(new_view.name());
            if old_schema.view(&key).is_none() {
                diff.created_views.push(new_view.clone());
            }
        }

        diff
    }

    /// Compares the attributes of two same-named columns. The name itself is
    /// not compared here; a case-only spelling difference is not a change.
    fn diff_column(&self, old_column: &Column, new_column: &Column) -> BTreeSet<ChangedProperty> {
        let mut changed = BTreeSet::new();

        if old_column.column_type() != new_column.column_type() {
            changed.insert(ChangedProperty::Type);
        }
        if old_column.length() != new_column.length() {
            changed.insert(ChangedProperty::Length);
        }
        if old_column.precision() != new_column.precision() {
            changed.insert(ChangedProperty::Precision);
        }
        if old_column.scale() != new_column.scale() {
            changed.insert(ChangedProperty::Scale);
        }
        if old_column.is_fixed() != new_column.is_fixed() {
            changed.insert(ChangedProperty::Fixed);
        }
        if old_column.is_unsigned() != new_column.is_unsigned() {
            changed.insert(ChangedProperty::Unsigned);
        }
        if old_column.is_notnull() != new_column.is_notnull() {
            changed.insert(ChangedProperty::NotNull);
        }
        // Exact value identity: '' and '0' and NULL are all distinct.
        if self.platform.normalized_default(old_column)
            != self.platform.normalized_default(new_column)
        {
            changed.insert(ChangedProperty::Default);
        }
        if old_column.is_autoincrement() != new_column.is_autoincrement() {
            changed.insert(ChangedProperty::AutoIncrement);
        }
        if old_column.comment() != new_column.comment() {
            changed.insert(ChangedProperty::Comment);
        }
        if self
            .platform
            .relevant_column_options()
            .iter()
            .any(|key| old_column.platform_option(key) != new_column.platform_option(key))
        {
            changed.insert(ChangedProperty::PlatformOptions);
        }

        changed
    }

    fn diff_columns(&self, old_table: &Table, new_table: &Table, diff: &mut TableDiff) {
        let mut dropped: Vec<&Column> = Vec::new();
        let mut added: Vec<&Column> = Vec::new();

        for old_column in old_table.columns() {
            let spelling = old_column.name().to_string();
            match new_table.column(&spelling) {
                Some(new_column) => {
                    let changed = self.diff_column(old_column, new_column);
                    if !changed.is_empty() {
                        diff.changed_columns.push(ColumnDiff::new(
                            old_column.clone(),
                            new_column.clone(),
                            changed,
                        ));
                    }
                }
                None => dropped.push(old_column),
            }
        }
        for new_column in new_table.columns() {
            if !old_table.has_column(&new_column.name().to_string()) {
                added.push(new_column);
            }
        }

        if self.config.detect_renamed_columns() {
            let (renamed_dropped, renamed_added) =
                match_renames(&dropped, &added, |old_column, new_column| {
                    old_column.equals_ignoring_name(new_column)
                });

            for (&i, &j) in renamed_dropped.iter().zip(&renamed_added) {
                let old_column = dropped[i];
                let new_column = added[j];
                diff.renamed_columns
                    .insert(old_column.name().to_string(), new_column.clone());
                diff.changed_columns.push(ColumnDiff::new(
                    old_column.clone(),
                    new_column.clone(),
                    BTreeSet::from([ChangedProperty::Name]),
                ));
            }

            retain_unmatched(&mut dropped, &renamed_dropped);
            retain_unmatched(&mut added, &renamed_added);
        }

        diff.dropped_columns
            .extend(dropped.into_iter().cloned());
        diff.added_columns.extend(added.into_iter().cloned());
    }

    fn diff_indexes(&self, old_table: &Table, new_table: &Table, diff: &mut TableDiff) {
        let mut dropped: Vec<&Index> = Vec::new();
        let mut added: Vec<&Index> = Vec::new();

        for old_index in old_table.indexes() {
            let spelling = index_name(old_index);
            match new_table.index(&spelling) {
                Some(new_index) => {
                    if !old_index.structurally_equals(new_index) {
                        if self.config.report_modified_indexes() {
                            diff.modified_indexes.push(new_index.clone());
                        } else {
                            diff.dropped_indexes.push(old_index.clone());
                            diff.added_indexes.push(new_index.clone());
                        }
                    }
                }
                None => dropped.push(old_index),
            }
        }
        for new_index in new_table.indexes() {
            if old_table.index(&index_name(new_index)).is_none() {
                added.push(new_index);
            }
        }

        if self.config.detect_renamed_indexes() {
            let (renamed_dropped, renamed_added) =
                match_renames(&dropped, &added, |old_index, new_index| {
                    old_index.structurally_equals(new_index)
                });

            for (&i, &j) in renamed_dropped.iter().zip(&renamed_added) {
                diff.renamed_indexes
                    .insert(index_name(dropped[i]), added[j].clone());
            }

            retain_unmatched(&mut dropped, &renamed_dropped);
            retain_unmatched(&mut added, &renamed_added);
        }

        diff.dropped_indexes
            .extend(dropped.into_iter().cloned());
        diff.added_indexes.extend(added.into_iter().cloned());
    }

    fn diff_foreign_keys(old_table: &Table, new_table: &Table, diff: &mut TableDiff) {
        let new_keys: Vec<_> = new_table.foreign_keys().collect();
        let mut matched = vec![false; new_keys.len()];

        for old_key in old_table.foreign_keys() {
            let position = new_keys
                .iter()
                .enumerate()
                .position(|(j, new_key)| !matched[j] && old_key.structurally_equals(new_key));
            match position {
                // A structurally unchanged foreign key is a match even when
                // named differently; a pure rename contributes nothing.
                Some(j) => matched[j] = true,
                None => diff.dropped_foreign_keys.push(old_key.clone()),
            }
        }
        for (j, new_key) in new_keys.iter().enumerate() {
            if !matched[j] {
                diff.added_foreign_keys.push((*new_key).clone());
            }
        }
    }

    fn diff_primary_key(old_table: &Table, new_table: &Table, diff: &mut TableDiff) {
        diff.primary_key_change = match (old_table.primary_key(), new_table.primary_key()) {
            (None, None) => None,
            (None, Some(new_key)) => Some(PrimaryKeyChange::Added(new_key.clone())),
            (Some(old_key), None) => Some(PrimaryKeyChange::Dropped(old_key.clone())),
            (Some(old_key), Some(new_key)) => {
                if old_key.structurally_equals(new_key) {
                    None
                } else {
                    Some(PrimaryKeyChange::Altered {
                        old: old_key.clone(),
                        new: new_key.clone(),
                    })
                }
            }
        };
    }
}

fn index_name(index: &Index) -> String {
    index.name().map(ToString::to_string).unwrap_or_default()
}

/// Pairs dropped and added rename candidates through a bipartite graph: an
/// edge exists when the two definitions match ignoring the name, and a pair
/// is accepted only when it is the unique edge touching both endpoints.
/// Ambiguous candidates fall back to plain drops and adds.
///
/// Returns the accepted pairs as parallel index lists into the two slices.
fn match_renames<T, F>(dropped: &[&T], added: &[&T], matches: F) -> (Vec<usize>, Vec<usize>)
where
    F: Fn(&T, &T) -> bool,
{
    let mut edges: Vec<(usize, usize)> = Vec::new();
    let mut dropped_degree = vec![0_usize; dropped.len()];
    let mut added_degree = vec![0_usize; added.len()];

    for (i, old) in dropped.iter().enumerate() {
        for (j, new) in added.iter().enumerate() {
            if matches(old, new) {
                edges.push((i, j));
                dropped_degree[i] += 1;
                added_degree[j] += 1;
            }
        }
    }

    let mut matched_dropped = Vec::new();
    let mut matched_added = Vec::new();
    for (i, j) in edges {
        if dropped_degree[i] == 1 && added_degree[j] == 1 {
            matched_dropped.push(i);
            matched_added.push(j);
        }
    }
    (matched_dropped, matched_added)
}

/// Removes the entries at the given positions.
fn retain_unmatched<T>(candidates: &mut Vec<&T>, matched: &[usize]) {
    let mut position = 0;
    candidates.retain(|_| {
        let keep = !matched.contains(&position);
        position += 1;
        keep
    });
}
