//! Index model and index-to-index comparison rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::casemap::{normalize_key, trim_quotes};
use crate::diagnostics::{Warning, WarningCode};
use crate::error::{DefinitionError, InvalidStateError};
use crate::name::{parse_unqualified, Identifier, UnqualifiedName};

/// A single column participating in an index, with an optional prefix length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedColumn {
    column_name: UnqualifiedName,
    length: Option<u32>,
}

impl IndexedColumn {
    /// Creates an indexed column.
    #[must_use]
    pub const fn new(column_name: UnqualifiedName, length: Option<u32>) -> Self {
        Self {
            column_name,
            length,
        }
    }

    /// The column name.
    #[must_use]
    pub const fn column_name(&self) -> &UnqualifiedName {
        &self.column_name
    }

    /// The indexed prefix length, if any.
    #[must_use]
    pub const fn length(&self) -> Option<u32> {
        self.length
    }
}

/// Attributes accepted by the raw [`Index::new`] constructor.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Whether the index enforces uniqueness.
    pub unique: bool,
    /// Whether the index backs the primary key.
    pub primary: bool,
    /// Platform-specific flags (stored lower-cased).
    pub flags: Vec<String>,
    /// Partial-index predicate (`WHERE` clause), if any.
    pub predicate: Option<String>,
    /// Per-column prefix lengths, positionally aligned with the columns.
    pub lengths: Vec<Option<u32>>,
}

/// An index over an ordered list of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    name: Option<UnqualifiedName>,
    columns: Vec<String>,
    indexed_columns: Vec<IndexedColumn>,
    unique: bool,
    primary: bool,
    flags: BTreeSet<String>,
    predicate: Option<String>,
    lengths: Vec<Option<u32>>,
}

impl Index {
    /// Builds an index from raw introspection data.
    ///
    /// This seam is lenient: names that fail to parse are kept as opaque
    /// quoted literals, and column names that fail to parse poison only the
    /// parsed-columns view, which reports an error lazily from
    /// [`Index::indexed_columns`]. Each degradation records a warning.
    #[must_use]
    pub fn new<S: AsRef<str>>(name: Option<&str>, columns: &[S], options: IndexOptions) -> Self {
        let name = match name {
            None | Some("") => None,
            Some(raw) => Some(parse_name_lenient(raw)),
        };

        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_owned()).collect();
        let indexed_columns = parse_columns(&columns, options.primary, &options.lengths);

        Self {
            name,
            columns,
            indexed_columns,
            unique: options.unique || options.primary,
            primary: options.primary,
            flags: options
                .flags
                .iter()
                .map(|flag| flag.to_lowercase())
                .collect(),
            predicate: options.predicate,
            lengths: options.lengths,
        }
    }

    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> IndexEditor {
        IndexEditor::default()
    }

    /// Returns an editor pre-seeded with this index's state.
    ///
    /// An index whose column names failed to parse is seeded from the raw
    /// spellings, kept as opaque quoted identifiers.
    #[must_use]
    pub fn edit(&self) -> IndexEditor {
        let columns = if self.indexed_columns.is_empty() {
            self.columns
                .iter()
                .filter_map(|raw| {
                    Identifier::quoted(trim_quotes(raw))
                        .ok()
                        .map(|id| IndexedColumn::new(UnqualifiedName::new(id), None))
                })
                .collect()
        } else {
            self.indexed_columns.clone()
        };

        IndexEditor {
            name: self.name.clone(),
            columns,
            unique: self.unique,
            clustered: self.flags.contains("clustered"),
            flags: self.flags.iter().cloned().collect(),
            predicate: self.predicate.clone(),
        }
    }

    /// The index name, if the index is named.
    #[must_use]
    pub const fn name(&self) -> Option<&UnqualifiedName> {
        self.name.as_ref()
    }

    /// The raw column name spellings, in index order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The column names with surrounding quotes stripped.
    #[must_use]
    pub fn unquoted_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| trim_quotes(c)).collect()
    }

    /// The parsed indexed columns.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidStateError`] when the index has no columns or its
    /// column names failed to parse at construction time.
    pub fn indexed_columns(&self) -> Result<&[IndexedColumn], InvalidStateError> {
        if self.indexed_columns.is_empty() {
            let index = self
                .name
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            if self.columns.is_empty() {
                return Err(InvalidStateError::IndexHasNoColumns { index });
            }
            return Err(InvalidStateError::IndexColumnsUnparsed { index });
        }
        Ok(&self.indexed_columns)
    }

    /// Whether the index enforces uniqueness.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// Whether the index backs the primary key.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.primary
    }

    /// Whether the index is neither unique nor primary.
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        !self.unique && !self.primary
    }

    /// Platform-specific flags, lower-cased, in sorted order.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    /// Whether the given flag is set (case-insensitively).
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(&flag.to_lowercase())
    }

    /// The partial-index predicate, if any.
    #[must_use]
    pub fn predicate(&self) -> Option<&str> {
        self.predicate.as_deref()
    }

    /// Per-column prefix lengths as declared.
    #[must_use]
    pub fn lengths(&self) -> &[Option<u32>] {
        &self.lengths
    }

    /// Whether the named column sits at the given position in the index.
    #[must_use]
    pub fn has_column_at_position(&self, name: &str, position: usize) -> bool {
        let needle = normalize_key(name);
        self.columns
            .iter()
            .position(|column| normalize_key(column) == needle)
            == Some(position)
    }

    /// Checks whether this index's columns match the given list positionally
    /// (case-insensitive, quote-trimmed). The given list may be longer; every
    /// column of this index must match at its own position.
    #[must_use]
    pub fn spans_columns<S: AsRef<str>>(&self, column_names: &[S]) -> bool {
        self.columns.iter().enumerate().all(|(i, column)| {
            column_names
                .get(i)
                .is_some_and(|given| normalize_key(given.as_ref()) == normalize_key(column))
        })
    }

    /// Checks whether `other` already fulfills all the indexing and
    /// constraint needs of this index, i.e. could serve in its place without
    /// loss of guarantee.
    #[must_use]
    pub fn is_fulfilled_by(&self, other: &Self) -> bool {
        // Only an equally large index qualifies. A larger one would create
        // constraint overlaps in scenarios like PRIMARY KEY(foo,bar)
        // UNIQUE(foo).
        if other.columns.len() != self.columns.len() {
            return false;
        }

        if !self.spans_columns(&other.columns) {
            return false;
        }

        if !self.same_partial_index(other) || !self.same_column_lengths(other) {
            return false;
        }

        if self.is_simple() {
            // A unique or primary index always provides everything a plain
            // index provides, so any index of the same shape qualifies.
            return true;
        }

        other.primary == self.primary && other.unique == self.unique
    }

    /// Checks whether this index can replace `other` outright: `other` is a
    /// non-primary index whose guarantees this unique or primary index
    /// subsumes.
    #[must_use]
    pub fn overrules(&self, other: &Self) -> bool {
        if other.primary {
            return false;
        }

        if self.is_simple() && other.unique {
            return false;
        }

        self.spans_columns(&other.columns)
            && (self.primary || self.unique)
            && self.same_partial_index(other)
    }

    /// Whether the two indexes are structurally identical ignoring their
    /// names: same columns in the same order, same uniqueness and primary
    /// status, same flags, same predicate, same declared prefix lengths.
    #[must_use]
    pub fn structurally_equals(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self.spans_columns(&other.columns)
            && self.unique == other.unique
            && self.primary == other.primary
            && self.flags == other.flags
            && self.same_partial_index(other)
            && self.same_column_lengths(other)
    }

    /// Replaces the index name. Used by the table editor when assigning
    /// generated names to anonymous indexes.
    pub(crate) fn with_name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    fn same_partial_index(&self, other: &Self) -> bool {
        self.predicate == other.predicate
    }

    fn same_column_lengths(&self, other: &Self) -> bool {
        let declared = |lengths: &[Option<u32>]| -> Vec<(usize, u32)> {
            lengths
                .iter()
                .enumerate()
                .filter_map(|(i, l)| l.map(|l| (i, l)))
                .collect()
        };
        declared(&self.lengths) == declared(&other.lengths)
    }
}

fn parse_name_lenient(raw: &str) -> UnqualifiedName {
    parse_unqualified(raw).unwrap_or_else(|error| {
        let _ = Warning::emit(
            WarningCode::UnparsableName,
            format!("Unable to parse index name '{raw}': {error}"),
        );
        // Keep the raw spelling as an opaque, case-sensitive literal.
        UnqualifiedName::new(
            Identifier::quoted(trim_quotes(raw)).unwrap_or_else(|_| {
                // Unreachable for non-empty input; guarded by the caller.
                Identifier::quoted("?").expect("non-empty literal")
            }),
        )
    })
}

fn parse_columns(
    columns: &[String],
    primary: bool,
    lengths: &[Option<u32>],
) -> Vec<IndexedColumn> {
    if columns.is_empty() {
        let _ = Warning::emit(
            WarningCode::IndexWithoutColumns,
            "Index declared without column names",
        );
        return Vec::new();
    }

    let mut parsed = Vec::with_capacity(columns.len());
    for (i, raw) in columns.iter().enumerate() {
        let Ok(column_name) = parse_unqualified(raw) else {
            let _ = Warning::emit(
                WarningCode::UnparsableName,
                format!("Unable to parse indexed column name '{raw}'"),
            );
            return Vec::new();
        };

        let length = lengths.get(i).copied().flatten();
        if let Some(length) = length {
            if primary {
                let _ = Warning::emit(
                    WarningCode::InvalidIndexedColumnLength,
                    "Column lengths are not supported on primary key indexes",
                );
                return Vec::new();
            }
            if length == 0 {
                let _ = Warning::emit(
                    WarningCode::InvalidIndexedColumnLength,
                    format!("Indexed column length must be positive, got {length}"),
                );
                return Vec::new();
            }
        }

        parsed.push(IndexedColumn::new(column_name, length));
    }
    parsed
}

/// Fluent builder for [`Index`] instances.
#[derive(Debug, Clone, Default)]
pub struct IndexEditor {
    name: Option<UnqualifiedName>,
    columns: Vec<IndexedColumn>,
    unique: bool,
    clustered: bool,
    flags: Vec<String>,
    predicate: Option<String>,
}

impl IndexEditor {
    /// Sets the index name.
    #[must_use]
    pub fn set_name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the indexed columns, replacing any previous list.
    #[must_use]
    pub fn set_columns(mut self, columns: Vec<IndexedColumn>) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the indexed columns from bare names, without prefix lengths.
    #[must_use]
    pub fn set_column_names(mut self, names: Vec<UnqualifiedName>) -> Self {
        self.columns = names
            .into_iter()
            .map(|name| IndexedColumn::new(name, None))
            .collect();
        self
    }

    /// Marks the index unique.
    #[must_use]
    pub fn set_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Marks the index clustered.
    #[must_use]
    pub fn set_clustered(mut self, clustered: bool) -> Self {
        self.clustered = clustered;
        self
    }

    /// Adds a platform-specific flag.
    #[must_use]
    pub fn add_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Sets the partial-index predicate.
    #[must_use]
    pub fn set_predicate(mut self, predicate: Option<String>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Validates the definition and assembles the index.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NameNotSet`] or
    /// [`DefinitionError::ColumnsNotSet`] when a required field is missing.
    pub fn create(self) -> Result<Index, DefinitionError> {
        let name = self
            .name
            .ok_or(DefinitionError::NameNotSet { object: "Index" })?;
        if self.columns.is_empty() {
            return Err(DefinitionError::ColumnsNotSet { object: "Index" });
        }

        let mut flags: BTreeSet<String> =
            self.flags.iter().map(|flag| flag.to_lowercase()).collect();
        if self.clustered {
            flags.insert("clustered".to_owned());
        }

        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| column.column_name().to_string())
            .collect();
        let lengths: Vec<Option<u32>> =
            self.columns.iter().map(IndexedColumn::length).collect();

        Ok(Index {
            name: Some(name),
            columns,
            indexed_columns: self.columns,
            unique: self.unique,
            primary: false,
            flags,
            predicate: self.predicate,
            lengths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(name: &str, columns: &[&str], unique: bool, primary: bool) -> Index {
        Index::new(
            Some(name),
            columns,
            IndexOptions {
                unique,
                primary,
                ..IndexOptions::default()
            },
        )
    }

    #[test]
    fn name_and_columns_are_required_by_the_editor() {
        let missing_name = Index::editor()
            .set_column_names(vec![UnqualifiedName::unquoted("a").unwrap()])
            .create();
        assert_eq!(
            missing_name.unwrap_err(),
            DefinitionError::NameNotSet { object: "Index" }
        );

        let missing_columns = Index::editor()
            .set_name(UnqualifiedName::unquoted("idx_a").unwrap())
            .create();
        assert_eq!(
            missing_columns.unwrap_err(),
            DefinitionError::ColumnsNotSet { object: "Index" }
        );
    }

    #[test]
    fn primary_implies_unique() {
        let idx = index("pk", &["id"], false, true);
        assert!(idx.is_unique());
        assert!(idx.is_primary());
        assert!(!idx.is_simple());
    }

    #[test]
    fn spans_columns_is_positional_and_case_insensitive() {
        let idx = index("idx", &["User_Id", "Created_At"], false, false);
        assert!(idx.spans_columns(&["user_id", "created_at"]));
        assert!(idx.spans_columns(&["USER_ID", "CREATED_AT", "extra"]));
        assert!(!idx.spans_columns(&["created_at", "user_id"]));
        assert!(!idx.spans_columns(&["user_id"]));
    }

    #[test]
    fn spans_columns_trims_quotes() {
        let idx = index("idx", &["\"Email\""], false, false);
        assert!(idx.spans_columns(&["email"]));
    }

    #[test]
    fn fulfillment_is_asymmetric_between_plain_and_unique() {
        let plain = index("plain", &["a", "b"], false, false);
        let unique = index("uniq", &["a", "b"], true, false);

        assert!(plain.is_fulfilled_by(&unique));
        assert!(!unique.is_fulfilled_by(&plain));
    }

    #[test]
    fn fulfillment_requires_equal_cardinality() {
        let narrow = index("narrow", &["a"], false, false);
        let wide = index("wide", &["a", "b"], true, false);
        assert!(!narrow.is_fulfilled_by(&wide));
        assert!(!wide.is_fulfilled_by(&narrow));
    }

    #[test]
    fn fulfillment_respects_partial_predicates() {
        let partial = Index::new(
            Some("p"),
            &["a"],
            IndexOptions {
                predicate: Some("a IS NOT NULL".into()),
                ..IndexOptions::default()
            },
        );
        let full = index("f", &["a"], false, false);
        assert!(!partial.is_fulfilled_by(&full));
        assert!(!full.is_fulfilled_by(&partial));
        assert!(partial.is_fulfilled_by(&partial.clone()));
    }

    #[test]
    fn fulfillment_respects_column_lengths() {
        let short = Index::new(
            Some("short"),
            &["body"],
            IndexOptions {
                lengths: vec![Some(64)],
                ..IndexOptions::default()
            },
        );
        let long = Index::new(
            Some("long"),
            &["body"],
            IndexOptions {
                lengths: vec![Some(128)],
                ..IndexOptions::default()
            },
        );
        assert!(!short.is_fulfilled_by(&long));
        assert!(short.is_fulfilled_by(&short.clone()));
    }

    #[test]
    fn unique_overrules_plain_but_not_vice_versa() {
        let plain = index("plain", &["a"], false, false);
        let unique = index("uniq", &["a"], true, false);
        let primary = index("pk", &["a"], false, true);

        assert!(unique.overrules(&plain));
        assert!(!plain.overrules(&unique));
        assert!(!unique.overrules(&primary));
        assert!(primary.overrules(&plain));
    }

    #[test]
    fn structural_equality_ignores_name_only() {
        let a = index("idx1", &["email"], true, false);
        let b = index("idx2", &["email"], true, false);
        let c = index("idx3", &["email"], false, false);
        assert!(a.structurally_equals(&b));
        assert!(!a.structurally_equals(&c));
    }

    #[test]
    fn unparsable_column_names_fail_lazily() {
        let idx = index("bad", &["a.b.c"], false, false);
        assert_eq!(idx.columns(), &["a.b.c".to_owned()]);
        assert!(matches!(
            idx.indexed_columns(),
            Err(InvalidStateError::IndexColumnsUnparsed { .. })
        ));
    }

    #[test]
    fn empty_column_list_fails_lazily() {
        let idx = Index::new(Some("empty"), &[] as &[&str], IndexOptions::default());
        assert!(matches!(
            idx.indexed_columns(),
            Err(InvalidStateError::IndexHasNoColumns { .. })
        ));
    }

    #[test]
    fn zero_prefix_length_poisons_the_parsed_view() {
        let idx = Index::new(
            Some("bad_len"),
            &["body"],
            IndexOptions {
                lengths: vec![Some(0)],
                ..IndexOptions::default()
            },
        );
        assert!(idx.indexed_columns().is_err());
    }

    #[test]
    fn flags_are_lower_cased_and_queried_case_insensitively() {
        let idx = Index::new(
            Some("ft"),
            &["body"],
            IndexOptions {
                flags: vec!["FULLTEXT".into()],
                ..IndexOptions::default()
            },
        );
        assert!(idx.has_flag("fulltext"));
        assert!(idx.has_flag("FullText"));
        assert!(!idx.has_flag("spatial"));
    }

    #[test]
    fn has_column_at_position() {
        let idx = index("idx", &["a", "B"], false, false);
        assert!(idx.has_column_at_position("A", 0));
        assert!(idx.has_column_at_position("b", 1));
        assert!(!idx.has_column_at_position("b", 0));
    }

    #[test]
    fn edit_round_trip_is_structurally_equal() {
        let original = Index::editor()
            .set_name(UnqualifiedName::unquoted("idx_email").unwrap())
            .set_columns(vec![IndexedColumn::new(
                UnqualifiedName::unquoted("email").unwrap(),
                Some(32),
            )])
            .set_unique(true)
            .set_predicate(Some("email IS NOT NULL".into()))
            .create()
            .unwrap();

        let copy = original.edit().create().unwrap();
        assert_eq!(original, copy);
    }

    #[test]
    fn clustered_editor_flag_round_trips() {
        let idx = Index::editor()
            .set_name(UnqualifiedName::unquoted("idx_c").unwrap())
            .set_column_names(vec![UnqualifiedName::unquoted("a").unwrap()])
            .set_clustered(true)
            .create()
            .unwrap();
        assert!(idx.has_flag("clustered"));
        assert!(idx.edit().create().unwrap().has_flag("clustered"));
    }
}
