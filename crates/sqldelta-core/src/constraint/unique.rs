//! Unique constraint model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::casemap::trim_quotes;
use crate::diagnostics::{Warning, WarningCode};
use crate::error::{DefinitionError, InvalidStateError};
use crate::name::{parse_unqualified, UnqualifiedName};

/// A unique constraint over an ordered list of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    name: Option<UnqualifiedName>,
    columns: Vec<String>,
    column_names: Vec<UnqualifiedName>,
    clustered: bool,
    flags: BTreeSet<String>,
}

impl UniqueConstraint {
    /// Builds a unique constraint from raw introspection data.
    ///
    /// Lenient: column names that fail to parse poison only the parsed view,
    /// which reports an error lazily from
    /// [`UniqueConstraint::column_names`].
    #[must_use]
    pub fn new<S: AsRef<str>>(name: Option<UnqualifiedName>, columns: &[S]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_owned()).collect();

        let mut column_names = Vec::with_capacity(columns.len());
        for raw in &columns {
            match parse_unqualified(raw) {
                Ok(parsed) => column_names.push(parsed),
                Err(_) => {
                    let _ = Warning::emit(
                        WarningCode::UnparsableName,
                        format!("Unable to parse unique constraint column name '{raw}'"),
                    );
                    column_names.clear();
                    break;
                }
            }
        }

        Self {
            name,
            columns,
            column_names,
            clustered: false,
            flags: BTreeSet::new(),
        }
    }

    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> UniqueConstraintEditor {
        UniqueConstraintEditor::default()
    }

    /// Returns an editor pre-seeded with this constraint's state.
    #[must_use]
    pub fn edit(&self) -> UniqueConstraintEditor {
        UniqueConstraintEditor {
            name: self.name.clone(),
            column_names: self.column_names.clone(),
            clustered: self.clustered,
            flags: self.flags.iter().cloned().collect(),
        }
    }

    /// The constraint name, if named.
    #[must_use]
    pub const fn name(&self) -> Option<&UnqualifiedName> {
        self.name.as_ref()
    }

    /// The raw column name spellings, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The column names with surrounding quotes stripped.
    #[must_use]
    pub fn unquoted_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| trim_quotes(c)).collect()
    }

    /// The parsed column names.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidStateError`] when the column names failed to parse
    /// at construction time.
    pub fn column_names(&self) -> Result<&[UnqualifiedName], InvalidStateError> {
        if self.column_names.is_empty() {
            return Err(InvalidStateError::UniqueConstraintColumnsUnparsed {
                constraint: self
                    .name
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            });
        }
        Ok(&self.column_names)
    }

    /// Whether the constraint determines physical row order.
    #[must_use]
    pub const fn is_clustered(&self) -> bool {
        self.clustered
    }

    /// Replaces the constraint name. Used by the table editor when assigning
    /// generated names to anonymous constraints.
    pub(crate) fn with_name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
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
}

/// Fluent builder for [`UniqueConstraint`] instances.
#[derive(Debug, Clone, Default)]
pub struct UniqueConstraintEditor {
    name: Option<UnqualifiedName>,
    column_names: Vec<UnqualifiedName>,
    clustered: bool,
    flags: Vec<String>,
}

impl UniqueConstraintEditor {
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

    /// Adds a platform-specific flag.
    #[must_use]
    pub fn add_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Validates the definition and assembles the constraint.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::ColumnsNotSet`] when no column names were
    /// provided.
    pub fn create(self) -> Result<UniqueConstraint, DefinitionError> {
        if self.column_names.is_empty() {
            return Err(DefinitionError::ColumnsNotSet {
                object: "Unique constraint",
            });
        }

        let columns = self
            .column_names
            .iter()
            .map(ToString::to_string)
            .collect();

        Ok(UniqueConstraint {
            name: self.name,
            columns,
            column_names: self.column_names,
            clustered: self.clustered,
            flags: self.flags.iter().map(|flag| flag.to_lowercase()).collect(),
        })
    }
}
