//! Column model: a typed, named field with semantic attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::name::UnqualifiedName;

/// Semantic column type token.
///
/// Treated opaquely by the comparator: two types are the same if and only if
/// they are the same variant. Length, precision, and scale are attributes of
/// the [`Column`], not of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit integer.
    BigInt,
    /// Fixed-length binary data.
    Binary,
    /// Binary large object.
    Blob,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Exact-precision decimal number.
    Decimal,
    /// Floating point number.
    Float,
    /// Globally unique identifier.
    Guid,
    /// 32-bit integer.
    Integer,
    /// JSON document.
    Json,
    /// 16-bit integer.
    SmallInt,
    /// Variable-length character string.
    String,
    /// Character large object.
    Text,
    /// Time of day.
    Time,
}

/// A column default value.
///
/// Compared for exact identity: `Text("")`, `Text("0")`, and `Null` are all
/// distinct from one another, and a column without a default (`None` at the
/// [`Column`] level) is distinct from an explicit `Null` default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// An explicit NULL default.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    Text(String),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`).
    Expression(String),
}

/// A table column.
///
/// Structurally immutable: build one through [`Column::editor`] and derive
/// modified copies through [`Column::edit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: UnqualifiedName,
    column_type: ColumnType,
    length: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
    fixed: bool,
    unsigned: bool,
    notnull: bool,
    default: Option<Value>,
    autoincrement: bool,
    comment: String,
    platform_options: BTreeMap<String, String>,
}

impl Column {
    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> ColumnEditor {
        ColumnEditor::default()
    }

    /// Returns an editor pre-seeded with this column's state.
    #[must_use]
    pub fn edit(&self) -> ColumnEditor {
        ColumnEditor {
            name: Some(self.name.clone()),
            column_type: Some(self.column_type),
            length: self.length,
            precision: self.precision,
            scale: self.scale,
            fixed: self.fixed,
            unsigned: self.unsigned,
            notnull: self.notnull,
            default: self.default.clone(),
            autoincrement: self.autoincrement,
            comment: self.comment.clone(),
            platform_options: self.platform_options.clone(),
        }
    }

    /// The column name.
    #[must_use]
    pub const fn name(&self) -> &UnqualifiedName {
        &self.name
    }

    /// The semantic type token.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Declared length for string/binary types.
    #[must_use]
    pub const fn length(&self) -> Option<u32> {
        self.length
    }

    /// Declared precision for decimal types.
    #[must_use]
    pub const fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Declared scale for decimal types.
    #[must_use]
    pub const fn scale(&self) -> Option<u32> {
        self.scale
    }

    /// Whether the column is fixed-width.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Whether the column is unsigned.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    /// Whether the column is required (`true` means NOT NULL).
    #[must_use]
    pub const fn is_notnull(&self) -> bool {
        self.notnull
    }

    /// The default value, if one is declared.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the column auto-increments.
    #[must_use]
    pub const fn is_autoincrement(&self) -> bool {
        self.autoincrement
    }

    /// The column comment. Compared for exact string equality.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Platform-specific options.
    #[must_use]
    pub const fn platform_options(&self) -> &BTreeMap<String, String> {
        &self.platform_options
    }

    /// Looks up a single platform option.
    #[must_use]
    pub fn platform_option(&self, key: &str) -> Option<&str> {
        self.platform_options.get(key).map(String::as_str)
    }

    /// Whether every attribute except the name is identical to `other`.
    ///
    /// This is the byte-for-byte test used for rename candidate matching.
    #[must_use]
    pub fn equals_ignoring_name(&self, other: &Self) -> bool {
        self.column_type == other.column_type
            && self.length == other.length
            && self.precision == other.precision
            && self.scale == other.scale
            && self.fixed == other.fixed
            && self.unsigned == other.unsigned
            && self.notnull == other.notnull
            && self.default == other.default
            && self.autoincrement == other.autoincrement
            && self.comment == other.comment
            && self.platform_options == other.platform_options
    }
}

/// Fluent builder for [`Column`] instances.
#[derive(Debug, Clone)]
pub struct ColumnEditor {
    name: Option<UnqualifiedName>,
    column_type: Option<ColumnType>,
    length: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
    fixed: bool,
    unsigned: bool,
    notnull: bool,
    default: Option<Value>,
    autoincrement: bool,
    comment: String,
    platform_options: BTreeMap<String, String>,
}

impl Default for ColumnEditor {
    fn default() -> Self {
        Self {
            name: None,
            column_type: None,
            length: None,
            precision: None,
            scale: None,
            fixed: false,
            unsigned: false,
            // Columns are required unless declared otherwise.
            notnull: true,
            default: None,
            autoincrement: false,
            comment: String::new(),
            platform_options: BTreeMap::new(),
        }
    }
}

impl ColumnEditor {
    /// Sets the column name.
    #[must_use]
    pub fn set_name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the semantic type.
    #[must_use]
    pub fn set_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    /// Sets the declared length.
    #[must_use]
    pub fn set_length(mut self, length: Option<u32>) -> Self {
        self.length = length;
        self
    }

    /// Sets the declared precision.
    #[must_use]
    pub fn set_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the declared scale.
    #[must_use]
    pub fn set_scale(mut self, scale: Option<u32>) -> Self {
        self.scale = scale;
        self
    }

    /// Marks the column fixed-width.
    #[must_use]
    pub fn set_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Marks the column unsigned.
    #[must_use]
    pub fn set_unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    /// Sets whether the column is required (`true` means NOT NULL).
    #[must_use]
    pub fn set_notnull(mut self, notnull: bool) -> Self {
        self.notnull = notnull;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn set_default(mut self, default: Option<Value>) -> Self {
        self.default = default;
        self
    }

    /// Marks the column auto-incrementing.
    #[must_use]
    pub fn set_autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = autoincrement;
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn set_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets a platform-specific option.
    #[must_use]
    pub fn set_platform_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.platform_options.insert(key.into(), value.into());
        self
    }

    /// Replaces the platform option bag.
    #[must_use]
    pub fn set_platform_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.platform_options = options;
        self
    }

    /// Validates the definition and assembles the column.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NameNotSet`] or
    /// [`DefinitionError::TypeNotSet`] when a required field is missing.
    pub fn create(self) -> Result<Column, DefinitionError> {
        let name = self
            .name
            .ok_or(DefinitionError::NameNotSet { object: "Column" })?;
        let column_type = self.column_type.ok_or(DefinitionError::TypeNotSet)?;

        Ok(Column {
            name,
            column_type,
            length: self.length,
            precision: self.precision,
            scale: self.scale,
            fixed: self.fixed,
            unsigned: self.unsigned,
            notnull: self.notnull,
            default: self.default,
            autoincrement: self.autoincrement,
            comment: self.comment,
            platform_options: self.platform_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> Column {
        Column::editor()
            .set_name(UnqualifiedName::unquoted(name).unwrap())
            .set_type(ColumnType::Integer)
            .create()
            .unwrap()
    }

    #[test]
    fn name_is_required() {
        let result = Column::editor().set_type(ColumnType::Integer).create();
        assert_eq!(
            result,
            Err(DefinitionError::NameNotSet { object: "Column" })
        );
    }

    #[test]
    fn type_is_required() {
        let result = Column::editor()
            .set_name(UnqualifiedName::unquoted("id").unwrap())
            .create();
        assert_eq!(result, Err(DefinitionError::TypeNotSet));
    }

    #[test]
    fn notnull_by_default() {
        assert!(column("id").is_notnull());
    }

    #[test]
    fn edit_round_trip_is_structurally_equal() {
        let original = Column::editor()
            .set_name(UnqualifiedName::unquoted("email").unwrap())
            .set_type(ColumnType::String)
            .set_length(Some(255))
            .set_notnull(false)
            .set_default(Some(Value::Text(String::new())))
            .set_comment("contact address")
            .set_platform_option("collation", "utf8mb4_unicode_ci")
            .create()
            .unwrap();

        let copy = original.edit().create().unwrap();
        assert_eq!(original, copy);
    }

    #[test]
    fn edit_produces_modified_copy() {
        let original = column("score");
        let widened = original.edit().set_type(ColumnType::BigInt).create().unwrap();
        assert_eq!(original.column_type(), ColumnType::Integer);
        assert_eq!(widened.column_type(), ColumnType::BigInt);
        assert_eq!(widened.name(), original.name());
    }

    #[test]
    fn default_values_are_distinct() {
        let base = Column::editor()
            .set_name(UnqualifiedName::unquoted("v").unwrap())
            .set_type(ColumnType::String);

        let empty = base.clone().set_default(Some(Value::Text(String::new())));
        let zero = base.clone().set_default(Some(Value::Text("0".into())));
        let null = base.clone().set_default(Some(Value::Null));
        let none = base.clone().set_default(None);

        let empty = empty.create().unwrap();
        let zero = zero.create().unwrap();
        let null = null.create().unwrap();
        let none = none.create().unwrap();

        assert_ne!(empty.default(), zero.default());
        assert_ne!(empty.default(), null.default());
        assert_ne!(null.default(), none.default());
        assert_eq!(zero.default(), zero.clone().default());
    }

    #[test]
    fn equals_ignoring_name_ignores_only_the_name() {
        let a = column("foo");
        let b = a
            .edit()
            .set_name(UnqualifiedName::unquoted("bar").unwrap())
            .create()
            .unwrap();
        assert!(a.equals_ignoring_name(&b));

        let c = b.edit().set_unsigned(true).create().unwrap();
        assert!(!a.equals_ignoring_name(&c));
    }

    #[test]
    fn serialization_round_trip() {
        let original = Column::editor()
            .set_name(UnqualifiedName::unquoted("amount").unwrap())
            .set_type(ColumnType::Decimal)
            .set_precision(Some(10))
            .set_scale(Some(2))
            .set_default(Some(Value::Integer(0)))
            .create()
            .unwrap();

        let json = serde_json::to_string(&original).unwrap();
        let restored: Column = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}
