//! Error types for the schema engine.

/// Errors produced while parsing SQL object names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input (or one of its identifier parts) is empty.
    #[error("Identifier is empty")]
    EmptyIdentifier,

    /// A quoted identifier was opened but never closed.
    #[error("Unterminated quoted identifier in '{input}'")]
    UnterminatedQuote {
        /// The raw input being parsed.
        input: String,
    },

    /// A character that cannot appear in an unquoted identifier.
    #[error("Unexpected character '{character}' at position {position} in '{input}'")]
    UnexpectedCharacter {
        /// The raw input being parsed.
        input: String,
        /// The offending character.
        character: char,
        /// Byte offset of the offending character.
        position: usize,
    },

    /// The name carries more qualifier levels than the target allows.
    #[error("Name '{input}' has too many qualifier levels")]
    TooManyQualifiers {
        /// The raw input being parsed.
        input: String,
    },

    /// Leftover characters after a complete name was consumed.
    #[error("Trailing input after identifier in '{input}'")]
    TrailingInput {
        /// The raw input being parsed.
        input: String,
    },
}

/// Errors raised by editors when a definition is incomplete or violates a
/// table-local invariant. These are programmer errors and are never
/// recovered from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// A required name was not provided.
    #[error("{object} name is not set")]
    NameNotSet {
        /// The kind of object being defined.
        object: &'static str,
    },

    /// Column type was not provided.
    #[error("Column type is not set")]
    TypeNotSet,

    /// A required column list was not provided.
    #[error("{object} columns are not set")]
    ColumnsNotSet {
        /// The kind of object being defined.
        object: &'static str,
    },

    /// Foreign key referencing column names were not provided.
    #[error("Referencing column names are not set")]
    ReferencingColumnNamesNotSet,

    /// Foreign key referenced table name was not provided.
    #[error("Referenced table name is not set")]
    ReferencedTableNameNotSet,

    /// Foreign key referenced column names were not provided.
    #[error("Referenced column names are not set")]
    ReferencedColumnNamesNotSet,

    /// Referencing and referenced column lists differ in length.
    #[error("Foreign key references {referencing} columns but lists {referenced} referenced columns")]
    ColumnArityMismatch {
        /// Number of referencing columns.
        referencing: usize,
        /// Number of referenced columns.
        referenced: usize,
    },

    /// Two columns in a table share a name.
    #[error("Column '{column}' already exists in table '{table}'")]
    DuplicateColumn {
        /// The table being defined.
        table: String,
        /// The duplicated column name.
        column: String,
    },

    /// Two indexes in a table share a name.
    #[error("Index '{index}' already exists in table '{table}'")]
    DuplicateIndex {
        /// The table being defined.
        table: String,
        /// The duplicated index name.
        index: String,
    },

    /// Two constraints in a table share a name.
    #[error("Constraint '{constraint}' already exists in table '{table}'")]
    DuplicateConstraint {
        /// The table being defined.
        table: String,
        /// The duplicated constraint name.
        constraint: String,
    },

    /// Two same-kind objects in a schema share a fully qualified name.
    #[error("{kind} '{name}' already exists in the schema")]
    DuplicateObject {
        /// The kind of object ("table", "sequence", "view").
        kind: &'static str,
        /// The duplicated, fully qualified name.
        name: String,
    },
}

/// Errors raised lazily when querying an entity that was constructed from
/// partially invalid data (tolerated at construction time for the sake of
/// introspecting idiosyncratic live databases).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStateError {
    /// The index's column names could not be parsed.
    #[error("Index '{index}' has columns that could not be parsed")]
    IndexColumnsUnparsed {
        /// The index name, or an empty string for an unnamed index.
        index: String,
    },

    /// The index carries no columns at all.
    #[error("Index '{index}' has no columns")]
    IndexHasNoColumns {
        /// The index name, or an empty string for an unnamed index.
        index: String,
    },

    /// The unique constraint's column names could not be parsed.
    #[error("Unique constraint '{constraint}' has columns that could not be parsed")]
    UniqueConstraintColumnsUnparsed {
        /// The constraint name, or an empty string for an unnamed constraint.
        constraint: String,
    },
}

/// Any error produced by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Name parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An entity definition is incomplete or invalid.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// A malformed-but-constructed entity was queried.
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
}

/// Result type for schema engine operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
