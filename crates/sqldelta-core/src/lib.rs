//! # sqldelta-core
//!
//! A schema object model and structural diff engine for relational
//! databases.
//!
//! This crate provides:
//! - An immutable value-object model for database schemas: names, columns,
//!   indexes, constraints, tables, sequences, and views, each built through
//!   a validating editor
//! - A comparator that computes a minimal structural diff between two
//!   schema snapshots, with rename detection and ambiguity resolution
//! - A narrow platform-quirks interface for per-database comparison
//!   normalization
//!
//! ## Computing a diff
//!
//! ```rust
//! use sqldelta_core::{
//!     Column, ColumnType, Comparator, OptionallyQualifiedName, Table,
//!     UnqualifiedName,
//! };
//!
//! fn column(name: &str) -> Column {
//!     Column::editor()
//!         .set_name(UnqualifiedName::unquoted(name).unwrap())
//!         .set_type(ColumnType::Integer)
//!         .create()
//!         .unwrap()
//! }
//!
//! let old = Table::editor()
//!     .set_name(OptionallyQualifiedName::unquoted("users", None).unwrap())
//!     .add_column(column("id"))
//!     .add_column(column("legacy_flag"))
//!     .create()
//!     .unwrap();
//!
//! let new = old
//!     .edit()
//!     .set_columns(vec![column("id"), column("is_legacy")])
//!     .create()
//!     .unwrap();
//!
//! let diff = Comparator::new().compare_tables(&old, &new);
//!
//! // legacy_flag and is_legacy are structurally identical, so the change
//! // is reported as a rename rather than a drop plus an add.
//! assert_eq!(diff.renamed_columns.len(), 1);
//! assert!(diff.added_columns.is_empty());
//! assert!(diff.dropped_columns.is_empty());
//! ```
//!
//! ## Failure model
//!
//! Structural mismatches between snapshots are never errors; they are what
//! the diff reports. Errors are reserved for incomplete definitions (editor
//! `create()`), malformed names (strict parsing), and lazy queries against
//! entities built from unparsable introspection data.

pub mod casemap;
pub mod column;
pub mod comparator;
pub mod constraint;
pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod index;
pub mod name;
pub mod platform;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod view;

pub use casemap::CaseInsensitiveMap;
pub use column::{Column, ColumnEditor, ColumnType, Value};
pub use comparator::{Comparator, ComparatorConfig};
pub use constraint::{
    Deferrability, ForeignKeyConstraint, ForeignKeyConstraintEditor, MatchType,
    PrimaryKeyConstraint, PrimaryKeyConstraintEditor, ReferentialAction, UniqueConstraint,
    UniqueConstraintEditor,
};
pub use diagnostics::{Warning, WarningCode};
pub use diff::{ChangedProperty, ColumnDiff, PrimaryKeyChange, SchemaDiff, TableDiff};
pub use error::{DefinitionError, InvalidStateError, ParseError, Result, SchemaError};
pub use index::{Index, IndexEditor, IndexOptions, IndexedColumn};
pub use name::{
    parse_optionally_qualified, parse_unqualified, Identifier, OptionallyQualifiedName,
    UnqualifiedName, UnquotedIdentifierFolding,
};
pub use platform::{ComparatorPlatform, GenericPlatform};
pub use schema::{Schema, SchemaConfig, SchemaEditor};
pub use sequence::{Sequence, SequenceEditor};
pub use table::{Table, TableConfiguration, TableEditor, TableOptions};
pub use view::View;
