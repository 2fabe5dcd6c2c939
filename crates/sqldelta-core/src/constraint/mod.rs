//! Table constraint models: primary key, unique, and foreign key.

mod foreign_key;
mod primary_key;
mod unique;

pub use foreign_key::{
    Deferrability, ForeignKeyConstraint, ForeignKeyConstraintEditor, MatchType, ReferentialAction,
};
pub use primary_key::{PrimaryKeyConstraint, PrimaryKeyConstraintEditor};
pub use unique::{UniqueConstraint, UniqueConstraintEditor};
