//! View model.

use serde::{Deserialize, Serialize};

use crate::name::OptionallyQualifiedName;

/// A database view: a name and its defining query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    name: OptionallyQualifiedName,
    sql: String,
}

impl View {
    /// Creates a view.
    #[must_use]
    pub fn new(name: OptionallyQualifiedName, sql: impl Into<String>) -> Self {
        Self {
            name,
            sql: sql.into(),
        }
    }

    /// The view name.
    #[must_use]
    pub const fn name(&self) -> &OptionallyQualifiedName {
        &self.name
    }

    /// The defining query.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}
