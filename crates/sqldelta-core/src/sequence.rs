//! Sequence model.

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::name::OptionallyQualifiedName;

/// A database sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    name: OptionallyQualifiedName,
    allocation_size: u32,
    initial_value: i64,
    cache: Option<u32>,
}

impl Sequence {
    /// Returns a blank editor.
    #[must_use]
    pub fn editor() -> SequenceEditor {
        SequenceEditor::default()
    }

    /// Returns an editor pre-seeded with this sequence's state.
    #[must_use]
    pub fn edit(&self) -> SequenceEditor {
        SequenceEditor {
            name: Some(self.name.clone()),
            allocation_size: self.allocation_size,
            initial_value: self.initial_value,
            cache: self.cache,
        }
    }

    /// The sequence name.
    #[must_use]
    pub const fn name(&self) -> &OptionallyQualifiedName {
        &self.name
    }

    /// How many values are allocated per round trip.
    #[must_use]
    pub const fn allocation_size(&self) -> u32 {
        self.allocation_size
    }

    /// The first value the sequence yields.
    #[must_use]
    pub const fn initial_value(&self) -> i64 {
        self.initial_value
    }

    /// Server-side cache size, if declared.
    #[must_use]
    pub const fn cache(&self) -> Option<u32> {
        self.cache
    }
}

/// Fluent builder for [`Sequence`] instances.
#[derive(Debug, Clone)]
pub struct SequenceEditor {
    name: Option<OptionallyQualifiedName>,
    allocation_size: u32,
    initial_value: i64,
    cache: Option<u32>,
}

impl Default for SequenceEditor {
    fn default() -> Self {
        Self {
            name: None,
            allocation_size: 1,
            initial_value: 1,
            cache: None,
        }
    }
}

impl SequenceEditor {
    /// Sets the sequence name.
    #[must_use]
    pub fn set_name(mut self, name: OptionallyQualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the allocation size.
    #[must_use]
    pub fn set_allocation_size(mut self, allocation_size: u32) -> Self {
        self.allocation_size = allocation_size;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn set_initial_value(mut self, initial_value: i64) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// Sets the server-side cache size.
    #[must_use]
    pub fn set_cache(mut self, cache: Option<u32>) -> Self {
        self.cache = cache;
        self
    }

    /// Validates the definition and assembles the sequence.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NameNotSet`] when no name was provided.
    pub fn create(self) -> Result<Sequence, DefinitionError> {
        let name = self
            .name
            .ok_or(DefinitionError::NameNotSet { object: "Sequence" })?;
        Ok(Sequence {
            name,
            allocation_size: self.allocation_size,
            initial_value: self.initial_value,
            cache: self.cache,
        })
    }
}
