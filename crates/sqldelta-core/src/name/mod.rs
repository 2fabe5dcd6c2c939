//! SQL object name model.
//!
//! Names are built from [`Identifier`]s, each of which records whether it was
//! quoted in its source form. Quoting is preserved for rendering but does not
//! affect identity: unquoted identifiers compare case-insensitively (after
//! case folding), quoted identifiers compare verbatim.

mod parser;

pub use parser::{parse_optionally_qualified, parse_unqualified};

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// How a platform folds the case of unquoted identifiers.
///
/// The engine's generic comparisons fold to lower case; platforms that fold
/// to upper case (e.g. Oracle-style) can normalize accordingly when rendering
/// or introspecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnquotedIdentifierFolding {
    /// Unquoted identifiers are folded to upper case.
    Upper,
    /// Unquoted identifiers are folded to lower case.
    #[default]
    Lower,
    /// Unquoted identifiers are kept as spelled.
    None,
}

impl UnquotedIdentifierFolding {
    /// Applies the folding to an unquoted identifier value.
    #[must_use]
    pub fn fold(self, value: &str) -> String {
        match self {
            Self::Upper => value.to_uppercase(),
            Self::Lower => value.to_lowercase(),
            Self::None => value.to_owned(),
        }
    }
}

/// A single SQL identifier, with its quotation preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    value: String,
    quoted: bool,
}

impl Identifier {
    /// Creates an unquoted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyIdentifier`] if `value` is empty.
    pub fn unquoted(value: impl Into<String>) -> Result<Self, ParseError> {
        Self::new(value.into(), false)
    }

    /// Creates a quoted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyIdentifier`] if `value` is empty.
    pub fn quoted(value: impl Into<String>) -> Result<Self, ParseError> {
        Self::new(value.into(), true)
    }

    fn new(value: String, quoted: bool) -> Result<Self, ParseError> {
        if value.is_empty() {
            return Err(ParseError::EmptyIdentifier);
        }
        Ok(Self { value, quoted })
    }

    /// The literal identifier value, without quotes.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the identifier was quoted in its source form.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Returns the literal value normalized according to the given folding.
    ///
    /// Quoted identifiers are returned verbatim; only unquoted identifiers
    /// are folded. Consumers should use the normalized value for comparison
    /// and for referencing introspected objects.
    #[must_use]
    pub fn to_normalized_value(&self, folding: UnquotedIdentifierFolding) -> String {
        if self.quoted {
            self.value.clone()
        } else {
            folding.fold(&self.value)
        }
    }

    /// The identity key used by the engine's generic comparisons:
    /// lower-case folding for unquoted identifiers, verbatim otherwise.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.to_normalized_value(UnquotedIdentifierFolding::Lower)
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.value.replace('"', "\"\""))
        } else {
            f.write_str(&self.value)
        }
    }
}

/// An unqualified name: a single identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnqualifiedName {
    identifier: Identifier,
}

impl UnqualifiedName {
    /// Creates an unqualified name from an identifier.
    #[must_use]
    pub const fn new(identifier: Identifier) -> Self {
        Self { identifier }
    }

    /// Creates an unquoted unqualified name.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyIdentifier`] if `value` is empty.
    pub fn unquoted(value: impl Into<String>) -> Result<Self, ParseError> {
        Ok(Self::new(Identifier::unquoted(value)?))
    }

    /// Creates a quoted unqualified name.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyIdentifier`] if `value` is empty.
    pub fn quoted(value: impl Into<String>) -> Result<Self, ParseError> {
        Ok(Self::new(Identifier::quoted(value)?))
    }

    /// The underlying identifier.
    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The identity key used for comparison and map lookups.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.identifier.normalized()
    }
}

impl fmt::Display for UnqualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.identifier.fmt(f)
    }
}

/// An optionally qualified name: an identifier plus an optional qualifier
/// (e.g. the `public` in `public.users`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionallyQualifiedName {
    name: Identifier,
    qualifier: Option<Identifier>,
}

impl OptionallyQualifiedName {
    /// Creates an optionally qualified name from identifiers.
    #[must_use]
    pub const fn new(name: Identifier, qualifier: Option<Identifier>) -> Self {
        Self { name, qualifier }
    }

    /// Creates an optionally qualified name with all identifiers unquoted.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyIdentifier`] if any part is empty.
    pub fn unquoted(
        name: impl Into<String>,
        qualifier: Option<&str>,
    ) -> Result<Self, ParseError> {
        Ok(Self::new(
            Identifier::unquoted(name)?,
            qualifier.map(Identifier::unquoted).transpose()?,
        ))
    }

    /// Creates an optionally qualified name with all identifiers quoted.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyIdentifier`] if any part is empty.
    pub fn quoted(name: impl Into<String>, qualifier: Option<&str>) -> Result<Self, ParseError> {
        Ok(Self::new(
            Identifier::quoted(name)?,
            qualifier.map(Identifier::quoted).transpose()?,
        ))
    }

    /// The unqualified part of the name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// The qualifier, if present.
    #[must_use]
    pub const fn qualifier(&self) -> Option<&Identifier> {
        self.qualifier.as_ref()
    }

    /// The identity key used for comparison and map lookups:
    /// `qualifier.name` with each part normalized, or just `name`.
    #[must_use]
    pub fn normalized(&self) -> String {
        match &self.qualifier {
            Some(qualifier) => format!("{}.{}", qualifier.normalized(), self.name.normalized()),
            None => self.name.normalized(),
        }
    }
}

impl fmt::Display for OptionallyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{qualifier}.{}", self.name),
            None => self.name.fmt(f),
        }
    }
}
