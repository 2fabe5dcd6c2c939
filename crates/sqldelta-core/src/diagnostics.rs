//! Structured diagnostics for backward-compatible degradation paths.
//!
//! Legacy-tolerant code paths (lenient name parsing, mixed qualified and
//! unqualified naming) do not fail hard. Instead they record a [`Warning`]
//! on the owning object and emit it through `tracing` so tooling can surface
//! the problem ahead of a future breaking change.

use serde::{Deserialize, Serialize};

/// Machine-readable warning categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningCode {
    /// An object or column name could not be parsed and was kept as an
    /// opaque literal.
    UnparsableName,
    /// Qualified and unqualified names of the same object kind were mixed
    /// within one schema.
    MixedNameQualification,
    /// An index was declared without any columns.
    IndexWithoutColumns,
    /// An indexed column length was not a positive integer.
    InvalidIndexedColumnLength,
}

/// A non-fatal diagnostic recorded on a degraded code path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// The warning category.
    pub code: WarningCode,
    /// Human-readable description of what degraded and why.
    pub message: String,
}

impl Warning {
    /// Creates a warning and emits it through `tracing`.
    #[must_use]
    pub fn emit(code: WarningCode, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(code = ?code, "{message}");
        Self { code, message }
    }
}
