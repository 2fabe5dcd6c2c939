//! Platform comparison quirks.
//!
//! Rather than subclassing the comparator per database, platform-specific
//! comparison behavior is injected through this narrow capability interface.

use crate::column::{Column, Value};

/// Per-platform normalization hooks consulted by the comparator.
pub trait ComparatorPlatform {
    /// Returns the column's default value normalized for comparison.
    ///
    /// Introspected defaults often come back spelled differently from how
    /// they were declared (quoting, keyword casing). Platforms override this
    /// to fold equivalent spellings together; the generic behavior compares
    /// the declared value verbatim.
    fn normalized_default(&self, column: &Column) -> Option<Value> {
        column.default().cloned()
    }

    /// The platform option keys that are meaningful for diffing columns on
    /// this platform. Options not listed here are ignored by the comparator.
    fn relevant_column_options(&self) -> &[&str] {
        &[]
    }
}

/// The platform-neutral comparison behavior: defaults compare verbatim and
/// no platform options participate in diffing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericPlatform;

impl ComparatorPlatform for GenericPlatform {}
