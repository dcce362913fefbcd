//! Error types.

use thiserror::Error;

/// Parser construction error.
///
/// Construction is the only fallible operation in the crate; parsing itself
/// always degrades to absent/empty fields instead of failing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An identifier rule's field map references a capture group that does
    /// not exist in its pattern.
    #[error("identifier rule '{rule}' references unknown capture group '{group}'")]
    UnknownCaptureGroup {
        /// Name of the offending rule.
        rule: &'static str,
        /// The missing capture group name.
        group: &'static str,
    },

    /// An abbreviation table entry has an empty key or expansion.
    #[error("{table} contains an entry with an empty key or expansion")]
    EmptyAbbreviation {
        /// Which table the entry came from.
        table: &'static str,
    },
}
