use crate::valuation::Valuation;
use colored::Colorize;

/// Errors raised while declaring, resolving or reading flags
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    /// A flag or environment variable name is malformed
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A flag name is already bound to another definition
    #[error("flag {name} is already defined")]
    DuplicateName { name: String },

    /// The declared defaults do not fit the valuation
    #[error("{valuation} flag(s) {names} cannot take {count} default value(s)")]
    ValuationMismatch {
        names: String,
        valuation: Valuation,
        count: usize,
    },

    /// A command-line token does not name any registered flag
    #[error("unknown flag: {name}")]
    UnknownFlag { name: String },

    /// A mono-valuated flag appeared more than once on the command line
    #[error("flag {name} is set more than once")]
    AlreadySet { name: String },

    /// A mono or multi-valuated flag is the last token on the command line
    #[error("flag {name} requires a value")]
    MissingValue { name: String },

    /// A query names a flag or field that was never registered
    #[error("{name} is not defined")]
    NotFound { name: String },

    /// A query asks for a type the flag's valuation cannot provide
    #[error("flag {name} is {valuation}-valuated, expected {expected}")]
    WrongValuation {
        name: String,
        valuation: Valuation,
        expected: &'static str,
    },

    /// A stored value does not convert to the requested type
    #[error("flag {name}: cannot parse '{value}' as {type_name}: {message}")]
    ParseError {
        name: String,
        value: String,
        type_name: &'static str,
        message: String,
    },

    /// A bound field needs a value but none was resolved from any source
    #[error("flag {name} is required but was not set")]
    Required { name: String },

    /// Two schema fields share the same identifier
    #[error("field {field} is declared more than once")]
    DuplicateField { field: String },
}

impl FlagError {
    pub(crate) fn parse_error<T>(
        name: impl Into<String>,
        value: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::ParseError {
            name: name.into(),
            value: value.into(),
            type_name: std::any::type_name::<T>(),
            message: message.to_string(),
        }
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Helper to format multiple flag errors into a report for the terminal
pub fn format_flag_errors(errors: &[FlagError]) -> String {
    let error_summary = errors
        .iter()
        .map(|e| format!("  - {}", e.to_string().red()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Flag resolution failed with {} error(s):\n{}",
        errors.len().to_string().yellow().bold(),
        error_summary
    )
}
