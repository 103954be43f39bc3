//! Per-driver search rules.
//!
//! Adding a dialect is a table entry. Unknown drivers use [`DEFAULT_DIALECT`].

use tracing::debug;

use super::Operator;

/// How a driver matches text case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct DialectRules {
    /// Operator used for "contains" matching.
    pub search_operator: Operator,

    /// Expression that renders a structured (JSON) column as text.
    pub structured_text: fn(&str) -> String,
}

fn cast_to_text(column: &str) -> String {
    format!("{column}::text")
}

fn json_extract(column: &str) -> String {
    format!("json_extract({column}, '$')")
}

const POSTGRES: DialectRules = DialectRules {
    search_operator: Operator::ILike,
    structured_text: cast_to_text,
};

/// Rules for every driver not listed in the table.
pub const DEFAULT_DIALECT: DialectRules = DialectRules {
    search_operator: Operator::Like,
    structured_text: json_extract,
};

const DIALECTS: &[(&str, DialectRules)] = &[("pgsql", POSTGRES), ("postgres", POSTGRES)];

/// Look up the rules for a driver name.
pub fn rules_for(driver: &str) -> &'static DialectRules {
    match DIALECTS.iter().find(|(name, _)| name.eq_ignore_ascii_case(driver)) {
        Some((_, rules)) => rules,
        None => {
            debug!("No dialect entry for driver '{}', using default rules", driver);
            &DEFAULT_DIALECT
        }
    }
}
