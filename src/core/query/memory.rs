//! In-memory query provider.
//!
//! Evaluates [`Query`] constraints against records held in process memory.
//! `like` and `ilike` both match case-insensitively (SQLite semantics for
//! ASCII text). Raw predicates are limited to the case-folded search fragments
//! produced by the dialect table:
//! `lower(<expr>) <operator> lower(?)` where `<expr>` is `column::text` or
//! `json_extract(column, '$')`.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use super::{
    Boolean, Clause, Operator, Predicate, Query, QueryError, QueryProvider, Record,
    value_to_string,
};

/// Thread-safe in-memory record storage keyed by model.
#[derive(Debug)]
pub struct MemoryStore {
    driver: String,
    tables: RwLock<HashMap<String, Vec<Record>>>,
    translatable: HashMap<String, HashSet<String>>,
}

impl MemoryStore {
    /// Create an empty store that reports `driver` as its driver name.
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            tables: RwLock::new(HashMap::new()),
            translatable: HashMap::new(),
        }
    }

    /// Mark attributes of `model` as translatable (JSON objects keyed by locale).
    pub fn with_translatable<I, S>(mut self, model: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.translatable
            .entry(model.into())
            .or_default()
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Append a record to its model's table.
    pub fn insert(&self, record: Record) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.entry(record.model.clone()).or_default().push(record);
    }

    /// Number of records stored for `model`.
    pub fn count(&self, model: &str) -> usize {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.get(model).map_or(0, Vec::len)
    }
}

impl QueryProvider for MemoryStore {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn get(&self, query: &Query) -> Result<Vec<Record>, QueryError> {
        let (sql, bindings) = query.to_sql();
        debug!(sql = %sql, bindings = ?bindings, "Executing in-memory query");

        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let Some(records) = tables.get(query.model()) else {
            return Ok(Vec::new());
        };

        let limit = query.limit_value().unwrap_or(usize::MAX);
        let mut matches = Vec::new();

        for record in records {
            if matches.len() >= limit {
                break;
            }
            if matches_clauses(record, query.clauses())? {
                matches.push(record.clone());
            }
        }

        Ok(matches)
    }

    fn is_translatable_attribute(&self, model: &str, attribute: &str) -> bool {
        self.translatable
            .get(model)
            .is_some_and(|attributes| attributes.contains(attribute))
    }
}

/// Evaluate a clause list with AND binding tighter than OR.
fn matches_clauses(record: &Record, clauses: &[Clause]) -> Result<bool, QueryError> {
    if clauses.is_empty() {
        return Ok(true);
    }

    let mut any_term = false;
    let mut term = true;

    for (index, clause) in clauses.iter().enumerate() {
        let matched = matches_predicate(record, &clause.predicate)?;
        if index > 0 && clause.boolean == Boolean::Or {
            any_term |= term;
            term = matched;
        } else {
            term &= matched;
        }
    }

    Ok(any_term || term)
}

fn matches_predicate(record: &Record, predicate: &Predicate) -> Result<bool, QueryError> {
    match predicate {
        Predicate::Compare {
            column,
            operator,
            value,
        } => Ok(compare(record.attribute(column), *operator, value)),
        Predicate::Raw { sql, bindings } => matches_raw(record, sql, bindings),
        Predicate::Relation {
            relation,
            column,
            operator,
            value,
        } => Ok(matches_relation(record, relation, column, *operator, value)),
        Predicate::BelongsTo { foreign_key, key } => {
            Ok(compare(record.attribute(foreign_key), Operator::Eq, key))
        }
        Predicate::Nested(clauses) => matches_clauses(record, clauses),
    }
}

fn matches_relation(
    record: &Record,
    relation: &str,
    column: &str,
    operator: Operator,
    value: &Value,
) -> bool {
    let (head, rest) = match relation.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (relation, None),
    };

    record.related(head).iter().any(|related| match rest {
        Some(rest) => matches_relation(related, rest, column, operator, value),
        None => compare(related.attribute(column), operator, value),
    })
}

fn compare(actual: Option<&Value>, operator: Operator, expected: &Value) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    match operator {
        Operator::Eq => {
            actual == expected
                || matches!(
                    (value_to_string(actual), value_to_string(expected)),
                    (Some(a), Some(b)) if a == b
                )
        }
        Operator::Like | Operator::ILike => {
            match (value_to_string(actual), value_to_string(expected)) {
                (Some(text), Some(pattern)) => like(&text, &pattern),
                _ => false,
            }
        }
    }
}

fn matches_raw(record: &Record, sql: &str, bindings: &[Value]) -> Result<bool, QueryError> {
    let unsupported = || QueryError::unsupported_raw(sql);

    let body = sql
        .strip_prefix("lower(")
        .and_then(|rest| rest.strip_suffix(" lower(?)"))
        .ok_or_else(unsupported)?;
    let (expression, operator) = body.rsplit_once(") ").ok_or_else(unsupported)?;
    let operator = match operator {
        "like" => Operator::Like,
        "ilike" => Operator::ILike,
        _ => return Err(unsupported()),
    };
    let column = structured_column(expression).ok_or_else(unsupported)?;
    let pattern = bindings.first().ok_or_else(unsupported)?;

    let text = record.attribute(column).and_then(|value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    });

    Ok(compare(text.map(Value::String).as_ref(), operator, pattern))
}

fn structured_column(expression: &str) -> Option<&str> {
    if let Some(column) = expression.strip_suffix("::text") {
        return Some(column);
    }

    expression
        .strip_prefix("json_extract(")
        .and_then(|rest| rest.strip_suffix(", '$')"))
}

/// Case-insensitive SQL `like` with `%` and `_` wildcards.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    // matched[j]: pattern[..j] matches text[..i] for the current i
    let mut matched = vec![false; pattern.len() + 1];
    matched[0] = true;
    for j in 1..=pattern.len() {
        matched[j] = matched[j - 1] && pattern[j - 1] == '%';
    }

    for &c in &text {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                '%' => next[j - 1] || matched[j],
                '_' => matched[j - 1],
                p => matched[j - 1] && p == c,
            };
        }
        matched = next;
    }

    matched[pattern.len()]
}
