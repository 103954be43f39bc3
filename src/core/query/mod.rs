//! Query building and execution.
//!
//! A [`Query`] is a plain description of the constraints applied to a model:
//! a list of [`Clause`]s joined with AND/OR, optionally nested, plus a limit.
//! A [`QueryProvider`] owns the records and executes queries against them.
//!
//! - `dialect.rs` - per-driver search operator and JSON-to-text rules
//! - `memory.rs` - in-memory provider used by the demo binary and tests
//! - `record.rs` - the record value returned by providers
//! - `sql.rs` - renders a query's constraints as SQL for logging

pub mod dialect;
mod error;
mod memory;
mod record;
mod sql;

pub use dialect::{DialectRules, rules_for};
pub use error::QueryError;
pub use memory::MemoryStore;
pub use record::{Record, value_to_string};

use serde_json::Value;
use std::fmt;

/// How a clause joins the clauses before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `like` (wildcards `%` and `_`).
    Like,
    /// `ilike`, case-insensitive `like`.
    ILike,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::Like => "like",
            Self::ILike => "ilike",
        })
    }
}

/// A single constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <operator> value`.
    Compare {
        /// Column name.
        column: String,
        /// Operator.
        operator: Operator,
        /// Right-hand value.
        value: Value,
    },

    /// Raw SQL with `?` placeholders.
    Raw {
        /// SQL fragment.
        sql: String,
        /// Values bound to the placeholders, in order.
        bindings: Vec<Value>,
    },

    /// A related record (through `relation`, possibly dotted) matches
    /// `column <operator> value`.
    Relation {
        /// Relation path, e.g. `author` or `author.profile`.
        relation: String,
        /// Column on the related record.
        column: String,
        /// Operator.
        operator: Operator,
        /// Right-hand value.
        value: Value,
    },

    /// The record belongs to the given owner.
    BelongsTo {
        /// Foreign key column on the record.
        foreign_key: String,
        /// Owner's key.
        key: Value,
    },

    /// A parenthesized group of clauses.
    Nested(Vec<Clause>),
}

/// A predicate together with the boolean that joins it to what precedes it.
///
/// The boolean of the first clause in a list is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Join with the previous clause.
    pub boolean: Boolean,
    /// The constraint.
    pub predicate: Predicate,
}

/// Constraints and limit for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    model: String,
    clauses: Vec<Clause>,
    limit: Option<usize>,
}

impl Query {
    /// Start an unconstrained query for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            clauses: Vec::new(),
            limit: None,
        }
    }

    /// Model this query targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Top-level clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Maximum number of records to return.
    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    fn push(&mut self, boolean: Boolean, predicate: Predicate) -> &mut Self {
        self.clauses.push(Clause { boolean, predicate });
        self
    }

    fn compare(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Predicate {
        Predicate::Compare {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    fn relation(
        relation: impl Into<String>,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Predicate {
        Predicate::Relation {
            relation: relation.into(),
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// AND `column <operator> value`.
    pub fn where_(
        &mut self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push(Boolean::And, Self::compare(column, operator, value))
    }

    /// OR `column <operator> value`.
    pub fn or_where(
        &mut self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push(Boolean::Or, Self::compare(column, operator, value))
    }

    /// AND a raw SQL fragment.
    pub fn where_raw(&mut self, sql: impl Into<String>, bindings: Vec<Value>) -> &mut Self {
        let sql = sql.into();
        self.push(Boolean::And, Predicate::Raw { sql, bindings })
    }

    /// OR a raw SQL fragment.
    pub fn or_where_raw(&mut self, sql: impl Into<String>, bindings: Vec<Value>) -> &mut Self {
        let sql = sql.into();
        self.push(Boolean::Or, Predicate::Raw { sql, bindings })
    }

    /// AND a predicate on a related record.
    pub fn where_relation(
        &mut self,
        relation: impl Into<String>,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push(Boolean::And, Self::relation(relation, column, operator, value))
    }

    /// OR a predicate on a related record.
    pub fn or_where_relation(
        &mut self,
        relation: impl Into<String>,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push(Boolean::Or, Self::relation(relation, column, operator, value))
    }

    /// AND "belongs to the owner whose key is `key`".
    pub fn where_belongs_to(&mut self, foreign_key: impl Into<String>, key: Value) -> &mut Self {
        let foreign_key = foreign_key.into();
        self.push(Boolean::And, Predicate::BelongsTo { foreign_key, key })
    }

    /// AND a parenthesized group built by `build`. Empty groups are dropped.
    pub fn where_nested(&mut self, build: impl FnOnce(&mut Query)) -> &mut Self {
        let mut group = Query::new(self.model.clone());
        build(&mut group);

        if group.clauses.is_empty() {
            return self;
        }

        self.push(Boolean::And, Predicate::Nested(group.clauses))
    }

    /// Cap the number of returned records.
    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }
}

/// Executes queries against some record storage.
pub trait QueryProvider: Send + Sync {
    /// Database driver name (`pgsql`, `mysql`, `sqlite`, ...).
    fn driver_name(&self) -> &str;

    /// Start a query for `model`.
    fn query(&self, model: &str) -> Query {
        Query::new(model)
    }

    /// Run `query` and return matching records in storage order.
    fn get(&self, query: &Query) -> Result<Vec<Record>, QueryError>;

    /// Run `query` and return the first match.
    fn first(&self, query: &Query) -> Result<Option<Record>, QueryError> {
        let mut query = query.clone();
        query.limit(1);
        Ok(self.get(&query)?.into_iter().next())
    }

    /// Whether `attribute` of `model` stores per-locale translations.
    fn is_translatable_attribute(&self, _model: &str, _attribute: &str) -> bool {
        false
    }
}
