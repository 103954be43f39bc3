//! SQL rendering of query constraints.
//!
//! Output is for logging and assertions. Relation predicates are rendered as
//! an `exists` over the relation name since join keys are unknown here.

use serde_json::Value;

use super::{Boolean, Clause, Predicate, Query};

impl Query {
    /// Render the constraints as a `where` body with `?` placeholders.
    ///
    /// Returns an empty string when there are no constraints.
    pub fn where_sql(&self) -> (String, Vec<Value>) {
        let mut bindings = Vec::new();
        let sql = render_clauses(self.clauses(), &mut bindings);
        (sql, bindings)
    }

    /// Render the full select statement.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let (constraints, bindings) = self.where_sql();
        let mut sql = format!("select * from \"{}\"", self.model());

        if !constraints.is_empty() {
            sql.push_str(" where ");
            sql.push_str(&constraints);
        }

        if let Some(limit) = self.limit_value() {
            sql.push_str(&format!(" limit {limit}"));
        }

        (sql, bindings)
    }
}

fn render_clauses(clauses: &[Clause], bindings: &mut Vec<Value>) -> String {
    let mut sql = String::new();

    for (index, clause) in clauses.iter().enumerate() {
        if index > 0 {
            sql.push_str(match clause.boolean {
                Boolean::And => " and ",
                Boolean::Or => " or ",
            });
        }
        sql.push_str(&render_predicate(&clause.predicate, bindings));
    }

    sql
}

fn render_predicate(predicate: &Predicate, bindings: &mut Vec<Value>) -> String {
    match predicate {
        Predicate::Compare {
            column,
            operator,
            value,
        } => {
            bindings.push(value.clone());
            format!("{column} {operator} ?")
        }
        Predicate::Raw {
            sql,
            bindings: values,
        } => {
            bindings.extend(values.iter().cloned());
            sql.clone()
        }
        Predicate::Relation {
            relation,
            column,
            operator,
            value,
        } => {
            bindings.push(value.clone());
            format!("exists (select * from {relation} where {column} {operator} ?)")
        }
        Predicate::BelongsTo { foreign_key, key } => {
            bindings.push(key.clone());
            format!("{foreign_key} = ?")
        }
        Predicate::Nested(clauses) => format!("({})", render_clauses(clauses, bindings)),
    }
}
