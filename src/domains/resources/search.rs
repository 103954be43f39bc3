//! Global search building blocks.

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::query::{DialectRules, Query};

/// Split search text into words, dropping empty tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Add the "attribute contains `word`" predicate to `query`.
///
/// The first predicate of a group joins with AND, the rest with OR.
/// Translatable attributes are matched through the dialect's structured-text
/// expression, dotted attributes through the relation named by everything
/// before the last dot.
pub fn apply_global_search_attribute_constraint(
    query: &mut Query,
    attribute: &str,
    word: &str,
    is_first: bool,
    rules: &DialectRules,
    translatable: bool,
) {
    let operator = rules.search_operator;
    let pattern = format!("%{word}%");

    if translatable {
        let sql = format!("lower({}) {operator} lower(?)", (rules.structured_text)(attribute));
        let bindings = vec![pattern.into()];
        if is_first {
            query.where_raw(sql, bindings);
        } else {
            query.or_where_raw(sql, bindings);
        }
        return;
    }

    if let Some((relation, column)) = attribute.rsplit_once('.') {
        if is_first {
            query.where_relation(relation, column, operator, pattern);
        } else {
            query.or_where_relation(relation, column, operator, pattern);
        }
        return;
    }

    if is_first {
        query.where_(attribute, operator, pattern);
    } else {
        query.or_where(attribute, operator, pattern);
    }
}

/// A link offered next to a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalSearchResultAction {
    pub name: String,
    pub label: String,
    pub url: Option<String>,
}

impl GlobalSearchResultAction {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            url: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One matching record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalSearchResult {
    pub title: String,
    pub url: String,
    pub details: IndexMap<String, String>,
    pub actions: Vec<GlobalSearchResultAction>,
}

/// Results of one resource, labeled by its plural model label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalSearchResultGroup {
    pub label: String,
    pub results: Vec<GlobalSearchResult>,
}
