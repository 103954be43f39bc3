//! Convention-based names derived from a resource's declared type path.
//!
//! Type paths are `::`-separated, e.g.
//! `app::filament::resources::blog::PostResource`. For that path the
//! conventions give the model `app::models::Post` and the slug `blog/posts`.

use convert_case::{Case, Casing};
use deunicode::deunicode;
use std::fmt;
use std::sync::Arc;

use crate::core::i18n::{EnglishPluralizer, Pluralizer};

const SEPARATOR: &str = "::";

/// Pure string transformations for model identifiers, slugs and labels.
#[derive(Clone)]
pub struct NamingStrategy {
    model_namespace: String,
    resource_suffix: String,
    resources_segment: String,
    pluralizer: Arc<dyn Pluralizer>,
}

impl Default for NamingStrategy {
    fn default() -> Self {
        Self {
            model_namespace: "app::models".to_string(),
            resource_suffix: "Resource".to_string(),
            resources_segment: "resources".to_string(),
            pluralizer: Arc::new(EnglishPluralizer),
        }
    }
}

impl fmt::Debug for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamingStrategy")
            .field("model_namespace", &self.model_namespace)
            .field("resource_suffix", &self.resource_suffix)
            .field("resources_segment", &self.resources_segment)
            .finish_non_exhaustive()
    }
}

impl NamingStrategy {
    /// Conventions with the default namespace and English slug pluralization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace prepended to derived model identifiers.
    pub fn with_model_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.model_namespace = namespace.into().trim_end_matches(SEPARATOR).to_string();
        self
    }

    /// Pluralizer used for slugs. Slugs do not depend on the request locale.
    pub fn with_pluralizer(mut self, pluralizer: Arc<dyn Pluralizer>) -> Self {
        self.pluralizer = pluralizer;
        self
    }

    /// Last segment of a `::` path.
    pub fn basename(path: &str) -> &str {
        path.rsplit(SEPARATOR).next().unwrap_or(path)
    }

    fn strip_suffix<'a>(&self, name: &'a str) -> &'a str {
        match name.rfind(self.resource_suffix.as_str()) {
            Some(0) | None => name,
            Some(index) => &name[..index],
        }
    }

    /// `app::filament::resources::PostResource` → `app::models::Post`.
    pub fn model_identifier(&self, type_name: &str) -> String {
        let model = self.strip_suffix(Self::basename(type_name));
        if self.model_namespace.is_empty() {
            return model.to_string();
        }
        format!("{}{SEPARATOR}{model}", self.model_namespace)
    }

    /// `app::filament::resources::blog::PostResource` → `blog/posts`.
    pub fn slug(&self, type_name: &str) -> String {
        let marker = format!("{SEPARATOR}{}{SEPARATOR}", self.resources_segment);
        let relative = match type_name.rfind(&marker) {
            Some(index) => &type_name[index + marker.len()..],
            None => Self::basename(type_name),
        };

        self.pluralizer
            .plural(self.strip_suffix(relative))
            .split(SEPARATOR)
            .map(|segment| slugify(&segment.to_case(Case::Kebab)))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// `app::models::BlogPost` → `blog post`.
    pub fn model_label(&self, model: &str) -> String {
        Self::basename(model).to_case(Case::Kebab).replace('-', " ")
    }

    /// `blog posts` → `Blog Posts`.
    pub fn headline(text: &str) -> String {
        text.to_case(Case::Title)
    }

    /// Whether `slug` can be served: `/`-separated segments of ASCII
    /// alphanumerics, `-`, `_` and `.`, none empty or a dot segment.
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.split('/').all(|segment| {
                !matches!(segment, "" | "." | "..")
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            })
    }

    /// Foreign key pointing at a tenant: `app::models::Team` → `team_id`.
    pub fn tenant_ownership_key(&self, tenant_model: &str) -> String {
        format!("{}_id", Self::basename(tenant_model).to_case(Case::Snake))
    }
}

/// Lowercase ASCII alphanumerics separated by single dashes. Other
/// scripts are transliterated first.
fn slugify(text: &str) -> String {
    let text = deunicode(text);
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
