//! Locale-aware pluralization.
//!
//! Pluralization rules are pluggable per locale. A locale without a
//! registered [`Pluralizer`] has no pluralization rules, in which case labels
//! are used unchanged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Turns a singular noun into its plural form.
pub trait Pluralizer: Send + Sync {
    /// Pluralize the trailing word of `text`, keeping everything before it.
    fn plural(&self, text: &str) -> String;
}

/// Words that are identical in singular and plural.
const UNCOUNTABLE: &[&str] = &[
    "audio",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "hardware",
    "information",
    "metadata",
    "money",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "traffic",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("cactus", "cacti"),
    ("child", "children"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("mouse", "mice"),
    ("octopus", "octopuses"),
    ("ox", "oxen"),
    ("person", "people"),
    ("quiz", "quizzes"),
    ("shelf", "shelves"),
    ("thief", "thieves"),
    ("tooth", "teeth"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

/// English pluralization: uncountables, irregulars, then suffix rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

impl EnglishPluralizer {
    fn plural_word(lower: &str) -> String {
        if UNCOUNTABLE.contains(&lower) {
            return lower.to_string();
        }

        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
            return (*plural).to_string();
        }

        if lower.ends_with("sis") {
            return format!("{}ses", &lower[..lower.len() - 3]);
        }

        if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        {
            return format!("{lower}es");
        }

        if let Some(stem) = lower.strip_suffix('y') {
            let preceded_by_vowel = stem
                .chars()
                .last()
                .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
            if !stem.is_empty() && !preceded_by_vowel {
                return format!("{stem}ies");
            }
        }

        format!("{lower}s")
    }
}

impl Pluralizer for EnglishPluralizer {
    fn plural(&self, text: &str) -> String {
        let (prefix, word) = split_trailing_word(text);
        if word.is_empty() {
            return text.to_string();
        }

        let plural = Self::plural_word(&word.to_lowercase());
        format!("{prefix}{}", match_casing(word, &plural))
    }
}

/// Split `text` into everything before its trailing word and the word itself.
///
/// `"BlogPost"` splits into `("Blog", "Post")`, `"blog::Post"` into
/// `("blog::", "Post")`, and an all-caps run such as `"URL"` stays whole.
fn split_trailing_word(text: &str) -> (&str, &str) {
    let run_start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphabetic())
        .last()
        .map_or(text.len(), |(i, _)| i);
    let run = &text[run_start..];

    if !run.chars().any(char::is_lowercase) {
        return text.split_at(run_start);
    }

    let word_start = run
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);

    text.split_at(run_start + word_start)
}

fn match_casing(original: &str, plural: &str) -> String {
    let mut chars = original.chars();
    let Some(first) = chars.next() else {
        return plural.to_string();
    };

    if original.chars().count() > 1 && original.chars().all(|c| !c.is_lowercase()) {
        return plural.to_uppercase();
    }

    if first.is_uppercase() {
        let mut out = plural.chars();
        return match out.next() {
            Some(head) => head.to_uppercase().chain(out).collect(),
            None => String::new(),
        };
    }

    plural.to_string()
}

/// Registry of pluralizers keyed by locale.
#[derive(Clone)]
pub struct Pluralization {
    pluralizers: HashMap<String, Arc<dyn Pluralizer>>,
}

impl Pluralization {
    /// Create an empty registry (no locale has pluralization rules).
    pub fn empty() -> Self {
        Self {
            pluralizers: HashMap::new(),
        }
    }

    /// Register a pluralizer for `locale` (e.g. `"en"` or `"pt_BR"`).
    pub fn register(mut self, locale: impl Into<String>, pluralizer: Arc<dyn Pluralizer>) -> Self {
        self.pluralizers.insert(normalize(&locale.into()), pluralizer);
        self
    }

    /// Find the pluralizer for `locale`, falling back to its language part.
    pub fn for_locale(&self, locale: &str) -> Option<&dyn Pluralizer> {
        let locale = normalize(locale);
        if let Some(pluralizer) = self.pluralizers.get(&locale) {
            return Some(pluralizer.as_ref());
        }

        let language = locale.split('_').next().unwrap_or_default();
        self.pluralizers
            .get(language)
            .map(|pluralizer| pluralizer.as_ref())
    }

    /// Whether `locale` has pluralization rules.
    pub fn has_pluralization(&self, locale: &str) -> bool {
        self.for_locale(locale).is_some()
    }
}

impl Default for Pluralization {
    fn default() -> Self {
        Self::empty().register("en", Arc::new(EnglishPluralizer))
    }
}

impl fmt::Debug for Pluralization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locales: Vec<_> = self.pluralizers.keys().collect();
        locales.sort();
        f.debug_struct("Pluralization")
            .field("locales", &locales)
            .finish()
    }
}

fn normalize(locale: &str) -> String {
    locale.trim().replace('-', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let en = EnglishPluralizer;
        assert_eq!(en.plural("post"), "posts");
        assert_eq!(en.plural("Category"), "Categories");
        assert_eq!(en.plural("day"), "days");
        assert_eq!(en.plural("box"), "boxes");
        assert_eq!(en.plural("status"), "statuses");
        assert_eq!(en.plural("analysis"), "analyses");
    }

    #[test]
    fn test_irregular_and_uncountable() {
        let en = EnglishPluralizer;
        assert_eq!(en.plural("person"), "people");
        assert_eq!(en.plural("Child"), "Children");
        assert_eq!(en.plural("equipment"), "equipment");
        assert_eq!(en.plural("human"), "humans");
    }

    #[test]
    fn test_only_trailing_word_is_pluralized() {
        let en = EnglishPluralizer;
        assert_eq!(en.plural("BlogPost"), "BlogPosts");
        assert_eq!(en.plural("blog::Category"), "blog::Categories");
        assert_eq!(en.plural("blog post"), "blog posts");
        assert_eq!(en.plural("SalesPerson"), "SalesPeople");
    }

    #[test]
    fn test_casing_is_preserved() {
        let en = EnglishPluralizer;
        assert_eq!(en.plural("URL"), "URLS");
        assert_eq!(en.plural("Post"), "Posts");
    }

    #[test]
    fn test_locale_fallback_to_language() {
        let registry = Pluralization::default();
        assert!(registry.has_pluralization("en"));
        assert!(registry.has_pluralization("en_GB"));
        assert!(registry.has_pluralization("en-US"));
        assert!(!registry.has_pluralization("ja"));
    }

    #[test]
    fn test_empty_registry_has_no_rules() {
        assert!(!Pluralization::empty().has_pluralization("en"));
    }
}
