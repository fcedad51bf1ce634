//! Data types for resolved page data.
//!
//! These are read-only snapshots deserialized from the upstream JSON.
//! Rendering never mutates, filters or reorders them.

use crate::utils::date::CalendarDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Supported content languages.
///
/// `fr` (and regional `fr-*` tags) select French; every other tag falls back
/// to the default, English.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_lowercase();
        match code.split(['-', '_']).next() {
            Some("fr") => Self::Fr,
            _ => Self::En,
        }
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code().to_owned()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Site-relative page path, e.g. `/fr/mon-article/`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Slug(pub String);

impl Slug {
    #[cfg(test)]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path under the output directory, without leading or trailing slashes.
    pub fn rel_dir(&self) -> &str {
        self.0.trim_matches('/')
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pre-sanitized HTML fragment.
///
/// Only `write_markup` emits it, and it does so verbatim. Plain strings always go
/// through escaping, so trusted markup has to be asked for by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    #[cfg(test)]
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Sibling translations of one content item.
pub type Translations = BTreeMap<Language, Slug>;

/// Per-language site settings, taken from the language-root page.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub language: Language,
    /// Slug of the language-root page
    pub slug: Slug,
    #[serde(default)]
    pub bio_html: Markup,
}

/// Post as listed on an index page.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostSummary {
    pub slug: Slug,
    #[serde(default)]
    pub title: Option<String>,
    pub date: CalendarDate,
    #[serde(default)]
    pub excerpt_html: Markup,
}

impl PostSummary {
    /// Title to display; the slug stands in when the post has none.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => self.slug.as_str(),
        }
    }
}

/// A single post with its rendered body.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Post {
    pub id: String,
    pub slug: Slug,
    pub title: String,
    pub date: CalendarDate,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub body_html: Markup,
    /// Plain-text excerpt, used for the meta description
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub translations: Option<Translations>,
}

impl Post {
    /// Tags worth rendering: `None` when absent or empty.
    pub fn visible_tags(&self) -> Option<&[String]> {
        self.tags.as_deref().filter(|tags| !tags.is_empty())
    }
}

/// Previous or next post in the same language, date-ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavNeighbor {
    pub slug: Slug,
    pub title: String,
}

/// A post together with its navigation neighbours.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostEntry {
    pub post: Post,
    #[serde(default)]
    pub previous: Option<NavNeighbor>,
    #[serde(default)]
    pub next: Option<NavNeighbor>,
}

/// Everything published in one language.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageTree {
    pub config: PageConfig,
    /// Index listing, newest first
    #[serde(default)]
    pub summaries: Vec<PostSummary>,
    #[serde(default)]
    pub posts: Vec<PostEntry>,
}
