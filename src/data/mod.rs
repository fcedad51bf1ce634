//! Resolved site data.
//!
//! The upstream content layer hands over one JSON document per build. It
//! holds, for each language, the language-root config, the index listing
//! (already sorted newest first) and every post with its prev/next neighbours.
//!
//! ```text
//! site.json
//!   └── languages[]
//!         ├── config      PageConfig
//!         ├── summaries[] PostSummary   ──► index page
//!         └── posts[]     PostEntry     ──► one page per post
//! ```
//!
//! Nothing here filters or sorts: the document is rendered as given, after
//! a structural validation pass.

mod types;

pub use types::{
    Language, LanguageTree, Markup, NavNeighbor, PageConfig, Post, PostEntry, PostSummary, Slug,
    Translations,
};

use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Site data loading errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Site data parsing error in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Site data is inconsistent: {0}")]
    Invalid(String),
}

/// The whole site, one tree per language.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteData {
    pub languages: Vec<LanguageTree>,
}

impl SiteData {
    /// Load site data from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let content =
            fs::read_to_string(path).map_err(|err| DataError::Io(path.to_path_buf(), err))?;
        serde_json::from_str(&content).map_err(|err| DataError::Json(path.to_path_buf(), err))
    }

    /// Tree for the given language, if the site publishes it
    pub fn tree(&self, language: Language) -> Option<&LanguageTree> {
        self.languages
            .iter()
            .find(|tree| tree.config.language == language)
    }

    /// Whether some rendered page, language root or post, sits at the site root
    pub fn has_root_page(&self) -> bool {
        self.languages.iter().any(|tree| {
            tree.config.slug.rel_dir().is_empty()
                || tree.posts.iter().any(|entry| entry.post.slug.rel_dir().is_empty())
        })
    }

    /// Number of pages a build renders (indexes + posts)
    pub fn page_count(&self) -> usize {
        self.languages.iter().map(|tree| 1 + tree.posts.len()).sum()
    }

    /// Check the invariants rendering relies on.
    pub fn validate(&self) -> Result<(), DataError> {
        let mut languages = FxHashSet::default();
        let mut slugs = FxHashSet::default();

        for tree in &self.languages {
            let language = tree.config.language;
            if !languages.insert(language) {
                return Err(DataError::Invalid(format!(
                    "language `{language}` is defined more than once"
                )));
            }

            check_slug(&tree.config.slug, &mut slugs)?;

            for summary in &tree.summaries {
                check_slug_shape(&summary.slug)?;
            }

            for entry in &tree.posts {
                let post = &entry.post;
                check_slug(&post.slug, &mut slugs)?;

                if let Some(translations) = &post.translations
                    && translations.contains_key(&language)
                {
                    return Err(DataError::Invalid(format!(
                        "post `{}` lists its own language `{language}` as a translation",
                        post.id
                    )));
                }

                for neighbor in [&entry.previous, &entry.next].into_iter().flatten() {
                    check_slug_shape(&neighbor.slug)?;
                }
            }
        }

        Ok(())
    }
}

/// Slugs must be site-absolute and stay inside the output directory.
fn check_slug_shape(slug: &Slug) -> Result<(), DataError> {
    if !slug.as_str().starts_with('/') {
        return Err(DataError::Invalid(format!(
            "slug `{slug}` must start with `/`"
        )));
    }
    if slug.as_str().split('/').any(|segment| segment == "..") {
        return Err(DataError::Invalid(format!(
            "slug `{slug}` must not contain `..`"
        )));
    }
    Ok(())
}

/// Slugs of rendered pages must also be unique.
fn check_slug<'a>(slug: &'a Slug, seen: &mut FxHashSet<&'a str>) -> Result<(), DataError> {
    check_slug_shape(slug)?;
    if !seen.insert(slug.rel_dir()) {
        return Err(DataError::Invalid(format!(
            "two pages render to the same path `{slug}`"
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small bilingual site shared by render and build tests.

    use super::*;

    pub const SITE_JSON: &str = r#"{
        "languages": [
            {
                "config": {
                    "title": "Mon blog",
                    "description": "Notes en français",
                    "language": "fr",
                    "slug": "/fr/",
                    "bio_html": "<p>Écrit par <strong>DCK</strong></p>"
                },
                "summaries": [
                    { "slug": "/fr/deux/", "title": "Deux", "date": "2020-03-05", "excerpt_html": "<em>second</em>" },
                    { "slug": "/fr/un/", "date": "2020-01-10", "excerpt_html": "premier" }
                ],
                "posts": [
                    {
                        "post": {
                            "id": "fr-2", "slug": "/fr/deux/", "title": "Deux", "date": "2020-03-05",
                            "tags": ["rust", "web"], "body_html": "<p>Corps</p>",
                            "excerpt": "Le second",
                            "translations": { "en": "/en/two/" }
                        },
                        "previous": { "slug": "/fr/un/", "title": "Un" }
                    },
                    {
                        "post": {
                            "id": "fr-1", "slug": "/fr/un/", "title": "Un", "date": "2020-01-10",
                            "body_html": "<p>Premier</p>"
                        },
                        "next": { "slug": "/fr/deux/", "title": "Deux" }
                    }
                ]
            },
            {
                "config": {
                    "title": "My blog",
                    "description": "Notes in English",
                    "language": "en",
                    "slug": "/en/",
                    "bio_html": "<p>Written by DCK</p>"
                },
                "summaries": [
                    { "slug": "/en/two/", "title": "Two", "date": "2020-03-05", "excerpt_html": "second" }
                ],
                "posts": [
                    {
                        "post": {
                            "id": "en-2", "slug": "/en/two/", "title": "Two", "date": "2020-03-05",
                            "tags": [], "body_html": "<p>Body</p>",
                            "translations": { "fr": "/fr/deux/" }
                        }
                    }
                ]
            }
        ]
    }"#;

    pub fn site() -> SiteData {
        serde_json::from_str(SITE_JSON).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fixture_is_valid() {
        let site = fixtures::site();
        assert!(site.validate().is_ok());
        assert_eq!(site.languages.len(), 2);
        assert_eq!(site.page_count(), 5);
        assert!(!site.has_root_page());
        assert_eq!(site.tree(Language::En).unwrap().config.title, "My blog");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixtures::SITE_JSON.as_bytes()).unwrap();
        let site = SiteData::from_path(file.path()).unwrap();
        assert_eq!(site.languages[0].config.language, Language::Fr);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteData::from_path(Path::new("/nonexistent/site.json")).unwrap_err();
        assert!(matches!(err, DataError::Io(..)));
        assert!(err.to_string().contains("site.json"));
    }

    #[test]
    fn test_from_path_invalid_date() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = fixtures::SITE_JSON.replace("2020-01-10", "2020-02-30");
        file.write_all(json.as_bytes()).unwrap();
        let err = SiteData::from_path(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Json(..)));
    }

    #[test]
    fn test_duplicate_language_rejected() {
        let mut site = fixtures::site();
        site.languages[1].config.language = Language::Fr;
        let err = site.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_self_translation_rejected() {
        let mut site = fixtures::site();
        let post = &mut site.languages[0].posts[0].post;
        post.translations
            .as_mut()
            .unwrap()
            .insert(Language::Fr, Slug::new("/fr/deux/"));
        let err = site.validate().unwrap_err();
        assert!(err.to_string().contains("own language"));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut site = fixtures::site();
        site.languages[1].posts[0].post.slug = Slug::new("/fr/un");
        let err = site.validate().unwrap_err();
        assert!(err.to_string().contains("same path"));
    }

    #[test]
    fn test_relative_slug_rejected() {
        let mut site = fixtures::site();
        site.languages[0].summaries[0].slug = Slug::new("fr/deux/");
        assert!(matches!(site.validate(), Err(DataError::Invalid(_))));
    }

    #[test]
    fn test_parent_segment_rejected() {
        let mut site = fixtures::site();
        site.languages[0].posts[1].post.slug = Slug::new("/fr/../../etc/");
        let err = site.validate().unwrap_err();
        assert!(err.to_string().contains(".."));
    }

    #[test]
    fn test_root_page_detection() {
        let mut site = fixtures::site();
        site.languages[1].config.slug = Slug::new("/");
        assert!(site.has_root_page());
    }

    #[test]
    fn test_post_at_root_counts_as_root_page() {
        let mut site = fixtures::site();
        site.languages[1].posts[0].post.slug = Slug::new("/");
        assert!(site.validate().is_ok());
        assert!(site.has_root_page());
    }
}
