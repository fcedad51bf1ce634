//! Links to sibling translations of the current page.

use crate::{
    config::SiteConfig,
    data::{Language, Translations},
    utils::html::{HtmlWriter, write_end, write_start, write_text_element},
};
use anyhow::Result;

/// Write the current language label followed by one link per translation.
///
/// Translations come out in `Language` order; an absent map leaves only the label.
pub fn render_language_switcher(
    writer: &mut HtmlWriter,
    site: &SiteConfig,
    current: Language,
    translations: Option<&Translations>,
) -> Result<()> {
    write_start(writer, "nav", &[("class", "language-switcher")])?;
    write_text_element(
        writer,
        "span",
        &[("class", "language-current"), ("aria-current", "true")],
        current.code(),
    )?;

    for (language, slug) in translations.into_iter().flatten() {
        if *language == current {
            continue;
        }
        let href = site.href(slug.as_str());
        write_text_element(
            writer,
            "a",
            &[
                ("class", "language-link"),
                ("href", &href),
                ("hreflang", language.code()),
                ("lang", language.code()),
            ],
            language.code(),
        )?;
    }

    write_end(writer, "nav")
}
