//! Language index page: bio, then the post listing in upstream order.

use super::document::{PageHead, render_document};
use crate::{
    components::{RenderContext, render_bio, render_layout},
    data::{PageConfig, PostSummary},
    utils::{
        date::format_date,
        html::{HtmlWriter, write_end, write_markup_element, write_start, write_text_element},
    },
};
use anyhow::Result;

pub fn render_index_page(
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
    current_path: &str,
    config: &PageConfig,
    summaries: &[PostSummary],
) -> Result<()> {
    let head = PageHead {
        language: config.language,
        title: &config.title,
        description: &config.description,
    };

    render_document(writer, ctx, head, |writer| {
        render_layout(writer, ctx, current_path, config, None, |writer| {
            render_bio(writer, ctx.site, &config.bio_html)?;
            for summary in summaries {
                render_summary(writer, ctx, config, summary)?;
            }
            Ok(())
        })
    })
}

fn render_summary(
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
    config: &PageConfig,
    summary: &PostSummary,
) -> Result<()> {
    let href = ctx.site.href(summary.slug.as_str());
    let date = format_date(config.language, summary.date);

    write_start(writer, "article", &[("class", "blog-list-item")])?;
    write_start(writer, "h3", &[("class", "blog-list-title")])?;
    write_text_element(writer, "a", &[("href", &href)], summary.display_title())?;
    write_end(writer, "h3")?;
    write_text_element(writer, "small", &[], &date)?;
    write_markup_element(writer, "p", &[], &summary.excerpt_html)?;
    write_end(writer, "article")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SiteConfig,
        data::fixtures,
        theme::DisplayMode,
        utils::html::{finish, html_writer},
    };

    fn render(site: &SiteConfig, lang_index: usize, current_path: &str) -> String {
        let data = fixtures::site();
        let tree = &data.languages[lang_index];
        let ctx = RenderContext::new(site, DisplayMode::Light);
        let mut writer = html_writer();
        render_index_page(&mut writer, &ctx, current_path, &tree.config, &tree.summaries).unwrap();
        finish(writer).unwrap()
    }

    #[test]
    fn test_head_metadata_from_config() {
        let html = render(&SiteConfig::default(), 0, "/fr/");
        assert!(html.contains(r#"<html lang="fr">"#));
        assert!(html.contains("<title>Mon blog</title>"));
        assert!(html.contains(r#"content="Notes en français""#));
    }

    #[test]
    fn test_index_has_home_header_and_bio() {
        let html = render(&SiteConfig::default(), 0, "/fr/");
        assert!(html.contains("site-title--home"));
        assert!(html.contains("<p>Écrit par <strong>DCK</strong></p>"));
        assert!(html.find("bio-content").unwrap() < html.find("blog-list-item").unwrap());
    }

    #[test]
    fn test_entries_keep_upstream_order() {
        let html = render(&SiteConfig::default(), 0, "/fr/");
        let second = html.find(r#"href="/fr/deux/""#).unwrap();
        let first = html.find(r#"href="/fr/un/""#).unwrap();
        assert!(second < first);
        assert_eq!(html.matches("blog-list-item").count(), 2);
    }

    #[test]
    fn test_entry_date_and_excerpt() {
        let html = render(&SiteConfig::default(), 0, "/fr/");
        assert!(html.contains("<small>05 mars 2020</small>"));
        assert!(html.contains("<p><em>second</em></p>"));

        let html = render(&SiteConfig::default(), 1, "/en/");
        assert!(html.contains("<small>March 05, 2020</small>"));
    }

    #[test]
    fn test_missing_title_falls_back_to_slug() {
        let html = render(&SiteConfig::default(), 0, "/fr/");
        assert!(html.contains(r#"<a href="/fr/un/">/fr/un/</a>"#));
    }

    #[test]
    fn test_links_honour_path_prefix() {
        let mut site = SiteConfig::default();
        site.build.path_prefix = "/blog".into();
        let html = render(&site, 1, "/blog/en/");
        assert!(html.contains(r#"<a href="/blog/en/two/">Two</a>"#));
        assert!(html.contains("site-title--home"));
    }
}
