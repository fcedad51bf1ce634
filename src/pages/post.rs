//! Single post page.
//!
//! One template covers both historical variants: the date display and the
//! share action are switched by [`PostOptions`].

use super::document::{PageHead, render_document};
use crate::{
    components::{RenderContext, render_bio, render_layout, render_tags},
    config::SiteConfig,
    data::{Language, NavNeighbor, PageConfig, Post, PostEntry},
    utils::{
        date::{DateMode, display_date},
        html::{
            HtmlWriter, write_empty_elem, write_end, write_markup_element, write_script,
            write_start, write_text, write_text_element,
        },
    },
};
use anyhow::Result;

/// Post template switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOptions {
    pub date_mode: DateMode,
    pub include_share_action: bool,
}

impl PostOptions {
    pub const fn from_config(site: &SiteConfig) -> Self {
        Self {
            date_mode: site.build.post.date,
            include_share_action: site.build.post.share,
        }
    }
}

pub fn render_post_page(
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
    options: PostOptions,
    config: &PageConfig,
    entry: &PostEntry,
) -> Result<()> {
    let post = &entry.post;
    let title = format!("{} | {}", post.title, config.title);
    let head = PageHead {
        language: config.language,
        title: &title,
        description: post.excerpt.as_deref().unwrap_or(&config.description),
    };
    let current_path = ctx.site.href(post.slug.as_str());

    render_document(writer, ctx, head, |writer| {
        render_layout(
            writer,
            ctx,
            &current_path,
            config,
            post.translations.as_ref(),
            |writer| {
                write_text_element(writer, "h1", &[("class", "post-title")], &post.title)?;
                if let Some(tags) = post.visible_tags() {
                    render_tags(writer, tags)?;
                }

                let date = display_date(options.date_mode, config.language, post.date);
                write_text_element(writer, "p", &[("class", "post-date")], &date)?;

                write_markup_element(writer, "div", &[("class", "post")], &post.body_html)?;

                if options.include_share_action {
                    render_share_action(writer, ctx.site, config.language, post)?;
                }

                write_empty_elem(writer, "hr", &[])?;
                render_bio(writer, ctx.site, &config.bio_html)?;
                render_post_nav(writer, ctx.site, entry.previous.as_ref(), entry.next.as_ref())
            },
        )
    })
}

/// Share label in the page language
const fn share_label(language: Language) -> &'static str {
    match language {
        Language::Fr => "Partager cet article :",
        Language::En => "Share this post:",
    }
}

/// Twitter intent URL for the post.
///
/// The page URL is only included when `base.url` is configured.
fn share_href(site: &SiteConfig, post: &Post) -> String {
    let mut href = format!(
        "https://twitter.com/intent/tweet?text={}",
        urlencoding::encode(&post.title)
    );
    if let Some(base) = &site.base.url {
        let url = format!("{}{}", base.trim_end_matches('/'), site.href(post.slug.as_str()));
        href.push_str("&url=");
        href.push_str(&urlencoding::encode(&url));
    }
    if let Some(via) = &site.share.via {
        href.push_str("&via=");
        href.push_str(&urlencoding::encode(via));
    }
    href
}

/// Label, share link and the widget script.
///
/// The script is `async`: the page renders the same whether or not it loads.
fn render_share_action(
    writer: &mut HtmlWriter,
    site: &SiteConfig,
    language: Language,
    post: &Post,
) -> Result<()> {
    let href = share_href(site, post);

    write_start(writer, "div", &[("class", "share")])?;
    write_text_element(writer, "span", &[("class", "share-label")], share_label(language))?;

    let mut attrs = vec![
        ("class", "twitter-share-button"),
        ("href", href.as_str()),
        ("data-text", post.title.as_str()),
        ("data-lang", language.code()),
    ];
    if let Some(via) = &site.share.via {
        attrs.push(("data-via", via.as_str()));
    }
    write_text_element(writer, "a", &attrs, "Tweet")?;

    write_script(writer, &site.share.script, false, true)?;
    write_end(writer, "div")
}

/// Two slots, previous on the left and next on the right; a slot stays empty
/// when the neighbour is absent.
fn render_post_nav(
    writer: &mut HtmlWriter,
    site: &SiteConfig,
    previous: Option<&NavNeighbor>,
    next: Option<&NavNeighbor>,
) -> Result<()> {
    write_start(writer, "ul", &[("class", "post-nav")])?;

    write_start(writer, "li", &[])?;
    if let Some(previous) = previous {
        let href = site.href(previous.slug.as_str());
        write_start(writer, "a", &[("href", &href), ("rel", "prev")])?;
        write_text(writer, &format!("← {}", previous.title))?;
        write_end(writer, "a")?;
    }
    write_end(writer, "li")?;

    write_start(writer, "li", &[])?;
    if let Some(next) = next {
        let href = site.href(next.slug.as_str());
        write_start(writer, "a", &[("href", &href), ("rel", "next")])?;
        write_text(writer, &format!("{} →", next.title))?;
        write_end(writer, "a")?;
    }
    write_end(writer, "li")?;

    write_end(writer, "ul")
}
