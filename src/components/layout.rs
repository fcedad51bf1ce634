//! Shared page shell: top row, divider, site header, content container.

use super::{
    RenderContext, language::render_language_switcher, toggle::render_dark_mode_toggle,
};
use crate::{
    data::{PageConfig, Translations},
    utils::html::{HtmlWriter, write_empty_elem, write_end, write_start, write_text_element},
};
use anyhow::Result;

/// Which site header a page gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Large centered title linking to the language root
    Home,
    /// Small title linking to the site root
    Compact,
}

impl HeaderStyle {
    /// Home header on the language root itself and on the absolute site root.
    pub fn select(ctx: &RenderContext<'_>, current_path: &str, config: &PageConfig) -> Self {
        if current_path == ctx.site.href(config.slug.as_str()) || current_path == "/" {
            Self::Home
        } else {
            Self::Compact
        }
    }
}

/// Wrap `body` in the page shell.
pub fn render_layout<F>(
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
    current_path: &str,
    config: &PageConfig,
    translations: Option<&Translations>,
    body: F,
) -> Result<()>
where
    F: FnOnce(&mut HtmlWriter) -> Result<()>,
{
    write_start(writer, "div", &[("class", "blog")])?;

    write_start(writer, "div", &[("class", "top-bar")])?;
    render_language_switcher(writer, ctx.site, config.language, translations)?;
    render_dark_mode_toggle(writer, ctx.mode)?;
    write_end(writer, "div")?;

    write_empty_elem(writer, "hr", &[])?;

    render_header(writer, ctx, current_path, config)?;

    write_start(writer, "div", &[("class", "content")])?;
    body(writer)?;
    write_end(writer, "div")?;

    write_end(writer, "div")
}

fn render_header(
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
    current_path: &str,
    config: &PageConfig,
) -> Result<()> {
    let (tag, class, href) = match HeaderStyle::select(ctx, current_path, config) {
        HeaderStyle::Home => (
            "h1",
            "site-title site-title--home",
            ctx.site.href(config.slug.as_str()),
        ),
        HeaderStyle::Compact => ("h3", "site-title", ctx.site.href("/")),
    };

    write_start(writer, tag, &[("class", class)])?;
    write_text_element(writer, "a", &[("class", "site-title-link"), ("href", &href)], &config.title)?;
    write_end(writer, tag)
}
