//! Complete HTML document around a page body: doctype, `<html lang>`, head metadata.

use crate::{
    components::RenderContext,
    data::Language,
    utils::html::{
        HtmlWriter, write_doctype, write_empty_elem, write_end, write_script, write_start,
        write_text_element,
    },
};
use anyhow::Result;

/// Client script mirroring the dark-mode state machine, written to the output root
pub const DARK_MODE_SCRIPT: &str = include_str!("../embed/dark-mode.js");

/// Output file name of [`DARK_MODE_SCRIPT`]
pub const DARK_MODE_SCRIPT_NAME: &str = "dark-mode.js";

/// Page-level metadata placed in `<head>`
#[derive(Debug, Clone, Copy)]
pub struct PageHead<'a> {
    pub language: Language,
    pub title: &'a str,
    pub description: &'a str,
}

pub fn render_document<F>(
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
    head: PageHead<'_>,
    body: F,
) -> Result<()>
where
    F: FnOnce(&mut HtmlWriter) -> Result<()>,
{
    write_doctype(writer)?;
    write_start(writer, "html", &[("lang", head.language.code())])?;

    write_start(writer, "head", &[])?;
    write_empty_elem(writer, "meta", &[("charset", "utf-8")])?;
    write_empty_elem(
        writer,
        "meta",
        &[("name", "viewport"), ("content", "width=device-width, initial-scale=1")],
    )?;
    write_text_element(writer, "title", &[], head.title)?;
    if !head.description.is_empty() {
        write_empty_elem(
            writer,
            "meta",
            &[("name", "description"), ("content", head.description)],
        )?;
    }
    let script = ctx.site.href(&format!("/{DARK_MODE_SCRIPT_NAME}"));
    write_script(writer, &script, true, false)?;
    write_end(writer, "head")?;

    write_start(writer, "body", &[("class", &format!("{}-mode", ctx.mode))])?;
    body(writer)?;
    write_end(writer, "body")?;

    write_end(writer, "html")
}
