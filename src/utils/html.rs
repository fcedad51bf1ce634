//! HTML writing helpers on top of `quick_xml::Writer`.
//!
//! Text and attribute values are always escaped by quick-xml. The single
//! exception is [`write_markup`], which takes the dedicated [`Markup`] type
//! and copies it verbatim.

use crate::data::Markup;
use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{Cursor, Write};

pub type HtmlWriter = Writer<Cursor<Vec<u8>>>;

/// Create an empty in-memory writer.
#[inline]
pub fn html_writer() -> HtmlWriter {
    Writer::new(Cursor::new(Vec::new()))
}

/// Consume the writer and return the written document.
pub fn finish(writer: HtmlWriter) -> Result<String> {
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

/// Write `<!DOCTYPE html>`.
#[inline]
pub fn write_doctype(writer: &mut HtmlWriter) -> Result<()> {
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    Ok(())
}

/// Write an opening tag with attributes: `<tag attr1="val1" ...>`.
#[inline]
pub fn write_start(writer: &mut HtmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

/// Write a closing tag: `</tag>`.
#[inline]
pub fn write_end(writer: &mut HtmlWriter, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write escaped text.
#[inline]
pub fn write_text(writer: &mut HtmlWriter, text: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::new(text)))?;
    Ok(())
}

/// Write a text element: `<tag attrs>text</tag>`.
#[inline]
pub fn write_text_element(
    writer: &mut HtmlWriter,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    write_start(writer, tag, attrs)?;
    write_text(writer, text)?;
    write_end(writer, tag)
}

/// Write a void element with attributes: `<tag attr1="val1" ... />`.
///
/// Only for HTML void elements (`meta`, `img`, `hr`, `input`, ...).
#[inline]
pub fn write_empty_elem(writer: &mut HtmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Write an element wrapping trusted markup: `<tag attrs>markup</tag>`.
pub fn write_markup_element(
    writer: &mut HtmlWriter,
    tag: &str,
    attrs: &[(&str, &str)],
    markup: &Markup,
) -> Result<()> {
    write_start(writer, tag, attrs)?;
    write_markup(writer, markup)?;
    write_end(writer, tag)
}

/// Copy pre-sanitized markup into the document as-is (trusted input).
#[inline]
pub fn write_markup(writer: &mut HtmlWriter, markup: &Markup) -> Result<()> {
    writer.get_mut().write_all(markup.as_str().as_bytes())?;
    Ok(())
}

/// Write an external script element with optional defer/async.
pub fn write_script(
    writer: &mut HtmlWriter,
    src: &str,
    defer: bool,
    async_attr: bool,
) -> Result<()> {
    let mut elem = BytesStart::new("script");
    elem.push_attribute(("src", src));
    if defer {
        elem.push_attribute(("defer", ""));
    }
    if async_attr {
        elem.push_attribute(("async", ""));
    }
    writer.write_event(Event::Start(elem))?;
    writer.write_event(Event::End(BytesEnd::new("script")))?;
    Ok(())
}
