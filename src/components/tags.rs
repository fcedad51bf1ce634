//! Topic chips under a post title.

use crate::utils::html::{HtmlWriter, write_end, write_start, write_text_element};
use anyhow::Result;

/// Write one chip per tag, in input order.
///
/// Nothing is written for an empty slice.
pub fn render_tags(writer: &mut HtmlWriter, tags: &[String]) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }

    write_start(writer, "ul", &[("class", "tags")])?;
    for tag in tags {
        write_text_element(writer, "li", &[("class", "tag")], tag)?;
    }
    write_end(writer, "ul")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::html::{finish, html_writer};

    fn render(tags: &[&str]) -> String {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        let mut writer = html_writer();
        render_tags(&mut writer, &tags).unwrap();
        finish(writer).unwrap()
    }

    #[test]
    fn test_preserves_order_and_count() {
        let html = render(&["a", "b", "c"]);
        assert_eq!(html.matches(r#"<li class="tag">"#).count(), 3);
        let (a, b, c) = (
            html.find(">a<").unwrap(),
            html.find(">b<").unwrap(),
            html.find(">c<").unwrap(),
        );
        assert!(a < b && b < c);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = render(&["rust", "rust"]);
        assert_eq!(html.matches(">rust<").count(), 2);
    }

    #[test]
    fn test_empty_renders_nothing() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_tag_text_is_escaped() {
        let html = render(&["c<3"]);
        assert!(html.contains("c&lt;3"));
    }
}
