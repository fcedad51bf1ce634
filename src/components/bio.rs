//! Author identity block: picture, injected bio content, social links.

use crate::{
    config::SiteConfig,
    data::Markup,
    utils::html::{HtmlWriter, write_empty_elem, write_end, write_markup_element, write_start, write_text_element},
};
use anyhow::Result;

pub fn render_bio(writer: &mut HtmlWriter, site: &SiteConfig, content: &Markup) -> Result<()> {
    let picture = if site.bio.picture.starts_with('/') {
        site.href(&site.bio.picture)
    } else {
        site.bio.picture.clone()
    };

    write_start(writer, "div", &[("class", "bio")])?;
    write_empty_elem(
        writer,
        "img",
        &[("class", "bio-picture"), ("src", &picture), ("alt", site.picture_alt())],
    )?;

    write_start(writer, "div", &[])?;
    write_markup_element(writer, "div", &[("class", "bio-content")], content)?;

    write_start(writer, "div", &[("class", "socials")])?;
    for link in &site.bio.links {
        let class = format!("social-link social-link--{}", link.icon);
        // Opens in a new browsing context, detached from this page
        write_text_element(
            writer,
            "a",
            &[
                ("class", &class),
                ("href", &link.href),
                ("target", "_blank"),
                ("rel", "noopener noreferrer"),
                ("title", &link.title),
            ],
            &link.icon,
        )?;
    }
    write_end(writer, "div")?;

    write_end(writer, "div")?;
    write_end(writer, "div")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::html::{finish, html_writer};

    fn render(site: &SiteConfig, content: &str) -> String {
        let mut writer = html_writer();
        render_bio(&mut writer, site, &Markup::trusted(content)).unwrap();
        finish(writer).unwrap()
    }

    #[test]
    fn test_default_identity_block() {
        let html = render(&SiteConfig::default(), "<p>Hi, I'm <b>DCK</b></p>");

        assert!(html.contains(r#"<img class="bio-picture" src="/me.png" alt="DCK"/>"#));
        assert!(html.contains("<p>Hi, I'm <b>DCK</b></p>"));
        assert!(html.contains(r#"href="https://github.com/DCKT""#));
        assert!(html.contains(r#"href="https://twitter.com/DCK__""#));
        assert_eq!(html.matches(r#"target="_blank""#).count(), 2);
        assert_eq!(html.matches("noopener noreferrer").count(), 2);
    }

    #[test]
    fn test_content_comes_before_socials() {
        let html = render(&SiteConfig::default(), "<p>bio</p>");
        assert!(html.find("<p>bio</p>").unwrap() < html.find("socials").unwrap());
    }

    #[test]
    fn test_picture_honours_path_prefix() {
        let mut site = SiteConfig::default();
        site.build.path_prefix = "/blog".into();
        let html = render(&site, "");
        assert!(html.contains(r#"src="/blog/me.png""#));

        site.bio.picture = "https://cdn.example/me.png".into();
        let html = render(&site, "");
        assert!(html.contains(r#"src="https://cdn.example/me.png""#));
    }
}
