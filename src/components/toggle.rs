//! Three-part dark-mode control: sun button, checkbox, moon button.

use crate::{
    theme::DisplayMode,
    utils::html::{HtmlWriter, write_empty_elem, write_end, write_start, write_text_element},
};
use anyhow::Result;

/// Checkbox id shared with the client script
pub const CHECKBOX_ID: &str = "dmcheck";

/// Write the control with the checkbox reflecting `mode`.
///
/// The buttons carry `data-dark-mode` actions that `dark-mode.js` binds to.
pub fn render_dark_mode_toggle(writer: &mut HtmlWriter, mode: DisplayMode) -> Result<()> {
    write_start(
        writer,
        "div",
        &[("class", "dark-mode-toggle"), ("data-initial", mode.as_str())],
    )?;

    write_text_element(
        writer,
        "button",
        &[("type", "button"), ("data-dark-mode", "disable"), ("title", "Light mode")],
        "☀",
    )?;

    write_start(writer, "span", &[("class", "toggle-control")])?;
    let mut attrs = vec![
        ("class", "dmcheck"),
        ("type", "checkbox"),
        ("id", CHECKBOX_ID),
        ("data-dark-mode", "toggle"),
    ];
    if mode.is_dark() {
        attrs.push(("checked", ""));
    }
    write_empty_elem(writer, "input", &attrs)?;
    write_start(writer, "label", &[("for", CHECKBOX_ID)])?;
    write_end(writer, "label")?;
    write_end(writer, "span")?;

    write_text_element(
        writer,
        "button",
        &[("type", "button"), ("data-dark-mode", "enable"), ("title", "Dark mode")],
        "☾",
    )?;

    write_end(writer, "div")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        theme::{DarkModeToggle, MemoryStore},
        utils::html::{finish, html_writer},
    };

    fn render(mode: DisplayMode) -> String {
        let mut writer = html_writer();
        render_dark_mode_toggle(&mut writer, mode).unwrap();
        finish(writer).unwrap()
    }

    #[test]
    fn test_light_mode_is_unchecked() {
        let html = render(DisplayMode::Light);
        assert!(!html.contains("checked"));
        assert!(html.contains(r#"data-initial="light""#));
    }

    #[test]
    fn test_checkbox_follows_toggle() {
        let mut toggle = DarkModeToggle::new(MemoryStore::new(Some(false))).unwrap();
        toggle.toggle().unwrap();

        let html = render(toggle.mode());
        assert!(html.contains(r#"checked="""#));
        assert!(html.contains(r#"data-initial="dark""#));

        toggle.toggle().unwrap();
        assert!(!render(toggle.mode()).contains("checked"));
    }

    #[test]
    fn test_three_parts_in_order() {
        let html = render(DisplayMode::Light);
        let sun = html.find("☀").unwrap();
        let check = html.find("checkbox").unwrap();
        let moon = html.find("☾").unwrap();
        assert!(sun < check && check < moon);
        assert!(html.contains(r#"<label for="dmcheck"></label>"#));
    }
}
