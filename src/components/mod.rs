//! Presentational components.
//!
//! Every component writes straight into an [`HtmlWriter`]. None of them
//! owns state; the display mode is a snapshot taken from the
//! [`DarkModeToggle`](crate::theme::DarkModeToggle) before rendering starts.

mod bio;
mod language;
mod layout;
mod tags;
mod toggle;

pub use bio::render_bio;
pub use language::render_language_switcher;
pub use layout::render_layout;
pub use tags::render_tags;
pub use toggle::render_dark_mode_toggle;

use crate::{config::SiteConfig, theme::DisplayMode};

/// Inputs shared by every page of one build.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub site: &'a SiteConfig,
    /// Initial dark-mode state for the toggle control
    pub mode: DisplayMode,
}

impl<'a> RenderContext<'a> {
    pub const fn new(site: &'a SiteConfig, mode: DisplayMode) -> Self {
        Self { site, mode }
    }
}
