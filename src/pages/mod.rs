//! Top-level page templates.

mod document;
mod index;
mod post;

pub use document::{DARK_MODE_SCRIPT, DARK_MODE_SCRIPT_NAME};
pub use index::render_index_page;
pub use post::{PostOptions, render_post_page};
