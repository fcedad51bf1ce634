//! Utility modules for the blog renderer.

pub mod date;
pub mod html;
pub mod log;
pub mod minify;
