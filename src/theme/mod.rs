//! Dark-mode preference state machine.
//!
//! ```text
//!            enable / toggle
//!   ┌───────┐ ───────────────► ┌──────┐
//!   │ Light │                  │ Dark │
//!   └───────┘ ◄─────────────── └──────┘
//!            disable / toggle
//! ```
//!
//! Every transition is persisted to the [`PreferenceStore`] before the new
//! mode is reported. Applying the visual theme is up to the page (the
//! `dark-mode.js` client script mirrors these transitions in the browser).

mod store;

pub use store::{FileStore, MemoryStore, PreferenceError, PreferenceStore};

use std::fmt;

/// Visual theme of the site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keeps the persisted preference and the displayed mode in sync.
#[derive(Debug)]
pub struct DarkModeToggle<S: PreferenceStore> {
    store: S,
    mode: DisplayMode,
}

impl<S: PreferenceStore> DarkModeToggle<S> {
    /// Load the initial mode from the store; `Light` when nothing is stored.
    pub fn new(store: S) -> Result<Self, PreferenceError> {
        let mode = DisplayMode::from_dark(store.load()?.unwrap_or(false));
        Ok(Self { store, mode })
    }

    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn enable(&mut self) -> Result<DisplayMode, PreferenceError> {
        self.set(DisplayMode::Dark)
    }

    pub fn disable(&mut self) -> Result<DisplayMode, PreferenceError> {
        self.set(DisplayMode::Light)
    }

    pub fn toggle(&mut self) -> Result<DisplayMode, PreferenceError> {
        self.set(self.mode.flipped())
    }

    fn set(&mut self, mode: DisplayMode) -> Result<DisplayMode, PreferenceError> {
        self.store.save(mode.is_dark())?;
        self.mode = mode;
        Ok(mode)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
