//! Site configuration management.
//!
//! Handles loading, parsing, and validating the `bilingue.toml` configuration file.

use crate::{
    cli::{Cli, Commands},
    data::Language,
    utils::date::DateMode,
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub fn r#true() -> bool {
        true
    }

    pub mod base {
        pub fn author() -> String {
            "DCK".into()
        }
    }

    pub mod bio {
        use crate::config::SocialLink;

        pub fn picture() -> String {
            "/me.png".into()
        }
        pub fn links() -> Vec<SocialLink> {
            vec![
                SocialLink {
                    title: "Github link".into(),
                    href: "https://github.com/DCKT".into(),
                    icon: "github".into(),
                },
                SocialLink {
                    title: "Twitter link".into(),
                    href: "https://twitter.com/DCK__".into(),
                    icon: "twitter".into(),
                },
            ]
        }
    }

    pub mod build {
        use crate::data::Language;
        use std::path::PathBuf;

        pub fn root() -> Option<PathBuf> {
            None
        }
        pub fn data() -> PathBuf {
            "site.json".into()
        }
        pub fn output() -> PathBuf {
            "public".into()
        }
        pub fn language() -> Language {
            Language::En
        }
    }

    pub mod share {
        pub fn via() -> Option<String> {
            Some("DCK__".into())
        }
        pub fn script() -> String {
            "https://platform.twitter.com/widgets.js".into()
        }
    }

    pub mod theme {
        use std::path::PathBuf;

        pub fn preference() -> PathBuf {
            ".bilingue/preference.json".into()
        }
    }

    pub mod serve {
        pub fn interface() -> String {
            "127.0.0.1".into()
        }
        pub fn port() -> u16 {
            5277
        }
    }
}

/// `[base]` section in bilingue.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Author name, used as default picture alt text
    #[serde(default = "config_defaults::base::author")]
    #[educe(Default = config_defaults::base::author())]
    pub author: String,

    /// Absolute site URL, e.g.: "https://example.com"
    #[serde(default)]
    pub url: Option<String>,
}

/// One social link of the bio block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    /// Link title, e.g.: "Github link"
    pub title: String,
    pub href: String,
    /// Icon name, rendered as a `social-link--<icon>` class
    pub icon: String,
}

/// `[bio]` section in bilingue.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BioConfig {
    /// Profile picture path, e.g.: "/me.png"
    #[serde(default = "config_defaults::bio::picture")]
    #[educe(Default = config_defaults::bio::picture())]
    pub picture: String,

    /// Picture alt text, defaults to `base.author`
    #[serde(default)]
    pub alt: Option<String>,

    #[serde(default = "config_defaults::bio::links")]
    #[educe(Default = config_defaults::bio::links())]
    pub links: Vec<SocialLink>,
}

/// `[build.post]` section in bilingue.toml
#[derive(Debug, Clone, Copy, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PostConfig {
    /// Date display on post pages: "localized" or "raw"
    #[serde(default)]
    pub date: DateMode,

    /// Render the social-share action under each post
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub share: bool,
}

/// `[build]` section in bilingue.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory
    #[serde(default = "config_defaults::build::root")]
    #[educe(Default = config_defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Resolved site data file
    #[serde(default = "config_defaults::build::data")]
    #[educe(Default = config_defaults::build::data())]
    pub data: PathBuf,

    /// Output directory
    #[serde(default = "config_defaults::build::output")]
    #[educe(Default = config_defaults::build::output())]
    pub output: PathBuf,

    /// Prefix for every internal link, e.g.: "/blog"
    #[serde(default)]
    pub path_prefix: String,

    /// Language whose index is also rendered at `/`
    #[serde(default = "config_defaults::build::language")]
    #[educe(Default = config_defaults::build::language())]
    pub default_language: Language,

    /// Minify the html content
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clean output directory completely before building
    #[serde(default)]
    pub clean: bool,

    #[serde(default)]
    pub post: PostConfig,
}

/// `[share]` section in bilingue.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ShareConfig {
    /// Twitter handle credited by the share link
    #[serde(default = "config_defaults::share::via")]
    #[educe(Default = config_defaults::share::via())]
    pub via: Option<String>,

    /// Widget script, loaded asynchronously
    #[serde(default = "config_defaults::share::script")]
    #[educe(Default = config_defaults::share::script())]
    pub script: String,
}

/// `[theme]` section in bilingue.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// File persisting the dark-mode preference
    #[serde(default = "config_defaults::theme::preference")]
    #[educe(Default = config_defaults::theme::preference())]
    pub preference: PathBuf,
}

/// `[serve]` section in bilingue.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Interface to bind on
    #[serde(default = "config_defaults::serve::interface")]
    #[educe(Default = config_defaults::serve::interface())]
    pub interface: String,

    /// Port to listen on
    #[serde(default = "config_defaults::serve::port")]
    #[educe(Default = config_defaults::serve::port())]
    pub port: u16,

    /// Rebuild when the data or config file changes
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub watch: bool,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the loaded config file
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    #[serde(default)]
    pub base: BaseConfig,

    #[serde(default)]
    pub bio: BioConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Alt text of the bio picture
    pub fn picture_alt(&self) -> &str {
        self.bio.alt.as_deref().unwrap_or(&self.base.author)
    }

    /// Internal link for a site-relative path, with `path_prefix` applied
    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.build.path_prefix, path)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        self.update_path_with_root(&root, cli);

        if let Some(args) = cli.build_args() {
            self.build.clean |= args.clean;
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
        }

        if let Commands::Serve {
            interface,
            port,
            watch,
            ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        self.set_root(root);
        Self::update_option(&mut self.build.data, cli.data.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        self.config_path = root.join(&cli.config);
        self.build.data = root.join(&self.build.data);
        self.build.output = root.join(&self.build.output);
        self.theme.preference = root.join(&self.theme.preference);
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.build.path_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            bail!(ConfigError::Validation(
                "[build.path_prefix] must start with `/` and must not end with `/`".into()
            ));
        }

        if let Some(url) = &self.base.url
            && !url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.build.post.share && self.share.script.is_empty() {
            bail!(ConfigError::Validation(
                "[build.post.share] = true requires [share.script] to be set".into()
            ));
        }

        let needs_data = self.cli.is_none_or(|cli| !cli.is_mode());
        if needs_data && !self.build.data.is_file() {
            bail!(ConfigError::Validation(format!(
                "[build.data] not found: {}",
                self.build.data.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn leak_cli(args: &[&str]) -> &'static Cli {
        Box::leak(Box::new(Cli::parse_from(args)))
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_str("").unwrap();

        assert_eq!(config.base.author, "DCK");
        assert_eq!(config.base.url, None);
        assert_eq!(config.bio.picture, "/me.png");
        assert_eq!(config.bio.links.len(), 2);
        assert_eq!(config.build.data, PathBuf::from("site.json"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.path_prefix, "");
        assert_eq!(config.build.default_language, Language::En);
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert_eq!(config.build.post.date, DateMode::Localized);
        assert!(config.build.post.share);
        assert_eq!(config.serve.interface, "127.0.0.1");
        assert_eq!(config.serve.port, 5277);
        assert!(config.serve.watch);
    }

    #[test]
    fn test_struct_default_matches_serde_default() {
        let parsed = SiteConfig::from_str("").unwrap();
        let default = SiteConfig::default();

        assert_eq!(parsed.base.author, default.base.author);
        assert_eq!(parsed.bio.links, default.bio.links);
        assert_eq!(parsed.build.minify, default.build.minify);
        assert_eq!(parsed.build.post.share, default.build.post.share);
        assert_eq!(parsed.share.script, default.share.script);
        assert_eq!(parsed.theme.preference, default.theme.preference);
        assert_eq!(parsed.serve.port, default.serve.port);
    }

    #[test]
    fn test_full_config() {
        let config = r#"
            [base]
            author = "Alice"
            url = "https://alice.dev"

            [bio]
            picture = "/alice.jpg"
            links = [{ title = "Mastodon", href = "https://m.example/@alice", icon = "mastodon" }]

            [build]
            data = "resolved.json"
            path_prefix = "/blog"
            default_language = "fr"
            minify = false

            [build.post]
            date = "raw"
            share = false

            [share]
            via = "alice"

            [theme]
            preference = "prefs.json"
        "#;
        let config = SiteConfig::from_str(config).unwrap();

        assert_eq!(config.base.url.as_deref(), Some("https://alice.dev"));
        assert_eq!(config.picture_alt(), "Alice");
        assert_eq!(config.bio.links[0].icon, "mastodon");
        assert_eq!(config.build.data, PathBuf::from("resolved.json"));
        assert_eq!(config.build.default_language, Language::Fr);
        assert!(!config.build.minify);
        assert_eq!(config.build.post.date, DateMode::Raw);
        assert!(!config.build.post.share);
        assert_eq!(config.share.via.as_deref(), Some("alice"));
        assert_eq!(config.href("/fr/"), "/blog/fr/");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let err = SiteConfig::from_str("[build]\nunknown_field = 1\n");
        assert!(err.is_err());

        let err = SiteConfig::from_str("[bio]\nname = \"x\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_date_mode_rejected() {
        assert!(SiteConfig::from_str("[build.post]\ndate = \"iso\"\n").is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/bilingue.toml")).unwrap_err();
        let err = err.downcast::<ConfigError>().unwrap();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_update_with_cli_resolves_paths() {
        let cli = leak_cli(&["bilingue", "-r", "/site", "-o", "dist", "build", "--clean"]);
        let mut config = SiteConfig::default();
        config.update_with_cli(cli);

        assert_eq!(config.get_root(), Path::new("/site"));
        assert_eq!(config.build.output, PathBuf::from("/site/dist"));
        assert_eq!(config.build.data, PathBuf::from("/site/site.json"));
        assert_eq!(config.config_path, PathBuf::from("/site/bilingue.toml"));
        assert_eq!(
            config.theme.preference,
            PathBuf::from("/site/.bilingue/preference.json")
        );
        assert!(config.build.clean);
    }

    #[test]
    fn test_update_with_cli_serve_overrides() {
        let cli = leak_cli(&["bilingue", "serve", "-p", "9000", "-w", "false", "-m", "false"]);
        let mut config = SiteConfig::default();
        config.update_with_cli(cli);

        assert_eq!(config.serve.port, 9000);
        assert!(!config.serve.watch);
        assert!(!config.build.minify);
    }

    #[test]
    fn test_validate_path_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("site.json");
        fs::write(&data, "{}").unwrap();

        let mut config = SiteConfig::default();
        config.build.data = data;
        assert!(config.validate().is_ok());

        config.build.path_prefix = "/blog".into();
        assert!(config.validate().is_ok());

        config.build.path_prefix = "blog".into();
        assert!(config.validate().is_err());

        config.build.path_prefix = "/blog/".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_missing_data_file() {
        let mut config = SiteConfig::default();
        config.build.data = PathBuf::from("/nonexistent/site.json");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[build.data]"));

        // `mode` never reads site data
        let cli = leak_cli(&["bilingue", "mode", "show"]);
        config.cli = Some(cli);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = SiteConfig::default();
        config.cli = Some(leak_cli(&["bilingue", "mode"]));
        config.base.url = Some("alice.dev".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("test.toml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("test.toml"));

        let validation_err = ConfigError::Validation("Test validation error".to_string());
        assert!(format!("{validation_err}").contains("Test validation error"));
    }
}
