//! File watcher for `serve`.
//!
//! Watches the site data file and the config file, batches their events and
//! re-runs the full build.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────────────────┐
//! │ notify   │───▶│ Debouncer│───▶│ handle_changes()         │
//! │ events   │    │ (300ms)  │    │  config? reload + build  │
//! └──────────┘    └──────────┘    │  data?   build           │
//!                                 └──────────────────────────┘
//! ```
//!
//! The data file is usually replaced wholesale by the upstream content layer,
//! so its parent directory is watched and events are filtered by path.

use crate::{build::build_site, config::SiteConfig, log};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::RecvTimeoutError,
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// What a changed path means for the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Change {
    Config,
    Data,
    Unrelated,
}

/// Files whose changes trigger a rebuild.
struct WatchedFiles {
    config: PathBuf,
    data: PathBuf,
}

impl WatchedFiles {
    fn new(config: &SiteConfig) -> Self {
        Self {
            config: normalize(&config.config_path),
            data: normalize(&config.build.data),
        }
    }

    fn classify(&self, path: &Path) -> Change {
        let path = normalize(path);
        if path == self.config {
            Change::Config
        } else if path == self.data {
            Change::Data
        } else {
            Change::Unrelated
        }
    }
}

/// Absolute form of a path, so notify's event paths compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        match (path.parent().and_then(|p| p.canonicalize().ok()), path.file_name()) {
            (Some(parent), Some(name)) => parent.join(name),
            _ => path.to_path_buf(),
        }
    })
}

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

/// Re-read the config file, keeping CLI overrides.
fn reload_config(current: &SiteConfig) -> Result<SiteConfig> {
    let mut config = SiteConfig::from_path(&current.config_path)?;
    if let Some(cli) = current.cli {
        config.update_with_cli(cli);
    }
    config.validate()?;
    Ok(config)
}

/// Rebuild after a batch of changes. Returns true if a build succeeded.
fn handle_changes(paths: &[PathBuf], files: &WatchedFiles, config: &mut SiteConfig) -> bool {
    let changes: FxHashSet<Change> = paths.iter().map(|p| files.classify(p)).collect();

    let reason = if changes.contains(&Change::Config) {
        match reload_config(config) {
            Ok(fresh) => *config = fresh,
            Err(e) => {
                log!("watch"; "config reload failed, keeping previous config");
                log!("watch"; "{e:#}");
                return false;
            }
        }
        "config changed"
    } else if changes.contains(&Change::Data) {
        "site data changed"
    } else {
        return false;
    };

    log!("watch"; "{reason}, rebuilding...");
    match build_site(config) {
        Ok(_) => true,
        Err(e) => {
            log!("watch"; "build failed");
            log!("watch"; "{e:#}");
            false
        }
    }
}

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let files = [&config.build.data, &config.config_path];
    let mut dirs = FxHashSet::default();

    for file in files {
        let dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if dirs.insert(normalize(&dir)) {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
        }
    }

    log!(
        "watch";
        "{}, {}",
        config.build.data.display(),
        config.config_path.display()
    );
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

/// Start blocking file watcher with debouncing and live rebuild.
pub fn watch_for_changes_blocking(config: &SiteConfig) -> Result<()> {
    let mut config = config.clone();
    let files = WatchedFiles::new(&config);

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, &config)?;

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), &files, &mut config) {
                    debouncer.mark_rebuild();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}
