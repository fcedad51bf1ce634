//! Site building orchestration.
//!
//! ```text
//! build_site()
//!     │
//!     ├── SiteData::from_path() + validate()
//!     │
//!     ├── DarkModeToggle::new(FileStore) ──► initial display mode
//!     │
//!     ├── plan_pages()
//!     │       ├── one index page per language tree
//!     │       ├── one page per post
//!     │       └── default-language index copy at `/` (when no tree owns it)
//!     │
//!     ├── render + minify + write, in parallel (rayon)
//!     │
//!     └── dark-mode.js ──► output root
//! ```

use crate::{
    components::RenderContext,
    config::SiteConfig,
    data::{LanguageTree, PageConfig, PostEntry, PostSummary, SiteData},
    log,
    pages::{DARK_MODE_SCRIPT, DARK_MODE_SCRIPT_NAME, PostOptions, render_index_page, render_post_page},
    theme::{DarkModeToggle, FileStore},
    utils::{
        html::{finish, html_writer},
        log::ProgressBars,
        minify::minify_html,
    },
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

/// What a planned page renders
enum PageKind<'a> {
    Index(&'a [PostSummary]),
    Post(&'a PostEntry),
}

/// One output page
struct PageJob<'a> {
    /// Directory under the output root, without slashes
    rel_dir: String,
    /// Path the page is served at, used for the header decision
    current_path: String,
    config: &'a PageConfig,
    kind: PageKind<'a>,
}

impl PageJob<'_> {
    fn render(&self, ctx: &RenderContext<'_>, options: PostOptions) -> Result<String> {
        let mut writer = html_writer();
        match self.kind {
            PageKind::Index(summaries) => {
                render_index_page(&mut writer, ctx, &self.current_path, self.config, summaries)?
            }
            PageKind::Post(entry) => render_post_page(&mut writer, ctx, options, self.config, entry)?,
        }
        finish(writer)
    }

    fn output_file(&self, output: &Path) -> PathBuf {
        output.join(&self.rel_dir).join("index.html")
    }
}

/// Build the entire site into `config.build.output`.
///
/// Returns the number of pages written.
pub fn build_site(config: &SiteConfig) -> Result<usize> {
    let output = &config.build.output;

    let data = SiteData::from_path(&config.build.data)?;
    data.validate()?;

    let toggle = DarkModeToggle::new(FileStore::new(&config.theme.preference))
        .context("Failed to read dark-mode preference")?;
    let ctx = RenderContext::new(config, toggle.mode());
    let options = PostOptions::from_config(config);

    prepare_output(output, config.build.clean)?;

    let jobs = plan_pages(config, &data);
    log!("build"; "rendering {} pages", jobs.len());

    let progress = ProgressBars::new(&[("pages", jobs.len())]);
    let has_error = AtomicBool::new(false);

    let result = jobs.par_iter().try_for_each(|job| {
        if has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }
        if let Err(e) = write_page(job, &ctx, options, config) {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {:#}", job.current_path, e);
            }
            return Err(anyhow!("Build failed"));
        }
        progress.inc(0);
        Ok(())
    });
    progress.finish();
    result?;

    let script = output.join(DARK_MODE_SCRIPT_NAME);
    fs::write(&script, DARK_MODE_SCRIPT)
        .with_context(|| format!("Failed to write {}", script.display()))?;

    log!("build"; "done, {} pages ({} mode)", jobs.len(), ctx.mode);
    Ok(jobs.len())
}

/// Create the output directory, clearing it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// List every page of the site, indexes first.
fn plan_pages<'a>(config: &SiteConfig, data: &'a SiteData) -> Vec<PageJob<'a>> {
    let mut jobs = Vec::with_capacity(data.page_count() + 1);

    for tree in &data.languages {
        jobs.push(index_job(config, tree, tree.config.slug.rel_dir().to_owned(), None));
    }

    if !data.has_root_page()
        && let Some(tree) = data
            .tree(config.build.default_language)
            .or_else(|| data.languages.first())
    {
        jobs.push(index_job(config, tree, String::new(), Some("/".to_owned())));
    }

    for tree in &data.languages {
        for entry in &tree.posts {
            jobs.push(PageJob {
                rel_dir: entry.post.slug.rel_dir().to_owned(),
                current_path: config.href(entry.post.slug.as_str()),
                config: &tree.config,
                kind: PageKind::Post(entry),
            });
        }
    }

    jobs
}

fn index_job<'a>(
    config: &SiteConfig,
    tree: &'a LanguageTree,
    rel_dir: String,
    current_path: Option<String>,
) -> PageJob<'a> {
    PageJob {
        rel_dir,
        current_path: current_path.unwrap_or_else(|| config.href(tree.config.slug.as_str())),
        config: &tree.config,
        kind: PageKind::Index(&tree.summaries),
    }
}

fn write_page(
    job: &PageJob<'_>,
    ctx: &RenderContext<'_>,
    options: PostOptions,
    config: &SiteConfig,
) -> Result<()> {
    let html = job.render(ctx, options)?;
    let html = minify_html(html.as_bytes(), config);

    let path = job.output_file(&config.build.output);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &*html).with_context(|| format!("Failed to write {}", path.display()))
}
