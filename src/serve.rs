//! Local preview server.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │
//! │  (HTTP Server)  │     │  (File Monitor)  │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//!    Serve files             Rebuild on data /
//!                            config change
//!          └───────────┬───────────┘
//!                      ▼
//!              config.build.output
//! ```

use crate::{config::SiteConfig, log, watch::watch_for_changes_blocking};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

const NOT_FOUND: &str = "404 Not Found";

/// Serve the output directory until Ctrl+C, rebuilding on change when
/// `serve.watch` is on.
pub fn serve_site(config: &'static SiteConfig) -> Result<()> {
    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}{}/", addr, config.build.path_prefix);

    if config.serve.watch {
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking(config) {
                log!("watch"; "{err:#}");
            }
        });
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {e:#}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    match resolve_request_path(request.url(), config) {
        Some(path) => serve_file(request, &path),
        None => serve_not_found(request),
    }
}

/// Map a request URL onto a file of the output directory.
///
/// Resolution order: exact file, then `index.html` inside a directory.
/// The path prefix is stripped first, and anything escaping the output
/// root resolves to nothing.
fn resolve_request_path(url: &str, config: &SiteConfig) -> Option<PathBuf> {
    let decoded = urlencoding::decode(url).ok()?;
    let path = decoded.split(['?', '#']).next().unwrap_or_default();

    let prefix = config.build.path_prefix.as_str();
    let path = if prefix.is_empty() {
        path
    } else {
        let rest = path.strip_prefix(prefix)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        rest
    };

    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let local = config.build.output.join(relative);
    if local.is_file() {
        return Some(local);
    }

    let index = local.join("index.html");
    index.is_file().then_some(index)
}

fn content_type_header(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("Invalid header value `{value}`"))
}

fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content).with_header(content_type_header(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![content_type_header("text/plain; charset=utf-8")?],
        Cursor::new(NOT_FOUND),
        Some(NOT_FOUND.len()),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// Guess MIME content type from file extension.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(prefix: &str) -> (tempfile::TempDir, SiteConfig) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.build.output = dir.path().to_path_buf();
        config.build.path_prefix = prefix.to_owned();

        fs::create_dir_all(dir.path().join("fr/deux")).unwrap();
        fs::write(dir.path().join("index.html"), "root").unwrap();
        fs::write(dir.path().join("fr/deux/index.html"), "deux").unwrap();
        fs::write(dir.path().join("dark-mode.js"), "js").unwrap();
        (dir, config)
    }

    #[test]
    fn test_resolve_index_and_files() {
        let (dir, config) = setup("");
        let out = dir.path();

        assert_eq!(resolve_request_path("/", &config), Some(out.join("index.html")));
        assert_eq!(
            resolve_request_path("/fr/deux/", &config),
            Some(out.join("fr/deux/index.html"))
        );
        assert_eq!(
            resolve_request_path("/fr/deux", &config),
            Some(out.join("fr/deux/index.html"))
        );
        assert_eq!(
            resolve_request_path("/dark-mode.js?v=2", &config),
            Some(out.join("dark-mode.js"))
        );
        assert_eq!(resolve_request_path("/fr/", &config), None);
    }

    #[test]
    fn test_resolve_with_path_prefix() {
        let (dir, config) = setup("/blog");

        assert_eq!(
            resolve_request_path("/blog/fr/deux/", &config),
            Some(dir.path().join("fr/deux/index.html"))
        );
        assert_eq!(
            resolve_request_path("/blog", &config),
            Some(dir.path().join("index.html"))
        );
        assert_eq!(resolve_request_path("/fr/deux/", &config), None);
        assert_eq!(resolve_request_path("/blogger/", &config), None);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_dir, config) = setup("");
        assert_eq!(resolve_request_path("/../etc/passwd", &config), None);
        assert_eq!(resolve_request_path("/fr/%2e%2e/%2e%2e/secret", &config), None);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(
            guess_content_type(Path::new("dark-mode.js")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(guess_content_type(Path::new("me.png")), "image/png");
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }
}
