//! Sitemap HTTP server.
//!
//! Serves exactly one resource: the published sitemap at its configured
//! name. Requests never trigger generation; a sitemap that has not been
//! built yet is a 404, and regeneration happens in the watcher thread.

mod lifecycle;
mod maintenance;
mod response;
mod watch;

pub use lifecycle::setup_shutdown_handler;

use std::fs;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use chrono::{DateTime, Utc};
use crossbeam::channel;
use tiny_http::{Method, Request};

use crate::build::run_build;
use crate::config::{NewsConfig, cfg};
use crate::genlog::read_last_update;
use crate::publish::DOCUMENT_CACHE;
use crate::{debug, log};

/// Run the serve command: initial build, then serve until Ctrl+C.
pub fn serve(config: &NewsConfig) -> Result<()> {
    // One build up front so the document exists; failure is not fatal,
    // the server answers 404 until a later rebuild succeeds.
    if let Err(e) = run_build(config) {
        log!("serve"; "initial build failed: {}", e);
    }

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}/{}", addr, config.build.sitemap_name);

    let mut workers = Vec::new();

    // Log retention runs in serve mode whether or not watching is on.
    let config_arc = cfg();
    workers.push(thread::spawn(move || {
        maintenance::run_maintenance(&config_arc)
    }));

    if config.serve.watch {
        let config_arc = cfg();
        workers.push(thread::spawn(move || {
            watch::watch_content(&config_arc, shutdown_rx)
        }));
    }

    for request in server.incoming_requests() {
        if lifecycle::is_shutdown() {
            let _ = response::respond_unavailable(request);
            continue;
        }
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {}", e);
        }
    }

    lifecycle::wait_for_shutdown(workers);
    Ok(())
}

/// Routing decision for one request.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Sitemap,
    MethodNotAllowed,
    NotFound,
}

/// The server owns exactly one resource, reachable via GET/HEAD.
fn route(method: &Method, url: &str, sitemap_name: &str) -> Route {
    if !matches!(method, Method::Get | Method::Head) {
        return Route::MethodNotAllowed;
    }

    let path = url.split('?').next().unwrap_or("");
    if path.trim_start_matches('/') == sitemap_name {
        Route::Sitemap
    } else {
        Route::NotFound
    }
}

/// Handle a single HTTP request.
fn handle_request(request: Request, config: &NewsConfig) -> Result<()> {
    match route(request.method(), request.url(), &config.build.sitemap_name) {
        Route::MethodNotAllowed => {
            debug!("serve"; "405: {} {}", request.method(), request.url());
            return response::respond_method_not_allowed(request);
        }
        Route::NotFound => {
            debug!("serve"; "404: {}", request.url());
            return response::respond_not_found(request);
        }
        Route::Sitemap => {}
    }

    let Some(body) = load_document(config) else {
        log!("warning"; "sitemap requested but never generated");
        return response::respond_not_found(request);
    };

    response::respond_sitemap(request, &body, last_modified(config), Utc::now())
}

/// Cache-first document lookup; a miss repopulates from disk.
fn load_document(config: &NewsConfig) -> Option<Arc<Vec<u8>>> {
    if let Some(bytes) = DOCUMENT_CACHE.get() {
        return Some(bytes);
    }

    let bytes = fs::read(config.sitemap_path()).ok()?;
    DOCUMENT_CACHE.store(bytes.clone());
    Some(Arc::new(bytes))
}

/// Publish instant for the Last-Modified header.
///
/// The last-update marker is authoritative; the file mtime covers
/// documents published by an older process.
fn last_modified(config: &NewsConfig) -> DateTime<Utc> {
    read_last_update(&config.state_dir())
        .or_else(|| {
            fs::metadata(config.sitemap_path())
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from)
        })
        .unwrap_or_else(Utc::now)
}
