//! Static site server.
//!
//! Serves bug-detail pages at `/bugs/<id>` (and `/bug/<id>`) next to the
//! static assets they reference. Each page request runs on its own worker
//! thread: it mounts a fresh view, drives it until the bug list arrives,
//! renders it in link mode and unmounts it. Health checks and static files
//! are answered on the accept thread, so a slow bug list never holds them
//! up. Runs a `tiny_http` server on a background thread; shutdown waits for
//! in-flight pages, each bounded by the settle timeout.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bv_common::BugId;
use bv_render::{DirProbe, InteractionMode, PageGenerator, RenderConfig};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::fetch::BugSource;
use crate::host::{NoopNavigator, ViewHost};
use crate::logging::{event_names, Stage};
use crate::view::{Msg, Phase};

/// Errors starting the server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to start server on {addr}: {message}")]
    Bind { addr: SocketAddr, message: String },

    #[error("failed to spawn server thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Server settings.
#[derive(Clone)]
pub struct ServeOptions {
    pub addr: SocketAddr,
    /// Static-asset root.
    pub root: PathBuf,
    pub source: Arc<dyn BugSource>,
    /// Page settings; the interaction mode is always forced to links.
    pub render: RenderConfig,
    /// Longest a page request waits for the bug list.
    pub settle_timeout: Duration,
}

/// A parsed request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Health,
    Bug { id: BugId, image: Option<String> },
    Static(String),
    MethodNotAllowed,
    NotFound,
}

impl Route {
    /// Route a request line.
    pub fn parse(method: &tiny_http::Method, url: &str) -> Route {
        if *method != tiny_http::Method::Get {
            return Route::MethodNotAllowed;
        }
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };

        if path == "/health" || path == "/healthz" {
            return Route::Health;
        }

        let bug_segment = path
            .strip_prefix("/bugs/")
            .or_else(|| path.strip_prefix("/bug/"));
        if let Some(segment) = bug_segment {
            let segment = segment.trim_end_matches('/');
            if segment.is_empty() || segment.contains('/') {
                return Route::NotFound;
            }
            return match urlencoding::decode(segment) {
                Ok(id) => Route::Bug {
                    id: BugId::new(id.into_owned()),
                    image: query.and_then(image_param),
                },
                Err(_) => Route::NotFound,
            };
        }

        match urlencoding::decode(path) {
            Ok(decoded) => Route::Static(decoded.into_owned()),
            Err(_) => Route::NotFound,
        }
    }
}

/// Value of the `image` query parameter.
fn image_param(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "image")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Content type by file extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Most bug pages rendered at once; further page requests get 503.
const MAX_PAGE_WORKERS: usize = 64;

struct ServeContext {
    source: Arc<dyn BugSource>,
    generator: PageGenerator,
    probe: DirProbe,
    settle_timeout: Duration,
}

/// Handle to the running server.
pub struct BugServer {
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    addr: SocketAddr,
}

impl BugServer {
    /// Start the server on a background thread.
    pub fn start(options: ServeOptions) -> Result<Self, ServeError> {
        let server = tiny_http::Server::http(options.addr).map_err(|e| ServeError::Bind {
            addr: options.addr,
            message: e.to_string(),
        })?;
        let addr = server.server_addr().to_ip().unwrap_or(options.addr);

        let probe = Arc::new(DirProbe::new(&options.root));
        let generator = PageGenerator::new(
            options
                .render
                .clone()
                .with_interaction(InteractionMode::Links),
        )
        .with_probe(probe);
        let context = Arc::new(ServeContext {
            source: options.source.clone(),
            generator,
            probe: DirProbe::new(&options.root),
            settle_timeout: options.settle_timeout,
        });

        info!(
            event = event_names::SERVE_STARTED,
            addr = %addr,
            root = %options.root.display(),
            source = %options.source.describe(),
            "server started"
        );

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let thread = thread::Builder::new()
            .name("bv-serve".to_string())
            .spawn(move || serve_loop(server, &context, &shutdown_clone))?;

        Ok(Self {
            shutdown,
            thread: Some(thread),
            addr,
        })
    }

    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the server thread exits.
    pub fn wait(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    /// Shut down the server.
    pub fn shutdown(mut self) {
        self.stop();
        info!(event = event_names::SERVE_STOPPED, "server stopped");
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Unblock the accept loop
        let _ = std::net::TcpStream::connect(self.addr);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for BugServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Main serve loop: accept requests until shutdown.
fn serve_loop(server: tiny_http::Server, context: &Arc<ServeContext>, shutdown: &AtomicBool) {
    let mut workers: Vec<thread::JoinHandle<()>> = Vec::new();
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        // Accept with timeout so we can check shutdown flag
        let request = match server.recv_timeout(Duration::from_secs(1)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(e) => {
                if !shutdown.load(Ordering::SeqCst) {
                    error!(error = %e, "server accept error");
                }
                break;
            }
        };

        if shutdown.load(Ordering::SeqCst) {
            respond(request, 503, "text/plain; charset=utf-8", b"shutting down".to_vec());
            break;
        }

        dispatch(request, context, &mut workers);
    }

    for worker in workers {
        let _ = worker.join();
    }
}

/// Hand bug pages to a worker thread and answer everything else inline.
fn dispatch(
    request: tiny_http::Request,
    context: &Arc<ServeContext>,
    workers: &mut Vec<thread::JoinHandle<()>>,
) {
    let url = request.url().to_string();
    let route = Route::parse(request.method(), &url);
    debug!(
        event = event_names::SERVE_REQUEST,
        stage = %Stage::Serve,
        method = %request.method(),
        url = %url,
        "request"
    );

    let Route::Bug { id, image } = route else {
        handle(request, route, context);
        return;
    };

    workers.retain(|worker| !worker.is_finished());
    if workers.len() >= MAX_PAGE_WORKERS {
        warn!(in_flight = workers.len(), "page workers exhausted");
        respond(request, 503, "text/plain; charset=utf-8", b"busy".to_vec());
        return;
    }

    let context = Arc::clone(context);
    let spawned = thread::Builder::new()
        .name("bv-serve-page".to_string())
        .spawn(move || {
            let (status, body) = render_bug_page(&context, id, image);
            respond(request, status, "text/html; charset=utf-8", body.into_bytes());
        });
    match spawned {
        Ok(worker) => workers.push(worker),
        // The request is dropped with the closure and answers 500
        Err(e) => error!(error = %e, "failed to spawn page worker"),
    }
}

fn handle(request: tiny_http::Request, route: Route, context: &ServeContext) {
    match route {
        Route::Health => respond(request, 200, "text/plain; charset=utf-8", b"ok".to_vec()),
        Route::MethodNotAllowed => respond(
            request,
            405,
            "text/plain; charset=utf-8",
            b"method not allowed".to_vec(),
        ),
        Route::NotFound => not_found(request),
        Route::Bug { id, image } => {
            let (status, body) = render_bug_page(context, id, image);
            respond(request, status, "text/html; charset=utf-8", body.into_bytes());
        }
        Route::Static(path) => match context.probe.resolve(&path) {
            Some(file) if file.is_file() => match std::fs::read(&file) {
                Ok(bytes) => respond(request, 200, content_type(&file), bytes),
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "failed to read static file");
                    respond(
                        request,
                        500,
                        "text/plain; charset=utf-8",
                        b"internal error".to_vec(),
                    );
                }
            },
            _ => not_found(request),
        },
    }
}

/// Mount a view for `id`, settle it and render. Returns status and body.
fn render_bug_page(context: &ServeContext, id: BugId, image: Option<String>) -> (u16, String) {
    let mut host = ViewHost::new(context.source.clone(), NoopNavigator);
    host.mount(id);
    let settled = host.wait_settled(Some(Instant::now() + context.settle_timeout));
    if let Some(path) = image {
        host.dispatch(Msg::OpenImage(path));
    }

    let status = match host.view().phase() {
        Phase::Ready(_) => 200,
        Phase::Failed { error, .. } if error.is_not_found() => 404,
        Phase::Failed { .. } => 502,
        Phase::Loading if !settled => 504,
        Phase::Loading => 500,
    };

    let body = match host.render(&context.generator) {
        Ok(page) => page.html,
        Err(e) => {
            error!(error = %e, "failed to render page");
            host.unmount();
            return (500, "internal error".to_string());
        }
    };
    host.unmount();
    (status, body)
}

fn not_found(request: tiny_http::Request) {
    respond(request, 404, "text/plain; charset=utf-8", b"not found".to_vec());
}

fn respond(request: tiny_http::Request, status: u16, content_type: &str, body: Vec<u8>) {
    let mut response = tiny_http::Response::from_data(body).with_status_code(status);
    if let Ok(header) = tiny_http::Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
    {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        warn!(error = %e, "failed to send response");
    }
}
