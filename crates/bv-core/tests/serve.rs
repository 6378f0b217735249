//! Static server tests: start on an ephemeral port and request pages.
//!
//! Also drives the view host against a real HTTP origin, end to end.

use bv_common::{parse_bug_list, BugId, BugList};
use bv_core::fetch::{source_from_location, BugSource, HttpSource, LoadError, GENERIC_LOAD_FAILURE};
use bv_core::host::{NoopNavigator, ViewHost};
use bv_core::serve::{BugServer, ServeOptions};
use bv_render::{PageGenerator, RenderConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const BUGS: &str = r#"[
  {"id": "1", "title": "Login <crash>", "images": ["shots/one.png"]},
  {"id": "a b", "title": "Spaced"}
]"#;

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Bug.json"), BUGS).unwrap();
    std::fs::create_dir(dir.path().join("shots")).unwrap();
    std::fs::write(dir.path().join("shots/one.png"), b"\x89PNG").unwrap();
    dir
}

fn start(dir: &TempDir, source: Arc<dyn BugSource>, settle: Duration) -> BugServer {
    BugServer::start(ServeOptions {
        addr: "127.0.0.1:0".parse().unwrap(),
        root: dir.path().to_path_buf(),
        source,
        render: RenderConfig::default(),
        settle_timeout: settle,
    })
    .unwrap()
}

/// GET returning status and body for any status code.
fn get(server: &BugServer, path: &str) -> (u16, String, String) {
    let url = format!("http://{}{}", server.addr(), path);
    let response = match ureq::get(&url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(e) => panic!("request to {} failed: {}", url, e),
    };
    let status = response.status();
    let content_type = response.content_type().to_string();
    let body = response.into_string().unwrap();
    (status, content_type, body)
}

#[test]
fn serves_loaded_bug_page() {
    let dir = site();
    let server = start(
        &dir,
        source_from_location(dir.path().to_str().unwrap(), None),
        Duration::from_secs(5),
    );

    let (status, content_type, body) = get(&server, "/bugs/1");
    assert_eq!(status, 200);
    assert_eq!(content_type, "text/html");
    assert!(body.contains("Login &lt;crash&gt;"));
    // Served pages use links instead of the lightbox script
    assert!(body.contains("href=\"?image=%2Fshots%2Fone.png\""));

    server.shutdown();
}

#[test]
fn decodes_ids_and_opens_image() {
    let dir = site();
    let server = start(
        &dir,
        source_from_location(dir.path().to_str().unwrap(), None),
        Duration::from_secs(5),
    );

    let (status, _, body) = get(&server, "/bug/a%20b");
    assert_eq!(status, 200);
    assert!(body.contains("Spaced"));

    let (status, _, body) = get(&server, "/bugs/1?image=%2Fshots%2Fone.png");
    assert_eq!(status, 200);
    assert!(body.contains("Close image modal"));

    server.shutdown();
}

#[test]
fn not_found_and_failures_keep_page_body() {
    let dir = site();
    let server = start(
        &dir,
        source_from_location(dir.path().to_str().unwrap(), None),
        Duration::from_secs(5),
    );
    let (status, _, body) = get(&server, "/bugs/404");
    assert_eq!(status, 404);
    assert!(body.contains("Bug with ID 404 not found"));
    server.shutdown();

    let empty = tempfile::tempdir().unwrap();
    let server = start(
        &empty,
        source_from_location(empty.path().to_str().unwrap(), None),
        Duration::from_secs(5),
    );
    let (status, _, body) = get(&server, "/bugs/1");
    assert_eq!(status, 502);
    assert!(body.contains("Failed to load bug details. Please try again later."));
    server.shutdown();
}

#[test]
fn serves_static_files_inside_root_only() {
    let dir = site();
    let server = start(
        &dir,
        source_from_location(dir.path().to_str().unwrap(), None),
        Duration::from_secs(5),
    );

    let (status, content_type, _) = get(&server, "/shots/one.png");
    assert_eq!(status, 200);
    assert_eq!(content_type, "image/png");

    let (status, content_type, body) = get(&server, "/Bug.json");
    assert_eq!(status, 200);
    assert_eq!(content_type, "application/json");
    assert!(body.contains("Spaced"));

    let (status, _, _) = get(&server, "/../Cargo.toml");
    assert_eq!(status, 404);
    let (status, _, _) = get(&server, "/missing.png");
    assert_eq!(status, 404);

    server.shutdown();
}

#[test]
fn health_and_methods() {
    let dir = site();
    let server = start(
        &dir,
        source_from_location(dir.path().to_str().unwrap(), None),
        Duration::from_secs(5),
    );

    let (status, _, body) = get(&server, "/health");
    assert_eq!(status, 200);
    assert_eq!(body, "ok");

    let url = format!("http://{}/bugs/1", server.addr());
    match ureq::post(&url).call() {
        Err(ureq::Error::Status(code, _)) => assert_eq!(code, 405),
        other => panic!("expected 405, got {:?}", other.map(|r| r.status())),
    }

    server.shutdown();
}

/// Source that takes `delay` to answer, flagging when a fetch has begun.
struct SlowSource {
    delay: Duration,
    started: AtomicBool,
}

impl BugSource for SlowSource {
    fn fetch_list(&self) -> Result<BugList, LoadError> {
        self.started.store(true, Ordering::SeqCst);
        thread::sleep(self.delay);
        Ok(parse_bug_list(BUGS)?)
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

#[test]
fn health_answers_while_page_is_pending() {
    let dir = site();
    let source = Arc::new(SlowSource {
        delay: Duration::from_secs(2),
        started: AtomicBool::new(false),
    });
    let server = start(&dir, source.clone(), Duration::from_secs(3));
    let page_url = format!("http://{}/bugs/1", server.addr());
    let page = thread::spawn(move || {
        ureq::get(&page_url)
            .call()
            .map(|r| r.status())
            .map_err(|e| e.to_string())
    });

    let end = Instant::now() + Duration::from_secs(5);
    while !source.started.load(Ordering::SeqCst) && Instant::now() < end {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(source.started.load(Ordering::SeqCst));

    let asked = Instant::now();
    let (status, _, body) = get(&server, "/health");
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
    assert!(asked.elapsed() < Duration::from_secs(1), "{:?}", asked.elapsed());

    let (status, _, _) = get(&server, "/shots/one.png");
    assert_eq!(status, 200);
    assert!(asked.elapsed() < Duration::from_secs(1));

    assert_eq!(page.join().unwrap().unwrap(), 200);
    server.shutdown();
}

// ============================================================================
// View host against an HTTP origin
// ============================================================================

/// Answer one `GET /Bug.json` with `status` and `body` on an ephemeral port.
fn one_shot(status: u16, body: &'static str) -> (String, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        assert_eq!(request.url(), "/Bug.json");
        let response = tiny_http::Response::from_string(body).with_status_code(status);
        request.respond(response).unwrap();
    });
    (format!("http://{}", addr), handle)
}

fn load_over_http(base: String, id: &str) -> ViewHost<HttpSource, NoopNavigator> {
    let source = Arc::new(HttpSource::new(base, Some(Duration::from_secs(5))));
    let mut host = ViewHost::new(source, NoopNavigator);
    host.mount(BugId::new(id));
    assert!(host.wait_settled(Some(Instant::now() + Duration::from_secs(5))));
    host
}

#[test]
fn minimal_bug_renders_title_and_both_empty_notices() {
    let (base, upstream) = one_shot(200, r#"[{"id":"1","title":"T"}]"#);
    let mut host = load_over_http(base, "1");
    upstream.join().unwrap();

    assert_eq!(host.view().snapshot().unwrap().title(), Some("T"));
    let html = host.render(&PageGenerator::default_config()).unwrap().html;
    assert!(html.contains(r#"<h1 class="bv-title text-5xl font-bold mb-4">T</h1>"#));
    assert!(html.contains("No project screenshots available."));
    assert!(html.contains("No contributors listed."));
    assert!(!html.contains("Project Screenshots</h2>"));
    assert!(!html.contains("Contributors</h2>"));
}

#[test]
fn server_error_renders_generic_message() {
    let (base, upstream) = one_shot(500, "boom");
    let mut host = load_over_http(base, "1");
    upstream.join().unwrap();

    assert_eq!(host.view().error(), Some(&LoadError::Status(500)));
    assert!(host.view().snapshot().is_none());
    let html = host.render(&PageGenerator::default_config()).unwrap().html;
    assert!(html.contains(GENERIC_LOAD_FAILURE));
    assert!(!html.contains("history.back()"));
}
