//! HTTP bug list source.

use std::time::Duration;

use bv_common::{parse_bug_list, BugList, RESOURCE_PATH};
use tracing::debug;

use super::{BugSource, LoadError};

/// Fetches `<base_url>/Bug.json` with a blocking `ureq` agent.
pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    /// Create a source for `base_url`. Without a timeout a hung request
    /// blocks until the peer gives up.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: base_url.into(),
            agent: builder.build(),
        }
    }

    /// Full URL of the bug list.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), RESOURCE_PATH)
    }
}

impl BugSource for HttpSource {
    fn fetch_list(&self) -> Result<BugList, LoadError> {
        let url = self.url();
        debug!(url = %url, "fetching bug list");
        match self.agent.get(&url).call() {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| LoadError::Transport(e.to_string()))?;
                Ok(parse_bug_list(&body)?)
            }
            Err(ureq::Error::Status(code, _)) => Err(LoadError::Status(code)),
            Err(ureq::Error::Transport(err)) => Err(LoadError::Transport(err.to_string())),
        }
    }

    fn describe(&self) -> String {
        self.url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Serve one request with `status` and `body`, returning the base URL.
    fn one_shot(status: u16, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let _ = request
                    .respond(tiny_http::Response::from_string(body).with_status_code(status));
            }
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_url_joins_resource_path() {
        let source = HttpSource::new("https://bugs.example.com/", None);
        assert_eq!(source.url(), "https://bugs.example.com/Bug.json");
    }

    #[test]
    fn test_fetch_success() {
        let (base, handle) = one_shot(200, r#"[{"id":"1","title":"T"}]"#);
        let list = HttpSource::new(base, None).fetch_list().unwrap();
        handle.join().unwrap();
        assert_eq!(list.len(), 1);
        let record = list.find(&bv_common::BugId::new("1")).unwrap().unwrap();
        assert_eq!(record.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_fetch_status_error() {
        let (base, handle) = one_shot(500, "boom");
        let err = HttpSource::new(base, None).fetch_list().unwrap_err();
        handle.join().unwrap();
        assert_eq!(err, LoadError::Status(500));
    }

    #[test]
    fn test_fetch_malformed_body() {
        let (base, handle) = one_shot(200, "<html>not json</html>");
        let err = HttpSource::new(base, None).fetch_list().unwrap_err();
        handle.join().unwrap();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn test_fetch_transport_error() {
        // Bind then drop to find a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let source = HttpSource::new(
            format!("http://127.0.0.1:{}", port),
            Some(Duration::from_secs(2)),
        );
        assert_eq!(source.fetch_list().unwrap_err().kind(), "transport");
    }
}
