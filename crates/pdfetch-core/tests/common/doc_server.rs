//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies by path, counts GET requests per path, and can
//! require a cookie pair before serving (returning an HTML challenge page
//! otherwise), mimicking a verification-gated document host.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Body returned instead of a document when the required cookie is absent.
pub const CHALLENGE_BODY: &str = "<html><body>Please verify you are human</body></html>";

#[derive(Default)]
struct Shared {
    /// path → body served with 200.
    docs: HashMap<String, Vec<u8>>,
    /// `name=value` pair that must appear in the Cookie header, if set.
    required_cookie: Option<String>,
    /// path → number of GETs observed.
    hits: HashMap<String, u32>,
}

/// Handle to a running test server.
pub struct DocServer {
    base_url: String,
    shared: Arc<Mutex<Shared>>,
}

impl DocServer {
    /// Base URL without a trailing slash (e.g. `http://127.0.0.1:12345`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of GET requests observed for `path` (leading slash).
    pub fn hits(&self, path: &str) -> u32 {
        *self
            .shared
            .lock()
            .unwrap()
            .hits
            .get(path)
            .unwrap_or(&0)
    }

    /// Total GET requests observed across all paths.
    pub fn total_hits(&self) -> u32 {
        self.shared.lock().unwrap().hits.values().sum()
    }
}

/// Starts a server in a background thread. `docs` maps paths (leading
/// slash) to 200 bodies; unknown paths get 404. When `required_cookie` is
/// set, requests without it get a 200 HTML challenge page instead of the
/// document (the shape verification walls actually have).
pub fn start(docs: HashMap<String, Vec<u8>>, required_cookie: Option<String>) -> DocServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let shared = Arc::new(Mutex::new(Shared {
        docs,
        required_cookie,
        hits: HashMap::new(),
    }));
    let shared_srv = Arc::clone(&shared);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let shared = Arc::clone(&shared_srv);
            thread::spawn(move || handle(stream, &shared));
        }
    });
    DocServer {
        base_url: format!("http://127.0.0.1:{}", port),
        shared,
    }
}

fn handle(mut stream: std::net::TcpStream, shared: &Mutex<Shared>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path, cookie) = parse_request(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let (status, content_type, body) = {
        let mut shared = shared.lock().unwrap();
        *shared.hits.entry(path.to_string()).or_insert(0) += 1;

        let authorized = match &shared.required_cookie {
            Some(required) => cookie
                .map(|c| c.split(';').any(|p| p.trim() == required))
                .unwrap_or(false),
            None => true,
        };
        if !authorized {
            (
                "200 OK",
                "text/html",
                CHALLENGE_BODY.as_bytes().to_vec(),
            )
        } else {
            match shared.docs.get(path) {
                Some(body) => ("200 OK", "application/pdf", body.clone()),
                None => (
                    "404 Not Found",
                    "text/html",
                    b"<html><body>Not Found</body></html>".to_vec(),
                ),
            }
        }
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
}

/// Returns (method, path, Cookie header value).
fn parse_request(request: &str) -> (&str, &str, Option<&str>) {
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    let mut cookie = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("cookie") {
                cookie = Some(value.trim());
            }
        }
    }
    (method, path, cookie)
}
