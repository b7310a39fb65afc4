//! Minimal HTTP/1.1 server that imitates a share provider for integration tests.
//!
//! Routes are matched on the exact request target (path + query). Unknown
//! targets get a small HTML 404. Every request line is logged so tests can
//! assert which URLs were hit.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Pause before answering.
    pub delay: Duration,
    /// Answer 403 unless the request carries this cookie pair.
    pub required_cookie: Option<String>,
}

impl Route {
    fn new(status: &'static str, header: (&str, &str), body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![(header.0.to_string(), header.1.to_string())],
            body,
            delay: Duration::ZERO,
            required_cookie: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self::new("302 Found", ("Location", location), b"<html>moved</html>".to_vec())
    }

    pub fn html() -> Self {
        Self::new(
            "200 OK",
            ("Content-Type", "text/html; charset=utf-8"),
            b"<html><body>viewer</body></html>".to_vec(),
        )
    }

    pub fn file(content_type: &str, body: Vec<u8>) -> Self {
        Self::new("200 OK", ("Content-Type", content_type), body)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requires_cookie(mut self, pair: &str) -> Self {
        self.required_cookie = Some(pair.to_string());
        self
    }
}

pub struct ShareServer {
    pub port: u16,
    log: Arc<Mutex<Vec<String>>>,
}

impl ShareServer {
    pub fn base(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Request targets received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn hits(&self, target: &str) -> usize {
        self.requests().iter().filter(|t| t.as_str() == target).count()
    }
}

/// Starts the server in a background thread; it runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> ShareServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(target, route)| (target.to_string(), route))
            .collect(),
    );
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_srv = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log_srv);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    ShareServer { port, log }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(target.clone());

    let not_found = Route::new("404 Not Found", ("Content-Type", "text/html"), b"<html>not found</html>".to_vec());
    let forbidden = Route::new("403 Forbidden", ("Content-Type", "text/html"), b"<html>forbidden</html>".to_vec());
    let mut route = routes.get(&target).unwrap_or(&not_found);
    thread::sleep(route.delay);
    if let Some(pair) = &route.required_cookie {
        let has_cookie = request.lines().any(|l| {
            l.to_ascii_lowercase().starts_with("cookie:") && l.contains(pair.as_str())
        });
        if !has_cookie {
            route = &forbidden;
        }
    }

    let mut head = format!("HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n", route.status, route.body.len());
    for (name, value) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}
