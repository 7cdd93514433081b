//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one fixed body for every GET. Individual file names can be given a
//! status script: the n-th request for that name gets the n-th status, and
//! the last status repeats. Every request is counted per file name.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Default)]
struct State {
    scripts: HashMap<String, Vec<u16>>,
    hits: HashMap<String, u32>,
}

pub struct PaperServer {
    base_url: String,
    state: Arc<Mutex<State>>,
}

impl PaperServer {
    /// Base URL ending in `/`, e.g. "http://127.0.0.1:12345/papers/".
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Script the statuses returned for `name` (file name without leading path).
    pub fn script(&self, name: &str, statuses: &[u16]) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(name.to_string(), statuses.to_vec());
    }

    /// Number of GETs received for `name`.
    pub fn hits(&self, name: &str) -> u32 {
        *self.state.lock().unwrap().hits.get(name).unwrap_or(&0)
    }

    pub fn total_hits(&self) -> u32 {
        self.state.lock().unwrap().hits.values().sum()
    }
}

/// Starts a server in a background thread serving `body` under `/papers/`.
/// The server runs until the process exits.
pub fn start(body: Vec<u8>) -> PaperServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let state = Arc::new(Mutex::new(State::default()));
    let server_state = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let state = Arc::clone(&server_state);
            thread::spawn(move || handle(stream, &body, &state));
        }
    });
    PaperServer {
        base_url: format!("http://127.0.0.1:{}/papers/", port),
        state,
    }
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    let name = path.rsplit('/').next().unwrap_or("").to_string();

    let status = {
        let mut st = state.lock().unwrap();
        let hit = st.hits.entry(name.clone()).or_insert(0);
        *hit += 1;
        let n = *hit as usize;
        match st.scripts.get(&name) {
            Some(s) if !s.is_empty() => s[(n - 1).min(s.len() - 1)],
            _ => 200,
        }
    };

    let payload: &[u8] = if status == 200 { body } else { b"error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        payload.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(payload);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
