//! Canned-response HTTP fixture for store and client tests.
//!
//! Binds a loopback listener and serves one prepared response per
//! accepted connection, recording the raw requests for assertions.
//! Keeps tests hermetic without a mock-server dependency.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub(crate) struct MockApi {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Serve the given `(status, json_body)` responses, one per request,
    /// in order. The fixture thread exits after the last response.
    pub(crate) fn serve(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let (mut stream, _) = match listener.accept() {
                    Ok(pair) => pair,
                    Err(_) => return,
                };
                let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
                let raw = read_request(&mut stream);
                recorded.lock().expect("requests lock").push(raw);

                let response = format!(
                    "HTTP/1.1 {} MOCK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    pub(crate) fn base_url(&self) -> String {
        self.base.clone()
    }

    /// Wait for the fixture to finish and return the raw requests it saw.
    /// Call only after every configured response has been consumed.
    pub(crate) fn into_requests(self) -> Vec<String> {
        let _ = self.handle.join();
        let requests = self.requests.lock().expect("requests lock");
        requests.clone()
    }
}

/// Read one HTTP request: headers through the blank line, then the body
/// if a Content-Length header is present.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match stream.read(&mut chunk) {
            Ok(0) => return String::from_utf8_lossy(&buf).into_owned(),
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find(&buf, b"\r\n\r\n") {
                    break pos + 4;
                }
            }
            Err(_) => return String::from_utf8_lossy(&buf).into_owned(),
        }
    };

    let body_len = content_length(&buf[..header_end]);
    while buf.len() < header_end + body_len {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn content_length(headers: &[u8]) -> usize {
    let text = String::from_utf8_lossy(headers);
    text.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
