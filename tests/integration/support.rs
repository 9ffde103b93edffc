//! Local HTTP server serving fixture binaries and checksums

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

pub const SCRIPT_OK: &[u8] = b"#!/bin/sh\necho OK\n";

/// What the server answers for a path
#[derive(Clone)]
pub enum Route {
    /// 200 with `Content-Type: application/octet-stream`
    Binary(Vec<u8>),
    /// 200 with `Content-Type: text/plain`
    Text(String),
    /// Bare status code
    Status(u16),
    /// Like `Binary`, answered only after a delay
    Slow(Duration, Vec<u8>),
}

/// A running fixture server, stopped on drop
pub struct BinServer {
    server: Arc<Server>,
    addr: SocketAddr,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl BinServer {
    pub fn start(routes: Vec<(String, Route)>) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let hits = Arc::new(Mutex::new(HashMap::new()));
        let routes: HashMap<String, Route> = routes.into_iter().collect();

        let worker = Arc::clone(&server);
        let counter = Arc::clone(&hits);
        thread::spawn(move || {
            for request in worker.incoming_requests() {
                let path = request.url().to_string();
                *counter.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

                let _ = match routes.get(&path) {
                    Some(Route::Binary(bytes)) => request.respond(binary(bytes)),
                    Some(Route::Slow(delay, bytes)) => {
                        thread::sleep(*delay);
                        request.respond(binary(bytes))
                    }
                    Some(Route::Text(body)) => request.respond(Response::from_string(body.clone())),
                    Some(Route::Status(code)) => request.respond(Response::empty(*code)),
                    None => request.respond(Response::from_string("not found").with_status_code(404)),
                };
            }
        });

        Self { server, addr, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Number of requests received for `path`
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

impl Drop for BinServer {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

fn binary(bytes: &[u8]) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_data(bytes.to_vec()).with_header(
        "Content-Type: application/octet-stream"
            .parse::<Header>()
            .unwrap(),
    )
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Route path for a binary in the layout the resolvers below expect
pub fn bin_path(version: &str, command: &str) -> String {
    format!(
        "/{}/{}/{}/{}",
        version,
        std::env::consts::OS,
        std::env::consts::ARCH,
        command
    )
}

/// Every entry in a cache directory, partial files included
pub fn cache_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
