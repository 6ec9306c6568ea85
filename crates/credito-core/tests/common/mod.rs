//! Loopback HTTP stubs for the rate-source tests.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use credito_core::rates::config::{ProviderConfig, SourceConfig};

pub struct Route {
    pub prefix: &'static str,
    pub status: u16,
    pub body: String,
}

pub fn route(prefix: &'static str, status: u16, body: impl Into<String>) -> Route {
    Route {
        prefix,
        status,
        body: body.into(),
    }
}

/// Serve canned responses keyed by path prefix; unknown paths get 404.
/// Returns the base URL.
pub fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("stub address");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let path = read_request_path(&stream);
            let (status, body) = routes
                .iter()
                .find(|r| path.starts_with(r.prefix))
                .map(|r| (r.status, r.body.clone()))
                .unwrap_or((404, "{}".to_string()));
            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    format!("http://{addr}")
}

/// Accepts connections and never answers.
pub fn silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind silent server");
    let addr = listener.local_addr().expect("silent address");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            thread::spawn(move || {
                thread::sleep(Duration::from_secs(10));
                drop(stream);
            });
        }
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
pub fn unreachable() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}

pub fn config_with(sources: Vec<SourceConfig>) -> ProviderConfig {
    ProviderConfig {
        timeout_ms: 2_000,
        use_system_proxy: false,
        sources,
        ..ProviderConfig::default()
    }
}

pub fn series_at(base_url: &str) -> SourceConfig {
    SourceConfig::Series {
        base_url: format!("{base_url}/series/api"),
        series_id: "7917".into(),
    }
}

fn read_request_path(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    let _ = reader.read_line(&mut request_line);
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) if header == "\r\n" || header == "\n" => break,
            Ok(_) => continue,
            Err(_) => break,
        }
    }
    request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string()
}
