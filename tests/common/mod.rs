//! Common test utilities

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use panel_fm::config::Credentials;
use panel_fm::FileManagerClient;

/// A request as seen by [`FakePanel`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub const MKDIR_OK: &str = r#"{"cpanelresult":{"event":{"result":1},"data":[{"result":1}],"func":"mkdir","module":"Fileman"}}"#;
pub const MKDIR_EXISTS: &str = r#"{"cpanelresult":{"event":{"result":0},"error":"The directory already exists.","func":"mkdir","module":"Fileman"}}"#;
pub const UPLOAD_OK: &str = r#"{"status":1,"errors":null,"messages":null,"data":{"succeeded":1,"failed":0}}"#;
pub const FILEOP_OK: &str = r#"{"cpanelresult":{"event":{"result":1},"data":[{"result":1}],"func":"fileop","module":"Fileman"}}"#;

/// Loopback HTTP server answering one connection per canned reply, in
/// order, and recording each request.
pub struct FakePanel {
    pub base_url: String,
    handle: Option<JoinHandle<Vec<RecordedRequest>>>,
}

impl FakePanel {
    pub fn serve(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind fake panel");
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for reply in replies {
                let (stream, _) = listener.accept().expect("accept");
                seen.push(answer(stream, &reply));
            }
            seen
        });
        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            handle: Some(handle),
        }
    }

    /// Wait until every reply was served and return the recorded requests.
    pub fn finish(mut self) -> Vec<RecordedRequest> {
        self.handle
            .take()
            .unwrap()
            .join()
            .expect("fake panel thread panicked")
    }
}

fn answer(stream: TcpStream, reply: &Reply) -> RecordedRequest {
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let find = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };
    let mut body = Vec::new();
    if let Some(len) = find("content-length") {
        let len: usize = len.parse().unwrap();
        body.resize(len, 0);
        reader.read_exact(&mut body).unwrap();
    } else if find("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        loop {
            let mut size_line = String::new();
            reader.read_line(&mut size_line).unwrap();
            let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
            if size == 0 {
                let mut end = String::new();
                reader.read_line(&mut end).unwrap();
                break;
            }
            let mut chunk = vec![0; size];
            reader.read_exact(&mut chunk).unwrap();
            body.extend_from_slice(&chunk);
            let mut crlf = [0u8; 2];
            reader.read_exact(&mut crlf).unwrap();
        }
    }

    let url = url::Url::parse(&format!("http://127.0.0.1{target}")).unwrap();
    let query = url.query_pairs().into_owned().collect();

    let reason = if reply.status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason,
        reply.body.len(),
        reply.body
    );
    let mut stream = stream;
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();

    RecordedRequest {
        method,
        path: url.path().to_string(),
        query,
        headers,
        body,
    }
}

/// A loopback URL where nothing is listening.
pub fn refused_url() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn credentials(base_url: &str) -> Credentials {
    Credentials {
        principal: "acct".into(),
        token: "TOKEN123".into(),
        base_url: base_url.into(),
    }
}

/// Client talking straight to `base_url`, ignoring proxy settings.
pub fn client_for(base_url: &str) -> FileManagerClient {
    let http = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    FileManagerClient::with_client(&credentials(base_url), http).unwrap()
}
