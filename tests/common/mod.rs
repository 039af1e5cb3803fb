#![allow(dead_code)]

pub mod fixtures {
    use std::path::PathBuf;

    /// Path of a file under `tests/fixtures`.
    pub fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    /// Raw text of a fixture.
    pub fn fixture_text(name: &str) -> String {
        std::fs::read_to_string(fixture(name)).unwrap()
    }
}

pub mod files {
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// Every file under `root`, relative and `/`-separated, sorted.
    pub fn relative_files(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }

    /// Files in `dir` whose name contains `.backup.`.
    pub fn backups_in(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.to_string_lossy().contains(".backup."))
            .collect()
    }
}

pub mod mock_server {
    //! Minimal blocking HTTP/1.1 server for exercising the real transport.
    //!
    //! Every connection carries one request and is closed after the reply.

    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedRequest {
        pub method: String,
        pub path: String,
        pub authorization: Option<String>,
        pub body: String,
    }

    impl RecordedRequest {
        pub fn bearer(&self) -> Option<&str> {
            self.authorization.as_deref()?.strip_prefix("Bearer ")
        }
    }

    type Handler = dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync;

    pub struct MockServer {
        pub base_url: String,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl MockServer {
        /// Bind to an ephemeral port and answer every request with `handler`.
        pub fn start<F>(handler: F) -> Self
        where
            F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
        {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let handler: Arc<Handler> = Arc::new(handler);

            let recorded = Arc::clone(&requests);
            thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(stream) = stream else { continue };
                    let handler = Arc::clone(&handler);
                    let recorded = Arc::clone(&recorded);
                    thread::spawn(move || serve(stream, handler.as_ref(), &recorded));
                }
            });

            MockServer { base_url, requests }
        }

        pub fn url(&self, path: &str) -> String {
            format!("{}{path}", self.base_url)
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn paths(&self) -> Vec<String> {
            self.requests()
                .into_iter()
                .map(|r| format!("{} {}", r.method, r.path))
                .collect()
        }
    }

    fn serve(stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<RecordedRequest>>) {
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
            return;
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut content_length = 0usize;
        let mut authorization = None;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                let value = value.trim();
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.parse().unwrap_or(0);
                } else if name.eq_ignore_ascii_case("authorization") {
                    authorization = Some(value.to_string());
                }
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();

        let request = RecordedRequest {
            method,
            path,
            authorization,
            body: String::from_utf8_lossy(&body).into_owned(),
        };
        recorded.lock().unwrap().push(request.clone());

        let (status, body) = handler(&request);
        let reason = match status {
            200 => "OK",
            401 => "Unauthorized",
            404 => "Not Found",
            _ => "Error",
        };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = stream;
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    }

    /// `{status: "success", data: {accessToken, refreshToken}}`
    pub fn token_body(access: &str, refresh: &str) -> String {
        serde_json::json!({
            "status": "success",
            "data": { "accessToken": access, "refreshToken": refresh }
        })
        .to_string()
    }
}
