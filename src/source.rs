//! Statistics sources: local paths vs HTTP/HTTPS URLs, and the fetchers that read them.

use crate::error::FetchError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputSource {
    Local(PathBuf),
    Http(String),
}

/// Classifies the reference as local or HTTP/HTTPS using string parsing only (no filesystem calls).
/// `file://` URLs map to their local path.
pub fn input_source(reference: &str) -> InputSource {
    if let Some(after_scheme) = reference.find("://") {
        let prefix = reference[..after_scheme].to_lowercase();
        if prefix == "http" || prefix == "https" {
            return InputSource::Http(reference.to_string());
        }
        if prefix == "file" {
            return InputSource::Local(PathBuf::from(&reference[after_scheme + 3..]));
        }
    }
    InputSource::Local(PathBuf::from(reference))
}

/// Reads the raw statistics body for a reference. Implementations are shared with
/// the fetch worker thread, hence `Send + Sync`.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str, mime_type: &str) -> Result<String, FetchError>;
}

/// Single text-mode GET with an `Accept` header. No retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl Fetch for HttpFetcher {
    #[cfg(feature = "http")]
    fn fetch(&self, url: &str, mime_type: &str) -> Result<String, FetchError> {
        let mut request = ureq::get(url)
            .timeout(self.timeout)
            .set("Accept", mime_type);
        if let Some(agent) = &self.user_agent {
            request = request.set("User-Agent", agent);
        }
        match request.call() {
            Ok(response) => {
                let status = response.status();
                if !(200..300).contains(&status) {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                        status_text: response.status_text().to_string(),
                    });
                }
                response.into_string().map_err(|e| FetchError::Transport {
                    url: url.to_string(),
                    message: format!("reading response body: {e}"),
                })
            }
            Err(ureq::Error::Status(status, response)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
                status_text: response.status_text().to_string(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            }),
        }
    }

    #[cfg(not(feature = "http"))]
    fn fetch(&self, url: &str, _mime_type: &str) -> Result<String, FetchError> {
        Err(FetchError::Unsupported {
            url: url.to_string(),
        })
    }
}

/// Reads a table from the local filesystem; the MIME type is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFetcher;

impl Fetch for LocalFetcher {
    fn fetch(&self, url: &str, _mime_type: &str) -> Result<String, FetchError> {
        let path = match input_source(url) {
            InputSource::Local(path) => path,
            InputSource::Http(_) => PathBuf::from(url),
        };
        std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })
    }
}

/// Dispatches to [`HttpFetcher`] or [`LocalFetcher`] by the reference's scheme.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    pub http: HttpFetcher,
}

impl SourceFetcher {
    pub fn new(http: HttpFetcher) -> Self {
        Self { http }
    }
}

impl Fetch for SourceFetcher {
    fn fetch(&self, url: &str, mime_type: &str) -> Result<String, FetchError> {
        let source = input_source(url);
        debug!(?source, mime_type, "fetching statistics");
        match source {
            InputSource::Http(_) => self.http.fetch(url, mime_type),
            InputSource::Local(_) => LocalFetcher.fetch(url, mime_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_source_local_path() {
        assert!(matches!(input_source("/tmp/stats.tsv"), InputSource::Local(_)));
        assert!(matches!(input_source("relative.tsv"), InputSource::Local(_)));
    }

    #[test]
    fn input_source_http() {
        match input_source("https://example.com/ows?service=WPS&id=stats") {
            InputSource::Http(u) => assert_eq!(u, "https://example.com/ows?service=WPS&id=stats"),
            _ => panic!("expected Http"),
        }
        assert!(matches!(
            input_source("HTTP://host/stats.tsv"),
            InputSource::Http(_)
        ));
    }

    #[test]
    fn input_source_file_url() {
        assert_eq!(
            input_source("file:///tmp/stats.tsv"),
            InputSource::Local(PathBuf::from("/tmp/stats.tsv"))
        );
    }

    #[test]
    fn input_source_unknown_scheme_stays_local() {
        assert!(matches!(input_source("s3://bucket/key"), InputSource::Local(_)));
    }

    #[test]
    fn local_fetcher_missing_file_is_io_error() {
        let err = LocalFetcher
            .fetch("/definitely/not/here/stats.tsv", "text/plain")
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert_eq!(err.status(), None);
    }

    /// Serves one canned response on a local port and hands back the raw request.
    #[cfg(feature = "http")]
    fn serve_once(response: &'static str) -> (String, std::thread::JoinHandle<String>) {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/stats.tsv", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (url, handle)
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_fetcher_sends_accept_and_returns_body() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/tab-separated-values\r\nContent-Length: 13\r\nConnection: close\r\n\r\n\t\tA\r\n\t10\t10\r\n",
        );
        let body = HttpFetcher::default()
            .fetch(&url, "text/tab-separated-values")
            .unwrap();
        assert_eq!(body, "\t\tA\r\n\t10\t10\r\n");

        let request = server.join().unwrap().to_lowercase();
        assert!(
            request.contains("\r\naccept: text/tab-separated-values\r\n"),
            "got request:\n{}",
            request
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_fetcher_maps_error_status() {
        let (url, server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let err = HttpFetcher::default().fetch(&url, "text/plain").unwrap_err();
        server.join().unwrap();
        match &err {
            FetchError::Status {
                status,
                status_text,
                ..
            } => {
                assert_eq!(*status, 503);
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("expected Status, got {:?}", other),
        }
        assert_eq!(err.status(), Some(503));
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_fetcher_maps_refused_connection_to_transport() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/stats.tsv");
        let err = HttpFetcher::default().fetch(&url, "text/plain").unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "got {:?}", err);
        assert_eq!(err.status(), None);
    }
}
