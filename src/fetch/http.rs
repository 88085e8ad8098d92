use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use super::{FetchError, Fetcher};

/// [`Fetcher`] backed by a shared `reqwest` client.
///
/// The timeout covers each whole request (connect, headers and body).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let body = self.get(url).await?.text().await?;
        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched page");
        Ok(body)
    }

    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let t0 = Instant::now();
        let body = self.get(url).await?.bytes().await?;
        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched image body");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one connection with `status_line` and `body`, returning the base URL.
    async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(HttpFetcher::new(Duration::from_secs(10)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        // Port 9 on loopback (discard) is closed on test machines; connection is refused
        let err = fetcher.fetch_text("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }

    #[tokio::test]
    async fn test_server_error_status_is_error() {
        let base = serve_once("500 Internal Server Error", b"oops".to_vec()).await;
        let url = format!("{base}/a.jpg");
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch_bytes(&url).await.unwrap_err();

        match err {
            FetchError::Status { status, url: failed } => {
                assert_eq!(status, 500);
                assert_eq!(failed, url);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_not_found_page_is_error() {
        let base = serve_once("404 Not Found", Vec::new()).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch_text(&format!("{base}/")).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_ok_status_returns_body_unchanged() {
        let body: Vec<u8> = vec![0xFF, 0xD8, 0xFF, 0x00, 0x7F, 0x80, 0xFF, 0xD9];
        let base = serve_once("200 OK", body.clone()).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let fetched = fetcher.fetch_bytes(&format!("{base}/a.jpg")).await.unwrap();

        assert_eq!(fetched, body);
    }
}
