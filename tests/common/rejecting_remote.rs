//! HTTP git remote that rejects every request
//!
//! Answers `401 Unauthorized` with a Basic challenge, so libgit2 asks the
//! credential callback and then retries with whatever it got.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const UNAUTHORIZED: &[u8] = b"HTTP/1.1 401 Unauthorized\r\n\
WWW-Authenticate: Basic realm=\"git\"\r\n\
Content-Length: 0\r\n\
Connection: close\r\n\r\n";

/// Local listener standing in for a private repository
pub struct RejectingRemote {
    url: String,
    hits: Arc<AtomicUsize>,
}

impl RejectingRemote {
    /// Bind to an ephemeral port and start answering
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!(
            "http://{}/acme/widgets.git",
            listener.local_addr().unwrap()
        );
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let _ = socket.write_all(UNAUTHORIZED).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { url, hits }
    }

    /// Clone URL served by this listener
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connections accepted so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
