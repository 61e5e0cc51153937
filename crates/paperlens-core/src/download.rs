//! Fetching remote PDFs.

use std::time::Duration;

use futures_util::StreamExt;

use crate::error::{AnalysisError, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Download the document at `url` and check that it is a PDF.
///
/// The body is streamed and abandoned as soon as it passes `max_bytes` or its
/// first bytes are not a PDF header, so a hostile server cannot make us buffer
/// more than the cap.
///
/// Any failure here is the caller's problem (bad URL, dead link, not a PDF),
/// so everything maps to [`AnalysisError::Download`].
pub async fn fetch_pdf(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    max_bytes: usize,
) -> Result<Vec<u8>> {
    let timed_out = || AnalysisError::Download(format!("timed out after {}s", timeout.as_secs()));

    let resp = client
        .get(url)
        .header("User-Agent", "PaperLens PDF fetcher")
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                timed_out()
            } else {
                AnalysisError::Download(e.to_string())
            }
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(AnalysisError::Download(format!("HTTP {status}")));
    }

    if let Some(len) = resp.content_length() {
        if len > max_bytes as u64 {
            return Err(too_large(max_bytes));
        }
    }

    let mut data: Vec<u8> = Vec::new();
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            if e.is_timeout() {
                timed_out()
            } else {
                AnalysisError::Download(e.to_string())
            }
        })?;

        if data.len().saturating_add(chunk.len()) > max_bytes {
            return Err(too_large(max_bytes));
        }
        let checked = data.len() >= PDF_MAGIC.len();
        data.extend_from_slice(&chunk);
        if !checked && data.len() >= PDF_MAGIC.len() && !data.starts_with(PDF_MAGIC) {
            return Err(not_a_pdf());
        }
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(not_a_pdf());
    }

    tracing::debug!(url, bytes = data.len(), "downloaded PDF");
    Ok(data)
}

fn not_a_pdf() -> AnalysisError {
    AnalysisError::Download("URL did not return a PDF document".to_string())
}

fn too_large(max_bytes: usize) -> AnalysisError {
    const MIB: usize = 1024 * 1024;
    if max_bytes < MIB {
        AnalysisError::Download(format!("PDF exceeds the {max_bytes} bytes size limit"))
    } else {
        AnalysisError::Download(format!("PDF exceeds the {} MiB size limit", max_bytes / MIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const CHUNK: usize = 64 * 1024;
    const SERVER_LIMIT: usize = 64 * 1024 * 1024;

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    /// Serve one chunked response without a Content-Length, starting with
    /// `head` and then padding until `SERVER_LIMIT` or the client hangs up.
    /// Resolves to the number of body bytes the server managed to write.
    async fn spawn_chunked_host(head: &'static [u8]) -> (String, tokio::task::JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;

            let headers = b"HTTP/1.1 200 OK\r\n\
                Content-Type: application/pdf\r\n\
                Transfer-Encoding: chunked\r\n\r\n";
            if socket.write_all(headers).await.is_err() {
                return 0;
            }

            let mut written = 0;
            let mut body = head.to_vec();
            body.resize(CHUNK, b'0');
            while written < SERVER_LIMIT {
                let mut frame = format!("{:x}\r\n", body.len()).into_bytes();
                frame.extend_from_slice(&body);
                frame.extend_from_slice(b"\r\n");
                if socket.write_all(&frame).await.is_err() {
                    return written;
                }
                written += body.len();
                body.fill(b'0');
            }
            let _ = socket.write_all(b"0\r\n\r\n").await;
            written
        });
        (format!("http://{addr}/paper.pdf"), handle)
    }

    #[tokio::test]
    async fn oversized_chunked_body_is_abandoned_early() {
        let (url, server) = spawn_chunked_host(b"%PDF-1.7\n").await;

        let err = fetch_pdf(&client(), &url, Duration::from_secs(10), 1024)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1024 bytes size limit"), "{err}");

        let written = tokio::time::timeout(Duration::from_secs(10), server)
            .await
            .expect("server did not notice the client hanging up")
            .unwrap();
        assert!(written < SERVER_LIMIT, "server wrote the whole body");
    }

    #[tokio::test]
    async fn non_pdf_header_is_rejected_before_the_body_ends() {
        let (url, server) = spawn_chunked_host(b"<html>").await;

        let err = fetch_pdf(&client(), &url, Duration::from_secs(10), usize::MAX)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not return a PDF"), "{err}");

        let written = tokio::time::timeout(Duration::from_secs(10), server)
            .await
            .expect("server did not notice the client hanging up")
            .unwrap();
        assert!(written < SERVER_LIMIT);
    }

    #[test]
    fn size_limit_message_uses_bytes_below_one_mib() {
        assert_eq!(
            too_large(16).to_string(),
            "failed to download PDF: PDF exceeds the 16 bytes size limit"
        );
        assert_eq!(
            too_large(50 * 1024 * 1024).to_string(),
            "failed to download PDF: PDF exceeds the 50 MiB size limit"
        );
    }
}
