//! Banner capture for open ports.
//!
//! A single passive read against a freshly accepted connection; whatever
//! the service volunteers within the timeout is the banner. No probe
//! payloads are sent.

use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Maximum bytes read for a banner.
const MAX_BANNER_SIZE: usize = 1024;

/// Read a banner from an already connected stream.
///
/// Returns `None` when the service sends nothing before `read_timeout`,
/// closes the connection immediately, or sends only whitespace. The full
/// sanitized text is returned; display-time truncation is the renderer's
/// job.
pub async fn read_banner(stream: &mut TcpStream, read_timeout: Duration) -> Option<String> {
    let mut buffer = vec![0u8; MAX_BANNER_SIZE];

    match timeout(read_timeout, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => {
            let text = sanitize(&buffer[..n]);
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}

/// Scrub raw banner bytes for storage.
///
/// Printable ASCII survives, CR/LF/TAB become spaces, everything else
/// becomes '.', and runs of spaces collapse to one.
fn sanitize(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len());
    let mut prev_space = false;

    for &b in data {
        let c = match b {
            b'\r' | b'\n' | b'\t' | b' ' => ' ',
            _ if b.is_ascii_graphic() => b as char,
            _ => '.',
        };
        if c == ' ' {
            if !prev_space && !result.is_empty() {
                result.push(' ');
            }
            prev_space = true;
        } else {
            result.push(c);
            prev_space = false;
        }
    }

    result.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_ssh_greeting() {
        assert_eq!(sanitize(b"SSH-2.0-OpenSSH_9.6\r\n"), "SSH-2.0-OpenSSH_9.6");
    }

    #[test]
    fn test_sanitize_binary_data() {
        assert_eq!(sanitize(b"\x00\x01Hello\x02World\x03"), "..Hello.World.");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize(b"220  smtp \r\n ready\r\n"), "220 smtp ready");
    }

    #[test]
    fn test_sanitize_whitespace_only_is_empty() {
        assert_eq!(sanitize(b"\r\n \t "), "");
    }

    #[tokio::test]
    async fn test_read_banner_from_talkative_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            tokio::io::AsyncWriteExt::write_all(&mut sock, b"220 mail.example.com ESMTP\r\n")
                .await
                .unwrap();
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let banner = read_banner(&mut stream, Duration::from_millis(500)).await;
        assert_eq!(banner.as_deref(), Some("220 mail.example.com ESMTP"));
    }

    #[tokio::test]
    async fn test_read_banner_from_silent_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let banner = read_banner(&mut stream, Duration::from_millis(100)).await;
        assert_eq!(banner, None);
    }
}
