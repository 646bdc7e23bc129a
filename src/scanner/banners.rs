//! HTTP and SMTP banner grabbing (spec §4.4 item 4). Raw sockets with 1 s
//! timeouts, grounded in the teacher's `check_whois`/raw-TCP style.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

const BANNER_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn http_banner(ip: &str, vhost: &str, useragent: &str) -> Option<String> {
    let mut stream = timeout(BANNER_TIMEOUT, TcpStream::connect((ip, 80))).await.ok()?.ok()?;
    let request = format!(
        "HEAD / HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: close\r\n\r\n",
        vhost, useragent
    );
    timeout(BANNER_TIMEOUT, stream.write_all(request.as_bytes())).await.ok()?.ok()?;

    let mut buf = [0u8; 2048];
    let n = timeout(BANNER_TIMEOUT, stream.read(&mut buf)).await.ok()?.ok()?;
    let response = String::from_utf8_lossy(&buf[..n]);

    response
        .lines()
        .find(|line| line.to_ascii_lowercase().starts_with("server:"))
        .map(|line| line[8.min(line.len())..].trim().to_string())
}

pub async fn smtp_banner(mx: &str) -> Option<String> {
    let mut stream = timeout(BANNER_TIMEOUT, TcpStream::connect((mx, 25))).await.ok()?.ok()?;
    let mut buf = [0u8; 1024];
    let n = timeout(BANNER_TIMEOUT, stream.read(&mut buf)).await.ok()?.ok()?;
    let response = String::from_utf8_lossy(&buf[..n]);
    let hello = response.lines().next()?;
    if hello.starts_with("220") {
        Some(hello[4.min(hello.len())..].trim().to_string())
    } else {
        Some(hello.chars().take(40).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn http_banner_returns_none_when_unreachable() {
        assert!(http_banner("127.0.0.1", "examp1e.com", "test-agent").await.is_none());
    }

    #[tokio::test]
    async fn smtp_banner_returns_none_when_unreachable() {
        assert!(smtp_banner("127.0.0.1").await.is_none());
    }
}
