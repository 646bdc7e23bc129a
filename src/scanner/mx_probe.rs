//! SMTP catch-all MX-probe (spec §4.4 item 2): confirms an open-relay /
//! typo-harvesting mail server without delivering a message. Stops
//! strictly before `DATA`, per the Non-goals.

use rand::Rng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

const SMTP_TIMEOUT: Duration = Duration::from_secs(5);

/// `true` iff `mx` accepts a `MAIL FROM`/`RCPT TO` pair addressed from
/// `seed_domain` to `permutation_domain`, through the final `RCPT`
/// response, without ever sending `DATA`.
pub async fn probes_as_catch_all(mx: &str, seed_domain: &str, permutation_domain: &str) -> bool {
    match try_probe(mx, seed_domain, permutation_domain).await {
        Ok(accepted) => accepted,
        Err(_) => false,
    }
}

async fn try_probe(mx: &str, seed_domain: &str, permutation_domain: &str) -> std::io::Result<bool> {
    let mut stream = timeout(SMTP_TIMEOUT, TcpStream::connect((mx, 25))).await??;

    read_response(&mut stream).await?; // 220 greeting

    let mut rng = rand::thread_rng();
    let from_addr = format!("randombob{}@{}", rng.gen_range(1..9), seed_domain);
    let to_addr = format!("randomalice{}@{}", rng.gen_range(1..9), permutation_domain);

    send_line(&mut stream, &format!("EHLO {}", seed_domain)).await?;
    let ehlo_code = read_response(&mut stream).await?;
    if ehlo_code / 100 != 2 {
        return Ok(false);
    }

    send_line(&mut stream, &format!("MAIL FROM:<{}>", from_addr)).await?;
    let mail_code = read_response(&mut stream).await?;
    if mail_code / 100 != 2 {
        return Ok(false);
    }

    send_line(&mut stream, &format!("RCPT TO:<{}>", to_addr)).await?;
    let rcpt_code = read_response(&mut stream).await?;

    // Always close gracefully; never send DATA.
    let _ = send_line(&mut stream, "QUIT").await;

    Ok(rcpt_code / 100 == 2)
}

async fn send_line(stream: &mut TcpStream, line: &str) -> std::io::Result<()> {
    timeout(SMTP_TIMEOUT, stream.write_all(format!("{}\r\n", line).as_bytes())).await??;
    Ok(())
}

async fn read_response(stream: &mut TcpStream) -> std::io::Result<u32> {
    let mut buf = [0u8; 512];
    let n = timeout(SMTP_TIMEOUT, stream.read(&mut buf)).await??;
    let text = String::from_utf8_lossy(&buf[..n]);
    let code = text
        .lines()
        .next()
        .and_then(|l| l.get(0..3))
        .and_then(|c| c.parse::<u32>().ok())
        .unwrap_or(0);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_mx_is_not_a_catch_all() {
        // Nothing listens on 127.0.0.1:25 in the test sandbox; the connect
        // itself fails, so the probe must report false rather than panic.
        assert!(!probes_as_catch_all("127.0.0.1", "example.com", "examp1e.com").await);
    }
}
