//! WHOIS client (spec §6, external interface). Raw TCP to a seeded
//! TLD→server map with IANA fallback, following `refer:` lines. Runs
//! strictly single-threaded after the scan phase to respect provider rate
//! limits (spec §5).

use std::time::Duration;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const WHOIS_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REFERRALS: usize = 1;

/// Registries format WHOIS dates inconsistently; try each in turn and
/// normalize to `YYYY-MM-DD` (spec §6 "a pool of date formats"). The raw
/// string is kept as a fallback when none match.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%d-%b-%Y",
    "%d/%m/%Y",
    "%Y.%m.%d",
];

fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.date().to_string();
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.to_string();
        }
    }
    raw.to_string()
}

lazy_static! {
    static ref REGISTRAR_RE: Regex = Regex::new(r"(?mi)^\s*registrar:\s*(.+)$").unwrap();
    static ref CREATED_RE: Regex =
        Regex::new(r"(?mi)^\s*(?:creation date|created( on)?|registered on|registration date):\s*(.+)$").unwrap();
    static ref UPDATED_RE: Regex = Regex::new(r"(?mi)^\s*(?:updated date|last updated( on)?):\s*(.+)$").unwrap();
    static ref REFER_RE: Regex = Regex::new(r"(?mi)^\s*refer:\s*(\S+)").unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct WhoisRecord {
    pub registrar: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

/// Seeded TLD→server map (grounded in the teacher's `get_whois_server`);
/// anything not listed falls back to IANA, which is then followed via its
/// `refer:` line.
fn seeded_server(tld: &str) -> Option<&'static str> {
    Some(match tld {
        "com" | "net" => "whois.verisign-grs.com",
        "org" => "whois.pir.org",
        "info" => "whois.afilias.net",
        "biz" => "whois.neulevel.biz",
        "us" => "whois.nic.us",
        "co" => "whois.nic.co",
        "io" => "whois.nic.io",
        "me" => "whois.nic.me",
        "uk" => "whois.nic.uk",
        "ca" => "whois.cira.ca",
        "de" => "whois.denic.de",
        "fr" => "whois.afnic.fr",
        "ru" => "whois.tcinet.ru",
        "cn" => "whois.cnnic.net.cn",
        "jp" => "whois.jprs.jp",
        "au" => "whois.auda.org.au",
        "br" => "whois.registro.br",
        "pl" => "whois.dns.pl",
        "app" | "dev" => "whois.nic.google",
        "tech" => "whois.nic.tech",
        _ => return None,
    })
}

const IANA_SERVER: &str = "whois.iana.org";

pub async fn lookup(domain: &str) -> Option<WhoisRecord> {
    let tld = domain.rsplit('.').next()?;
    let server = seeded_server(tld).unwrap_or(IANA_SERVER);

    let raw = query(server, domain).await.ok()?;
    let raw = follow_referral(&raw, domain, MAX_REFERRALS).await;

    let record = parse(&raw);
    if record.registrar.is_none() && record.created.is_none() {
        None
    } else {
        Some(record)
    }
}

async fn follow_referral(first_response: &str, domain: &str, hops_remaining: usize) -> String {
    if hops_remaining == 0 {
        return first_response.to_string();
    }
    if let Some(referred) = REFER_RE.captures(first_response).and_then(|c| c.get(1)).map(|m| m.as_str()) {
        debug!("following WHOIS referral to {}", referred);
        if let Ok(body) = query(referred, domain).await {
            return body;
        }
    }
    first_response.to_string()
}

async fn query(server: &str, domain: &str) -> std::io::Result<String> {
    let mut stream = timeout(WHOIS_TIMEOUT, TcpStream::connect((server, 43))).await??;
    timeout(WHOIS_TIMEOUT, stream.write_all(format!("{}\r\n", domain).as_bytes())).await??;

    let mut buf = Vec::new();
    timeout(WHOIS_TIMEOUT, stream.read_to_end(&mut buf)).await??;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

fn parse(raw: &str) -> WhoisRecord {
    WhoisRecord {
        registrar: REGISTRAR_RE.captures(raw).map(|c| c[1].trim().to_string()),
        created: CREATED_RE.captures(raw).map(|c| normalize_date(&c[2])),
        updated: UPDATED_RE.captures(raw).map(|c| normalize_date(&c[2])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_server_matches_common_tlds() {
        assert_eq!(seeded_server("com"), Some("whois.verisign-grs.com"));
        assert_eq!(seeded_server("pl"), Some("whois.dns.pl"));
        assert_eq!(seeded_server("xyz-unknown-tld"), None);
    }

    #[test]
    fn parse_extracts_registrar_and_dates() {
        let raw = "Domain Name: EXAMPLE.COM\nRegistrar: Example Registrar, Inc.\nCreation Date: 1995-08-14T04:00:00Z\nUpdated Date: 2023-08-14T04:00:00Z\n";
        let record = parse(raw);
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar, Inc."));
        assert_eq!(record.created.as_deref(), Some("1995-08-14"));
        assert_eq!(record.updated.as_deref(), Some("2023-08-14"));
    }

    #[test]
    fn normalize_date_falls_back_to_raw_on_unknown_format() {
        assert_eq!(normalize_date("not a date"), "not a date");
    }

    #[test]
    fn normalize_date_handles_dd_mon_yyyy() {
        assert_eq!(normalize_date("14-Aug-1995"), "1995-08-14");
    }

    #[test]
    fn parse_returns_none_fields_when_absent() {
        let record = parse("No match for domain.\n");
        assert!(record.registrar.is_none());
        assert!(record.created.is_none());
    }

    #[test]
    fn referral_regex_extracts_refer_line() {
        let body = "refer: whois.verisign-grs.com\n";
        let captured = REFER_RE.captures(body).unwrap();
        assert_eq!(&captured[1], "whois.verisign-grs.com");
    }
}
