//! Baseline Fetcher (spec §4.3): fetches the seed page once, normalizes its
//! body, and computes the LSH digest the Scanner Pool compares every
//! permutation's homepage against.

use std::time::Duration;

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

use crate::config::LshAlgorithm;
use crate::error::{Error, Result};
use crate::lsh::Digest;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref ACTION_SRC_HREF: Regex = Regex::new(r#"(?i)(action|src|href)="[^"]*""#).unwrap();
    static ref URL_FN: Regex = Regex::new(r"(?i)url\([^)]*\)").unwrap();
    static ref META_REFRESH: Regex =
        Regex::new(r#"(?i)<meta[^>]+http-equiv=["']?refresh["']?[^>]*url=(https?://[^"'>\s]+)"#).unwrap();
}

#[derive(Debug, Clone)]
pub struct Baseline {
    /// The post-redirect, query-stripped URL actually served — used to
    /// skip exact-origin echoes during the Scanner's LSH stage.
    pub effective_url: String,
    pub digest: Option<Digest>,
}

/// Fetch `url` (the seed's or an operator override), following a single
/// meta-refresh hop, normalize the body, and compute its LSH digest.
/// Any network/HTTP failure disables LSH comparison for the whole run but
/// never aborts it (spec §4.3 "Failure").
pub async fn fetch(client: &reqwest::Client, url: &str, algo: Option<LshAlgorithm>) -> Baseline {
    match try_fetch(client, url).await {
        Ok((effective_url, body)) => {
            let digest = algo.map(|_| Digest::compute(&normalize(&body)));
            Baseline { effective_url, digest }
        }
        Err(e) => {
            warn!("baseline fetch failed for {}: {}", url, e);
            Baseline {
                effective_url: url.to_string(),
                digest: None,
            }
        }
    }
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<(String, String)> {
    let resp = client
        .get(url)
        .timeout(DEFAULT_TIMEOUT)
        .send()
        .await
        .map_err(|e| Error::BaselineFetchFailure(e.to_string()))?;

    let mut effective_url = strip_query(resp.url().as_str());
    let body = resp.text().await.map_err(|e| Error::BaselineFetchFailure(e.to_string()))?;

    if is_meta_refresh(&body) {
        if let Some(target) = META_REFRESH.captures(&body).and_then(|c| c.get(1)).map(|m| m.as_str()) {
            let resp2 = client
                .get(target)
                .timeout(DEFAULT_TIMEOUT)
                .send()
                .await
                .map_err(|e| Error::BaselineFetchFailure(e.to_string()))?;
            effective_url = strip_query(resp2.url().as_str());
            let body2 = resp2.text().await.map_err(|e| Error::BaselineFetchFailure(e.to_string()))?;
            return Ok((effective_url, body2));
        }
    }

    Ok((effective_url, body))
}

fn is_meta_refresh(body: &str) -> bool {
    (64..1024).contains(&body.len()) && META_REFRESH.is_match(body)
}

fn strip_query(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

/// Collapse whitespace, scrub volatile attribute values, and scrub
/// `url(...)` CSS references so two pages differing only in dynamic
/// attributes/assets still compare as similar content (spec §4.3).
pub fn normalize(body: &str) -> String {
    let collapsed = WHITESPACE.replace_all(body, " ");
    let scrubbed_attrs = ACTION_SRC_HREF.replace_all(&collapsed, r#"$1=""#);
    let scrubbed_urls = URL_FN.replace_all(&scrubbed_attrs, "url()");
    scrubbed_urls.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        let body = "a   b\n\tc";
        assert_eq!(normalize(body), "a b c");
    }

    #[test]
    fn normalize_scrubs_action_src_href_values() {
        let body = r#"<form action="/login?x=1"><img src="/a.png"></form>"#;
        let out = normalize(body);
        assert!(!out.contains("/login"));
        assert!(!out.contains("/a.png"));
    }

    #[test]
    fn normalize_scrubs_css_url_function() {
        let body = "background: url(/img/bg-12345.png);";
        let out = normalize(body);
        assert!(out.contains("url()"));
    }

    #[test]
    fn strip_query_removes_query_string() {
        assert_eq!(strip_query("https://example.com/x?y=1"), "https://example.com/x");
    }

    #[test]
    fn meta_refresh_heuristic_respects_length_bounds() {
        let short = r#"<meta http-equiv="refresh" content="0; url=http://e.com">"#;
        assert!(is_meta_refresh(short));
        assert!(!is_meta_refresh(""));
    }
}
