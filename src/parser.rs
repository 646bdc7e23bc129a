//! URL/Domain Parser: turns a free-form seed string into a `ParsedURL`, and
//! splits its hostname into the `(subdomain, label, tld)` triple the
//! Permutation Engine fuzzes.

use lazy_static::lazy_static;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::idna_util;

lazy_static! {
    /// Fallback compound-ccTLD set used when no TLD dictionary is supplied.
    static ref COMPOUND_TLDS: HashSet<&'static str> = [
        "org", "com", "net", "gov", "edu", "co", "mil", "nom", "ac", "info", "biz", "ne",
    ]
    .into_iter()
    .collect();
}

/// A validated, immutable view of the seed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedURL {
    pub scheme: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub domain: String,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl ParsedURL {
    /// Parse `input`, prefixing `http://` when it has no scheme separator.
    pub fn parse(input: &str) -> Result<Self> {
        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        let url = url::Url::parse(&with_scheme)
            .map_err(|e| Error::InvalidInput(format!("cannot parse '{}': {}", input, e)))?;

        let scheme = url.scheme().to_string();
        if scheme != "http" && scheme != "https" {
            return Err(Error::InvalidInput(format!(
                "unsupported scheme '{}', expected http or https",
                scheme
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidInput(format!("'{}' has no hostname", input)))?
            .to_lowercase();

        if host.is_empty() || host.len() > 253 {
            return Err(Error::InvalidInput(format!(
                "hostname '{}' has invalid length",
                host
            )));
        }

        let domain = idna_util::to_ascii(&host)
            .map_err(|e| Error::InvalidInput(format!("IDNA encoding failed for '{}': {:?}", host, e)))?;

        if !idna_util::is_valid_fqdn(&domain) {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a valid FQDN",
                domain
            )));
        }

        if !idna_util::round_trips(&domain) {
            return Err(Error::InvalidInput(format!(
                "'{}' does not round-trip through IDNA decode",
                domain
            )));
        }

        Ok(ParsedURL {
            scheme,
            user: non_empty(url.username()),
            password: url.password().map(str::to_string),
            port: url.port(),
            domain,
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            fragment: url.fragment().map(str::to_string),
        })
    }

    /// Reconstruct a canonical URI, substituting `alt_domain` for this
    /// parser's domain when given — used by the Scanner to fetch a
    /// permutation's homepage with the seed's scheme/path/query.
    pub fn full_uri(&self, alt_domain: Option<&str>) -> String {
        let domain = alt_domain.unwrap_or(&self.domain);
        let mut uri = format!("{}://{}", self.scheme, domain);
        if let Some(port) = self.port {
            uri.push(':');
            uri.push_str(&port.to_string());
        }
        uri.push_str(&self.path);
        if let Some(q) = &self.query {
            uri.push('?');
            uri.push_str(q);
        }
        if let Some(f) = &self.fragment {
            uri.push('#');
            uri.push_str(f);
        }
        uri
    }

    /// Split `self.domain` into its `(subdomain, label, tld)` triple.
    pub fn triple(&self, tld_dictionary: Option<&HashSet<String>>) -> DomainTriple {
        DomainTriple::split(&self.domain, tld_dictionary)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// `(subdomain, label, tld)` derived from an A-label FQDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTriple {
    pub subdomain: String,
    pub label: String,
    pub tld: String,
}

impl DomainTriple {
    /// Split policy (spec §3): if a TLD dictionary is available, match the
    /// longest matching TLD suffix; otherwise fall back to the built-in
    /// compound-ccTLD set — for `a.b.c.d`, if `c` is a compound-set member,
    /// `c.d` is the TLD, else `d` alone is.
    pub fn split(fqdn: &str, tld_dictionary: Option<&HashSet<String>>) -> Self {
        let parts: Vec<&str> = fqdn.split('.').collect();

        if let Some(dict) = tld_dictionary {
            if let Some((tld, rest_len)) = longest_tld_match(&parts, dict) {
                let label = parts[rest_len - 1].to_string();
                let subdomain = parts[..rest_len - 1].join(".");
                return DomainTriple { subdomain, label, tld };
            }
        }

        if parts.len() >= 3 {
            let second_last = parts[parts.len() - 2];
            if COMPOUND_TLDS.contains(second_last) {
                let tld = format!("{}.{}", second_last, parts[parts.len() - 1]);
                let label = parts[parts.len() - 3].to_string();
                let subdomain = parts[..parts.len() - 3].join(".");
                return DomainTriple { subdomain, label, tld };
            }
        }

        let tld = parts.last().copied().unwrap_or("").to_string();
        let label = if parts.len() >= 2 {
            parts[parts.len() - 2].to_string()
        } else {
            String::new()
        };
        let subdomain = if parts.len() >= 2 {
            parts[..parts.len() - 2].join(".")
        } else {
            String::new()
        };
        DomainTriple { subdomain, label, tld }
    }

    /// Rejoin the triple into an FQDN, substituting `label`/`tld` if given.
    pub fn join(&self, label: Option<&str>, tld: Option<&str>) -> String {
        let label = label.unwrap_or(&self.label);
        let tld = tld.unwrap_or(&self.tld);
        let mut segments = Vec::new();
        if !self.subdomain.is_empty() {
            segments.push(self.subdomain.as_str());
        }
        segments.push(label);
        segments.push(tld);
        segments.join(".")
    }
}

/// Longest dictionary-TLD suffix match over `parts`; returns the matched
/// TLD string and the index one-past the label.
fn longest_tld_match(parts: &[&str], dict: &HashSet<String>) -> Option<(String, usize)> {
    let mut best: Option<(String, usize)> = None;
    for start in 0..parts.len() {
        let candidate = parts[start..].join(".");
        if dict.contains(&candidate) {
            if best.as_ref().map(|(t, _)| candidate.len() > t.len()).unwrap_or(true) {
                best = Some((candidate, start));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hostname_gets_http_prefix() {
        let p = ParsedURL::parse("example.com").unwrap();
        assert_eq!(p.scheme, "http");
        assert_eq!(p.domain, "example.com");
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(ParsedURL::parse("ftp://example.com").is_err());
    }

    #[test]
    fn full_uri_substitutes_alt_domain() {
        let p = ParsedURL::parse("https://example.com/login?x=1").unwrap();
        assert_eq!(p.full_uri(Some("examp1e.com")), "https://examp1e.com/login?x=1");
        assert_eq!(p.full_uri(None), "https://example.com/login?x=1");
    }

    #[test]
    fn simple_tld_splits_two_labels() {
        let t = DomainTriple::split("example.com", None);
        assert_eq!(t.subdomain, "");
        assert_eq!(t.label, "example");
        assert_eq!(t.tld, "com");
    }

    #[test]
    fn compound_tld_fallback_splits_three_labels() {
        let t = DomainTriple::split("example.co.uk", None);
        assert_eq!(t.subdomain, "");
        assert_eq!(t.label, "example");
        assert_eq!(t.tld, "co.uk");
    }

    #[test]
    fn subdomain_preserved_ahead_of_compound_tld() {
        let t = DomainTriple::split("www.example.co.uk", None);
        assert_eq!(t.subdomain, "www");
        assert_eq!(t.label, "example");
        assert_eq!(t.tld, "co.uk");
    }

    #[test]
    fn tld_dictionary_overrides_compound_set() {
        let mut dict = HashSet::new();
        dict.insert("co.uk".to_string());
        let t = DomainTriple::split("example.co.uk", Some(&dict));
        assert_eq!(t.label, "example");
        assert_eq!(t.tld, "co.uk");
    }

    #[test]
    fn join_roundtrips_simple_domain() {
        let t = DomainTriple::split("example.com", None);
        assert_eq!(t.join(None, None), "example.com");
        assert_eq!(t.join(Some("examp1e"), None), "examp1e.com");
    }
}
