//! The `Permutation` record: a fuzzer tag plus a domain candidate, annotated
//! in place as the scanner pool works through the pipeline stages.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// One SMTP MX-probe outcome.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct MxProbe {
    pub accepts_any_recipient: bool,
}

/// A single candidate domain produced by a fuzzer, carrying whatever
/// annotations the scanner pool managed to attach. `fuzzer` and `domain` are
/// set at construction and never change; every other field starts `None`
/// and is filled in by its corresponding stage, or stays `None` if the stage
/// short-circuited or the job was never scheduled for it.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Permutation {
    pub fuzzer: String,
    pub domain: String,

    pub dns_ns: Option<Vec<String>>,
    pub dns_a: Option<Vec<String>>,
    pub dns_aaaa: Option<Vec<String>>,
    pub dns_mx: Option<Vec<String>>,

    pub mx_spy: Option<MxProbe>,
    pub banner_http: Option<String>,
    pub banner_smtp: Option<String>,
    pub geoip: Option<String>,

    /// Populated from either the `ssdeep` or `tlsh` config branch; which one
    /// ran is implied by `ScanConfig`, not recorded per-permutation.
    pub lsh_score: Option<u8>,
    pub phash_score: Option<u8>,

    pub whois_registrar: Option<String>,
    pub whois_created: Option<String>,
    pub whois_updated: Option<String>,
}

impl Permutation {
    pub fn new(fuzzer: impl Into<String>, domain: impl Into<String>) -> Self {
        Permutation {
            fuzzer: fuzzer.into(),
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// True once any DNS record is present, matching the "any record beyond
    /// the bare tuple" registered-domain predicate of spec §4.3.
    pub fn is_registered(&self) -> bool {
        self.dns_ns.is_some()
            || self.dns_a.is_some()
            || self.dns_aaaa.is_some()
            || self.dns_mx.is_some()
    }

    /// True for the seed domain itself, always the first row emitted.
    pub fn is_original(&self) -> bool {
        self.fuzzer == "*original"
    }

    fn sort_key(&self) -> (bool, &str, &str) {
        let first_a = self
            .dns_a
            .as_ref()
            .and_then(|v| v.first())
            .map(String::as_str)
            .unwrap_or("");
        (!self.is_original(), first_a, self.domain.as_str())
    }
}

/// Two permutations are equal iff their domains match — the dedup key
/// throughout the engine and scanner, regardless of which fuzzer produced
/// them or what annotations they carry.
impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain
    }
}
impl Eq for Permutation {}

impl Hash for Permutation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain.hash(state);
    }
}

/// `*original` sorts first; the rest order by first A record (if any), then
/// lexically by domain, so resolvable hosts cluster together in output.
impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Permutation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_sorts_first() {
        let mut v = vec![
            Permutation::new("bitsquatting", "examp1e.com"),
            Permutation::new("*original", "example.com"),
        ];
        v.sort();
        assert!(v[0].is_original());
    }

    #[test]
    fn equality_ignores_fuzzer() {
        let a = Permutation::new("bitsquatting", "examp1e.com");
        let b = Permutation::new("homoglyph", "examp1e.com");
        assert_eq!(a, b);
    }

    #[test]
    fn registered_requires_a_dns_field() {
        let mut p = Permutation::new("omission", "exmple.com");
        assert!(!p.is_registered());
        p.dns_ns = Some(vec!["ns1.exmple.com".into()]);
        assert!(p.is_registered());
    }
}
