//! Punycode (IDNA) normalization and FQDN validation shared by the parser,
//! the permutation engine's post-processing step, and the formatter.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `^(?=.{4,253}$)((?!-)[A-Z0-9-]{1,63}(?<!-)\.)+[A-Z0-9-]{2,63}$`, case-insensitive,
    /// applied to the Punycode (A-label) form. `regex` has no lookbehind, so the
    /// no-leading/trailing-hyphen constraint on each *non-final* label is
    /// re-expressed as an alternation over the label's first/last character.
    /// The final (TLD) component carries no such exclusion in the spec's own
    /// regex — only a `{2,63}` length floor — so it's just `[a-z0-9-]{2,63}`,
    /// no leading/trailing-hyphen alternation.
    static ref FQDN_RE: Regex = Regex::new(
        r"(?i)^(?=.{4,253}$)(([a-z0-9]|[a-z0-9][a-z0-9-]{0,61}[a-z0-9])\.)+[a-z0-9-]{2,63}$"
    ).unwrap();
}

/// Encode a UTF-8 (or already-ASCII) domain to its Punycode A-label form.
pub fn to_ascii(domain: &str) -> Result<String, idna::Errors> {
    idna::domain_to_ascii(domain)
}

/// Decode a Punycode A-label domain back to its Unicode presentation form,
/// for display purposes only (never used to validate user input, per the
/// Non-goals).
pub fn to_unicode_display(domain: &str) -> String {
    let (out, result) = idna::domain_to_unicode(domain);
    if result.is_ok() {
        out
    } else {
        domain.to_string()
    }
}

/// True iff `domain` (expected already in A-label form) matches the FQDN
/// regex of spec §6.
pub fn is_valid_fqdn(domain: &str) -> bool {
    FQDN_RE.is_match(domain)
}

/// IDNA-encode `domain` and validate it against the FQDN regex, discarding
/// it (returning `None`) if either step fails — the fate of every rejected
/// permutation candidate in §4.2's "Post-processing" step.
pub fn normalize_and_validate(domain: &str) -> Option<String> {
    let ascii = to_ascii(domain).ok()?;
    if is_valid_fqdn(&ascii) {
        Some(ascii)
    } else {
        None
    }
}

/// Round-trips `domain` through decode(encode(.)) and checks it returns the
/// same A-label, per the idempotence property of spec §8. Used by the
/// engine's invariant-checking tests, not on the hot path.
pub fn round_trips(domain: &str) -> bool {
    match to_ascii(domain) {
        Ok(ascii) => {
            let (_, res) = idna::domain_to_unicode(&ascii);
            res.is_ok() && to_ascii(&ascii).map(|re_ascii| re_ascii == ascii).unwrap_or(false)
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_fqdn() {
        assert!(is_valid_fqdn("example.com"));
        assert!(is_valid_fqdn("www.example.co.uk"));
    }

    #[test]
    fn rejects_too_short() {
        // "a.b" is 3 characters total (below the {4,253} floor) and its
        // single-char TLD also violates the {2,63} TLD minimum.
        assert!(!is_valid_fqdn("a.b"));
        // "a.co" sits exactly at the 4-character floor and is valid.
        assert!(is_valid_fqdn("a.co"));
    }

    #[test]
    fn rejects_leading_or_trailing_hyphen() {
        assert!(!is_valid_fqdn("-example.com"));
        assert!(!is_valid_fqdn("example-.com"));
    }

    #[test]
    fn rejects_short_tld() {
        assert!(!is_valid_fqdn("example.c"));
    }

    #[test]
    fn allows_hyphen_at_tld_edge() {
        // The spec's literal regex puts no leading/trailing-hyphen exclusion
        // on the final TLD group, unlike every other label.
        assert!(is_valid_fqdn("example.-ab"));
    }

    #[test]
    fn normalizes_unicode_to_punycode() {
        let encoded = normalize_and_validate("pаypal.com").unwrap();
        assert!(encoded.starts_with("xn--"));
    }

    #[test]
    fn round_trip_holds_for_ascii_domains() {
        assert!(round_trips("example.com"));
    }
}
