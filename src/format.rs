//! Result Formatter (spec §4.5): renders the final permutation set as
//! cli/csv/json/list, applying the registration filter and `dns_all`
//! truncation first.

use serde_json::json;

use crate::config::{OutputFormat, RegistrationFilter};
use crate::idna_util;
use crate::model::Permutation;

/// Apply the registration filter and sort the set per spec §3's ordering
/// rule (original first, then by first A record, else by domain).
pub fn select(mut permutations: Vec<Permutation>, filter: RegistrationFilter) -> Vec<Permutation> {
    permutations.retain(|p| match filter {
        RegistrationFilter::All => true,
        RegistrationFilter::RegisteredOnly => p.is_registered(),
        RegistrationFilter::UnregisteredOnly => !p.is_original() && !p.is_registered(),
    });
    permutations.sort();
    permutations
}

pub fn render(permutations: &[Permutation], format: OutputFormat, dns_all: bool, colorize: bool) -> String {
    match format {
        OutputFormat::Cli => render_cli(permutations, dns_all, colorize),
        OutputFormat::Csv => render_csv(permutations, dns_all),
        OutputFormat::Json => render_json(permutations, dns_all),
        OutputFormat::List => render_list(permutations),
    }
}

fn first_or_all<'a>(field: &'a Option<Vec<String>>, dns_all: bool) -> Option<Vec<&'a str>> {
    field.as_ref().map(|v| {
        if dns_all {
            v.iter().map(String::as_str).collect()
        } else {
            v.first().into_iter().map(String::as_str).collect()
        }
    })
}

const FG_CYAN: &str = "\x1b[96m";
const FG_YELLOW: &str = "\x1b[93m";
const FG_RESET: &str = "\x1b[0m";

fn color(s: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("{}{}{}", code, s, FG_RESET)
    } else {
        s.to_string()
    }
}

fn render_cli(permutations: &[Permutation], dns_all: bool, colorize: bool) -> String {
    let fuzzer_width = permutations.iter().map(|p| p.fuzzer.len()).max().unwrap_or(0);
    let domain_width = permutations.iter().map(|p| p.domain.len()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(permutations.len());
    for p in permutations {
        let mut line = format!(
            "{:<fw$} {:<dw$}",
            p.fuzzer,
            idna_util::to_unicode_display(&p.domain),
            fw = fuzzer_width,
            dw = domain_width
        );

        if let Some(ns) = first_or_all(&p.dns_ns, dns_all) {
            line.push_str(&format!(" {}={}", color("NS", FG_CYAN, colorize), ns.join(";")));
        }
        if let Some(a) = first_or_all(&p.dns_a, dns_all) {
            line.push_str(&format!(" A={}", a.join(";")));
            if let Some(geo) = &p.geoip {
                line.push_str(&format!("/{}", color(geo, FG_YELLOW, colorize)));
            }
        }
        if let Some(aaaa) = first_or_all(&p.dns_aaaa, dns_all) {
            line.push_str(&format!(" AAAA={}", aaaa.join(";")));
        }
        if let Some(mx) = first_or_all(&p.dns_mx, dns_all) {
            let label = if p.mx_spy.as_ref().is_some_and(|m| m.accepts_any_recipient) {
                "SPYING-MX"
            } else {
                "MX"
            };
            line.push_str(&format!(" {}={}", color(label, FG_CYAN, colorize), mx.join(";")));
        }
        if let Some(banner) = &p.banner_http {
            line.push_str(&format!(" {}=\"{}\"", color("HTTP", FG_CYAN, colorize), banner));
        }
        if let Some(banner) = &p.banner_smtp {
            line.push_str(&format!(" {}=\"{}\"", color("SMTP", FG_CYAN, colorize), banner));
        }
        match (&p.whois_created, &p.whois_updated) {
            (Some(c), Some(u)) if c == u => line.push_str(&format!(" CREATED/UPDATED={}", c)),
            (Some(c), Some(u)) => line.push_str(&format!(" CREATED={} UPDATED={}", c, u)),
            (Some(c), None) => line.push_str(&format!(" CREATED={}", c)),
            (None, Some(u)) => line.push_str(&format!(" UPDATED={}", u)),
            (None, None) => {}
        }
        if let Some(registrar) = &p.whois_registrar {
            line.push_str(&format!(" REGISTRAR=\"{}\"", registrar));
        }
        if let Some(score) = p.lsh_score {
            line.push_str(&format!(" LSH={}%", score));
        }
        if let Some(score) = p.phash_score {
            line.push_str(&format!(" PHASH={}%", score));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_field(field: &Option<Vec<String>>, dns_all: bool) -> String {
    first_or_all(field, dns_all)
        .map(|v| v.join(";"))
        .unwrap_or_default()
}

/// Stable header `fuzzer,domain,...` with remaining fields alphabetized.
fn render_csv(permutations: &[Permutation], dns_all: bool) -> String {
    let header = "fuzzer,domain,banner_http,banner_smtp,dns_a,dns_aaaa,dns_mx,dns_ns,geoip,lsh_score,mx_spy,phash_score,whois_created,whois_registrar,whois_updated";
    let mut rows = vec![header.to_string()];
    for p in permutations {
        let fields = [
            csv_escape(&p.fuzzer),
            csv_escape(&p.domain),
            csv_escape(&p.banner_http.clone().unwrap_or_default()),
            csv_escape(&p.banner_smtp.clone().unwrap_or_default()),
            csv_field(&p.dns_a, dns_all),
            csv_field(&p.dns_aaaa, dns_all),
            csv_field(&p.dns_mx, dns_all),
            csv_field(&p.dns_ns, dns_all),
            csv_escape(&p.geoip.clone().unwrap_or_default()),
            p.lsh_score.map(|v| v.to_string()).unwrap_or_default(),
            p.mx_spy.as_ref().map(|m| m.accepts_any_recipient.to_string()).unwrap_or_default(),
            p.phash_score.map(|v| v.to_string()).unwrap_or_default(),
            csv_escape(&p.whois_created.clone().unwrap_or_default()),
            csv_escape(&p.whois_registrar.clone().unwrap_or_default()),
            csv_escape(&p.whois_updated.clone().unwrap_or_default()),
        ];
        rows.push(fields.join(","));
    }
    rows.join("\n")
}

fn render_json(permutations: &[Permutation], dns_all: bool) -> String {
    let values: Vec<serde_json::Value> = permutations
        .iter()
        .map(|p| {
            json!({
                "fuzzer": p.fuzzer,
                "domain": p.domain,
                "dns_a": first_or_all(&p.dns_a, dns_all),
                "dns_aaaa": first_or_all(&p.dns_aaaa, dns_all),
                "dns_mx": first_or_all(&p.dns_mx, dns_all),
                "dns_ns": first_or_all(&p.dns_ns, dns_all),
                "geoip": p.geoip,
                "banner_http": p.banner_http,
                "banner_smtp": p.banner_smtp,
                "mx_spy": p.mx_spy.as_ref().map(|m| m.accepts_any_recipient),
                "lsh_score": p.lsh_score,
                "phash_score": p.phash_score,
                "whois_created": p.whois_created,
                "whois_updated": p.whois_updated,
                "whois_registrar": p.whois_registrar,
            })
        })
        .collect();
    serde_json::to_string_pretty(&json!(values)).unwrap_or_default()
}

fn render_list(permutations: &[Permutation]) -> String {
    permutations.iter().map(|p| p.domain.clone()).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Permutation> {
        let mut original = Permutation::new("*original", "example.com");
        original.dns_a = Some(vec!["93.184.216.34".to_string()]);
        let mut variant = Permutation::new("omission", "exmple.com");
        variant.dns_a = Some(vec!["1.2.3.4".to_string(), "1.2.3.5".to_string()]);
        vec![variant, original]
    }

    #[test]
    fn select_sorts_original_first() {
        let out = select(sample(), RegistrationFilter::All);
        assert!(out[0].is_original());
    }

    #[test]
    fn registered_filter_drops_unregistered() {
        let mut set = sample();
        set.push(Permutation::new("omission", "nope.com"));
        let out = select(set, RegistrationFilter::RegisteredOnly);
        assert!(out.iter().all(|p| p.is_registered()));
    }

    #[test]
    fn unregistered_filter_always_excludes_original_even_when_registered() {
        let mut set = sample();
        set.push(Permutation::new("omission", "nope.com"));
        let out = select(set, RegistrationFilter::UnregisteredOnly);
        assert!(!out.iter().any(|p| p.is_original()));
        assert!(out.iter().all(|p| !p.is_registered()));
        assert!(out.iter().any(|p| p.domain == "nope.com"));
    }

    #[test]
    fn list_format_is_one_domain_per_line() {
        let out = render(&sample(), OutputFormat::List, false, false);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn dns_all_false_truncates_to_first_element() {
        let out = render(&sample(), OutputFormat::Cli, false, false);
        assert!(out.contains("A=1.2.3.4"));
        assert!(!out.contains("1.2.3.5"));
    }

    #[test]
    fn dns_all_true_shows_every_element() {
        let out = render(&sample(), OutputFormat::Cli, true, false);
        assert!(out.contains("1.2.3.4;1.2.3.5"));
    }

    #[test]
    fn csv_header_is_stable() {
        let out = render(&sample(), OutputFormat::Csv, false, false);
        assert!(out.lines().next().unwrap().starts_with("fuzzer,domain,"));
    }

    #[test]
    fn csv_quotes_fields_containing_commas() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("plain"), "plain");
    }

    #[test]
    fn json_output_is_valid_and_sorted_array() {
        let out = render(&sample(), OutputFormat::Json, false, false);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(parsed.is_array());
    }
}
