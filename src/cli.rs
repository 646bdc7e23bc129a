//! Command-line argument parsing. Thin plumbing over the core (named
//! out of scope in spec §1) — this module's only job is to turn `Cli` into
//! a validated `ScanConfig`.

use std::collections::HashSet;
use std::fs;

use clap::Parser;

use crate::config::{LshAlgorithm, OutputFormat, RegistrationFilter, ScanConfig};
use crate::error::{Error, Result};

#[derive(Parser)]
#[command(name = "squatwatch")]
#[command(
    about = "Domain permutation engine and concurrent resolver for homograph phishing, typosquatting and brand-impersonation detection"
)]
#[command(after_help = "Fuzzers (comma-separated names for --fuzzers):
  bitsquatting, homoglyph, hyphenation, insertion, omission, repetition,
  replacement, subdomain, transposition, vowel-swap, addition, plural,
  cyrillic, dictionary, tld-swap, various

Examples:
  squatwatch example.com
  squatwatch --fuzzers homoglyph,bitsquatting --registered example.com
  squatwatch --geoip --banners --mxcheck --whois -f json example.com")]
pub struct Cli {
    /// Seed domain or URL to generate and scan permutations for
    pub domain: String,

    /// Show all DNS records per field instead of truncating to the first
    #[arg(short = 'a', long = "all")]
    pub dns_all: bool,

    /// Show only registered permutations
    #[arg(short = 'r', long)]
    pub registered: bool,

    /// Show only unregistered permutations
    #[arg(short = 'u', long)]
    pub unregistered: bool,

    /// Path to a dictionary file (one lowercase word per line) for the
    /// `dictionary` fuzzer
    #[arg(long, value_name = "FILE")]
    pub dictionary: Option<String>,

    /// Path to a TLD dictionary file (one lowercase TLD per line) for the
    /// `tld-swap` fuzzer and the Parser's TLD split
    #[arg(long, value_name = "FILE")]
    pub tld: Option<String>,

    /// Restrict to these fuzzers (comma-separated); default is all fuzzers
    #[arg(long, value_delimiter = ',')]
    pub fuzzers: Vec<String>,

    /// Comma-separated nameservers to query (host, host:port, or
    /// https://host/dns-query for DoH); default uses the OS resolver
    #[arg(long, value_delimiter = ',')]
    pub nameservers: Vec<String>,

    /// Worker pool size; default is min(32, cpus+4)
    #[arg(long)]
    pub threads: Option<usize>,

    /// User-Agent sent on HTTP and baseline fetches
    #[arg(long, default_value = "Mozilla/5.0 (compatible) squatwatch/0.1.0")]
    pub useragent: String,

    /// Resolve the first A record's GeoIP country name
    #[arg(short = 'g', long)]
    pub geoip: bool,

    /// Collect HTTP and SMTP banners
    #[arg(short = 'b', long)]
    pub banners: bool,

    /// Probe the first MX for catch-all recipient acceptance
    #[arg(short = 'm', long)]
    pub mxcheck: bool,

    /// Compare rendered content against the seed using ssdeep-style LSH
    #[arg(short = 's', long)]
    pub ssdeep: bool,

    /// Compare rendered content against the seed using TLSH
    #[arg(long)]
    pub tlsh: bool,

    /// Override the baseline URL used for content comparison
    #[arg(long = "lsh-url", value_name = "URL")]
    pub lsh_url: Option<String>,

    /// Compute a perceptual hash of each permutation's rendered homepage
    /// (requires --screenshots)
    #[arg(long)]
    pub phash: bool,

    /// Enable headless-browser screenshot capture (required by --phash)
    #[arg(long)]
    pub screenshots: bool,

    /// Look up WHOIS creation/registrar data for registered permutations
    #[arg(short = 'w', long)]
    pub whois: bool,

    /// Output format
    #[arg(short = 'f', long, default_value = "cli")]
    pub format: String,

    /// Enable verbose (debug-level) logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<ScanConfig> {
        if self.registered && self.unregistered {
            return Err(Error::ConfigConflict(
                "--registered and --unregistered are mutually exclusive".into(),
            ));
        }
        if self.ssdeep && self.tlsh {
            return Err(Error::ConfigConflict(
                "--ssdeep and --tlsh are mutually exclusive".into(),
            ));
        }

        let registration_filter = if self.registered {
            RegistrationFilter::RegisteredOnly
        } else if self.unregistered {
            RegistrationFilter::UnregisteredOnly
        } else {
            RegistrationFilter::All
        };

        let lsh = if self.ssdeep {
            Some(LshAlgorithm::Ssdeep)
        } else if self.tlsh {
            Some(LshAlgorithm::Tlsh)
        } else {
            None
        };

        let format = match self.format.as_str() {
            "cli" => OutputFormat::Cli,
            "csv" => OutputFormat::Csv,
            "json" => OutputFormat::Json,
            "list" => OutputFormat::List,
            other => {
                return Err(Error::ConfigConflict(format!(
                    "unknown format '{}', expected cli|csv|json|list",
                    other
                )))
            }
        };

        let dictionary = match &self.dictionary {
            Some(path) => read_word_list(path)?,
            None => Vec::new(),
        };
        let tld_dictionary: HashSet<String> = match &self.tld {
            Some(path) => read_word_list(path)?.into_iter().collect(),
            None => HashSet::new(),
        };

        let fuzzers = if self.fuzzers.is_empty() {
            None
        } else {
            Some(self.fuzzers.into_iter().collect())
        };

        let config = ScanConfig {
            seed: self.domain,
            dns_all: self.dns_all,
            registration_filter,
            dictionary,
            tld_dictionary,
            fuzzers,
            nameservers: self.nameservers,
            threads: self.threads.unwrap_or_else(ScanConfig::default_threads),
            useragent: self.useragent,
            geoip: self.geoip,
            banners: self.banners,
            mxcheck: self.mxcheck,
            lsh,
            lsh_url: self.lsh_url,
            phash: self.phash,
            screenshots: self.screenshots,
            whois: self.whois,
            format,
        };
        config.validate()?;
        Ok(config)
    }
}

fn read_word_list(path: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::ConfigConflict(format!("cannot read '{}': {}", path, e)))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.to_lowercase())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            domain: "example.com".into(),
            dns_all: false,
            registered: false,
            unregistered: false,
            dictionary: None,
            tld: None,
            fuzzers: vec![],
            nameservers: vec![],
            threads: None,
            useragent: "test-agent".into(),
            geoip: false,
            banners: false,
            mxcheck: false,
            ssdeep: false,
            tlsh: false,
            lsh_url: None,
            phash: false,
            screenshots: false,
            whois: false,
            format: "cli".into(),
            verbose: false,
        }
    }

    #[test]
    fn registered_and_unregistered_conflict() {
        let mut c = base_cli();
        c.registered = true;
        c.unregistered = true;
        assert!(c.into_config().is_err());
    }

    #[test]
    fn ssdeep_and_tlsh_conflict() {
        let mut c = base_cli();
        c.ssdeep = true;
        c.tlsh = true;
        assert!(c.into_config().is_err());
    }

    #[test]
    fn unknown_format_rejected() {
        let mut c = base_cli();
        c.format = "xml".into();
        assert!(c.into_config().is_err());
    }

    #[test]
    fn plain_domain_produces_all_filter() {
        let c = base_cli();
        let cfg = c.into_config().unwrap();
        assert_eq!(cfg.registration_filter, RegistrationFilter::All);
    }
}
