//! Validated run configuration, built from the `Cli` clap struct and threaded
//! through the engine, baseline fetcher and scanner pool.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Which LSH algorithm the Baseline Fetcher and Scanner Pool use for content
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LshAlgorithm {
    Ssdeep,
    Tlsh,
}

/// Output rendering selected for the Result Formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Cli,
    Csv,
    Json,
    List,
}

/// Mutually-exclusive registration filter applied by the Formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationFilter {
    All,
    RegisteredOnly,
    UnregisteredOnly,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub seed: String,

    pub dns_all: bool,
    pub registration_filter: RegistrationFilter,

    pub dictionary: Vec<String>,
    pub tld_dictionary: HashSet<String>,
    pub fuzzers: Option<HashSet<String>>,

    pub nameservers: Vec<String>,
    pub threads: usize,
    pub useragent: String,

    pub geoip: bool,
    pub banners: bool,
    pub mxcheck: bool,

    pub lsh: Option<LshAlgorithm>,
    pub lsh_url: Option<String>,

    pub phash: bool,
    pub screenshots: bool,

    pub whois: bool,

    pub format: OutputFormat,
}

impl ScanConfig {
    /// Default worker count, spec §4.4: `min(32, cpus + 4)`.
    pub fn default_threads() -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        (cpus + 4).min(32)
    }

    /// Validate cross-field constraints not expressible in the CLI parser
    /// itself, per spec §7's `ConfigConflict` kind.
    pub fn validate(&self) -> Result<()> {
        if self.phash && !self.screenshots {
            return Err(Error::ConfigConflict(
                "phash requires the screenshots capability to be enabled".into(),
            ));
        }
        #[cfg(not(feature = "screenshots"))]
        if self.screenshots {
            return Err(Error::ConfigConflict(
                "screenshots requested but the crate was built without the 'screenshots' feature".into(),
            ));
        }
        #[cfg(not(feature = "geoip"))]
        if self.geoip {
            return Err(Error::ConfigConflict(
                "geoip requested but the crate was built without the 'geoip' feature".into(),
            ));
        }
        if self.threads == 0 {
            return Err(Error::ConfigConflict("threads must be greater than 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ScanConfig {
        ScanConfig {
            seed: "example.com".into(),
            dns_all: false,
            registration_filter: RegistrationFilter::All,
            dictionary: vec![],
            tld_dictionary: HashSet::new(),
            fuzzers: None,
            nameservers: vec![],
            threads: ScanConfig::default_threads(),
            useragent: "Mozilla/5.0 squatwatch/0.1.0".into(),
            geoip: false,
            banners: false,
            mxcheck: false,
            lsh: None,
            lsh_url: None,
            phash: false,
            screenshots: false,
            whois: false,
            format: OutputFormat::Cli,
        }
    }

    #[test]
    fn zero_threads_is_a_config_conflict() {
        let mut c = base_config();
        c.threads = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn phash_without_screenshots_is_a_config_conflict() {
        let mut c = base_config();
        c.phash = true;
        c.screenshots = false;
        assert!(c.validate().is_err());
    }

    #[test]
    fn default_threads_is_capped_at_32() {
        assert!(ScanConfig::default_threads() <= 32);
    }
}
