//! Error taxonomy for the engine and scanner.
//!
//! Per-job scan errors (DNS timeouts, refused connections, ServFail) are never
//! represented here — they are caught at the stage boundary inside the scanner
//! worker and become the absence of an annotation on the `Permutation` instead.
//! Only startup-fatal and whole-run conditions reach this type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The seed URL/hostname failed validation in the parser. Fatal at startup.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Mutually exclusive flags, or a capability explicitly requested but
    /// unavailable (e.g. `--geoip` without the `geoip` feature). Fatal at startup.
    #[error("configuration conflict: {0}")]
    ConfigConflict(String),

    /// An optional library or data file a requested capability needs is
    /// absent or unusable (e.g. the GeoIP database path doesn't open). Fatal
    /// at startup, since the capability was explicitly requested.
    #[error("dependency missing: {0}")]
    DependencyMissing(String),

    /// The resolver itself could not be constructed (bad `--nameservers`
    /// value, malformed DoH URL). Distinct from a single job's DNS timeout,
    /// which never reaches this type. Fatal at startup.
    #[error("transient network error: {0}")]
    TransientNetworkError(String),

    /// The baseline LSH fetch failed outright. Disables LSH comparison for the
    /// whole run; the run continues.
    #[error("baseline fetch failed: {0}")]
    BaselineFetchFailure(String),
}
