use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use squatwatch::cli::Cli;
use squatwatch::config::ScanConfig;
use squatwatch::error::Error;
use squatwatch::fuzz::Engine;
use squatwatch::parser::ParsedURL;
use squatwatch::phash::{AverageHash, ScreenshotProvider};
use squatwatch::scanner::geoip::GeoIpProvider;
use squatwatch::scanner::{ScannerContext, ScannerPool, StopFlag};
use squatwatch::{baseline, format, whois};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config: ScanConfig = cli.into_config()?;

    let seed = ParsedURL::parse(&config.seed)?;
    let triple = seed.triple(if config.tld_dictionary.is_empty() {
        None
    } else {
        Some(&config.tld_dictionary)
    });

    let fuzzers = config.fuzzers.as_ref();
    let engine = Engine::new(triple, &config.dictionary, &config.tld_dictionary, fuzzers);
    let permutations = engine.generate();
    info!("generated {} permutations for {}", permutations.len(), seed.domain);

    let http_client = reqwest::Client::builder()
        .user_agent(config.useragent.clone())
        .gzip(true)
        .build()
        .map_err(|e| Error::ConfigConflict(format!("cannot build HTTP client: {}", e)))?;

    let baseline_url = config.lsh_url.clone().unwrap_or_else(|| seed.full_uri(None));
    let baseline = baseline::fetch(&http_client, &baseline_url, config.lsh).await;

    let resolver = squatwatch::scanner::dns::DnsResolver::new(&config.nameservers)?;

    let geoip: Option<Box<dyn GeoIpProvider>> = resolve_geoip_provider(&config)?;

    let screenshot: Option<Box<dyn ScreenshotProvider>> = resolve_screenshot_provider(&config);
    let baseline_phash = capture_baseline_phash(&config, &baseline_url, screenshot.as_deref()).await;

    let threads = config.threads;
    let ctx = ScannerContext {
        config,
        seed,
        resolver,
        http_client,
        baseline,
        geoip,
        screenshot,
        baseline_phash,
    };

    let stop = StopFlag::new();
    let progress = build_progress_bar(permutations.len() as u64);
    let on_complete: Arc<dyn Fn() + Send + Sync> = {
        let progress = progress.clone();
        Arc::new(move || progress.inc(1))
    };

    let pool = ScannerPool::new(&ctx);
    let scanned = pool.run(permutations, stop, Some(on_complete)).await;
    progress.finish_and_clear();

    let scanned = if ctx.config.whois {
        run_whois_stage(scanned).await
    } else {
        scanned
    };

    let selected = format::select(scanned, ctx.config.registration_filter);
    let colorize = ctx.config.format == squatwatch::config::OutputFormat::Cli && is_tty();
    let rendered = format::render(&selected, ctx.config.format, ctx.config.dns_all, colorize);
    println!("{}", rendered);

    Ok(())
}

#[cfg(feature = "geoip")]
fn resolve_geoip_provider(config: &ScanConfig) -> Result<Option<Box<dyn GeoIpProvider>>, Error> {
    if !config.geoip {
        return Ok(None);
    }
    // The database path is external plumbing (spec §1's "file I/O for
    // dictionary/TLD/screenshot paths" out-of-scope note applies equally
    // to the GeoIP database); GEOIP_DB_PATH is the operator's handoff.
    let path = std::env::var("GEOIP_DB_PATH")
        .map_err(|_| Error::DependencyMissing("GEOIP_DB_PATH not set; --geoip requires it".into()))?;
    let provider = squatwatch::scanner::geoip::MaxMindProvider::open(&path)?;
    Ok(Some(Box::new(provider)))
}

#[cfg(not(feature = "geoip"))]
fn resolve_geoip_provider(_config: &ScanConfig) -> Result<Option<Box<dyn GeoIpProvider>>, Error> {
    Ok(None)
}

/// No concrete WebDriver-backed `ScreenshotProvider` ships with this crate —
/// spec §1 names only the interface, not an implementation. When `--phash`
/// is requested anyway, log the missing dependency and disable the feature
/// for this run rather than leaving it silently inert (the contract
/// `Error::DependencyMissing` documents).
fn resolve_screenshot_provider(config: &ScanConfig) -> Option<Box<dyn ScreenshotProvider>> {
    if !config.phash {
        return None;
    }
    warn!("phash requested but no ScreenshotProvider is configured; disabling phash for this run");
    None
}

/// Capture and hash the baseline homepage once, up front, the same way the
/// LSH baseline digest is computed once in `baseline::fetch` rather than
/// per-job.
async fn capture_baseline_phash(
    config: &ScanConfig,
    baseline_url: &str,
    screenshot: Option<&dyn ScreenshotProvider>,
) -> Option<AverageHash> {
    if !config.phash {
        return None;
    }
    let provider = screenshot?;
    match provider.capture(baseline_url).await {
        Some(bytes) => AverageHash::compute(&bytes),
        None => {
            warn!("failed to capture baseline screenshot at {}; disabling phash for this run", baseline_url);
            None
        }
    }
}

async fn run_whois_stage(mut permutations: Vec<squatwatch::Permutation>) -> Vec<squatwatch::Permutation> {
    // Serialized, single-threaded, after the scan phase (spec §5) to
    // respect WHOIS provider rate limits.
    for p in permutations.iter_mut() {
        if !p.is_registered() {
            continue;
        }
        if let Some(record) = whois::lookup(&p.domain).await {
            p.whois_registrar = record.registrar;
            p.whois_created = record.created;
            p.whois_updated = record.updated;
        }
    }
    permutations
}

fn build_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb.set_message("scanning permutations...");
    pb
}

fn is_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
