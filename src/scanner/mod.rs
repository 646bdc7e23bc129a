//! The Scanner Pool (spec §4.4): drains a queue of permutations with N
//! workers, running each job's stages sequentially and short-circuiting on
//! failure. Grounded in the teacher's `check_domains_concurrent`
//! (`Semaphore` + `futures::stream::buffer_unordered`), generalized from a
//! single status check into the full multi-stage pipeline.

pub mod banners;
pub mod dns;
pub mod geoip;
pub mod mx_probe;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::debug;
use tokio::sync::Semaphore;

use crate::baseline::{self, Baseline};
use crate::config::{LshAlgorithm, ScanConfig};
use crate::lsh;
use crate::model::Permutation;
use crate::parser::ParsedURL;
use crate::phash::{self, AverageHash, ScreenshotProvider};
use crate::scanner::dns::DnsResolver;
use crate::scanner::geoip::GeoIpProvider;

/// Shared, read-only context every worker consults; built once before the
/// pool starts.
pub struct ScannerContext {
    pub config: ScanConfig,
    pub seed: ParsedURL,
    pub resolver: DnsResolver,
    pub http_client: reqwest::Client,
    pub baseline: Baseline,
    pub geoip: Option<Box<dyn GeoIpProvider>>,
    pub screenshot: Option<Box<dyn ScreenshotProvider>>,
    /// Perceptual hash of the baseline homepage's screenshot, captured once
    /// up front the same way `baseline.digest` is computed once for LSH.
    pub baseline_phash: Option<AverageHash>,
}

/// Cooperative stop flag: set from a signal handler or an explicit cancel
/// request; workers check it between jobs (spec §4.4 "Ordering &
/// cancellation").
#[derive(Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct ScannerPool<'a> {
    ctx: &'a ScannerContext,
}

impl<'a> ScannerPool<'a> {
    pub fn new(ctx: &'a ScannerContext) -> Self {
        ScannerPool { ctx }
    }

    /// Enqueue `permutations`, run `threads` workers concurrently via a
    /// semaphore-bounded unordered stream, and return the annotated set
    /// once the queue drains (or the stop flag is observed). `on_complete`
    /// is invoked once per finished job (including skipped ones), letting
    /// the caller drive a progress indicator without the library itself
    /// depending on one.
    pub async fn run(
        &self,
        permutations: Vec<Permutation>,
        stop: StopFlag,
        on_complete: Option<Arc<dyn Fn() + Send + Sync>>,
    ) -> Vec<Permutation> {
        let semaphore = Arc::new(Semaphore::new(self.ctx.config.threads));
        let ctx = self.ctx;

        stream::iter(permutations)
            .map(|mut p| {
                let sem = Arc::clone(&semaphore);
                let stop = stop.clone();
                let on_complete = on_complete.clone();
                async move {
                    let _permit = sem.acquire().await.expect("scanner semaphore closed");
                    if !stop.is_stopped() {
                        process_job(ctx, &mut p).await;
                    }
                    if let Some(cb) = &on_complete {
                        cb();
                    }
                    p
                }
            })
            .buffer_unordered(self.ctx.config.threads)
            .collect()
            .await
    }
}

async fn process_job(ctx: &ScannerContext, p: &mut Permutation) {
    ctx.resolver.resolve(p).await;

    if !p.is_registered() {
        return;
    }

    if ctx.config.mxcheck && p.domain != ctx.seed.domain {
        if let Some(mx) = p.dns_mx.as_ref().and_then(|v| v.first()).cloned() {
            let accepted = mx_probe::probes_as_catch_all(&mx, &ctx.seed.domain, &p.domain).await;
            p.mx_spy = Some(crate::model::MxProbe {
                accepts_any_recipient: accepted,
            });
        }
    }

    let first_a = p.dns_a.as_ref().and_then(|v| v.first()).cloned();

    if ctx.config.geoip {
        if let (Some(provider), Some(ip)) = (&ctx.geoip, &first_a) {
            if let Ok(addr) = ip.parse() {
                p.geoip = provider.lookup_country(addr);
            }
        }
    }

    if ctx.config.banners {
        if let Some(ip) = &first_a {
            p.banner_http = banners::http_banner(ip, &p.domain, &ctx.config.useragent).await;
        }
        if let Some(mx_list) = &p.dns_mx {
            if let Some(mx) = mx_list.first() {
                p.banner_smtp = banners::smtp_banner(mx).await;
            }
        }
    }

    if let Some(algo) = ctx.config.lsh {
        if let Some(baseline_digest) = &ctx.baseline.digest {
            content_compare(ctx, p, algo, baseline_digest).await;
        }
    }

    if ctx.config.phash {
        if let (Some(provider), Some(baseline_hash)) = (&ctx.screenshot, &ctx.baseline_phash) {
            phash_compare(ctx, p, provider.as_ref(), baseline_hash).await;
        }
    }

    debug!("scanned {}", p.domain);
}

async fn content_compare(ctx: &ScannerContext, p: &mut Permutation, algo: LshAlgorithm, baseline_digest: &lsh::Digest) {
    let uri = ctx.seed.full_uri(Some(&p.domain));
    let resp = match ctx
        .http_client
        .get(&uri)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
    {
        Ok(r) => r,
        Err(_) => return,
    };

    let effective_url = resp.url().as_str().split('?').next().unwrap_or("").to_string();
    if effective_url == ctx.baseline.effective_url {
        // Exact same origin served; skip per spec §4.4 item 6.
        return;
    }

    let body = match resp.text().await {
        Ok(b) => b,
        Err(_) => return,
    };
    let digest = lsh::Digest::compute(&baseline::normalize(&body));
    p.lsh_score = Some(lsh::similarity(baseline_digest, &digest, algo));
}

/// Capture and hash `p`'s rendered homepage, then score it against the
/// precomputed `baseline_hash` (spec §4.4 item 5 / §6's average-hash formula).
async fn phash_compare(
    ctx: &ScannerContext,
    p: &mut Permutation,
    provider: &dyn ScreenshotProvider,
    baseline_hash: &AverageHash,
) {
    let uri = ctx.seed.full_uri(Some(&p.domain));
    let Some(bytes) = provider.capture(&uri).await else {
        return;
    };
    if let Some(hash) = AverageHash::compute(&bytes) {
        p.phash_score = Some(phash::similarity(baseline_hash, &hash));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_flag_starts_clear_and_latches() {
        let flag = StopFlag::new();
        assert!(!flag.is_stopped());
        flag.request_stop();
        assert!(flag.is_stopped());
    }

    #[test]
    fn stop_flag_clone_shares_state() {
        let flag = StopFlag::new();
        let clone = flag.clone();
        clone.request_stop();
        assert!(flag.is_stopped());
    }
}
