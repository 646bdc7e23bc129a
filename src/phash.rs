//! Perceptual hash of a rendered screenshot (spec §4.4 item 5, §6).
//!
//! The headless-browser driver itself is named only as an interface in
//! spec §1 ("the optional headless-browser screenshot feature — only its
//! interface is named"); this module implements the hash/similarity math
//! against whatever `ScreenshotProvider` impl the caller supplies.

use image::{imageops::FilterType, GenericImageView};

/// Supplies a rendered screenshot for a homepage URL. No concrete
/// WebDriver-backed implementation is provided, per the Non-goals; callers
/// inject one when the `screenshots` feature is enabled.
#[async_trait::async_trait]
pub trait ScreenshotProvider: Send + Sync {
    async fn capture(&self, url: &str) -> Option<Vec<u8>>;
}

/// An 8x8 average-hash digest: 64 bits, one per grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AverageHash(u64);

impl AverageHash {
    /// Decode `image_bytes`, resize to 8x8 grayscale with a Lanczos filter,
    /// and set bit `i` iff pixel `i` is brighter than the mean.
    pub fn compute(image_bytes: &[u8]) -> Option<Self> {
        let img = image::load_from_memory(image_bytes).ok()?;
        let small = img.resize_exact(8, 8, FilterType::Lanczos3).grayscale();

        let mut pixels = [0u32; 64];
        for (i, (_, _, px)) in small.pixels().enumerate().take(64) {
            pixels[i] = px.0[0] as u32;
        }
        let mean = pixels.iter().sum::<u32>() / 64;

        let mut bits: u64 = 0;
        for (i, &p) in pixels.iter().enumerate() {
            if p > mean {
                bits |= 1 << i;
            }
        }
        Some(AverageHash(bits))
    }

    pub fn hamming_distance(&self, other: &AverageHash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

/// `max(0, floor((1 + e^((64 - hamming)/64) - e) * 100))`, spec §6 exactly.
pub fn similarity(a: &AverageHash, b: &AverageHash) -> u8 {
    let hamming = a.hamming_distance(b) as f64;
    let e = std::f64::consts::E;
    let raw = (1.0 + ((64.0 - hamming) / 64.0).exp() - e) * 100.0;
    raw.max(0.0).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_hash_scores_maximum_similarity() {
        let a = AverageHash(0b1010_1010);
        assert_eq!(similarity(&a, &a), 100);
    }

    #[test]
    fn fully_inverted_hash_scores_near_zero() {
        let a = AverageHash(0);
        let b = AverageHash(u64::MAX);
        assert_eq!(a.hamming_distance(&b), 64);
        assert_eq!(similarity(&a, &b), 0);
    }

    #[test]
    fn partial_difference_scores_between_bounds() {
        let a = AverageHash(0);
        let b = AverageHash(0xFF);
        let score = similarity(&a, &b);
        assert!(score < 100);
    }
}
