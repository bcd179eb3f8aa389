use image::RgbImage;

use crate::detection::find_candidates;
use crate::rectify::rectify;

/// Tunables for one processing run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Median blur kernel size; must be odd
    pub blur_kernel: u8,
    /// Inverse binary threshold cutoff
    pub threshold: u8,
    /// Expected number of photos per scan. Advisory only: detection keeps
    /// every candidate above the area cutoff and never truncates to this.
    pub photos_per_scan: usize,
    /// Report detection and deskew details
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 9,
            threshold: 230,
            photos_per_scan: 1,
            verbose: false,
        }
    }
}

/// Outcome of processing a single scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Deskewed crops in descending candidate-area order
    pub crops: Vec<RgbImage>,
    /// Errors and warnings recovered while processing this scan
    pub errors: u64,
}

/// Running totals over a whole directory run.
///
/// Kept as plain values aggregated by the caller rather than state mutated
/// from inside the pipeline, so each scan's processing stays independent.
#[derive(Debug, Default)]
pub struct RunTotals {
    /// Scan files processed
    pub images: u64,
    /// Photos cropped out of all scans
    pub scans: u64,
    /// Errors and warnings encountered
    pub errors: u64,
}

impl RunTotals {
    pub fn absorb(&mut self, outcome: &ScanOutcome) {
        self.images += 1;
        self.scans += outcome.crops.len() as u64;
        self.errors += outcome.errors;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }
}

/// Process one decoded scan end-to-end: segment it into candidate photo
/// regions, then deskew and crop each one. Per-candidate failures are logged
/// and counted without aborting the rest of the scan.
pub fn process_scan(img: &RgbImage, config: &PipelineConfig) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let candidates = find_candidates(img, config.blur_kernel, config.threshold, config.verbose);
    if candidates.is_empty() {
        eprintln!("Warning: no photo regions found in this scan");
        outcome.errors += 1;
        return outcome;
    }

    if config.verbose && candidates.len() != config.photos_per_scan {
        eprintln!(
            "Expected {} photos in this scan, detected {}",
            config.photos_per_scan,
            candidates.len()
        );
    }

    for candidate in &candidates {
        match rectify(img, candidate, config.verbose) {
            Ok(crop) => outcome.crops.push(crop),
            Err(err) => {
                eprintln!("Error: {err}");
                outcome.errors += 1;
            }
        }
    }

    outcome
}
