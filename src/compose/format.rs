//! Canvas size selection.

use crate::config::{FormatCandidate, FormatSpec};

use super::error::ComposeError;

/// Concrete canvas dimensions chosen for one composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pick the canvas size for a source of `src_w` x `src_h` pixels.
///
/// Fixed formats return their size. Auto formats return the candidate whose
/// aspect ratio is closest to the source's; on a tie the earlier candidate
/// wins.
pub fn select_format(
    format: &FormatSpec,
    src_w: u32,
    src_h: u32,
) -> Result<CanvasSize, ComposeError> {
    match format {
        FormatSpec::Fixed { width, height } => Ok(CanvasSize::new(*width, *height)),
        FormatSpec::Auto { candidates } => {
            if candidates.is_empty() {
                return Err(ComposeError::invalid_config(
                    "auto format has no candidates",
                ));
            }
            if src_w == 0 || src_h == 0 {
                return Err(ComposeError::InvalidSourceDimensions {
                    width: src_w,
                    height: src_h,
                });
            }

            let src_ratio = src_w as f64 / src_h as f64;
            let best = closest_candidate(candidates, src_ratio)
                .ok_or_else(|| ComposeError::invalid_config("auto format has no usable candidates"))?;

            tracing::debug!(
                candidate = %best.name,
                width = best.width,
                height = best.height,
                source_ratio = src_ratio,
                "Auto format selected"
            );
            Ok(CanvasSize::new(best.width, best.height))
        }
    }
}

fn closest_candidate(candidates: &[FormatCandidate], src_ratio: f64) -> Option<&FormatCandidate> {
    let mut best: Option<(&FormatCandidate, f64)> = None;
    for candidate in candidates.iter().filter(|c| c.height > 0) {
        let diff = (src_ratio - candidate.width as f64 / candidate.height as f64).abs();
        // strict comparison keeps the first of equally close candidates
        if best.map_or(true, |(_, best_diff)| diff < best_diff) {
            best = Some((candidate, diff));
        }
    }
    best.map(|(candidate, _)| candidate)
}
