//! Responsive width ladder
//!
//! Pure arithmetic: scale a base width by a multiplier set, clamp to the
//! allowed range, deduplicate, and sort. The output is always ascending
//! regardless of multiplier order, so srcsets stay byte-stable.

use crate::constants::{
    DEFAULT_MAX_LADDER_WIDTH, DEFAULT_MIN_LADDER_WIDTH, DEFAULT_WIDTH_MULTIPLIERS,
};

/// Options for width ladder generation
#[derive(Debug, Clone, PartialEq)]
pub struct WidthLadderOptions {
    /// Multipliers applied to the base width
    pub multipliers: Vec<f64>,
    /// Smallest width kept in the ladder
    pub min_width: u32,
    /// Largest width kept in the ladder
    pub max_width: u32,
}

impl Default for WidthLadderOptions {
    fn default() -> Self {
        Self {
            multipliers: DEFAULT_WIDTH_MULTIPLIERS.to_vec(),
            min_width: DEFAULT_MIN_LADDER_WIDTH,
            max_width: DEFAULT_MAX_LADDER_WIDTH,
        }
    }
}

/// Generate the sorted, deduplicated width ladder for a base width
pub fn generate_responsive_widths(base_width: u32, options: &WidthLadderOptions) -> Vec<u32> {
    let mut widths: Vec<u32> = options
        .multipliers
        .iter()
        .map(|multiplier| (f64::from(base_width) * multiplier).round() as u32)
        .filter(|width| (options.min_width..=options.max_width).contains(width))
        .collect();
    widths.sort_unstable();
    widths.dedup();
    widths
}
