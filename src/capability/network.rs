//! Network-based quality adjustment
//!
//! Slower connections get lower-quality (smaller) images. Reductions are
//! fixed percentages with floor guarantees so quality degrades gracefully
//! instead of collapsing; the constants live in `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    MODERATE_CONNECTION_QUALITY_FLOOR, MODERATE_CONNECTION_REDUCTION_PERCENT,
    SAVE_DATA_QUALITY_FLOOR, SAVE_DATA_REDUCTION_PERCENT, SLOW_CONNECTION_QUALITY_FLOOR,
    SLOW_CONNECTION_REDUCTION_PERCENT,
};

/// Effective connection type as reported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    Cellular2g,
    #[serde(rename = "3g")]
    Cellular3g,
    #[serde(rename = "4g")]
    Cellular4g,
    #[default]
    Unknown,
}

impl ConnectionType {
    /// Parse the Network Information API's `effectiveType` string
    ///
    /// Unrecognized values map to `Unknown`, which applies no reduction.
    pub fn from_effective_type(value: &str) -> Self {
        match value {
            "slow-2g" => Self::Slow2g,
            "2g" => Self::Cellular2g,
            "3g" => Self::Cellular3g,
            "4g" => Self::Cellular4g,
            _ => Self::Unknown,
        }
    }
}

/// Observed client network conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkConditions {
    /// Effective connection type (Network Information API)
    #[serde(default)]
    pub effective_type: ConnectionType,
    /// Client requested reduced data usage (`Save-Data` hint)
    #[serde(default)]
    pub save_data: bool,
}

/// Reduce quality by a percentage, clamped to `[floor, base]`
fn reduce(base_quality: u8, percent: u8, floor: u8) -> u8 {
    let reduced = (u32::from(base_quality) * u32::from(100 - percent) / 100) as u8;
    reduced.max(floor).min(base_quality)
}

/// Adjust a base quality to the observed network conditions
///
/// Save-data takes precedence over connection type; 2g-class connections
/// reduce further than 3g; 4g and unknown apply no reduction. The result
/// never exceeds the base quality, and never drops below the floor for
/// the applied rule.
pub fn adjust_quality_for_network(base_quality: u8, conditions: &NetworkConditions) -> u8 {
    if conditions.save_data {
        return reduce(
            base_quality,
            SAVE_DATA_REDUCTION_PERCENT,
            SAVE_DATA_QUALITY_FLOOR,
        );
    }

    match conditions.effective_type {
        ConnectionType::Slow2g | ConnectionType::Cellular2g => reduce(
            base_quality,
            SLOW_CONNECTION_REDUCTION_PERCENT,
            SLOW_CONNECTION_QUALITY_FLOOR,
        ),
        ConnectionType::Cellular3g => reduce(
            base_quality,
            MODERATE_CONNECTION_REDUCTION_PERCENT,
            MODERATE_CONNECTION_QUALITY_FLOOR,
        ),
        ConnectionType::Cellular4g | ConnectionType::Unknown => base_quality,
    }
}
