// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Image defaults
// =============================================================================

/// Default output quality when none is configured
pub const DEFAULT_QUALITY: u8 = 85;

/// Default logical width used in fill mode (height is left to the container)
pub const DEFAULT_FILL_WIDTH: u32 = 1920;

/// Device pixel ratios used for x-descriptor srcsets
pub const DEFAULT_DPR_VALUES: [f64; 3] = [1.0, 2.0, 3.0];

// =============================================================================
// Responsive width ladder defaults
// =============================================================================

/// Multipliers applied to the base width when generating a width ladder
pub const DEFAULT_WIDTH_MULTIPLIERS: [f64; 7] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Smallest width emitted by the ladder
pub const DEFAULT_MIN_LADDER_WIDTH: u32 = 64;

/// Largest width emitted by the ladder
pub const DEFAULT_MAX_LADDER_WIDTH: u32 = 3840;

// =============================================================================
// Cache defaults
// =============================================================================

/// Default capacity of the URL builder LRU cache
pub const DEFAULT_BUILDER_CACHE_CAPACITY: usize = 50;

/// Default capacity of the engine instance cache
pub const DEFAULT_ENGINE_CACHE_CAPACITY: usize = 10;

/// Default engine cache TTL in seconds (sliding expiration)
pub const DEFAULT_ENGINE_CACHE_TTL_SECS: u64 = 300;

// =============================================================================
// Network quality adjustment
// =============================================================================

/// Percentage reduction applied when the client requests reduced data usage
pub const SAVE_DATA_REDUCTION_PERCENT: u8 = 40;

/// Quality floor when save-data is active
pub const SAVE_DATA_QUALITY_FLOOR: u8 = 40;

/// Percentage reduction for slow-2g/2g connections
pub const SLOW_CONNECTION_REDUCTION_PERCENT: u8 = 50;

/// Quality floor for slow-2g/2g connections
pub const SLOW_CONNECTION_QUALITY_FLOOR: u8 = 30;

/// Percentage reduction for 3g connections
pub const MODERATE_CONNECTION_REDUCTION_PERCENT: u8 = 25;

/// Quality floor for 3g connections
pub const MODERATE_CONNECTION_QUALITY_FLOOR: u8 = 50;

// =============================================================================
// Browser support minimum versions
// =============================================================================

/// First Chrome release with AVIF enabled by default
pub const CHROME_MIN_AVIF_VERSION: f64 = 85.0;

/// First Firefox release with AVIF enabled by default
pub const FIREFOX_MIN_AVIF_VERSION: f64 = 93.0;

/// First Chromium Edge release with AVIF enabled by default
pub const EDGE_MIN_AVIF_VERSION: f64 = 121.0;

/// First Safari release with AVIF support (macOS and iOS)
pub const SAFARI_MIN_AVIF_VERSION: f64 = 16.4;

/// First Chrome release with WebP support
pub const CHROME_MIN_WEBP_VERSION: f64 = 32.0;

/// First Firefox release with WebP support
pub const FIREFOX_MIN_WEBP_VERSION: f64 = 65.0;

/// First Chromium Edge release (WebP supported from the first release)
pub const EDGE_MIN_WEBP_VERSION: f64 = 79.0;

/// First Safari release with WebP support
pub const SAFARI_MIN_WEBP_VERSION: f64 = 14.0;

/// First iOS major version with WebP support in Safari
pub const IOS_MIN_WEBP_MAJOR: u32 = 14;

// =============================================================================
// Security defaults
// =============================================================================

/// Maximum number of input characters echoed back in security errors
pub const MAX_ERROR_INPUT_LENGTH: usize = 100;
