//! Image render engine
//!
//! The orchestration facade: resolves effective dimensions, quality, and
//! format from a logical image request, then drives the URL builder to
//! produce the primary URL and a responsive srcset. The engine owns no
//! I/O and no global state; it holds a validated configuration and a
//! shared builder factory.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::capability::{adjust_quality_for_network, NetworkConditions};
use crate::config::{ConfigError, SnapkitConfig};
use crate::constants::DEFAULT_FILL_WIDTH;
use crate::error::SnapkitError;
use crate::transform::{ImageFormat, ImageTransforms};
use crate::url::UrlBuilderFactory;

mod cache;
mod responsive;

pub use cache::EngineCache;
pub use responsive::{generate_responsive_widths, WidthLadderOptions};

/// Aggregate parameter validation failure
///
/// Lists every violated rule, not just the first, so callers can report
/// all problems with a request in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid image request: {}", violations.join("; "))]
pub struct ParamError {
    pub violations: Vec<String>,
}

/// Logical image request, as supplied by the component layer
#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    /// Image reference: relative path or absolute URL
    pub src: String,
    /// Logical display width in pixels
    pub width: Option<u32>,
    /// Logical display height in pixels
    pub height: Option<u32>,
    /// Explicit quality override (1-100)
    pub quality: Option<u8>,
    /// Fill mode: stretch to the container instead of fixed dimensions
    pub fill: bool,
    /// Responsive `sizes` hint; presence selects a width-ladder srcset
    pub sizes: Option<String>,
    /// Requested transformations
    pub transforms: ImageTransforms,
    /// Reduce quality on slow connections
    pub adjust_quality_by_network: bool,
    /// Observed network conditions, when the caller has them
    pub network: Option<NetworkConditions>,
}

impl ImageRequest {
    /// Request with just a source, everything else default
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Default::default()
        }
    }
}

/// Resolved logical size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Everything the component layer needs to render an image element
#[derive(Debug, Clone, PartialEq)]
pub struct RenderData {
    /// Primary URL for `src`
    pub url: String,
    /// Responsive srcset (`w`- or `x`-descriptors); empty when no base
    /// width could be resolved
    pub src_set: String,
    /// Resolved logical size
    pub size: RenderSize,
    /// Fully resolved transforms used for the primary URL
    pub transforms: ImageTransforms,
    /// Quality after network adjustment, when adjustment was applied
    pub adjusted_quality: Option<u8>,
}

/// Orchestrates capability defaults and URL building for one configuration
pub struct ImageEngine {
    config: SnapkitConfig,
    factory: Arc<UrlBuilderFactory>,
}

impl ImageEngine {
    /// Create an engine over a validated configuration
    pub fn new(
        config: SnapkitConfig,
        factory: Arc<UrlBuilderFactory>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, factory })
    }

    /// The engine's configuration
    pub fn config(&self) -> &SnapkitConfig {
        &self.config
    }

    fn validate_request(request: &ImageRequest) -> Result<(), ParamError> {
        let mut violations = Vec::new();

        if request.src.trim().is_empty() {
            violations.push("src must not be empty".to_string());
        }
        if request.width == Some(0) {
            violations.push("width must be positive".to_string());
        }
        if request.height == Some(0) {
            violations.push("height must be positive".to_string());
        }
        if let Some(quality) = request.quality {
            if !(1..=100).contains(&quality) {
                violations.push(format!("quality {} is outside 1-100", quality));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ParamError { violations })
        }
    }

    /// Generate render data for a logical image request
    ///
    /// Resolution order:
    /// 1. validate parameters (aggregate error on any violation)
    /// 2. fill mode pins width to 1920 and leaves height to the container
    /// 3. quality: explicit override, else network-adjusted default when
    ///    enabled, else the configured default
    /// 4. format: explicit transform format, else the configured default
    ///    (`auto` passes through and is omitted from the encoding; the
    ///    CDN negotiates via `Accept` in that case)
    /// 5. `sizes` present selects a width-ladder srcset, otherwise a
    ///    1x/2x/3x DPR srcset at the fixed logical size
    pub fn generate_image_data(&self, request: &ImageRequest) -> Result<RenderData, SnapkitError> {
        Self::validate_request(request)?;

        let (width, height) = if request.fill {
            (Some(DEFAULT_FILL_WIDTH), None)
        } else {
            (
                request.width.or(request.transforms.width),
                request.height.or(request.transforms.height),
            )
        };

        let explicit_quality = request.quality.or(request.transforms.quality);
        let mut adjusted_quality = None;
        let quality = match explicit_quality {
            Some(quality) => quality,
            None if request.adjust_quality_by_network => {
                let conditions = request.network.unwrap_or_default();
                let adjusted =
                    adjust_quality_for_network(self.config.default_quality, &conditions);
                adjusted_quality = Some(adjusted);
                adjusted
            }
            None => self.config.default_quality,
        };

        let format = match request.transforms.format {
            Some(format) if format != ImageFormat::Auto => Some(format),
            _ => Some(self.config.default_format),
        };

        let transforms = ImageTransforms {
            width,
            height,
            quality: Some(quality),
            format,
            ..request.transforms.clone()
        };

        let builder = self.factory.get_or_create(&self.config.cdn)?;
        let url = builder.build_transformed_url(&request.src, &transforms)?;

        let src_set = match (request.sizes.as_deref(), width) {
            (Some(_), Some(base_width)) => {
                let widths =
                    generate_responsive_widths(base_width, &WidthLadderOptions::default());
                builder.build_srcset(&request.src, &widths, &transforms)?
            }
            (None, Some(base_width)) => {
                builder.build_dpr_srcset(&request.src, base_width, height, &transforms, None)?
            }
            (_, None) => String::new(),
        };

        debug!(src = %request.src, url = %url, "generated image render data");

        Ok(RenderData {
            url,
            src_set,
            size: RenderSize { width, height },
            transforms,
            adjusted_quality,
        })
    }

    /// Next.js-style loader adapter
    ///
    /// Satisfies the external loader contract (`{src, width, quality}` in,
    /// URL out) with network-based quality adjustment forced on. No logic
    /// of its own beyond that mapping.
    pub fn loader_url(
        &self,
        src: &str,
        width: u32,
        quality: Option<u8>,
    ) -> Result<String, SnapkitError> {
        let request = ImageRequest {
            src: src.to_string(),
            width: Some(width),
            quality,
            adjust_quality_by_network: true,
            ..Default::default()
        };
        Ok(self.generate_image_data(&request)?.url)
    }
}
