//! URL builder implementation

use crate::config::{CdnProvider, ConfigError};
use crate::constants::DEFAULT_DPR_VALUES;
use crate::security::{self, SecurityError};
use crate::transform::{self, ImageFormat, ImageTransforms};

/// Per-format URL set for `<picture>`-style multi-source rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatUrls {
    /// URL with `format:avif` forced
    pub avif: String,
    /// URL with `format:webp` forced
    pub webp: String,
    /// URL with no format override (CDN serves the source format)
    pub original: String,
}

/// Builds CDN-addressable URLs for one resolved provider configuration
///
/// Construction validates the provider, so every builder holds a base
/// address that is known to be well-formed.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_address: String,
}

impl UrlBuilder {
    /// Create a builder for the given provider
    ///
    /// Hosted providers resolve to `https://{org}-cdn.snapkit.studio`;
    /// custom providers use their validated base address verbatim (less a
    /// trailing slash, so path concatenation never doubles separators).
    pub fn new(provider: &CdnProvider) -> Result<Self, ConfigError> {
        provider.validate()?;
        let base_address = match provider {
            CdnProvider::Hosted { organization_name } => {
                format!("https://{}-cdn.snapkit.studio", organization_name)
            }
            CdnProvider::Custom { base_address } => {
                base_address.trim_end_matches('/').to_string()
            }
        };
        Ok(Self { base_address })
    }

    /// The resolved CDN base address
    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    fn is_absolute(src: &str) -> bool {
        src.starts_with("http://") || src.starts_with("https://")
    }

    /// Build the plain image URL with no transforms
    ///
    /// Absolute sources are validated and returned unchanged. Relative
    /// sources have any existing query string split off, the path portion
    /// validated and sanitized, and the query reattached after joining
    /// onto the base address.
    pub fn build_image_url(&self, src: &str) -> Result<String, SecurityError> {
        if Self::is_absolute(src) {
            security::validate_url(src)?;
            return Ok(src.to_string());
        }

        let (path, query) = match src.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (src, None),
        };

        security::validate_path(path)?;
        let clean_path = security::sanitize_path(path);

        let mut built = format!("{}{}", self.base_address, clean_path);
        if let Some(query) = query {
            built.push('?');
            built.push_str(query);
        }
        Ok(built)
    }

    /// Build a URL carrying the encoded transform set
    ///
    /// Relative sources use the path strategy (`?transform=` appended, or
    /// `&transform=` when the source already carries a query). Absolute
    /// sources use the URL-proxy strategy:
    /// `{base}/image?url=<percent-encoded src>&transform=...`. An empty
    /// transform encoding never leaves a dangling `?` or `&`.
    pub fn build_transformed_url(
        &self,
        src: &str,
        transforms: &ImageTransforms,
    ) -> Result<String, SecurityError> {
        let encoded = transform::encode(transforms);

        if Self::is_absolute(src) {
            security::validate_url(src)?;
            let mut built = format!(
                "{}/image?url={}",
                self.base_address,
                urlencoding::encode(src)
            );
            if !encoded.is_empty() {
                built.push_str("&transform=");
                built.push_str(&encoded);
            }
            return Ok(built);
        }

        let base_url = self.build_image_url(src)?;
        if encoded.is_empty() {
            return Ok(base_url);
        }

        let separator = if base_url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}transform={}", base_url, separator, encoded))
    }

    /// Build AVIF/WebP/original variants of the same source
    ///
    /// Used for `<picture>` multi-format fallback: the original variant
    /// clears any format override so the CDN serves the source format.
    pub fn build_format_urls(
        &self,
        src: &str,
        transforms: &ImageTransforms,
    ) -> Result<FormatUrls, SecurityError> {
        Ok(FormatUrls {
            avif: self
                .build_transformed_url(src, &transforms.with_format(Some(ImageFormat::Avif)))?,
            webp: self
                .build_transformed_url(src, &transforms.with_format(Some(ImageFormat::WebP)))?,
            original: self.build_transformed_url(src, &transforms.with_format(None))?,
        })
    }

    /// Build a `w`-descriptor srcset over the given widths
    ///
    /// Widths are used in the order supplied; callers sort and deduplicate
    /// (the responsive ladder already does).
    pub fn build_srcset(
        &self,
        src: &str,
        widths: &[u32],
        transforms: &ImageTransforms,
    ) -> Result<String, SecurityError> {
        let mut entries = Vec::with_capacity(widths.len());
        for &width in widths {
            let url = self.build_transformed_url(src, &transforms.with_width(width))?;
            entries.push(format!("{} {}w", url, width));
        }
        Ok(entries.join(", "))
    }

    /// Build an `x`-descriptor srcset over device pixel ratios
    ///
    /// The logical size stays fixed at `base_width`/`base_height`; only the
    /// requested pixel density varies. `None` for `dprs` uses the default
    /// 1x/2x/3x ladder.
    pub fn build_dpr_srcset(
        &self,
        src: &str,
        base_width: u32,
        base_height: Option<u32>,
        transforms: &ImageTransforms,
        dprs: Option<&[f64]>,
    ) -> Result<String, SecurityError> {
        let dprs = dprs.unwrap_or(&DEFAULT_DPR_VALUES);
        let mut entries = Vec::with_capacity(dprs.len());
        for &dpr in dprs {
            let variant = ImageTransforms {
                width: Some(base_width),
                height: base_height,
                dpr: Some(dpr),
                ..transforms.clone()
            };
            let url = self.build_transformed_url(src, &variant)?;
            entries.push(format!("{} {}x", url, transform::format_number(dpr)));
        }
        Ok(entries.join(", "))
    }
}
