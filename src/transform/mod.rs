//! Image transformation data model
//!
//! Transform options describe what the CDN should do to an image: resize,
//! crop, format conversion, quality, and visual effects. Values are
//! constructed per call and encoded into the canonical `transform` query
//! parameter by [`encoder::encode`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod encoder;

pub use encoder::encode;
pub(crate) use encoder::format_number;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Avif,
    /// Defer format choice to capability detection / CDN content negotiation
    #[default]
    Auto,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Auto => "auto",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Avif => "image/avif",
            Self::Auto => "image/jpeg", // Fallback, should be resolved before use
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            "webp" => Ok(ImageFormat::WebP),
            "avif" => Ok(ImageFormat::Avif),
            "auto" => Ok(ImageFormat::Auto),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

/// How to fit the image within target dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Crop to fill target dimensions (default)
    #[default]
    Cover,
    /// Scale to fit within dimensions, preserving aspect ratio
    Contain,
    /// Stretch to fill exactly (may distort)
    Fill,
    /// Scale down only, never up
    Inside,
    /// Scale to cover, may exceed target
    Outside,
}

impl FitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Contain => "contain",
            Self::Fill => "fill",
            Self::Inside => "inside",
            Self::Outside => "outside",
        }
    }
}

impl FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cover" => Ok(FitMode::Cover),
            "contain" => Ok(FitMode::Contain),
            "fill" => Ok(FitMode::Fill),
            "inside" => Ok(FitMode::Inside),
            "outside" => Ok(FitMode::Outside),
            _ => Err(format!("unknown fit mode: {}", s)),
        }
    }
}

/// Blur effect: either "apply a default blur" or an explicit radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlurOption {
    /// Apply the CDN's default blur without specifying a radius
    Enabled,
    /// Gaussian blur radius
    Radius(f64),
}

/// Rectangle extracted from the source image before other transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Image transformation parameters
///
/// All fields are optional; `ImageTransforms::default()` requests no
/// transformation at all and encodes to an empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageTransforms {
    // === Resize ===
    /// Target width in pixels
    pub width: Option<u32>,
    /// Target height in pixels
    pub height: Option<u32>,
    /// How to fit image in target dimensions
    pub fit: Option<FitMode>,
    /// Device pixel ratio
    pub dpr: Option<f64>,

    // === Orientation ===
    /// Mirror horizontally
    pub flip: bool,
    /// Mirror vertically
    pub flop: bool,

    // === Effects ===
    /// Gaussian blur
    pub blur: Option<BlurOption>,
    /// Convert to grayscale
    pub grayscale: bool,

    // === Crop ===
    /// Region extracted from the source before resizing
    pub extract: Option<ExtractRegion>,

    // === Format & Quality ===
    /// Output format (`Auto` defers to capability detection)
    pub format: Option<ImageFormat>,
    /// Output quality (1-100)
    pub quality: Option<u8>,
}

impl ImageTransforms {
    /// Check if any transformation is requested
    ///
    /// `format: Auto` and zero-valued quality/blur count as "nothing
    /// requested" since they are omitted from the encoding.
    pub fn has_transformations(&self) -> bool {
        !encode(self).is_empty()
    }

    /// Copy of these transforms with `width` replaced
    pub fn with_width(&self, width: u32) -> Self {
        Self {
            width: Some(width),
            ..self.clone()
        }
    }

    /// Copy of these transforms with `format` replaced (`None` clears it)
    pub fn with_format(&self, format: Option<ImageFormat>) -> Self {
        Self {
            format,
            ..self.clone()
        }
    }

    /// Copy of these transforms with `dpr` replaced
    pub fn with_dpr(&self, dpr: f64) -> Self {
        Self {
            dpr: Some(dpr),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format_from_str() {
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("gif".parse::<ImageFormat>().unwrap(), ImageFormat::Gif);
        assert_eq!("webp".parse::<ImageFormat>().unwrap(), ImageFormat::WebP);
        assert_eq!("avif".parse::<ImageFormat>().unwrap(), ImageFormat::Avif);
        assert_eq!("AUTO".parse::<ImageFormat>().unwrap(), ImageFormat::Auto);
        assert!("tga".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn test_image_format_content_type() {
        assert_eq!(ImageFormat::WebP.content_type(), "image/webp");
        assert_eq!(ImageFormat::Avif.content_type(), "image/avif");
    }

    #[test]
    fn test_fit_mode_from_str() {
        assert_eq!("cover".parse::<FitMode>().unwrap(), FitMode::Cover);
        assert_eq!("contain".parse::<FitMode>().unwrap(), FitMode::Contain);
        assert_eq!("fill".parse::<FitMode>().unwrap(), FitMode::Fill);
        assert_eq!("inside".parse::<FitMode>().unwrap(), FitMode::Inside);
        assert_eq!("outside".parse::<FitMode>().unwrap(), FitMode::Outside);
        assert!("pad".parse::<FitMode>().is_err());
    }

    #[test]
    fn test_default_transforms_request_nothing() {
        assert!(!ImageTransforms::default().has_transformations());
    }

    #[test]
    fn test_with_width_preserves_other_fields() {
        let base = ImageTransforms {
            quality: Some(85),
            grayscale: true,
            ..Default::default()
        };
        let widened = base.with_width(640);
        assert_eq!(widened.width, Some(640));
        assert_eq!(widened.quality, Some(85));
        assert!(widened.grayscale);
    }

    #[test]
    fn test_with_format_clears_format() {
        let base = ImageTransforms {
            format: Some(ImageFormat::WebP),
            ..Default::default()
        };
        assert_eq!(base.with_format(None).format, None);
        assert_eq!(
            base.with_format(Some(ImageFormat::Avif)).format,
            Some(ImageFormat::Avif)
        );
    }
}
