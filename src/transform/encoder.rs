//! Canonical transform encoding
//!
//! Converts an [`ImageTransforms`] value into the token string carried in
//! the `transform` query parameter. The encoding is the CDN's cache key,
//! so it must be byte-stable: identical transforms always produce
//! identical strings, and token ordering is fixed regardless of how the
//! value was constructed.
//!
//! Token rules:
//! - valued options serialize as `key:value` (`w:800`, `quality:85`)
//! - boolean flags serialize as bare tokens (`flip`, `grayscale`)
//! - tokens join with `,`; the extract rectangle joins its fields with
//!   `-` to stay unambiguous inside the comma-separated list
//!
//! Ordering: size (`w`, `h`, `fit`) → `dpr` → flips → effects (`blur`,
//! `grayscale`) → `extract` → `format`, `quality`.

use super::{BlurOption, ImageFormat, ImageTransforms};

/// Encode transforms into the canonical `transform` parameter value
///
/// Pure and total: no transforms produce an empty string. `format: auto`
/// is omitted (capability detection or the CDN's content negotiation
/// decides), as are zero-valued `quality`, `dpr`, and blur radius. The
/// zero-omission matches the deployed CDN's falsy-check semantics; a zero
/// blur radius cannot be expressed on the wire, and changing that would
/// shift cache keys for every existing deployment.
pub fn encode(transforms: &ImageTransforms) -> String {
    let mut tokens: Vec<String> = Vec::new();

    if let Some(width) = transforms.width {
        if width > 0 {
            tokens.push(format!("w:{}", width));
        }
    }
    if let Some(height) = transforms.height {
        if height > 0 {
            tokens.push(format!("h:{}", height));
        }
    }
    if let Some(fit) = transforms.fit {
        tokens.push(format!("fit:{}", fit.as_str()));
    }

    if let Some(dpr) = transforms.dpr {
        if dpr > 0.0 {
            tokens.push(format!("dpr:{}", format_number(dpr)));
        }
    }

    if transforms.flip {
        tokens.push("flip".to_string());
    }
    if transforms.flop {
        tokens.push("flop".to_string());
    }

    match transforms.blur {
        Some(BlurOption::Enabled) => tokens.push("blur".to_string()),
        Some(BlurOption::Radius(radius)) if radius > 0.0 => {
            tokens.push(format!("blur:{}", format_number(radius)));
        }
        _ => {}
    }
    if transforms.grayscale {
        tokens.push("grayscale".to_string());
    }

    if let Some(region) = transforms.extract {
        tokens.push(format!(
            "extract:{}-{}-{}-{}",
            region.x, region.y, region.width, region.height
        ));
    }

    if let Some(format) = transforms.format {
        if format != ImageFormat::Auto {
            tokens.push(format!("format:{}", format.as_str()));
        }
    }
    if let Some(quality) = transforms.quality {
        if quality > 0 {
            tokens.push(format!("quality:{}", quality));
        }
    }

    tokens.join(",")
}

/// Print a float without a trailing `.0` so `dpr:2` stays byte-stable
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{ExtractRegion, FitMode};

    #[test]
    fn test_encode_empty_transforms() {
        assert_eq!(encode(&ImageTransforms::default()), "");
    }

    #[test]
    fn test_encode_single_width() {
        let transforms = ImageTransforms {
            width: Some(800),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "w:800");
    }

    #[test]
    fn test_encode_full_ordering() {
        let transforms = ImageTransforms {
            width: Some(800),
            height: Some(600),
            fit: Some(FitMode::Cover),
            dpr: Some(2.0),
            flip: true,
            flop: true,
            blur: Some(BlurOption::Radius(5.0)),
            grayscale: true,
            extract: Some(ExtractRegion {
                x: 10,
                y: 20,
                width: 100,
                height: 200,
            }),
            format: Some(ImageFormat::WebP),
            quality: Some(85),
        };
        assert_eq!(
            encode(&transforms),
            "w:800,h:600,fit:cover,dpr:2,flip,flop,blur:5,grayscale,extract:10-20-100-200,format:webp,quality:85"
        );
    }

    #[test]
    fn test_encode_ordering_is_fixed_not_insertion_based() {
        // quality always trails width no matter how the struct was built
        let transforms = ImageTransforms {
            quality: Some(85),
            width: Some(800),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "w:800,quality:85");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let transforms = ImageTransforms {
            width: Some(400),
            blur: Some(BlurOption::Enabled),
            quality: Some(70),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), encode(&transforms));
    }

    #[test]
    fn test_encode_omits_auto_format() {
        let transforms = ImageTransforms {
            format: Some(ImageFormat::Auto),
            width: Some(100),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "w:100");
    }

    #[test]
    fn test_encode_omits_zero_quality() {
        let transforms = ImageTransforms {
            format: Some(ImageFormat::Auto),
            quality: Some(0),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "");
    }

    #[test]
    fn test_encode_omits_zero_blur_radius() {
        let transforms = ImageTransforms {
            blur: Some(BlurOption::Radius(0.0)),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "");
    }

    #[test]
    fn test_encode_bare_blur_flag() {
        let transforms = ImageTransforms {
            blur: Some(BlurOption::Enabled),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "blur");
    }

    #[test]
    fn test_encode_fractional_values() {
        let transforms = ImageTransforms {
            dpr: Some(1.5),
            blur: Some(BlurOption::Radius(2.5)),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "dpr:1.5,blur:2.5");
    }

    #[test]
    fn test_encode_integral_dpr_has_no_decimal_point() {
        let transforms = ImageTransforms {
            dpr: Some(3.0),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "dpr:3");
    }

    #[test]
    fn test_encode_extract_uses_hyphens() {
        let transforms = ImageTransforms {
            extract: Some(ExtractRegion {
                x: 0,
                y: 0,
                width: 50,
                height: 60,
            }),
            ..Default::default()
        };
        assert_eq!(encode(&transforms), "extract:0-0-50-60");
    }
}
