//! Client capability detection
//!
//! Parses user-agent strings into a structured [`BrowserInfo`] and decides
//! modern-format support (AVIF, WebP) from browser family and version.
//! Detection order matters: Chromium Edge advertises both `Edg/` and
//! `Chrome/` tokens, so Edge must be checked before Chrome, and legacy
//! EdgeHTML (`Edge/`) before both.
//!
//! Nothing here is persisted; `BrowserInfo` is recomputed per call and
//! callers memoize externally if they need to.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{
    CHROME_MIN_AVIF_VERSION, CHROME_MIN_WEBP_VERSION, EDGE_MIN_AVIF_VERSION,
    EDGE_MIN_WEBP_VERSION, FIREFOX_MIN_AVIF_VERSION, FIREFOX_MIN_WEBP_VERSION,
    IOS_MIN_WEBP_MAJOR, SAFARI_MIN_AVIF_VERSION, SAFARI_MIN_WEBP_VERSION,
};

mod network;

pub use network::{adjust_quality_for_network, ConnectionType, NetworkConditions};

static IOS_VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();
static EDGE_PATTERN: OnceLock<Regex> = OnceLock::new();
static LEGACY_EDGE_PATTERN: OnceLock<Regex> = OnceLock::new();
static CHROME_PATTERN: OnceLock<Regex> = OnceLock::new();
static FIREFOX_PATTERN: OnceLock<Regex> = OnceLock::new();
static SAFARI_VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn ios_version_pattern() -> &'static Regex {
    IOS_VERSION_PATTERN
        .get_or_init(|| Regex::new(r"OS (\d+)_(\d+)").expect("iOS version regex is valid"))
}

fn edge_pattern() -> &'static Regex {
    EDGE_PATTERN.get_or_init(|| Regex::new(r"Edg/(\d+)").expect("Edge regex is valid"))
}

fn legacy_edge_pattern() -> &'static Regex {
    LEGACY_EDGE_PATTERN
        .get_or_init(|| Regex::new(r"Edge/(\d+)").expect("legacy Edge regex is valid"))
}

fn chrome_pattern() -> &'static Regex {
    CHROME_PATTERN
        .get_or_init(|| Regex::new(r"(?:Chrome|CriOS)/(\d+)").expect("Chrome regex is valid"))
}

fn firefox_pattern() -> &'static Regex {
    FIREFOX_PATTERN
        .get_or_init(|| Regex::new(r"(?:Firefox|FxiOS)/(\d+)").expect("Firefox regex is valid"))
}

fn safari_version_pattern() -> &'static Regex {
    SAFARI_VERSION_PATTERN
        .get_or_init(|| Regex::new(r"Version/(\d+(?:\.\d+)?)").expect("Safari regex is valid"))
}

/// Browser family parsed from a user-agent string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Safari,
    /// Chromium-based Edge (`Edg/` token)
    Edge,
    /// EdgeHTML-based Edge (`Edge/` token)
    LegacyEdge,
    Unknown,
}

/// Client platform classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Desktop,
    Ios,
    Android,
    Unknown,
}

/// Parsed client identity, derived and ephemeral
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserInfo {
    pub family: BrowserFamily,
    /// Major (or major.minor for Safari) browser version; 0 when unknown
    pub version: f64,
    pub platform: Platform,
    /// iOS major/minor pair when the UA declares one
    pub ios_version: Option<(u32, u32)>,
}

/// Modern-format support decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatSupport {
    pub avif: bool,
    pub webp: bool,
}

fn capture_version(pattern: &Regex, user_agent: &str) -> Option<f64> {
    pattern
        .captures(user_agent)
        .and_then(|captures| captures.get(1))
        .and_then(|capture| capture.as_str().parse().ok())
}

/// Parse a user-agent string into a [`BrowserInfo`]
///
/// Family matching is ordered: Chromium Edge, legacy EdgeHTML, Chrome
/// (including iOS Chrome), Firefox (including iOS Firefox), Safari.
/// A UA that matches nothing but declares an iOS platform classifies as
/// Safari, since every iOS browser runs the system WebKit engine.
pub fn parse_browser_info(user_agent: &str) -> BrowserInfo {
    let platform = if user_agent.contains("iPhone")
        || user_agent.contains("iPad")
        || user_agent.contains("iPod")
    {
        Platform::Ios
    } else if user_agent.contains("Android") {
        Platform::Android
    } else if user_agent.contains("Windows")
        || user_agent.contains("Macintosh")
        || user_agent.contains("X11")
        || user_agent.contains("Linux")
    {
        Platform::Desktop
    } else {
        Platform::Unknown
    };

    // Gate on platform: macOS UAs carry a frozen "Mac OS X 10_15_7" token
    // that would otherwise match the iOS version pattern
    let ios_version = if platform == Platform::Ios {
        ios_version_pattern().captures(user_agent).and_then(|captures| {
            let major = captures.get(1)?.as_str().parse().ok()?;
            let minor = captures.get(2)?.as_str().parse().ok()?;
            Some((major, minor))
        })
    } else {
        None
    };

    let ios_as_float = ios_version
        .and_then(|(major, minor)| format!("{}.{}", major, minor).parse::<f64>().ok())
        .unwrap_or(0.0);

    let (family, version) = if user_agent.contains("Edg/") {
        (
            BrowserFamily::Edge,
            capture_version(edge_pattern(), user_agent).unwrap_or(0.0),
        )
    } else if user_agent.contains("Edge/") {
        (
            BrowserFamily::LegacyEdge,
            capture_version(legacy_edge_pattern(), user_agent).unwrap_or(0.0),
        )
    } else if user_agent.contains("Chrome/") || user_agent.contains("CriOS/") {
        (
            BrowserFamily::Chrome,
            capture_version(chrome_pattern(), user_agent).unwrap_or(0.0),
        )
    } else if user_agent.contains("Firefox/") || user_agent.contains("FxiOS/") {
        (
            BrowserFamily::Firefox,
            capture_version(firefox_pattern(), user_agent).unwrap_or(0.0),
        )
    } else if user_agent.contains("Safari") {
        (
            BrowserFamily::Safari,
            capture_version(safari_version_pattern(), user_agent).unwrap_or(ios_as_float),
        )
    } else if platform == Platform::Ios {
        // No explicit token, but iOS means WebKit
        (BrowserFamily::Safari, ios_as_float)
    } else {
        (BrowserFamily::Unknown, 0.0)
    };

    BrowserInfo {
        family,
        version,
        platform,
        ios_version,
    }
}

/// Decide AVIF support for a parsed client
///
/// iOS 16.0 through 16.3 report no support regardless of browser: those
/// builds shipped a decoder defect that produced corrupted output. On any
/// other iOS the system WebKit version (16.4+) decides for every browser
/// family. Desktop support is per family with fixed minimum versions;
/// legacy EdgeHTML never supports AVIF.
pub fn check_avif_support(info: &BrowserInfo) -> bool {
    if let Some((16, minor)) = info.ios_version {
        if minor <= 3 {
            return false;
        }
    }

    if info.platform == Platform::Ios {
        return match info.ios_version {
            Some(version) => version >= (16, 4),
            None => false,
        };
    }

    match info.family {
        BrowserFamily::Chrome => info.version >= CHROME_MIN_AVIF_VERSION,
        BrowserFamily::Firefox => info.version >= FIREFOX_MIN_AVIF_VERSION,
        BrowserFamily::Edge => info.version >= EDGE_MIN_AVIF_VERSION,
        BrowserFamily::Safari => info.version >= SAFARI_MIN_AVIF_VERSION,
        BrowserFamily::LegacyEdge | BrowserFamily::Unknown => false,
    }
}

/// Decide WebP support for a parsed client
///
/// On iOS the system WebKit decides for every family (major ≥ 14);
/// desktop support is per family. Legacy EdgeHTML never reports support.
pub fn check_webp_support(info: &BrowserInfo) -> bool {
    if info.platform == Platform::Ios {
        return match info.ios_version {
            Some((major, _)) => major >= IOS_MIN_WEBP_MAJOR,
            None => false,
        };
    }

    match info.family {
        BrowserFamily::Chrome => info.version >= CHROME_MIN_WEBP_VERSION,
        BrowserFamily::Firefox => info.version >= FIREFOX_MIN_WEBP_VERSION,
        BrowserFamily::Edge => info.version >= EDGE_MIN_WEBP_VERSION,
        BrowserFamily::Safari => info.version >= SAFARI_MIN_WEBP_VERSION,
        BrowserFamily::LegacyEdge | BrowserFamily::Unknown => false,
    }
}

/// Estimate format support from an optional user-agent string
///
/// `None` models a non-browser execution context (server rendering, tests)
/// and reports no modern-format support, letting the encoder fall back to
/// `format: auto` and CDN-side content negotiation.
pub fn estimate_format_support(user_agent: Option<&str>) -> FormatSupport {
    match user_agent {
        None => FormatSupport::default(),
        Some(user_agent) => {
            let info = parse_browser_info(user_agent);
            FormatSupport {
                avif: check_avif_support(&info),
                webp: check_webp_support(&info),
            }
        }
    }
}
