//! Security Validation Module
//!
//! Protects the URL builder against malicious or malformed image references
//! that could:
//! - Escape the CDN namespace (path traversal, absolute system paths)
//! - Smuggle scriptable content into rendered markup (pseudo-protocols,
//!   script tags, inline event handlers)
//! - Corrupt downstream parsers (control characters, null bytes)
//!
//! Validation and sanitization are distinct operations: `is_valid_path`
//! rejects traversal outright, while `sanitize_path` silently drops the
//! offending segments and returns a best-effort clean path. The builder
//! always validates before sanitizing, so a rejected path never reaches
//! the lenient code path.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::constants::MAX_ERROR_INPUT_LENGTH;

/// Pseudo-protocols that must never appear in a URL candidate
const URL_BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "data:", "vbscript:"];

/// Pseudo-protocols that must never begin a path candidate
const PATH_BLOCKED_PREFIXES: [&str; 5] = ["javascript:", "data:", "vbscript:", "file:", "ftp:"];

/// Directory traversal markers, including URL-encoded and double-encoded forms
const TRAVERSAL_PATTERNS: [&str; 4] = ["../", "..\\", "%2e%2e", "%252e%252e"];

/// Absolute system path prefixes that are never valid image locations
const SYSTEM_PATH_PREFIXES: [&str; 4] = ["/etc/", "/usr/", "/var/", "/windows/"];

/// Characters stripped from path segments during sanitization
const DISALLOWED_PATH_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

static EVENT_HANDLER_PATTERN: OnceLock<Regex> = OnceLock::new();
static SCRIPT_TAG_PATTERN: OnceLock<Regex> = OnceLock::new();
static DRIVE_LETTER_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches inline event-handler attributes such as `onerror=` or `onload =`
fn event_handler_pattern() -> &'static Regex {
    EVENT_HANDLER_PATTERN
        .get_or_init(|| Regex::new(r"(?i)on\w+\s*=").expect("event handler regex is valid"))
}

/// Matches opening and closing script-tag markers
fn script_tag_pattern() -> &'static Regex {
    SCRIPT_TAG_PATTERN
        .get_or_init(|| Regex::new(r"(?i)</?script[^>]*>?").expect("script tag regex is valid"))
}

/// Matches Windows drive-letter prefixes such as `C:\` or `d:/`
fn drive_letter_pattern() -> &'static Regex {
    DRIVE_LETTER_PATTERN
        .get_or_init(|| Regex::new(r"(?i)^[a-z]:[/\\]").expect("drive letter regex is valid"))
}

/// Security validation failure
///
/// Carries the operation that rejected the input, a truncated copy of the
/// offending input, and a human-readable reason. This is the single error
/// shape used by the URL builder for all security rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Security validation failed in {operation}: {reason} (input: {input:?})")]
pub struct SecurityError {
    /// Name of the operation that rejected the input
    pub operation: &'static str,
    /// Offending input, truncated to a safe length for logging
    pub input: String,
    /// Human-readable rejection reason
    pub reason: String,
}

impl SecurityError {
    pub(crate) fn new(operation: &'static str, input: &str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            input: truncate_input(input),
            reason: reason.into(),
        }
    }
}

/// Truncate input echoed in errors so oversized or hostile strings never
/// dominate log lines
fn truncate_input(input: &str) -> String {
    input.chars().take(MAX_ERROR_INPUT_LENGTH).collect()
}

fn contains_control_chars(candidate: &str) -> bool {
    candidate
        .chars()
        .any(|c| ('\u{00}'..='\u{1f}').contains(&c) || c == '\u{7f}')
}

/// Returns the reason a URL candidate is unacceptable, or None if it is clean
fn url_violation(candidate: &str) -> Option<String> {
    if candidate.is_empty() {
        return Some("URL is empty".to_string());
    }
    if contains_control_chars(candidate) {
        return Some("URL contains control characters".to_string());
    }

    let lower = candidate.to_lowercase();
    for scheme in URL_BLOCKED_SCHEMES {
        if lower.contains(scheme) {
            return Some(format!("URL contains blocked scheme '{}'", scheme));
        }
    }
    if lower.contains("<script") {
        return Some("URL contains script tag".to_string());
    }
    if event_handler_pattern().is_match(candidate) {
        return Some("URL contains inline event handler".to_string());
    }

    match url::Url::parse(candidate) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => None,
            other => Some(format!("URL scheme '{}' is not allowed", other)),
        },
        Err(_) => Some("URL failed to parse".to_string()),
    }
}

/// Returns the reason a path candidate is unacceptable, or None if it is clean
fn path_violation(candidate: &str) -> Option<String> {
    if contains_control_chars(candidate) {
        return Some("path contains control characters".to_string());
    }

    let lower = candidate.to_lowercase();
    for prefix in PATH_BLOCKED_PREFIXES {
        if lower.trim_start().starts_with(prefix) {
            return Some(format!("path begins with blocked protocol '{}'", prefix));
        }
    }
    for pattern in TRAVERSAL_PATTERNS {
        if lower.contains(pattern) {
            return Some("path contains directory traversal sequence".to_string());
        }
    }
    if lower == ".." || lower.ends_with("/..") {
        return Some("path contains directory traversal sequence".to_string());
    }
    for prefix in SYSTEM_PATH_PREFIXES {
        if lower.starts_with(prefix) {
            return Some(format!("path targets system directory '{}'", prefix));
        }
    }
    if drive_letter_pattern().is_match(candidate) {
        return Some("path targets a Windows drive root".to_string());
    }

    None
}

/// Check whether a candidate string is an acceptable http(s) URL
///
/// Accepts only `http` and `https` schemes and rejects injection vectors
/// (blocked pseudo-protocols anywhere in the string, script-tag markers,
/// inline event handlers, control characters) as well as anything the
/// generic URL parser cannot handle.
pub fn is_valid_url(candidate: &str) -> bool {
    url_violation(candidate).is_none()
}

/// Check whether a candidate string is an acceptable relative image path
///
/// Rejects control characters, leading pseudo-protocols, directory
/// traversal sequences (including URL-encoded and double-encoded forms),
/// absolute system paths, and Windows drive letters.
pub fn is_valid_path(candidate: &str) -> bool {
    path_violation(candidate).is_none()
}

/// Validate a URL, producing a structured error on rejection
pub fn validate_url(candidate: &str) -> Result<(), SecurityError> {
    match url_violation(candidate) {
        None => Ok(()),
        Some(reason) => {
            warn!(reason = %reason, "rejected image URL");
            Err(SecurityError::new("validate_url", candidate, reason))
        }
    }
}

/// Validate a path, producing a structured error on rejection
pub fn validate_path(candidate: &str) -> Result<(), SecurityError> {
    match path_violation(candidate) {
        None => Ok(()),
        Some(reason) => {
            warn!(reason = %reason, "rejected image path");
            Err(SecurityError::new("validate_path", candidate, reason))
        }
    }
}

/// Produce a best-effort clean path from an untrusted candidate
///
/// Strips null bytes and control characters, collapses repeated `/`,
/// drops `.` and `..` segments, and removes disallowed characters plus
/// script/event-handler patterns from each segment. The result always
/// begins with `/`.
///
/// Unlike [`is_valid_path`], traversal segments are dropped rather than
/// rejected: this function is intentionally lenient so callers can clean
/// display paths without round-tripping an error. It must not be used as
/// a substitute for validation on security-sensitive input.
pub fn sanitize_path(candidate: &str) -> String {
    // Stripping characters can expose a pattern the regexes missed (and vice
    // versa), so the cleaning step runs to a fixpoint. Every step only
    // deletes, so the loop terminates.
    let mut cleaned: String = candidate.chars().filter(|&c| c != '\0').collect();
    loop {
        let next = script_tag_pattern().replace_all(&cleaned, "");
        let next = event_handler_pattern().replace_all(&next, "");
        let next: String = next
            .chars()
            .filter(|c| {
                !DISALLOWED_PATH_CHARS.contains(c)
                    && !('\u{00}'..='\u{1f}').contains(c)
                    && *c != '\u{7f}'
            })
            .collect();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    let segments: Vec<&str> = cleaned
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect();

    format!("/{}", segments.join("/"))
}
