//! CDN URL construction
//!
//! Combines the security validator and the transform encoder into the two
//! delivery strategies:
//! - **Path strategy**: relative sources are validated, sanitized, and
//!   joined onto the CDN base address with a `transform` query parameter.
//! - **URL-proxy strategy**: absolute sources are routed through the
//!   CDN's `/image` endpoint so third-party-hosted images can still be
//!   transformed.
//!
//! Builder instances are cheap but validation is not free, so the
//! [`UrlBuilderFactory`] memoizes one builder per distinct CDN
//! configuration in a bounded LRU cache.

mod builder;
mod factory;

pub use builder::{FormatUrls, UrlBuilder};
pub use factory::UrlBuilderFactory;
