//! Configuration module
//!
//! Defines the CDN provider union and the full engine configuration.
//! Values are immutable once constructed and validated up front:
//! a [`CdnProvider`] that passes [`CdnProvider::validate`] can always be
//! turned into a base address by the URL builder.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_QUALITY;
use crate::security;
use crate::transform::ImageFormat;

mod env;

pub use env::{resolve_config, EnvSource, ProcessEnv};

static ORGANIZATION_NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches valid hosted organization names (lowercase alphanumerics and hyphens)
fn organization_name_pattern() -> &'static Regex {
    ORGANIZATION_NAME_PATTERN
        .get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("organization name regex is valid"))
}

/// Configuration errors
///
/// Fatal to the constructing call; nothing here is transient or retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Hosted provider selected but no organization name supplied
    #[error("Configuration error: organization name is required for the hosted provider")]
    MissingOrganizationName,

    /// Custom provider selected but no base address supplied
    #[error("Configuration error: base address is required for the custom provider")]
    MissingBaseAddress,

    /// Organization name does not match the allowed pattern
    #[error("Configuration error: invalid organization name {name:?} (allowed: lowercase letters, digits, hyphens)")]
    InvalidOrganizationName { name: String },

    /// Base address failed URL validation
    #[error("Configuration error: invalid base address {address:?}")]
    InvalidBaseAddress { address: String },

    /// No CDN configuration could be resolved from the environment
    #[error("Configuration error: no CDN configuration found in environment")]
    MissingCdnConfiguration,

    /// A configuration field holds an out-of-range or unparseable value
    #[error("Configuration error: invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// CDN provider selection
///
/// Hosted providers derive their base address from an organization name on
/// the shared CDN domain; custom providers bring their own base address
/// (CloudFront, GCS, Cloudflare, ...). The two variants carry exactly the
/// fields they need, so an inconsistent "hosted config with a base address"
/// cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum CdnProvider {
    Hosted { organization_name: String },
    Custom { base_address: String },
}

impl CdnProvider {
    /// Validate the provider fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            CdnProvider::Hosted { organization_name } => {
                if organization_name.is_empty() {
                    return Err(ConfigError::MissingOrganizationName);
                }
                if !organization_name_pattern().is_match(organization_name) {
                    return Err(ConfigError::InvalidOrganizationName {
                        name: organization_name.clone(),
                    });
                }
                Ok(())
            }
            CdnProvider::Custom { base_address } => {
                if base_address.is_empty() {
                    return Err(ConfigError::MissingBaseAddress);
                }
                if !security::is_valid_url(base_address) {
                    return Err(ConfigError::InvalidBaseAddress {
                        address: base_address.clone(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Cache key for builder instance caching
    ///
    /// Two providers that differ in organization or base address never share
    /// a key; identical providers always do.
    pub fn cache_key(&self) -> String {
        match self {
            CdnProvider::Hosted { organization_name } => format!("hosted:{}", organization_name),
            CdnProvider::Custom { base_address } => format!("custom:{}", base_address),
        }
    }
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

/// Full engine configuration: CDN provider plus rendering defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapkitConfig {
    /// CDN provider selection
    #[serde(flatten)]
    pub cdn: CdnProvider,

    /// Quality applied when a request carries none (default: 85)
    #[serde(default = "default_quality")]
    pub default_quality: u8,

    /// Format applied when a request carries none (default: auto)
    #[serde(default)]
    pub default_format: ImageFormat,
}

impl SnapkitConfig {
    /// Create a configuration with default quality and format
    pub fn new(cdn: CdnProvider) -> Self {
        Self {
            cdn,
            default_quality: DEFAULT_QUALITY,
            default_format: ImageFormat::Auto,
        }
    }

    /// Validate provider fields and default ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cdn.validate()?;
        if !(1..=100).contains(&self.default_quality) {
            return Err(ConfigError::invalid_value(
                "default_quality",
                format!("{} is outside 1-100", self.default_quality),
            ));
        }
        Ok(())
    }

    /// Canonical cache key over every configuration field
    ///
    /// Field order is fixed here rather than derived from any serialization,
    /// so structurally equal configs always map to the same engine cache
    /// entry.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|q:{}|f:{}",
            self.cdn.cache_key(),
            self.default_quality,
            self.default_format.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosted_provider_validates() {
        let provider = CdnProvider::Hosted {
            organization_name: "acme-corp-01".to_string(),
        };
        assert!(provider.validate().is_ok());
    }

    #[test]
    fn test_hosted_provider_rejects_empty_name() {
        let provider = CdnProvider::Hosted {
            organization_name: String::new(),
        };
        assert_eq!(
            provider.validate(),
            Err(ConfigError::MissingOrganizationName)
        );
    }

    #[test]
    fn test_hosted_provider_rejects_invalid_name() {
        for name in ["Acme", "acme corp", "acme_corp", "acme/corp"] {
            let provider = CdnProvider::Hosted {
                organization_name: name.to_string(),
            };
            assert!(
                matches!(
                    provider.validate(),
                    Err(ConfigError::InvalidOrganizationName { .. })
                ),
                "expected rejection for {:?}",
                name
            );
        }
    }

    #[test]
    fn test_custom_provider_validates() {
        let provider = CdnProvider::Custom {
            base_address: "https://d123.cloudfront.net".to_string(),
        };
        assert!(provider.validate().is_ok());
    }

    #[test]
    fn test_custom_provider_rejects_empty_address() {
        let provider = CdnProvider::Custom {
            base_address: String::new(),
        };
        assert_eq!(provider.validate(), Err(ConfigError::MissingBaseAddress));
    }

    #[test]
    fn test_custom_provider_rejects_invalid_address() {
        for address in ["not a url", "javascript:alert(1)", "ftp://host/"] {
            let provider = CdnProvider::Custom {
                base_address: address.to_string(),
            };
            assert!(
                matches!(
                    provider.validate(),
                    Err(ConfigError::InvalidBaseAddress { .. })
                ),
                "expected rejection for {:?}",
                address
            );
        }
    }

    #[test]
    fn test_provider_cache_keys() {
        let hosted = CdnProvider::Hosted {
            organization_name: "acme".to_string(),
        };
        let custom = CdnProvider::Custom {
            base_address: "https://cdn.example.com".to_string(),
        };
        assert_eq!(hosted.cache_key(), "hosted:acme");
        assert_eq!(custom.cache_key(), "custom:https://cdn.example.com");
    }

    #[test]
    fn test_config_cache_key_covers_all_fields() {
        let base = SnapkitConfig::new(CdnProvider::Hosted {
            organization_name: "acme".to_string(),
        });
        let mut other_quality = base.clone();
        other_quality.default_quality = 70;
        let mut other_format = base.clone();
        other_format.default_format = ImageFormat::WebP;

        assert_ne!(base.cache_key(), other_quality.cache_key());
        assert_ne!(base.cache_key(), other_format.cache_key());
        assert_eq!(base.cache_key(), base.clone().cache_key());
    }

    #[test]
    fn test_config_validate_quality_range() {
        let mut config = SnapkitConfig::new(CdnProvider::Hosted {
            organization_name: "acme".to_string(),
        });
        config.default_quality = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        config.default_quality = 101;
        assert!(config.validate().is_err());
        config.default_quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_deserializes_from_tagged_json() {
        let hosted: CdnProvider =
            serde_json::from_str(r#"{"provider":"hosted","organization_name":"acme"}"#).unwrap();
        assert_eq!(
            hosted,
            CdnProvider::Hosted {
                organization_name: "acme".to_string()
            }
        );

        let custom: CdnProvider = serde_json::from_str(
            r#"{"provider":"custom","base_address":"https://cdn.example.com"}"#,
        )
        .unwrap();
        assert_eq!(
            custom,
            CdnProvider::Custom {
                base_address: "https://cdn.example.com".to_string()
            }
        );
    }
}
