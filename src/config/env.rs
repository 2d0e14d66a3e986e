//! Environment-based configuration resolution
//!
//! Front-end build tools expose environment variables under different
//! prefixes (`NEXT_PUBLIC_` for Next.js, `VITE_` for Vite, `REACT_APP_`
//! for CRA, none for plain server runtimes). Rather than probing each
//! framework inline, resolution goes through the [`EnvSource`] strategy:
//! callers inject whatever lookup fits their runtime, and the default
//! [`ProcessEnv`] reads the process environment while the resolver tries
//! the known prefixes in priority order.

use super::{CdnProvider, ConfigError, SnapkitConfig};

/// Variable prefixes tried in priority order (unprefixed last)
const FRAMEWORK_PREFIXES: [&str; 4] = ["NEXT_PUBLIC_", "VITE_", "REACT_APP_", ""];

const ORGANIZATION_NAME_VAR: &str = "SNAPKIT_ORGANIZATION_NAME";
const BASE_ADDRESS_VAR: &str = "SNAPKIT_BASE_ADDRESS";
const DEFAULT_QUALITY_VAR: &str = "SNAPKIT_DEFAULT_QUALITY";
const DEFAULT_FORMAT_VAR: &str = "SNAPKIT_DEFAULT_FORMAT";

/// Environment lookup strategy
pub trait EnvSource {
    /// Human-readable name of this source, used in diagnostics
    fn name(&self) -> &str;

    /// Look up a single variable by its full key
    fn get(&self, key: &str) -> Option<String>;

    /// Whether this source's environment appears to be present
    fn detect(&self) -> bool {
        true
    }
}

/// Default source backed by the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn name(&self) -> &str {
        "process-env"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

fn lookup(source: &dyn EnvSource, key: &str) -> Option<String> {
    FRAMEWORK_PREFIXES.iter().find_map(|prefix| {
        source
            .get(&format!("{}{}", prefix, key))
            .filter(|value| !value.is_empty())
    })
}

/// Resolve a full [`SnapkitConfig`] from an environment source
///
/// A base address selects the custom provider; otherwise an organization
/// name selects the hosted provider. A base address wins when both are
/// set, since bring-your-own CDN is the more specific intent. The
/// resolved configuration is validated before it is returned.
pub fn resolve_config(source: &dyn EnvSource) -> Result<SnapkitConfig, ConfigError> {
    let cdn = if let Some(base_address) = lookup(source, BASE_ADDRESS_VAR) {
        CdnProvider::Custom { base_address }
    } else if let Some(organization_name) = lookup(source, ORGANIZATION_NAME_VAR) {
        CdnProvider::Hosted { organization_name }
    } else {
        return Err(ConfigError::MissingCdnConfiguration);
    };

    let mut config = SnapkitConfig::new(cdn);

    if let Some(quality) = lookup(source, DEFAULT_QUALITY_VAR) {
        config.default_quality = quality.parse().map_err(|_| {
            ConfigError::invalid_value(DEFAULT_QUALITY_VAR, format!("{:?} is not a number", quality))
        })?;
    }
    if let Some(format) = lookup(source, DEFAULT_FORMAT_VAR) {
        config.default_format = format
            .parse()
            .map_err(|message: String| ConfigError::invalid_value(DEFAULT_FORMAT_VAR, message))?;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ImageFormat;
    use std::collections::HashMap;

    struct MapEnv {
        vars: HashMap<String, String>,
    }

    impl MapEnv {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                vars: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl EnvSource for MapEnv {
        fn name(&self) -> &str {
            "map-env"
        }

        fn get(&self, key: &str) -> Option<String> {
            self.vars.get(key).cloned()
        }
    }

    #[test]
    fn test_resolve_hosted_from_unprefixed_var() {
        let env = MapEnv::new(&[("SNAPKIT_ORGANIZATION_NAME", "acme")]);
        let config = resolve_config(&env).unwrap();
        assert_eq!(
            config.cdn,
            CdnProvider::Hosted {
                organization_name: "acme".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_prefers_framework_prefix() {
        let env = MapEnv::new(&[
            ("NEXT_PUBLIC_SNAPKIT_ORGANIZATION_NAME", "next-org"),
            ("SNAPKIT_ORGANIZATION_NAME", "plain-org"),
        ]);
        let config = resolve_config(&env).unwrap();
        assert_eq!(
            config.cdn,
            CdnProvider::Hosted {
                organization_name: "next-org".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_base_address_wins_over_organization() {
        let env = MapEnv::new(&[
            ("SNAPKIT_ORGANIZATION_NAME", "acme"),
            ("VITE_SNAPKIT_BASE_ADDRESS", "https://cdn.example.com"),
        ]);
        let config = resolve_config(&env).unwrap();
        assert_eq!(
            config.cdn,
            CdnProvider::Custom {
                base_address: "https://cdn.example.com".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_reads_defaults() {
        let env = MapEnv::new(&[
            ("SNAPKIT_ORGANIZATION_NAME", "acme"),
            ("SNAPKIT_DEFAULT_QUALITY", "70"),
            ("SNAPKIT_DEFAULT_FORMAT", "webp"),
        ]);
        let config = resolve_config(&env).unwrap();
        assert_eq!(config.default_quality, 70);
        assert_eq!(config.default_format, ImageFormat::WebP);
    }

    #[test]
    fn test_resolve_missing_configuration() {
        let env = MapEnv::new(&[]);
        assert_eq!(
            resolve_config(&env),
            Err(ConfigError::MissingCdnConfiguration)
        );
    }

    #[test]
    fn test_resolve_rejects_bad_quality() {
        let env = MapEnv::new(&[
            ("SNAPKIT_ORGANIZATION_NAME", "acme"),
            ("SNAPKIT_DEFAULT_QUALITY", "loud"),
        ]);
        assert!(matches!(
            resolve_config(&env),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_resolve_validates_resolved_config() {
        let env = MapEnv::new(&[("SNAPKIT_ORGANIZATION_NAME", "Not Valid")]);
        assert!(matches!(
            resolve_config(&env),
            Err(ConfigError::InvalidOrganizationName { .. })
        ));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let env = MapEnv::new(&[
            ("NEXT_PUBLIC_SNAPKIT_ORGANIZATION_NAME", ""),
            ("SNAPKIT_ORGANIZATION_NAME", "acme"),
        ]);
        let config = resolve_config(&env).unwrap();
        assert_eq!(
            config.cdn,
            CdnProvider::Hosted {
                organization_name: "acme".to_string()
            }
        );
    }
}
