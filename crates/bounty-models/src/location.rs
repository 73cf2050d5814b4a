//! Resolved IP geolocation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::jurisdiction::JurisdictionRegistry;

/// Result of resolving a client IP to a location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    /// ISO 3166-2 subdivision suffix, e.g. `43` for `UA-43`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub is_vpn: bool,
    #[serde(default)]
    pub is_proxy: bool,
    #[serde(default)]
    pub is_restricted: bool,
}

impl UserLocation {
    /// Set `is_restricted` from the country and `COUNTRY-REGION` codes.
    pub fn apply_restrictions(mut self, registry: &JurisdictionRegistry) -> Self {
        let country = self.country_code.as_deref().unwrap_or_default();
        let country_restricted = !country.is_empty() && registry.is_restricted(country);
        let region_restricted = match self.region.as_deref() {
            Some(region) if !country.is_empty() => {
                registry.is_restricted(&format!("{}-{}", country, region))
            }
            _ => false,
        };

        self.is_restricted = country_restricted || region_restricted;
        self
    }

    /// Whether the caller should be denied access.
    pub fn is_blocked(&self) -> bool {
        self.is_restricted || self.is_vpn || self.is_proxy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(country: &str, region: Option<&str>) -> UserLocation {
        UserLocation {
            ip: "203.0.113.7".to_string(),
            country_code: Some(country.to_string()),
            region: region.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_restricted_country() {
        let registry = JurisdictionRegistry::with_defaults();
        let loc = location("IR", None).apply_restrictions(&registry);
        assert!(loc.is_restricted);
        assert!(loc.is_blocked());
    }

    #[test]
    fn test_restricted_region_only() {
        let registry = JurisdictionRegistry::with_defaults();
        assert!(location("UA", Some("43")).apply_restrictions(&registry).is_restricted);
        assert!(!location("UA", Some("30")).apply_restrictions(&registry).is_restricted);
    }

    #[test]
    fn test_vpn_blocks_even_when_unrestricted() {
        let registry = JurisdictionRegistry::with_defaults();
        let mut loc = location("DE", None).apply_restrictions(&registry);
        assert!(!loc.is_blocked());

        loc.is_vpn = true;
        assert!(loc.is_blocked());
    }
}
