//! Geographic restrictions.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Granularity of a restricted jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionType {
    Country,
    Region,
    State,
}

/// A jurisdiction the platform cannot pay out to or accept work from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedJurisdiction {
    /// ISO 3166-1 alpha-2 for countries, ISO 3166-2 for subdivisions.
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub jurisdiction_type: JurisdictionType,
    pub reason: String,
    pub effective_date: NaiveDate,
}

impl RestrictedJurisdiction {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        jurisdiction_type: JurisdictionType,
        reason: impl Into<String>,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            jurisdiction_type,
            reason: reason.into(),
            effective_date,
        }
    }
}

/// Static lookup table of restricted jurisdictions.
#[derive(Debug, Clone, Default)]
pub struct JurisdictionRegistry {
    entries: Vec<RestrictedJurisdiction>,
}

impl JurisdictionRegistry {
    pub fn new(entries: Vec<RestrictedJurisdiction>) -> Self {
        Self { entries }
    }

    /// Registry with the sanctioned countries and regions the platform ships with.
    pub fn with_defaults() -> Self {
        const SANCTIONS: &str = "Comprehensive sanctions";
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

        Self::new(vec![
            RestrictedJurisdiction::new("CU", "Cuba", JurisdictionType::Country, SANCTIONS, date(2024, 1, 1)),
            RestrictedJurisdiction::new("IR", "Iran", JurisdictionType::Country, SANCTIONS, date(2024, 1, 1)),
            RestrictedJurisdiction::new("KP", "North Korea", JurisdictionType::Country, SANCTIONS, date(2024, 1, 1)),
            RestrictedJurisdiction::new("SY", "Syria", JurisdictionType::Country, SANCTIONS, date(2024, 1, 1)),
            RestrictedJurisdiction::new("UA-43", "Crimea", JurisdictionType::Region, SANCTIONS, date(2024, 1, 1)),
            RestrictedJurisdiction::new("UA-14", "Donetsk", JurisdictionType::Region, SANCTIONS, date(2024, 1, 1)),
            RestrictedJurisdiction::new("UA-09", "Luhansk", JurisdictionType::Region, SANCTIONS, date(2024, 1, 1)),
        ])
    }

    pub fn all(&self) -> &[RestrictedJurisdiction] {
        &self.entries
    }

    /// Look up a row by code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&RestrictedJurisdiction> {
        let code = code.trim();
        self.entries
            .iter()
            .find(|j| j.code.eq_ignore_ascii_case(code))
    }

    pub fn is_restricted(&self, code: &str) -> bool {
        self.get(code).is_some()
    }
}
