use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Kind of property a listing offers.
///
/// Serialized lower-case (`"condo"`); parsing is case-insensitive so both the
/// create form values (`"condo"`) and the browse filter labels (`"Condo"`)
/// resolve to the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Condo,
    Apartment,
    Townhouse,
    Studio,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::House,
        PropertyType::Condo,
        PropertyType::Apartment,
        PropertyType::Townhouse,
        PropertyType::Studio,
    ];

    /// Wire value, e.g. `"townhouse"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Condo => "condo",
            PropertyType::Apartment => "apartment",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Studio => "studio",
        }
    }

    /// Human readable label, e.g. `"Townhouse"`.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Condo => "Condo",
            PropertyType::Apartment => "Apartment",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Studio => "Studio",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown property type: {}", s))
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Property type selection of the browse filter.
///
/// `All` is the "all types" sentinel; it only exists for filtering and is
/// never a valid type for a stored listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropertyTypeFilter {
    #[default]
    All,
    Only(PropertyType),
}

impl PropertyTypeFilter {
    pub const ALL_TYPES_LABEL: &'static str = "All Types";

    pub fn matches(&self, property_type: PropertyType) -> bool {
        match self {
            PropertyTypeFilter::All => true,
            PropertyTypeFilter::Only(wanted) => *wanted == property_type,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyTypeFilter::All => Self::ALL_TYPES_LABEL,
            PropertyTypeFilter::Only(t) => t.label(),
        }
    }
}

impl FromStr for PropertyTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case(Self::ALL_TYPES_LABEL)
            || trimmed.eq_ignore_ascii_case("all")
        {
            return Ok(PropertyTypeFilter::All);
        }
        trimmed.parse().map(PropertyTypeFilter::Only)
    }
}
