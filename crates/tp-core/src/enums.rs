//! Accept formats and device category enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! unless the wire format dictates otherwise. Category parsing is strict: any
//! value outside the two fixed sets is a client error, surfaced as
//! [`InvalidCategory`](crate::errors::InvalidCategory).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::InvalidCategory;

// ---------------------------------------------------------------------------
// AcceptFormat
// ---------------------------------------------------------------------------

/// Response shape negotiated for code/schema/example endpoints.
///
/// Parsed once at the boundary from the `accept` string; every downstream
/// branch dispatches on this closed enumeration rather than comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AcceptFormat {
    /// `application/x-thingtalk`: textual ThingTalk (the default).
    ThingTalk,
    /// `application/json`: JSON manifest / declaration rows.
    Json,
    /// `application/json;apiVersion=1`: JSON rows in the legacy dialect.
    JsonV1,
}

impl AcceptFormat {
    /// Parse an accept header value. Unknown values fall back to the
    /// ThingTalk default, matching the wire protocol's `default:` branch.
    #[must_use]
    pub fn parse(accept: &str) -> Self {
        match accept {
            "application/json" => Self::Json,
            "application/json;apiVersion=1" => Self::JsonV1,
            _ => Self::ThingTalk,
        }
    }

    /// The media-type string this format was negotiated from.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThingTalk => "application/x-thingtalk",
            Self::Json => "application/json",
            Self::JsonV1 => "application/json;apiVersion=1",
        }
    }
}

impl Default for AcceptFormat {
    fn default() -> Self {
        Self::ThingTalk
    }
}

impl fmt::Display for AcceptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DeviceCategory / DeviceSubcategory
// ---------------------------------------------------------------------------

/// Primary device category axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Online,
    Physical,
    Data,
    System,
}

impl DeviceCategory {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Physical => "physical",
            Self::Data => "data",
            Self::System => "system",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary device category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceSubcategory {
    Media,
    SocialNetwork,
    Home,
    Communication,
    Health,
    Service,
    DataManagement,
}

impl DeviceSubcategory {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::SocialNetwork => "social-network",
            Self::Home => "home",
            Self::Communication => "communication",
            Self::Health => "health",
            Self::Service => "service",
            Self::DataManagement => "data-management",
        }
    }
}

impl fmt::Display for DeviceSubcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CategoryFilter
// ---------------------------------------------------------------------------

/// A validated `class` query parameter: either a primary category or a
/// secondary one. Anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    Category(DeviceCategory),
    Subcategory(DeviceSubcategory),
}

impl CategoryFilter {
    /// Parse a raw `class` parameter against the two fixed category sets.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCategory`] for any value outside both sets.
    pub fn parse(klass: &str) -> Result<Self, InvalidCategory> {
        let primary = match klass {
            "online" => Some(DeviceCategory::Online),
            "physical" => Some(DeviceCategory::Physical),
            "data" => Some(DeviceCategory::Data),
            "system" => Some(DeviceCategory::System),
            _ => None,
        };
        if let Some(cat) = primary {
            return Ok(Self::Category(cat));
        }
        let secondary = match klass {
            "media" => Some(DeviceSubcategory::Media),
            "social-network" => Some(DeviceSubcategory::SocialNetwork),
            "home" => Some(DeviceSubcategory::Home),
            "communication" => Some(DeviceSubcategory::Communication),
            "health" => Some(DeviceSubcategory::Health),
            "service" => Some(DeviceSubcategory::Service),
            "data-management" => Some(DeviceSubcategory::DataManagement),
            _ => None,
        };
        secondary.map_or_else(
            || Err(InvalidCategory(klass.to_string())),
            |sub| Ok(Self::Subcategory(sub)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accept_format_parses_known_values() {
        assert_eq!(
            AcceptFormat::parse("application/x-thingtalk"),
            AcceptFormat::ThingTalk
        );
        assert_eq!(AcceptFormat::parse("application/json"), AcceptFormat::Json);
        assert_eq!(
            AcceptFormat::parse("application/json;apiVersion=1"),
            AcceptFormat::JsonV1
        );
    }

    #[test]
    fn accept_format_defaults_to_thingtalk() {
        assert_eq!(AcceptFormat::parse(""), AcceptFormat::ThingTalk);
        assert_eq!(AcceptFormat::parse("text/html"), AcceptFormat::ThingTalk);
        assert_eq!(AcceptFormat::default(), AcceptFormat::ThingTalk);
    }

    #[test]
    fn category_filter_accepts_both_axes() {
        assert_eq!(
            CategoryFilter::parse("online").unwrap(),
            CategoryFilter::Category(DeviceCategory::Online)
        );
        assert_eq!(
            CategoryFilter::parse("social-network").unwrap(),
            CategoryFilter::Subcategory(DeviceSubcategory::SocialNetwork)
        );
    }

    #[test]
    fn category_filter_rejects_unknown_values() {
        for bad in ["", "unknown", "ONLINE", "social_network", "medias"] {
            assert!(CategoryFilter::parse(bad).is_err(), "{bad} should be rejected");
        }
    }
}
