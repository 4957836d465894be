//! Forecasting strategy tags

use std::fmt;

/// Forecasting strategy requested through `model_type`
///
/// The set of recognized tags is closed; anything else is carried verbatim
/// in [`Strategy::Unsupported`] so it can be reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Automatic non-seasonal ARIMA order selection
    #[default]
    AutoArima,
    /// Seasonal ARIMA, recognized but not served
    Sarima,
    /// Trend + seasonality decomposition on a synthetic calendar
    Prophet,
    /// Any other tag, uppercased
    Unsupported(String),
}

impl Strategy {
    /// Tag used when the request does not name a strategy
    pub const DEFAULT_TAG: &'static str = "AUTOARIMA";

    /// Parse a tag case-insensitively
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.to_uppercase();
        match normalized.as_str() {
            "AUTOARIMA" => Strategy::AutoArima,
            "SARIMA" => Strategy::Sarima,
            "PROPHET" => Strategy::Prophet,
            _ => Strategy::Unsupported(normalized),
        }
    }

    /// Canonical tag
    pub fn tag(&self) -> &str {
        match self {
            Strategy::AutoArima => "AUTOARIMA",
            Strategy::Sarima => "SARIMA",
            Strategy::Prophet => "PROPHET",
            Strategy::Unsupported(tag) => tag,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_case_insensitive() {
        assert_eq!(Strategy::from_tag("autoarima"), Strategy::AutoArima);
        assert_eq!(Strategy::from_tag("Prophet"), Strategy::Prophet);
        assert_eq!(Strategy::from_tag("SARIMA"), Strategy::Sarima);
    }

    #[test]
    fn test_unknown_tag_is_kept_uppercased() {
        assert_eq!(
            Strategy::from_tag("foo"),
            Strategy::Unsupported("FOO".to_string())
        );
        assert_eq!(Strategy::from_tag("foo").to_string(), "FOO");
    }

    #[test]
    fn test_default_matches_default_tag() {
        assert_eq!(Strategy::default(), Strategy::from_tag(Strategy::DEFAULT_TAG));
    }
}
