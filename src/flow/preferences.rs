//! User preferences submitted to the generator
//!
//! Budget tiers and times of day are closed enumerations; both parse from the
//! CLI spelling (`standard`, `late_night`) and from the symbolic form the
//! hosted model sees (`$$`).

use crate::error::KelpError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest crew the planner accepts from the command line
pub const MAX_GROUP_SIZE: u32 = 20;

/// Ordered budget tier for an outing
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Budget {
    /// Cheap and cheerful (`$`)
    #[serde(rename = "$")]
    Econ,
    /// The default tier (`$$`)
    #[default]
    #[serde(rename = "$$")]
    Standard,
    /// Nicer places (`$$$`)
    #[serde(rename = "$$$")]
    Premium,
    /// No holding back (`$$$$`)
    #[serde(rename = "$$$$")]
    Splurge,
}

impl Budget {
    /// All tiers, cheapest first
    pub const ALL: [Budget; 4] = [
        Budget::Econ,
        Budget::Standard,
        Budget::Premium,
        Budget::Splurge,
    ];

    /// Symbolic price tier, as shown on review sites
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Econ => "$",
            Self::Standard => "$$",
            Self::Premium => "$$$",
            Self::Splurge => "$$$$",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Econ => "Econ",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
            Self::Splurge => "Splurge",
        }
    }

    /// Approximate per-person spend for the tier
    pub fn range(&self) -> &'static str {
        match self {
            Self::Econ => "<$30",
            Self::Standard => "$30-60",
            Self::Premium => "$60-100",
            Self::Splurge => "$100+",
        }
    }

    /// Parse a budget from its name or its symbol
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::flow::Budget;
    ///
    /// assert_eq!(Budget::parse_str("premium").unwrap(), Budget::Premium);
    /// assert_eq!(Budget::parse_str("$$").unwrap(), Budget::Standard);
    /// assert!(Budget::parse_str("free").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "econ" | "$" => Ok(Self::Econ),
            "standard" | "$$" => Ok(Self::Standard),
            "premium" | "$$$" => Ok(Self::Premium),
            "splurge" | "$$$$" => Ok(Self::Splurge),
            other => Err(format!(
                "Unknown budget: {} (expected econ, standard, premium or splurge)",
                other
            )),
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Part of the day the outing happens in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Afternoon,
    #[default]
    Evening,
    LateNight,
}

impl TimeOfDay {
    /// Wire spelling used in prompts and config
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::LateNight => "late_night",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::LateNight => "Late Night",
        }
    }

    /// Parse a time of day, accepting `late-night` and `late night` too
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "late_night" => Ok(Self::LateNight),
            other => Err(format!(
                "Unknown time: {} (expected afternoon, evening or late_night)",
                other
            )),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the user asked for
///
/// Built by the front end, consumed once by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// City, neighborhood or zip; may be empty
    #[serde(default)]
    pub location: String,
    /// Mood and constraints in the user's own words
    pub vibe: String,
    #[serde(default)]
    pub budget: Budget,
    #[serde(default)]
    pub time: TimeOfDay,
    #[serde(default = "default_group_size")]
    pub group_size: u32,
}

fn default_group_size() -> u32 {
    2
}

impl UserPreferences {
    /// Creates preferences with the default budget, time and group size
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::flow::{Budget, TimeOfDay, UserPreferences};
    ///
    /// let prefs = UserPreferences::new("Austin", "chill date night");
    /// assert_eq!(prefs.budget, Budget::Standard);
    /// assert_eq!(prefs.time, TimeOfDay::Evening);
    /// assert_eq!(prefs.group_size, 2);
    /// ```
    pub fn new(location: impl Into<String>, vibe: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            vibe: vibe.into(),
            budget: Budget::default(),
            time: TimeOfDay::default(),
            group_size: default_group_size(),
        }
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_time(mut self, time: TimeOfDay) -> Self {
        self.time = time;
        self
    }

    pub fn with_group_size(mut self, group_size: u32) -> Self {
        self.group_size = group_size;
        self
    }

    /// Location if the user gave one
    pub fn location(&self) -> Option<&str> {
        let trimmed = self.location.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Front-end validation run before a generation request is made
    ///
    /// # Errors
    ///
    /// Returns `KelpError::InvalidPreferences` if the vibe is blank or the
    /// group size is outside `1..=MAX_GROUP_SIZE`
    pub fn validate(&self) -> Result<(), KelpError> {
        if self.vibe.trim().is_empty() {
            return Err(KelpError::InvalidPreferences(
                "describe the vibe you're going for".to_string(),
            ));
        }
        if self.group_size == 0 || self.group_size > MAX_GROUP_SIZE {
            return Err(KelpError::InvalidPreferences(format!(
                "group size must be between 1 and {}",
                MAX_GROUP_SIZE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_ordering() {
        assert!(Budget::Econ < Budget::Standard);
        assert!(Budget::Premium < Budget::Splurge);
        assert_eq!(Budget::ALL.len(), 4);
    }

    #[test]
    fn test_budget_symbols_and_labels() {
        assert_eq!(Budget::Econ.symbol(), "$");
        assert_eq!(Budget::Splurge.symbol(), "$$$$");
        assert_eq!(Budget::Premium.label(), "Premium");
        assert_eq!(Budget::Standard.range(), "$30-60");
        assert_eq!(Budget::Standard.to_string(), "$$");
    }

    #[test]
    fn test_budget_serializes_as_symbol() {
        let json = serde_json::to_string(&Budget::Premium).unwrap();
        assert_eq!(json, r#""$$$""#);
        let parsed: Budget = serde_json::from_str(r#""$""#).unwrap();
        assert_eq!(parsed, Budget::Econ);
    }

    #[test]
    fn test_time_of_day_parse() {
        assert_eq!(TimeOfDay::parse_str("late-night").unwrap(), TimeOfDay::LateNight);
        assert_eq!(TimeOfDay::parse_str("Late Night").unwrap(), TimeOfDay::LateNight);
        assert_eq!(TimeOfDay::parse_str("AFTERNOON").unwrap(), TimeOfDay::Afternoon);
        assert!(TimeOfDay::parse_str("brunch").is_err());
    }

    #[test]
    fn test_time_of_day_serde() {
        let json = serde_json::to_string(&TimeOfDay::LateNight).unwrap();
        assert_eq!(json, r#""late_night""#);
    }

    #[test]
    fn test_preferences_deserialize_camel_case_with_defaults() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"vibe":"rooftop drinks","groupSize":4}"#).unwrap();
        assert_eq!(prefs.group_size, 4);
        assert_eq!(prefs.location, "");
        assert_eq!(prefs.budget, Budget::Standard);
    }

    #[test]
    fn test_preferences_location_blank_is_none() {
        assert_eq!(UserPreferences::new("   ", "x").location(), None);
        assert_eq!(UserPreferences::new(" Austin ", "x").location(), Some("Austin"));
    }

    #[test]
    fn test_validate_rejects_blank_vibe() {
        let prefs = UserPreferences::new("Austin", "  ");
        assert!(matches!(
            prefs.validate(),
            Err(KelpError::InvalidPreferences(_))
        ));
    }

    #[test]
    fn test_validate_rejects_group_size_bounds() {
        let prefs = UserPreferences::new("Austin", "tacos").with_group_size(0);
        assert!(prefs.validate().is_err());
        let prefs = UserPreferences::new("Austin", "tacos").with_group_size(21);
        assert!(prefs.validate().is_err());
        let prefs = UserPreferences::new("Austin", "tacos").with_group_size(20);
        assert!(prefs.validate().is_ok());
    }
}
