//! User-selectable reasoning budget.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How much internal reasoning the completion service may spend per answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingLevel {
    Low,
    #[default]
    Medium,
    High,
    Dynamic,
}

/// Token budget derived from a [`ThinkingLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkingBudget {
    Tokens(u32),
    /// Let the service pick the budget itself.
    Dynamic,
}

impl ThinkingBudget {
    /// Value sent upstream; the service reads `-1` as "decide dynamically".
    pub fn wire_value(self) -> i32 {
        match self {
            ThinkingBudget::Tokens(tokens) => i32::try_from(tokens).unwrap_or(i32::MAX),
            ThinkingBudget::Dynamic => -1,
        }
    }
}

impl ThinkingLevel {
    pub const ALL: [ThinkingLevel; 4] = [
        ThinkingLevel::Low,
        ThinkingLevel::Medium,
        ThinkingLevel::High,
        ThinkingLevel::Dynamic,
    ];

    /// Parse a stored or callback value. Anything unrecognised maps to the default.
    pub fn parse(value: &str) -> Self {
        match value {
            "low" => ThinkingLevel::Low,
            "medium" => ThinkingLevel::Medium,
            "high" => ThinkingLevel::High,
            "dynamic" => ThinkingLevel::Dynamic,
            _ => ThinkingLevel::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThinkingLevel::Low => "low",
            ThinkingLevel::Medium => "medium",
            ThinkingLevel::High => "high",
            ThinkingLevel::Dynamic => "dynamic",
        }
    }

    pub fn budget(self) -> ThinkingBudget {
        match self {
            ThinkingLevel::Low => ThinkingBudget::Tokens(4096),
            ThinkingLevel::Medium => ThinkingBudget::Tokens(16384),
            ThinkingLevel::High => ThinkingBudget::Tokens(32768),
            ThinkingLevel::Dynamic => ThinkingBudget::Dynamic,
        }
    }

    /// Human-readable label shown in the settings menu.
    pub fn label(self) -> &'static str {
        match self {
            ThinkingLevel::Low => "Low - 4,096 tokens",
            ThinkingLevel::Medium => "Medium - 16,384 tokens",
            ThinkingLevel::High => "High - 32,768 tokens",
            ThinkingLevel::Dynamic => "Dynamic reasoning",
        }
    }
}

impl fmt::Display for ThinkingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_levels_round_trip() {
        for level in ThinkingLevel::ALL {
            assert_eq!(ThinkingLevel::parse(level.as_str()), level);
        }
    }

    #[test]
    fn test_parse_unknown_defaults_to_medium() {
        assert_eq!(ThinkingLevel::parse(""), ThinkingLevel::Medium);
        assert_eq!(ThinkingLevel::parse("HIGH"), ThinkingLevel::Medium);
        assert_eq!(ThinkingLevel::parse("extreme"), ThinkingLevel::Medium);
    }

    #[test]
    fn test_budget_mapping() {
        assert_eq!(ThinkingLevel::Low.budget(), ThinkingBudget::Tokens(4096));
        assert_eq!(ThinkingLevel::Medium.budget(), ThinkingBudget::Tokens(16384));
        assert_eq!(ThinkingLevel::High.budget(), ThinkingBudget::Tokens(32768));
        assert_eq!(ThinkingLevel::Dynamic.budget(), ThinkingBudget::Dynamic);
        assert_eq!(ThinkingLevel::Dynamic.budget().wire_value(), -1);
        assert_eq!(ThinkingLevel::High.budget().wire_value(), 32768);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ThinkingLevel::Medium.label(), "Medium - 16,384 tokens");
        assert_eq!(ThinkingLevel::Dynamic.label(), "Dynamic reasoning");
    }
}
