use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Decision strategy of a channel, parsed from its configured tag.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Strategy {
    /// Trigger while the current price is below the trigger price.
    BestCost,

    /// Trigger during the N cheapest hours of the day.
    BestSingleHours,

    /// Trigger during the cheapest block of N consecutive hours.
    BestHoursBlock,

    /// Tag that this version does not know about.
    Unrecognized(String),
}

impl Strategy {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BestCost => "best_cost",
            Self::BestSingleHours => "best_single_hours",
            Self::BestHoursBlock => "best_hours_block",
            Self::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for Strategy {
    fn from(tag: String) -> Self {
        match tag.trim() {
            "best_cost" | "BestCost" => Self::BestCost,
            "best_single_hours" | "BestSingleHours" => Self::BestSingleHours,
            "best_hours_block" | "BestHoursBlock" => Self::BestHoursBlock,
            _ => Self::Unrecognized(tag),
        }
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Unrecognized(tag) => tag,
            known => known.name().to_owned(),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Activation state of the hours block strategy.
///
/// Dormant channels are skipped without writing their target.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Activation {
    #[default]
    Dormant,

    Active,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(Strategy::from("best_cost".to_owned()), Strategy::BestCost);
        assert_eq!(Strategy::from("BestSingleHours".to_owned()), Strategy::BestSingleHours);
        assert_eq!(Strategy::from(" best_hours_block ".to_owned()), Strategy::BestHoursBlock);
        assert_eq!(
            Strategy::from("cheapest_day".to_owned()),
            Strategy::Unrecognized("cheapest_day".to_owned()),
        );
    }

    #[test]
    fn test_round_trip_unrecognized_tag() {
        let strategy = Strategy::from("future".to_owned());
        assert_eq!(strategy.name(), "future");
        assert_eq!(String::from(strategy), "future");
    }
}
