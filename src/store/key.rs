use std::fmt::{Display, Formatter};

use crate::api::Day;

/// State namespace below a home.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Space {
    CurrentPrice,
    PricesToday,
    PricesTomorrow,
    Calculations,
}

impl Space {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentPrice => "CurrentPrice",
            Self::PricesToday => "PricesToday",
            Self::PricesTomorrow => "PricesTomorrow",
            Self::Calculations => "Calculations",
        }
    }
}

impl From<Day> for Space {
    fn from(day: Day) -> Self {
        match day {
            Day::Today => Self::PricesToday,
            Day::Tomorrow => Self::PricesTomorrow,
        }
    }
}

/// Dotted state path: `Homes.<home ID>.<space>.<name>…`.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Key(String);

impl Key {
    pub fn new(home_id: &str, space: Space) -> Self {
        Self(format!("Homes.{home_id}.{}", space.as_str()))
    }

    pub fn join(&self, segment: impl Display) -> Self {
        Self(format!("{}.{segment}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}
