use std::fmt::{Display, Formatter};

use chrono::{DateTime, Local, Timelike};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::quantity::rate::KilowattHourRate;

/// Categorical price tier attached by the pricing API.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceLevel {
    VeryCheap,
    Cheap,
    Normal,
    Expensive,
    VeryExpensive,

    #[default]
    #[serde(other)]
    Unknown,
}

impl Display for PriceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryCheap => write!(f, "VERY_CHEAP"),
            Self::Cheap => write!(f, "CHEAP"),
            Self::Normal => write!(f, "NORMAL"),
            Self::Expensive => write!(f, "EXPENSIVE"),
            Self::VeryExpensive => write!(f, "VERY_EXPENSIVE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One hour's price.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PriceRecord {
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Local>,

    /// Energy and taxes.
    pub total: KilowattHourRate,

    /// Spot market part.
    #[serde(default)]
    pub energy: KilowattHourRate,

    #[serde(default)]
    pub tax: KilowattHourRate,

    #[serde(default)]
    pub level: PriceLevel,
}

impl PriceRecord {
    /// Local hour of day, `0..24`.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.starts_at.hour()
    }
}

/// Hourly prices of a single day for a single home, in chronological order.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, derive_more::From, derive_more::Into)]
pub struct PriceSeries(Vec<PriceRecord>);

impl PriceSeries {
    pub const MAX_LEN: usize = 24;

    /// Build a series, ordering the records by their start time.
    pub fn new(records: impl IntoIterator<Item = PriceRecord>) -> Self {
        Self(records.into_iter().sorted_by_key(|record| record.starts_at).collect())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.0
    }

    /// Records sorted by ascending total.
    ///
    /// The sort is stable, so equally priced hours keep their chronological order.
    #[must_use]
    pub fn by_total_ascending(&self) -> Vec<PriceRecord> {
        self.0.iter().copied().sorted_by_key(|record| record.total.ordered()).collect()
    }

    /// The `n` cheapest records, ties resolved by chronological order.
    #[must_use]
    pub fn cheapest(&self, n: usize) -> Vec<PriceRecord> {
        let mut records = self.by_total_ascending();
        records.truncate(n);
        records
    }

    /// The window of `n` consecutive records with the lowest summed total.
    ///
    /// The earliest window wins a tie. Returns [`None`] when `n` is zero
    /// or exceeds the number of records.
    #[must_use]
    pub fn cheapest_block(&self, n: usize) -> Option<&[PriceRecord]> {
        if n == 0 {
            return None;
        }
        self.0.windows(n).min_by_key(|window| {
            window.iter().map(|record| record.total).sum::<KilowattHourRate>().ordered()
        })
    }
}
