//! Collaborators the decision engine talks to.

use async_trait::async_trait;

use crate::{
    core::{price::PriceSeries, value::Value},
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Calendar day of a price series, relative to now.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Day {
    Today,
    Tomorrow,
}

#[async_trait]
pub trait PriceReader: Sync {
    /// Hourly prices of the day in chronological order, empty when not yet published.
    async fn get_price_series(&self, home_id: &str, day: Day) -> Result<PriceSeries>;

    /// Total price of the current hour, if known.
    async fn get_current_price_total(&self, home_id: &str) -> Result<Option<KilowattHourRate>>;
}

#[async_trait]
pub trait StateWriter: Sync {
    async fn write_target(&self, target: &str, value: &Value) -> Result;
}
