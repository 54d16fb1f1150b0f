use chrono::{DateTime, Local, Timelike};

use crate::{
    api::{Day, PriceReader},
    core::{channel::ChannelConfig, decision::Decision, price::PriceSeries},
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Evaluates channel strategies against the prices known at `now`.
///
/// Hours are compared by their local hour-of-day component only,
/// so the reader must return the series of the right day.
pub struct DecisionEngine<'a, R> {
    reader: &'a R,
    now: DateTime<Local>,
}

impl<'a, R: PriceReader> DecisionEngine<'a, R> {
    pub const fn new(reader: &'a R, now: DateTime<Local>) -> Self {
        Self { reader, now }
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(channel = channel.index))]
    pub async fn best_cost(&self, channel: &ChannelConfig) -> Result<Decision> {
        let current_price = self
            .reader
            .get_current_price_total(&channel.home_id)
            .await
            .with_context(|| format!("failed to read the current price of `{}`", channel.home_id))?;
        Ok(Decision::new(channel, is_below_trigger_price(channel, current_price)))
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(channel = channel.index))]
    pub async fn best_single_hours(&self, channel: &ChannelConfig) -> Result<Decision> {
        let series = self.read_today(channel).await?;
        Ok(Decision::new(channel, is_cheapest_hour(channel, &series, self.now)))
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(channel = channel.index))]
    pub async fn best_hours_block(&self, channel: &ChannelConfig) -> Result<Decision> {
        let series = self.read_today(channel).await?;
        Ok(Decision::new(channel, is_in_cheapest_block(channel, &series, self.now)))
    }

    async fn read_today(&self, channel: &ChannelConfig) -> Result<PriceSeries> {
        let series = self
            .reader
            .get_price_series(&channel.home_id, Day::Today)
            .await
            .with_context(|| format!("failed to read today's prices of `{}`", channel.home_id))?;
        if series.is_empty() {
            debug!(channel = channel.index, home_id = %channel.home_id, "no prices published yet");
        }
        Ok(series)
    }
}

/// Active channels trigger while the current price is strictly below the trigger price.
///
/// An unknown current price never triggers.
#[must_use]
pub fn is_below_trigger_price(
    channel: &ChannelConfig,
    current_price: Option<KilowattHourRate>,
) -> bool {
    channel.active && current_price.is_some_and(|current| channel.trigger_price > current)
}

/// Whether the current hour is one of the channel's cheapest hours of the day.
#[must_use]
pub fn is_cheapest_hour(channel: &ChannelConfig, series: &PriceSeries, now: DateTime<Local>) -> bool {
    series.cheapest(channel.amount_hours()).iter().any(|record| record.hour() == now.hour())
}

/// Whether the current hour falls into the cheapest block of consecutive hours.
#[must_use]
pub fn is_in_cheapest_block(
    channel: &ChannelConfig,
    series: &PriceSeries,
    now: DateTime<Local>,
) -> bool {
    series
        .cheapest_block(channel.amount_hours())
        .is_some_and(|block| block.iter().any(|record| record.hour() == now.hour()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::core::{
        price::{
            PriceRecord,
            tests::{record, series},
        },
        strategy::Strategy,
        value::Value,
    };

    fn channel(strategy: Strategy) -> ChannelConfig {
        ChannelConfig::builder()
            .index(0)
            .home_id("home")
            .strategy(strategy)
            .trigger_price(KilowattHourRate(1.0))
            .active(true)
            .amount_hours(2)
            .target_state("0_userdata.0.heater")
            .value_on("true")
            .value_off("false")
            .build()
    }

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 16, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_below_trigger_price() {
        let channel = channel(Strategy::BestCost);
        assert!(is_below_trigger_price(&channel, Some(KilowattHourRate(0.99))));
        assert!(!is_below_trigger_price(&channel, Some(KilowattHourRate(1.0))));
        assert!(!is_below_trigger_price(&channel, Some(KilowattHourRate(1.2))));
        assert!(!is_below_trigger_price(&channel, None));
    }

    #[test]
    fn test_inactive_never_below_trigger_price() {
        let channel = ChannelConfig { active: false, ..channel(Strategy::BestCost) };
        for price in [-10.0, 0.0, 0.5, 2.0] {
            assert!(!is_below_trigger_price(&channel, Some(KilowattHourRate(price))));
        }
    }

    #[test]
    fn test_cheapest_hour() {
        let channel = channel(Strategy::BestSingleHours);
        let series = series(&[1.0, 0.5, 0.8]);
        assert!(is_cheapest_hour(&channel, &series, at(1)));
        assert!(is_cheapest_hour(&channel, &series, at(2)));
        assert!(!is_cheapest_hour(&channel, &series, at(0)));
        assert!(!is_cheapest_hour(&channel, &series, at(3)));
    }

    #[test]
    fn test_cheapest_hours_match_n_lowest_totals() {
        let totals = [
            0.31, 0.29, 0.27, 0.27, 0.26, 0.28, 0.33, 0.41, 0.45, 0.39, 0.35, 0.30, 0.29, 0.28,
            0.30, 0.34, 0.40, 0.47, 0.52, 0.49, 0.42, 0.37, 0.34, 0.32,
        ];
        let series = series(&totals);
        let channel = ChannelConfig { amount_hours: 4, ..channel(Strategy::BestSingleHours) };
        let triggering: Vec<u32> =
            (0..24).filter(|hour| is_cheapest_hour(&channel, &series, at(*hour))).collect();
        assert_eq!(triggering, [2, 3, 4, 5]);
    }

    #[test]
    fn test_cheapest_hour_ties_resolved_chronologically() {
        let channel = ChannelConfig { amount_hours: 1, ..channel(Strategy::BestSingleHours) };
        let series = series(&[0.4, 0.2, 0.2]);
        assert!(is_cheapest_hour(&channel, &series, at(1)));
        assert!(!is_cheapest_hour(&channel, &series, at(2)));
    }

    #[test]
    fn test_cheapest_hour_zero_hours() {
        let channel = ChannelConfig { amount_hours: 0, ..channel(Strategy::BestSingleHours) };
        let series = series(&[1.0, 0.5, 0.8]);
        assert!((0..24).all(|hour| !is_cheapest_hour(&channel, &series, at(hour))));
    }

    #[test]
    fn test_cheapest_hour_compares_hour_of_day_only() {
        let channel = channel(Strategy::BestSingleHours);
        let yesterday = PriceSeries::new([
            PriceRecord { starts_at: at(1) - chrono::TimeDelta::days(1), ..record(1, 0.1) },
            PriceRecord { starts_at: at(5) - chrono::TimeDelta::days(1), ..record(5, 0.9) },
        ]);
        assert!(is_cheapest_hour(&channel, &yesterday, at(1)));
    }

    #[test]
    fn test_empty_series_never_triggers() {
        let series = PriceSeries::default();
        for hour in 0..24 {
            assert!(!is_cheapest_hour(&channel(Strategy::BestSingleHours), &series, at(hour)));
            assert!(!is_in_cheapest_block(&channel(Strategy::BestHoursBlock), &series, at(hour)));
        }
    }

    #[test]
    fn test_in_cheapest_block() {
        let channel = ChannelConfig { amount_hours: 3, ..channel(Strategy::BestHoursBlock) };
        let series = series(&[0.5, 0.1, 0.6, 0.2, 0.2, 0.3, 0.9]);
        let triggering: Vec<u32> =
            (0..24).filter(|hour| is_in_cheapest_block(&channel, &series, at(*hour))).collect();
        assert_eq!(triggering, [3, 4, 5]);
    }

    struct Prices {
        current: Option<KilowattHourRate>,
        today: PriceSeries,
    }

    #[async_trait::async_trait]
    impl PriceReader for Prices {
        async fn get_price_series(&self, _home_id: &str, day: Day) -> Result<PriceSeries> {
            ensure!(day == Day::Today);
            Ok(self.today.clone())
        }

        async fn get_current_price_total(&self, _home_id: &str) -> Result<Option<KilowattHourRate>> {
            Ok(self.current)
        }
    }

    #[tokio::test]
    async fn test_best_cost_outputs_value_off_above_trigger_price() -> Result {
        let prices = Prices { current: Some(KilowattHourRate(1.2)), today: PriceSeries::default() };
        let channel = ChannelConfig {
            value_on: "on".to_owned(),
            value_off: "0".to_owned(),
            ..channel(Strategy::BestCost)
        };
        let decision = DecisionEngine::new(&prices, at(12)).best_cost(&channel).await?;
        assert!(!decision.should_trigger);
        assert_eq!(decision.output_value, Value::Number(0.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_best_single_hours_example() -> Result {
        let prices = Prices { current: None, today: series(&[1.0, 0.5, 0.8]) };
        let channel = channel(Strategy::BestSingleHours);

        let decision = DecisionEngine::new(&prices, at(1)).best_single_hours(&channel).await?;
        assert!(decision.should_trigger);
        assert_eq!(decision.output_value, Value::Boolean(true));

        let decision = DecisionEngine::new(&prices, at(0)).best_single_hours(&channel).await?;
        assert!(!decision.should_trigger);
        assert_eq!(decision.output_value, Value::Boolean(false));
        Ok(())
    }

    #[tokio::test]
    async fn test_best_hours_block() -> Result {
        let prices = Prices { current: None, today: series(&[0.9, 0.2, 0.1, 0.8]) };
        let engine = DecisionEngine::new(&prices, at(2));
        assert!(engine.best_hours_block(&channel(Strategy::BestHoursBlock)).await?.should_trigger);
        Ok(())
    }
}
