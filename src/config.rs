use std::{fmt::Debug, fs, path::Path};

use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::{
    core::{channel::ChannelConfig, strategy::Strategy},
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Calculator settings file.
#[derive(Default, Deserialize)]
pub struct Settings {
    /// Whether the channels get evaluated at all.
    #[serde(default)]
    pub use_calculator: bool,

    /// Channel entries, validated one by one so that a malformed entry fails alone.
    #[serde(default)]
    pub channels: Vec<toml::Value>,
}

/// Channel as configured, with the optional fields still unset.
///
/// Numbers and flags are also accepted as strings, as some admin UIs store them that way.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct RawChannel {
    pub home_id: String,

    pub strategy: Strategy,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub trigger_price: Option<f64>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub amount_hours: Option<u32>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub active: Option<bool>,

    pub target_state: String,
    pub value_on: String,
    pub value_off: String,
}

impl RawChannel {
    /// Fill in the defaults for the unset fields.
    pub fn normalize(self, index: usize) -> ChannelConfig {
        ChannelConfig {
            index,
            home_id: self.home_id,
            strategy: self.strategy,
            trigger_price: self.trigger_price.map_or(KilowattHourRate::ZERO, KilowattHourRate),
            amount_hours: self.amount_hours.unwrap_or(0),
            active: self.active.unwrap_or(false),
            target_state: self.target_state,
            value_on: self.value_on,
            value_off: self.value_off,
        }
    }
}

impl Settings {
    #[instrument(skip_all, fields(path = ?path.as_ref()))]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let settings: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(settings.use_calculator, n_channels = settings.channels.len(), "loaded");
        Ok(settings)
    }

    /// Produce the immutable channel configurations, indexed by their position.
    ///
    /// Malformed entries keep their position as errors.
    #[must_use]
    pub fn normalize(&self) -> Vec<Result<ChannelConfig>> {
        self.channels
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, entry)| {
                RawChannel::deserialize(entry)
                    .with_context(|| format!("malformed channel #{index}"))
                    .map(|channel| channel.normalize(index))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // language=TOML
    const SETTINGS: &str = r#"
        use_calculator = true

        [[channels]]
        home_id = "c70dcbe5-4485-4821-933d-a8a86452737b"
        strategy = "best_cost"
        trigger_price = 0.25
        active = true
        target_state = "0_userdata.0.boiler"
        value_on = "true"
        value_off = "false"

        [[channels]]
        home_id = "c70dcbe5-4485-4821-933d-a8a86452737b"
        strategy = "BestSingleHours"
        amount_hours = "3"
        active = "true"
        target_state = "shelly.0.SHSW-1.Relay0.Switch"
        value_on = "1"
        value_off = "0"

        [[channels]]
        home_id = "c70dcbe5-4485-4821-933d-a8a86452737b"
        strategy = "cheapest_week"
        target_state = "0_userdata.0.dryer"
        value_on = "on"
        value_off = "off"
    "#;

    #[test]
    fn test_normalize() -> Result {
        let settings: Settings = toml::from_str(SETTINGS)?;
        assert!(settings.use_calculator);

        let channels = settings.normalize().into_iter().collect::<Result<Vec<_>>>()?;
        assert_eq!(channels.len(), 3);

        assert_eq!(channels[0].index, 0);
        assert_eq!(channels[0].strategy, Strategy::BestCost);
        assert_eq!(channels[0].trigger_price, KilowattHourRate(0.25));
        assert_eq!(channels[0].amount_hours, 0);
        assert!(channels[0].active);

        assert_eq!(channels[1].index, 1);
        assert_eq!(channels[1].strategy, Strategy::BestSingleHours);
        assert_eq!(channels[1].amount_hours, 3);
        assert_eq!(channels[1].trigger_price, KilowattHourRate::ZERO);
        assert!(channels[1].active);

        assert_eq!(channels[2].strategy, Strategy::Unrecognized("cheapest_week".to_owned()));
        assert!(!channels[2].active);
        Ok(())
    }

    // language=TOML
    const MALFORMED_SETTINGS: &str = r#"
        use_calculator = true

        [[channels]]
        home_id = "home"
        strategy = "best_cost"
        target_state = "target.0"
        value_on = "on"
        value_off = "off"

        [[channels]]
        home_id = "home"
        strategy = "best_single_hours"
        amount_hours = -1
        target_state = "target.1"
        value_on = "on"

        [[channels]]
        home_id = "home"
        strategy = "best_cost"
        trigger_price = "abc"
        target_state = "target.2"
        value_on = "on"
        value_off = "off"

        [[channels]]
        home_id = "home"
        strategy = "best_single_hours"
        amount_hours = 2
        target_state = "target.3"
        value_on = "on"
        value_off = "off"
    "#;

    #[test]
    fn test_malformed_channels_keep_their_position() -> Result {
        let settings: Settings = toml::from_str(MALFORMED_SETTINGS)?;
        let channels = settings.normalize();
        assert_eq!(channels.len(), 4);
        assert_eq!(channels[0].as_ref().map_err(|error| anyhow!("{error:#}"))?.index, 0);
        assert!(channels[1].is_err());
        assert!(channels[2].is_err());
        let last = channels[3].as_ref().map_err(|error| anyhow!("{error:#}"))?;
        assert_eq!(last.index, 3);
        assert_eq!(last.target_state, "target.3");
        Ok(())
    }

    #[test]
    fn test_empty_settings() -> Result {
        let settings: Settings = toml::from_str("")?;
        assert!(!settings.use_calculator);
        assert!(settings.normalize().is_empty());
        Ok(())
    }
}
