//! Hierarchical key-value state store persisted as a JSON file.

mod key;
mod prices;

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub use self::key::{Key, Space};
use crate::{
    api::{Day, PriceReader, StateWriter},
    core::{
        channel::ChannelConfig,
        price::{PriceRecord, PriceSeries},
        value::Value,
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Stored value with its metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "val")]
    pub value: Value,

    /// Whether the value was produced by this application rather than requested from it.
    pub ack: bool,

    #[serde(rename = "ts")]
    pub updated_at: DateTime<Local>,
}

#[derive(Default)]
pub struct Store {
    /// Backing file, [`None`] for an in-memory store.
    path: Option<PathBuf>,

    states: Mutex<BTreeMap<String, State>>,
}

impl Store {
    #[cfg(test)]
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store backed by the file, which may not exist yet.
    #[instrument(skip_all, fields(path = ?path.as_ref()))]
    pub fn open<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let states = if path.is_file() {
            let contents =
                fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
            serde_json::from_slice(&contents)
                .with_context(|| format!("failed to deserialize `{}`", path.display()))?
        } else {
            info!("store does not exist yet, starting empty");
            BTreeMap::new()
        };
        Ok(Self { path: Some(path.to_path_buf()), states: Mutex::new(states) })
    }

    /// Persist the states to the backing file, if any.
    #[instrument(skip_all, fields(path = ?self.path))]
    pub fn save(&self) -> Result {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let (contents, n_states) = {
            let states = self.lock();
            (serde_json::to_vec_pretty(&*states)?, states.len())
        };
        fs::write(path, contents).with_context(|| format!("failed to write `{}`", path.display()))?;
        info!(n_states, "saved");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<State> {
        self.lock().get(key).cloned()
    }

    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).map(|state| state.value)
    }

    /// Replace the state and return the previous one.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>, ack: bool) -> Option<State> {
        let state = State { value: value.into(), ack, updated_at: Local::now() };
        self.lock().insert(key.into(), state)
    }

    /// Mirror the channel's effective settings below the home's calculations.
    #[instrument(skip_all, fields(channel = channel.index))]
    pub fn publish_channel_settings(&self, channel: &ChannelConfig) {
        let key = Key::new(&channel.home_id, Space::Calculations).join(channel.index);
        self.set(key.join("TriggerPrice"), channel.trigger_price.0, true);
        self.set(key.join("Active"), channel.active, true);
        self.set(key.join("AmountHours"), channel.amount_hours, true);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, State>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PriceReader for Store {
    #[instrument(skip_all, level = Level::DEBUG, fields(home_id = home_id, day = ?day))]
    async fn get_price_series(&self, home_id: &str, day: Day) -> Result<PriceSeries> {
        let key = Key::new(home_id, Space::from(day)).join("json");
        let json = match self.get_value(key.as_str()) {
            None => return Ok(PriceSeries::default()),
            Some(Value::String(json)) if json.trim().is_empty() => {
                return Ok(PriceSeries::default());
            }
            Some(Value::String(json)) => json,
            Some(other) => bail!("`{key}` holds a {}, expected a JSON string", other.kind()),
        };
        let records: Vec<PriceRecord> =
            serde_json::from_str(&json).with_context(|| format!("malformed `{key}`"))?;
        Ok(PriceSeries::new(records))
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(home_id = home_id))]
    async fn get_current_price_total(&self, home_id: &str) -> Result<Option<KilowattHourRate>> {
        let key = Key::new(home_id, Space::CurrentPrice).join("total");
        match self.get_value(key.as_str()) {
            None => Ok(None),
            Some(Value::Number(total)) => Ok(Some(KilowattHourRate(total))),
            Some(other) => bail!("`{key}` holds a {}, expected a number", other.kind()),
        }
    }
}

#[async_trait]
impl StateWriter for Store {
    async fn write_target(&self, target: &str, value: &Value) -> Result {
        ensure!(!target.trim().is_empty(), "the target state is not configured");
        self.set(target, value.clone(), false);
        Ok(())
    }
}
