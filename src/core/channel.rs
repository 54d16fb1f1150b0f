use bon::Builder;

use crate::{core::strategy::Strategy, quantity::rate::KilowattHourRate};

/// Fully populated configuration of a single automation channel.
///
/// Read-only during a pass.
#[must_use]
#[derive(Clone, Debug, PartialEq, Builder)]
pub struct ChannelConfig {
    /// Position in the configured channel list.
    pub index: usize,

    #[builder(into)]
    pub home_id: String,

    pub strategy: Strategy,

    #[builder(default)]
    pub trigger_price: KilowattHourRate,

    /// Number of hours to trigger for.
    #[builder(default)]
    pub amount_hours: u32,

    #[builder(default)]
    pub active: bool,

    /// Foreign state that receives the decided value.
    #[builder(into)]
    pub target_state: String,

    #[builder(into)]
    pub value_on: String,

    #[builder(into)]
    pub value_off: String,
}

impl ChannelConfig {
    #[must_use]
    pub const fn amount_hours(&self) -> usize {
        self.amount_hours as usize
    }
}
