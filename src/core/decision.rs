use crate::core::{channel::ChannelConfig, value::Value};

/// Outcome of evaluating one channel during one pass.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub channel: usize,
    pub should_trigger: bool,
    pub output_value: Value,
}

impl Decision {
    /// Select and coerce the channel's on or off literal.
    pub fn new(channel: &ChannelConfig, should_trigger: bool) -> Self {
        let literal = if should_trigger { &channel.value_on } else { &channel.value_off };
        Self { channel: channel.index, should_trigger, output_value: Value::coerce(literal) }
    }
}
