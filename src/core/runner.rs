use std::fmt::{Display, Formatter};

use bon::Builder;
use chrono::{DateTime, Local};

use crate::{
    api::{PriceReader, StateWriter},
    core::{
        channel::ChannelConfig,
        decision::Decision,
        engine::DecisionEngine,
        strategy::{Activation, Strategy},
    },
    prelude::*,
};

/// Why a channel produced no decision.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Skip {
    UnknownStrategy,
    Dormant,
}

impl Display for Skip {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStrategy => write!(f, "unknown strategy"),
            Self::Dormant => write!(f, "dormant"),
        }
    }
}

/// Result of a single channel within a pass.
#[derive(Debug)]
pub enum Outcome {
    /// Decided and written to the target state.
    Written(Decision),

    /// Decided, but not written because of the dry run.
    Evaluated(Decision),

    Skipped(Skip),

    /// Evaluation or the write failed, the target state is untouched.
    Failed(Error),
}

impl Outcome {
    #[must_use]
    pub const fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Written(decision) | Self::Evaluated(decision) => Some(decision),
            Self::Skipped(_) | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Evaluates every channel once and writes the decided values.
#[derive(Builder)]
pub struct ChannelRunner<'a, R, W> {
    reader: &'a R,
    writer: &'a W,
    now: DateTime<Local>,

    #[builder(default)]
    hours_block: Activation,

    /// Evaluate without writing the target states.
    #[builder(default)]
    dry_run: bool,
}

impl<R: PriceReader, W: StateWriter> ChannelRunner<'_, R, W> {
    /// Run one pass over the channels in their configured order.
    ///
    /// A failing or malformed channel is logged and does not affect the remaining ones.
    /// Values are written on every pass, even when unchanged.
    #[instrument(skip_all, fields(n_channels = channels.len(), now = %self.now))]
    pub async fn run_pass(&self, channels: &[Result<ChannelConfig>]) -> Vec<Outcome> {
        let engine = DecisionEngine::new(self.reader, self.now);
        let mut outcomes = Vec::with_capacity(channels.len());
        for (index, channel) in channels.iter().enumerate() {
            let outcome = match channel {
                Ok(channel) => self.run_channel(&engine, channel).await.unwrap_or_else(|error| {
                    warn!(
                        channel = channel.index,
                        strategy = %channel.strategy,
                        "failed to execute the channel: {error:#}",
                    );
                    Outcome::Failed(error)
                }),
                Err(error) => {
                    warn!(channel = index, "skipped the channel: {error:#}");
                    Outcome::Failed(anyhow!("{error:#}"))
                }
            };
            outcomes.push(outcome);
        }
        info!(
            n_decided = outcomes.iter().filter(|outcome| outcome.decision().is_some()).count(),
            n_failed = outcomes.iter().filter(|outcome| outcome.is_failed()).count(),
            "pass completed",
        );
        outcomes
    }

    async fn run_channel(
        &self,
        engine: &DecisionEngine<'_, R>,
        channel: &ChannelConfig,
    ) -> Result<Outcome> {
        let decision = match &channel.strategy {
            Strategy::BestCost => engine.best_cost(channel).await?,
            Strategy::BestSingleHours => engine.best_single_hours(channel).await?,
            Strategy::BestHoursBlock => match self.hours_block {
                Activation::Active => engine.best_hours_block(channel).await?,
                Activation::Dormant => {
                    debug!(channel = channel.index, "hours block strategy is dormant, skipped");
                    return Ok(Outcome::Skipped(Skip::Dormant));
                }
            },
            Strategy::Unrecognized(tag) => {
                debug!(channel = channel.index, tag = %tag, "unknown calculator strategy, skipped");
                return Ok(Outcome::Skipped(Skip::UnknownStrategy));
            }
        };

        if self.dry_run {
            return Ok(Outcome::Evaluated(decision));
        }
        self.writer
            .write_target(&channel.target_state, &decision.output_value)
            .await
            .with_context(|| format!("failed to set `{}`", channel.target_state))?;
        debug!(
            channel = decision.channel,
            strategy = %channel.strategy,
            target = %channel.target_state,
            value = %decision.output_value,
            "target state set",
        );
        Ok(Outcome::Written(decision))
    }
}
