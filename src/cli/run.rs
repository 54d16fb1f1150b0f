use chrono::{Local, Timelike};
use clap::Parser;

use crate::{
    cli::{config::ConfigArgs, store::StoreArgs},
    core::{runner::ChannelRunner, strategy::Activation},
    prelude::*,
    tables::build_outcomes_table,
};

#[derive(Parser)]
pub struct RunArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    store: StoreArgs,

    /// Evaluate the channels without setting the target states.
    #[clap(long)]
    dry_run: bool,

    /// Whether to evaluate the best hours block channels.
    #[clap(long, env = "HOURS_BLOCK", default_value = "dormant")]
    hours_block: Activation,
}

impl RunArgs {
    #[instrument(skip_all, fields(dry_run = self.dry_run))]
    pub async fn run(self) -> Result {
        let settings = self.config.read()?;
        if !settings.use_calculator {
            info!("calculator is disabled");
            return Ok(());
        }
        let channels = settings.normalize();
        let store = self.store.open()?;
        for channel in channels.iter().flatten() {
            store.publish_channel_settings(channel);
        }

        let now = Local::now().with_nanosecond(0).unwrap_or_else(Local::now);
        let outcomes = ChannelRunner::builder()
            .reader(&store)
            .writer(&store)
            .now(now)
            .hours_block(self.hours_block)
            .dry_run(self.dry_run)
            .build()
            .run_pass(&channels)
            .await;
        println!("{}", build_outcomes_table(&channels, &outcomes));

        if !self.dry_run {
            store.save()?;
        }
        Ok(())
    }
}
