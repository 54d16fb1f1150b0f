use clap::Parser;

use crate::{cli::config::ConfigArgs, prelude::*, tables::build_channels_table};

#[derive(Parser)]
pub struct ShowArgs {
    #[clap(flatten)]
    config: ConfigArgs,
}

impl ShowArgs {
    pub fn run(self) -> Result {
        let settings = self.config.read()?;
        if !settings.use_calculator {
            warn!("calculator is disabled, `run` will not evaluate these channels");
        }
        println!("{}", build_channels_table(&settings.normalize()));
        Ok(())
    }
}
