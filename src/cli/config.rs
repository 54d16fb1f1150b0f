use std::path::PathBuf;

use clap::Parser;

use crate::{config::Settings, prelude::*};

#[derive(Parser)]
pub struct ConfigArgs {
    /// Calculator settings file.
    #[clap(long = "config", env = "CONFIG_PATH", default_value = "price-switch.toml")]
    path: PathBuf,
}

impl ConfigArgs {
    pub fn read(&self) -> Result<Settings> {
        Settings::read_from(&self.path)
    }
}
