use std::path::PathBuf;

use clap::Parser;

use crate::{prelude::*, store::Store};

#[derive(Parser)]
pub struct StoreArgs {
    /// State store file, created on the first save.
    #[clap(long = "store", env = "STORE_PATH", default_value = "states.json")]
    path: PathBuf,
}

impl StoreArgs {
    pub fn open(&self) -> Result<Store> {
        Store::open(&self.path)
    }
}
