use std::{fs, path::PathBuf};

use clap::{Parser, ValueEnum};

use crate::{
    api::Day,
    cli::store::StoreArgs,
    core::price::{PriceRecord, PriceSeries},
    prelude::*,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Target {
    /// Today's hourly prices.
    Today,

    /// Tomorrow's hourly prices, an empty array when not published yet.
    Tomorrow,

    /// The current hour's price, a single object.
    Current,
}

#[derive(Parser)]
pub struct ImportArgs {
    #[clap(flatten)]
    store: StoreArgs,

    #[clap(long = "home-id", env = "HOME_ID")]
    home_id: String,

    #[clap(long, value_enum)]
    day: Target,

    /// JSON file with the price records as returned by the pricing API.
    #[clap(long)]
    file: PathBuf,
}

impl ImportArgs {
    #[instrument(skip_all, fields(home_id = %self.home_id, day = ?self.day))]
    pub fn run(self) -> Result {
        let contents = fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read `{}`", self.file.display()))?;
        let store = self.store.open()?;
        match self.day {
            Target::Today | Target::Tomorrow => {
                let records: Vec<PriceRecord> = serde_json::from_str(&contents)
                    .with_context(|| format!("malformed `{}`", self.file.display()))?;
                let day = if matches!(self.day, Target::Today) { Day::Today } else { Day::Tomorrow };
                store.put_price_series(&self.home_id, day, &PriceSeries::new(records))?;
            }
            Target::Current => {
                let record: PriceRecord = serde_json::from_str(&contents)
                    .with_context(|| format!("malformed `{}`", self.file.display()))?;
                store.put_current_price(&self.home_id, &record);
            }
        }
        store.save()
    }
}
