use crate::{
    api::Day,
    core::price::{PriceRecord, PriceSeries},
    prelude::*,
    store::{Key, Space, Store},
};

impl Store {
    /// Store the day's prices: the JSON series, the series by ascending price, and per-hour states.
    ///
    /// An empty tomorrow series means the prices are not published yet,
    /// so the per-hour tomorrow states get reset.
    #[instrument(skip_all, fields(home_id = home_id, day = ?day, n_records = series.len()))]
    pub fn put_price_series(&self, home_id: &str, day: Day, series: &PriceSeries) -> Result {
        if series.len() > PriceSeries::MAX_LEN {
            warn!("more records than hours in a day");
        }
        let prefix = Key::new(home_id, Space::from(day));
        self.set(
            prefix.join("json"),
            serde_json::to_string(series.records()).context("failed to serialize the prices")?,
            true,
        );
        self.set(
            prefix.join("jsonBYpriceASC"),
            serde_json::to_string(&series.by_total_ascending())
                .context("failed to serialize the sorted prices")?,
            true,
        );

        if series.is_empty() && day == Day::Tomorrow {
            info!("prices are not published yet, resetting");
            for hour in 0..24 {
                self.reset_record(&prefix.join(hour));
            }
        } else {
            for record in series.records() {
                self.put_record(&prefix.join(record.hour()), record);
            }
        }
        info!("stored");
        Ok(())
    }

    #[instrument(skip_all, fields(home_id = home_id, starts_at = %record.starts_at))]
    pub fn put_current_price(&self, home_id: &str, record: &PriceRecord) {
        self.put_record(&Key::new(home_id, Space::CurrentPrice), record);
        info!(total = %record.total, "stored");
    }

    fn put_record(&self, prefix: &Key, record: &PriceRecord) {
        self.set(prefix.join("total"), record.total.0, true);
        self.set(prefix.join("energy"), record.energy.0, true);
        self.set(prefix.join("tax"), record.tax.0, true);
        self.set(prefix.join("startsAt"), record.starts_at.to_rfc3339(), true);
        self.set(prefix.join("level"), record.level.to_string(), true);
    }

    fn reset_record(&self, prefix: &Key) {
        self.set(prefix.join("total"), 0.0, true);
        self.set(prefix.join("energy"), 0.0, true);
        self.set(prefix.join("tax"), 0.0, true);
        self.set(prefix.join("level"), "Not known now", true);
    }
}
