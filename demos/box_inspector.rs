//! Click a box to highlight it and print its position and size.
//!
//! Set `VANTAGE_SEED` to replay the same field.

use env_logger::Env;
use vantage::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let stage = build_box_field(&BoxFieldSettings::from_env())?;
    VantageApp::new(stage).run()?;
    Ok(())
}
