//! Orbit around the campus with a drag, zoom with the wheel, hover and click
//! the Rectorate, press L to toggle the lights.

use env_logger::Env;
use vantage::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let stage = build_campus(&mut rand::rng())?;
    let config = AppConfig {
        title: "SEEU Campus".to_string(),
        background: stage.background,
        ..AppConfig::default()
    }
    .with_size(1280, 800);
    VantageApp::new(stage).with_config(config).run()?;
    Ok(())
}
