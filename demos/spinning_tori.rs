use env_logger::Env;
use vantage::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    vantage::run(build_spinning_tori()?)?;
    Ok(())
}
