use std::io;

use anyhow::Context;

use stockcard_cli::{Shell, ShellConfig};
use stockcard_inventory::{DisplaySettings, Registry};

fn main() -> anyhow::Result<()> {
    let config = ShellConfig::from_env()?;
    stockcard_observability::init(&config.log);

    tracing::info!(currency = %config.currency, output = ?config.output, "starting stockcard shell");

    let registry = Registry::with_settings(DisplaySettings::new(config.currency.clone()));
    let mut shell = Shell::new(registry, io::stdin().lock(), io::stdout().lock(), config.output);

    shell.run().context("interactive session failed")?;
    Ok(())
}
