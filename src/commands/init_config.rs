use crate::config::Config;
use anyhow::{anyhow, Result};

pub fn run() -> Result<()> {
    let path = Config::default()
        .save()
        .map_err(|e| anyhow!("Failed to write config: {}", e))?;
    println!("Default configuration written to {}", path.display());
    Ok(())
}
