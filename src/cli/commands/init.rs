//! The `init` command: write a default configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};

use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(&config_path, default_config_json())?;
    println!("created {}", config_path.display());
    Ok(())
}
