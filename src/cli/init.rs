//! Init command implementation

use std::path::Path;

use anyhow::Result;

use farmstead::config::Config;

/// Write a default config file
pub fn init_command(path: &Path, force: bool) -> Result<()> {
    Config::write_default(path, force)?;
    println!("Wrote config to {}", path.display());
    println!("Edit it and start the server with: farmstead serve");
    Ok(())
}
