//! Checksum command: SHA-256 of the file a script name resolves to.

use anyhow::Result;
use sgate_core::checksum;
use sgate_core::config::GateConfig;

/// Resolve `name` against the configured scripts directory and print its digest.
pub async fn run_checksum(cfg: &GateConfig, name: &str) -> Result<()> {
    let store = cfg.script_dir()?;
    let (script, digest) = checksum::script_digest(&store, name)?;
    println!("{}  {}", digest, script.path.display());
    Ok(())
}
