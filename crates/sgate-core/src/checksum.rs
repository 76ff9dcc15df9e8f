//! SHA-256 of deployed scripts, for operators comparing what is served
//! against what they shipped. Not used on the request path.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::name::sanitize;
use crate::store::{ResolvedScript, ScriptStore};

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Resolve `raw_name` the way the gate would and hash the file it would serve.
pub fn script_digest<S: ScriptStore>(store: &S, raw_name: &str) -> Result<(ResolvedScript, String)> {
    let name = sanitize(raw_name);
    if name.is_empty() {
        anyhow::bail!("invalid script name {raw_name:?}");
    }
    let script = store
        .resolve(&name)
        .with_context(|| format!("script {name} not found"))?;
    let digest = sha256_path(&script.path)?;
    Ok((script, digest))
}
