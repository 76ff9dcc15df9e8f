//! Script resolution against a read-only scripts directory.
//!
//! The gate only depends on the [`ScriptStore`] trait; [`ScriptDir`] is the
//! filesystem-backed implementation. Paths are built solely from a fixed
//! directory, a sanitized [`ScriptName`] and an extension from a closed list.

mod extensions;

pub use extensions::{CandidateExtensions, ExtensionError, DEFAULT_EXTENSIONS};

use crate::name::ScriptName;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// A script confirmed to exist and be readable at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScript {
    pub name: ScriptName,
    pub path: PathBuf,
    pub extension: String,
}

/// Source of scripts consulted by the access gate.
///
/// Implementations block; call from `spawn_blocking` when used from async code.
pub trait ScriptStore {
    /// Returns the first existing candidate for `name`, or `None`.
    ///
    /// Never fails: errors other than "not found" reject the candidate.
    fn resolve(&self, name: &ScriptName) -> Option<ResolvedScript>;

    /// Reads the full content of a previously resolved script.
    fn read(&self, script: &ResolvedScript) -> io::Result<Vec<u8>>;
}

/// Scripts stored as plain files directly under one directory.
#[derive(Debug, Clone)]
pub struct ScriptDir {
    dir: PathBuf,
    extensions: CandidateExtensions,
}

impl ScriptDir {
    pub fn new(dir: impl Into<PathBuf>, extensions: CandidateExtensions) -> Self {
        Self {
            dir: dir.into(),
            extensions,
        }
    }

    fn candidate_path(&self, name: &ScriptName, ext: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name.as_str(), ext))
    }
}

/// Confirms `path` is a regular file, then opens it.
///
/// Opening a FIFO or device blocks, so the type check comes first.
fn probe_readable(path: &Path) -> io::Result<bool> {
    if !fs::metadata(path)?.is_file() {
        return Ok(false);
    }
    File::open(path)?;
    Ok(true)
}

impl ScriptStore for ScriptDir {
    fn resolve(&self, name: &ScriptName) -> Option<ResolvedScript> {
        if name.is_empty() {
            return None;
        }
        for ext in self.extensions.iter() {
            let path = self.candidate_path(name, ext);
            match probe_readable(&path) {
                Ok(true) => {
                    return Some(ResolvedScript {
                        name: name.clone(),
                        path,
                        extension: ext.to_string(),
                    });
                }
                Ok(false) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(script = %name, ext, error = %e, "script candidate rejected");
                }
            }
        }
        None
    }

    fn read(&self, script: &ResolvedScript) -> io::Result<Vec<u8>> {
        if !fs::metadata(&script.path)?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is no longer a regular file", script.path.display()),
            ));
        }
        let mut f = File::open(&script.path)?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        Ok(buf)
    }
}
