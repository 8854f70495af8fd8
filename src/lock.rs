//! File-based locking so two merge runs never write the same output.
//!
//! The lock file sits next to the output (`<output>.lock`) and is held
//! with an advisory flock for the lifetime of the guard.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::MergeError;

/// Holds an exclusive lock until dropped.
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Lock path used for a given output file
    pub fn path_for(output: &Path) -> PathBuf {
        let mut name = output
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "rulemerge".into());
        name.push(".lock");
        output.with_file_name(name)
    }

    /// Try to take the lock for `output` without blocking.
    pub fn acquire(output: &Path) -> Result<Self> {
        let path = Self::path_for(output);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // create without truncate: another holder may own it
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {:?}", path))?;

        file.try_lock_exclusive()
            .map_err(|_| MergeError::Locked(path.clone()))?;

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
