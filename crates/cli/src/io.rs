//! Font file I/O and flushing generated artifacts to disk.

use std::{
    fs::{create_dir_all, read, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use fontface_core::ArtifactStore;
use glob::glob;
use log::error;

/// A file handle for I/O operations.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).with_context(|| format!("Failed to read font: {}", self.path.display()))
    }

    /// Write data, creating parent directories as needed.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data).with_context(|| format!("Failed to write: {}", self.path.display()))
    }

    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Expand CLI inputs: glob patterns are matched, plain paths are kept as given.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if !is_pattern(input) {
            paths.push(PathBuf::from(input));
            continue;
        }
        let matched: Vec<PathBuf> = glob(input)
            .with_context(|| format!("Failed to glob pattern: {input}"))?
            .filter_map(Result::ok)
            .collect();
        if matched.is_empty() {
            bail!("No fonts match {input}");
        }
        paths.extend(matched);
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Write every stored artifact under `out_dir`, dropping the `virtual_base` prefix.
pub fn flush_store(
    store: &impl ArtifactStore,
    virtual_base: &Path,
    out_dir: &Path,
) -> Result<usize> {
    let paths = store.paths()?;
    for path in &paths {
        let relative = path.strip_prefix(virtual_base).unwrap_or(path);
        let data = store.read(path)?;
        FontFile::new(out_dir.join(relative)).write(&*data)?;
    }
    Ok(paths.len())
}

/// Log every failure and bail if any occurred.
pub fn check_results_with_paths<T, P: AsRef<Path>>(
    results: &[(P, Result<T>)],
    operation: &str,
) -> Result<()> {
    let errors: Vec<_> = results
        .iter()
        .filter_map(|(path, r)| r.as_ref().err().map(|e| (path.as_ref(), e)))
        .collect();

    if !errors.is_empty() {
        for (path, err) in &errors {
            error!("{}: {err:#}", path.display());
        }
        bail!("{operation} failed for {} files", errors.len());
    }
    Ok(())
}
