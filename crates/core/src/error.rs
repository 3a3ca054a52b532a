//! Error types for font-face synthesis.

use std::path::PathBuf;

use fontface_font_info::FontDecodeError;

use crate::format::FontFormat;

/// Errors raised while loading plugin options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read an options file.
    #[error("Failed to read options file '{path}': {source}")]
    Read { path: PathBuf, source: std::io::Error },

    /// Unknown option or wrongly typed value.
    #[error("Invalid options: {0}")]
    Parse(#[from] toml::de::Error),

    /// A rule's `test` pattern is not a valid glob.
    #[error("Invalid rule pattern '{pattern}': {source}")]
    Pattern { pattern: String, source: globset::Error },

    /// The virtual base path is empty.
    #[error("virtual_path must not be empty")]
    EmptyVirtualPath,

    /// A descriptor override has an empty name.
    #[error("Descriptor names must not be empty")]
    EmptyDescriptorName,
}

/// Errors raised by the virtual artifact store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Nothing has been written at this path.
    #[error("No artifact at '{0}'")]
    NotFound(PathBuf),

    /// The store refused a write.
    #[error("Failed to write artifact '{path}': {message}")]
    Write { path: PathBuf, message: String },

    /// Another writer panicked while holding the store lock.
    #[error("Artifact store lock poisoned")]
    Poisoned,
}

/// Errors that abort synthesis for one font resource.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The font's metadata could not be decoded.
    #[error(transparent)]
    Decode(#[from] FontDecodeError),

    /// An artifact could not be stored.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A format encoder failed.
    #[error("Failed to encode {format}: {source:#}")]
    Encode { format: FontFormat, source: anyhow::Error },
}
