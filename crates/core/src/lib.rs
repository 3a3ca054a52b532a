//! fontface core: turn a font file into an `@font-face` stylesheet, its web
//! font variants and a JavaScript module exporting the font's metadata.
//!
//! All output goes to a virtual [`ArtifactStore`]; nothing touches the disk.

pub mod descriptors;
pub mod encode;
pub mod error;
pub mod format;
pub mod options;
pub mod plugin;
pub mod store;
pub mod stylesheet;
pub mod synthesizer;

pub use descriptors::{Descriptors, SUB_FAMILY_WEIGHTS, infer_weight, normalize_sub_family};
pub use encode::{Encoders, FontEncoder};
pub use error::{ConfigError, StorageError, SynthesisError};
pub use fontface_font_info::{FontDecodeError, FontInfo, MetadataExtractor, NameTableExtractor};
pub use format::FontFormat;
pub use options::{DEFAULT_VIRTUAL_PATH, DescriptorValue, Options, Rule};
pub use plugin::{FontfacePlugin, Loader, ModuleRequest, ModuleType, PLUGIN_NAME};
pub use store::{ArtifactStore, MemoryStore};
pub use stylesheet::{STYLESHEET_NAME, render_module, render_stylesheet};
pub use synthesizer::Synthesizer;
