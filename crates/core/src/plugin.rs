//! Build-graph integration.
//!
//! The host bundler calls [`FontfacePlugin::create_module`] for every module
//! it is about to create. Fonts matched by a rule get a transform step
//! prepended and are re-typed as JavaScript; [`FontfacePlugin::load`] then
//! runs that transform on the font's bytes.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use fontface_font_info::{MetadataExtractor, NameTableExtractor};
use log::debug;

use crate::{
    encode::Encoders,
    error::SynthesisError,
    options::{Options, Rule},
    store::{ArtifactStore, MemoryStore},
    synthesizer::Synthesizer,
};

pub const PLUGIN_NAME: &str = "fontface";

/// How the host parses and generates a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleType {
    /// Emitted as a file asset.
    #[default]
    Asset,
    /// Parsed as an auto-detected JavaScript module.
    JavascriptAuto,
}

/// A transform step applied to a module's content before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loader {
    /// Replace the font with generated module source, using the rule at this index.
    Fontface { rule: usize },
    /// A host-provided transform, identified by name.
    External(String),
}

/// A module the host is about to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
    pub resource: PathBuf,
    pub module_type: ModuleType,
    pub loaders: Vec<Loader>,
}

impl ModuleRequest {
    pub fn new(resource: impl Into<PathBuf>) -> Self {
        Self { resource: resource.into(), module_type: ModuleType::default(), loaders: Vec::new() }
    }
}

/// A configured plugin instance.
#[derive(Debug)]
pub struct FontfacePlugin<E, S> {
    options: Options,
    synthesizer: Synthesizer<E, S>,
}

impl FontfacePlugin<NameTableExtractor, MemoryStore> {
    /// Plugin with the built-in extractor, encoders and a fresh memory store.
    pub fn with_defaults(context: impl Into<PathBuf>, options: Options) -> Self {
        Self::new(
            context,
            options,
            NameTableExtractor,
            Encoders::builtin(),
            Arc::new(MemoryStore::new()),
        )
    }
}

impl<E, S> FontfacePlugin<E, S>
where
    E: MetadataExtractor,
    S: ArtifactStore,
{
    pub fn new(
        context: impl Into<PathBuf>,
        options: Options,
        extractor: E,
        encoders: Encoders,
        store: Arc<S>,
    ) -> Self {
        let synthesizer =
            Synthesizer::new(context, &options.virtual_path, extractor, encoders, store);
        Self { options, synthesizer }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn synthesizer(&self) -> &Synthesizer<E, S> {
        &self.synthesizer
    }

    /// Whether `resource` lives inside the generated artifact directory.
    pub fn is_generated(&self, resource: &Path) -> bool {
        resource.starts_with(self.synthesizer.virtual_base())
    }

    /// Claim a font module before the host creates it.
    ///
    /// Generated artifacts are never claimed. Otherwise the first matching
    /// rule wins; returns whether the request was modified.
    pub fn create_module(&self, request: &mut ModuleRequest) -> bool {
        if self.is_generated(&request.resource) {
            return false;
        }
        let Some((index, rule)) = self.options.find_rule(&request.resource) else {
            return false;
        };

        debug!("{PLUGIN_NAME}: {} matched rule '{}'", request.resource.display(), rule.test());
        request.loaders.insert(0, Loader::Fontface { rule: index });
        request.module_type = ModuleType::JavascriptAuto;
        true
    }

    fn claimed_rule(&self, request: &ModuleRequest) -> Option<&Rule> {
        request.loaders.iter().find_map(|loader| match loader {
            Loader::Fontface { rule } => self.options.rules.get(*rule),
            Loader::External(_) => None,
        })
    }

    /// Run the font transform for a claimed module.
    ///
    /// Returns `None` for modules this plugin did not claim.
    pub async fn load(
        &self,
        request: &ModuleRequest,
        content: &[u8],
    ) -> Result<Option<Arc<str>>, SynthesisError> {
        let Some(rule) = self.claimed_rule(request) else {
            return Ok(None);
        };
        self.synthesizer.synthesize(&request.resource, content, rule).await.map(Some)
    }
}
