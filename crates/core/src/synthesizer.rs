//! Font artifact synthesis with change detection.

use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use fontface_font_info::MetadataExtractor;
use log::{debug, info};

use crate::{
    descriptors::Descriptors,
    encode::Encoders,
    error::SynthesisError,
    format::FontFormat,
    options::Rule,
    store::ArtifactStore,
    stylesheet::{STYLESHEET_NAME, render_module, render_stylesheet},
};

/// Generates a font's stylesheet, format variants and module source.
///
/// Output is regenerated only when the font's bytes differ from the `.ttf`
/// artifact stored by the previous run. The generated module text is cached
/// per resource path for the lifetime of the synthesizer.
pub struct Synthesizer<E, S> {
    context: PathBuf,
    virtual_base: PathBuf,
    extractor: E,
    encoders: Encoders,
    store: Arc<S>,
    modules: Mutex<HashMap<PathBuf, Arc<str>>>,
}

impl<E, S> Synthesizer<E, S>
where
    E: MetadataExtractor,
    S: ArtifactStore,
{
    /// `virtual_path` is resolved against the build `context` directory.
    pub fn new(
        context: impl Into<PathBuf>,
        virtual_path: &Path,
        extractor: E,
        encoders: Encoders,
        store: Arc<S>,
    ) -> Self {
        let context = context.into();
        let virtual_base = context.join(virtual_path);
        Self {
            context,
            virtual_base,
            extractor,
            encoders,
            store,
            modules: Mutex::default(),
        }
    }

    pub fn context(&self) -> &Path {
        &self.context
    }

    /// Absolute directory under which all artifacts are written.
    pub fn virtual_base(&self) -> &Path {
        &self.virtual_base
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Directory holding the artifacts of one font resource.
    ///
    /// Mirrors the resource's path relative to the context, file name
    /// included, so every font gets its own directory.
    pub fn artifact_dir(&self, resource: &Path) -> PathBuf {
        let relative: PathBuf = match resource.strip_prefix(&self.context) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => resource
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect(),
        };
        self.virtual_base.join(relative)
    }

    /// Cached module text for `resource`, if one was generated.
    pub fn cached(&self, resource: &Path) -> Option<Arc<str>> {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource)
            .cloned()
    }

    /// Produce the module source for a font resource.
    ///
    /// When the stored `.ttf` artifact equals `content` byte for byte, the
    /// cached text is returned without touching the extractor or encoders.
    /// Otherwise metadata is extracted, every format the rule enables is
    /// written to the store along with the stylesheet, and the new module
    /// text replaces the cached one.
    pub async fn synthesize(
        &self,
        resource: &Path,
        content: &[u8],
        rule: &Rule,
    ) -> Result<Arc<str>, SynthesisError> {
        let dir = self.artifact_dir(resource);
        let basename = resource
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let ttf_path = dir.join(format!("{basename}.ttf"));
        if let Some(module) = self.unchanged(resource, &ttf_path, content) {
            debug!("{} unchanged, reusing generated module", resource.display());
            return Ok(module);
        }
        // A failed run below may leave new artifacts next to the old module.
        self.modules.lock().unwrap_or_else(PoisonError::into_inner).remove(resource);

        let font_info = self.extractor.extract(content).await?;
        let descriptors = Descriptors::resolve(&font_info, rule);

        let mut written = 0;
        for format in rule.formats() {
            let data = self
                .encoders
                .encode(format, content)
                .map_err(|source| SynthesisError::Encode { format, source })?;
            let path = dir.join(format!("{basename}.{}", format.extension()));
            debug!("Writing {format} artifact {} ({} bytes)", path.display(), data.len());
            self.store.write(&path, data)?;
            written += 1;
        }

        let stylesheet_path = dir.join(STYLESHEET_NAME);
        let stylesheet =
            render_stylesheet(&basename, rule, &descriptors, font_info.postscript_name.as_deref());
        self.store.write(&stylesheet_path, stylesheet.into_bytes())?;

        let module: Arc<str> = render_module(&stylesheet_path, &descriptors).into();
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource.to_path_buf(), Arc::clone(&module));

        info!(
            "Generated {} for {} ({written} font file{})",
            STYLESHEET_NAME,
            resource.display(),
            if written == 1 { "" } else { "s" }
        );
        Ok(module)
    }

    /// The cached module when the stored TrueType artifact still matches.
    ///
    /// A failed read means the font was never generated and is not an error.
    fn unchanged(&self, resource: &Path, ttf_path: &Path, content: &[u8]) -> Option<Arc<str>> {
        let stored = self.store.read(ttf_path).ok()?;
        if *stored != *content {
            return None;
        }
        self.cached(resource)
    }
}

impl<E, S> std::fmt::Debug for Synthesizer<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("context", &self.context)
            .field("virtual_base", &self.virtual_base)
            .finish_non_exhaustive()
    }
}
