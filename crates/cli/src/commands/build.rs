//! Run the plugin over font files.

use std::{
    path::{Path, PathBuf, absolute},
    sync::Arc,
    time::Instant,
};

use anyhow::{Context, Result};
use fontface_core::{
    Encoders, FontfacePlugin, MemoryStore, ModuleRequest, NameTableExtractor, Options,
};
use log::{info, warn};
use tokio::task::JoinSet;

use crate::{
    cli::BuildArgs,
    io::{FontFile, check_results_with_paths, expand_inputs, flush_store},
};

/// Options file picked up from the context directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "fontface.toml";

type Plugin = FontfacePlugin<NameTableExtractor, MemoryStore>;

fn load_options(args: &BuildArgs, context: &Path) -> Result<Options> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => {
            let default = context.join(DEFAULT_CONFIG);
            if !default.exists() {
                return Ok(Options::default());
            }
            default
        }
    };
    info!("Loading options from {}", path.display());
    Options::load(&path).with_context(|| format!("Invalid options in {}", path.display()))
}

/// Module source for one font, or `None` when no rule matches it.
async fn load_font(plugin: &Plugin, path: &Path) -> Result<Option<Arc<str>>> {
    let mut request = ModuleRequest::new(path);
    if !plugin.create_module(&mut request) {
        warn!("No rule matches {}, skipping", path.display());
        return Ok(None);
    }
    let data = FontFile::new(path).read()?;
    let module = plugin
        .load(&request, &data)
        .await
        .with_context(|| format!("Failed to generate font-face for {}", path.display()))?;
    Ok(module)
}

pub async fn build(args: &BuildArgs) -> Result<()> {
    let start = Instant::now();
    let context = absolute(&args.context).context("Failed to resolve context directory")?;
    let options = load_options(args, &context)?;
    let fonts = expand_inputs(&args.fonts)?;

    let store = Arc::new(MemoryStore::new());
    let plugin: Arc<Plugin> = Arc::new(FontfacePlugin::new(
        &context,
        options,
        NameTableExtractor,
        Encoders::builtin(),
        Arc::clone(&store),
    ));

    let mut tasks = JoinSet::new();
    for font in fonts {
        let path = absolute(&font)
            .with_context(|| format!("Failed to resolve {}", font.display()))?;
        let plugin = Arc::clone(&plugin);
        tasks.spawn(async move {
            let result = load_font(&plugin, &path).await;
            (path, result)
        });
    }

    let mut results: Vec<(PathBuf, Result<Option<Arc<str>>>)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("Font task panicked")?);
    }
    results.sort_by(|(a, _), (b, _)| a.cmp(b));
    check_results_with_paths(&results, "Font-face generation")?;

    for (path, result) in &results {
        if let Ok(Some(module)) = result {
            println!("// {}\n{module}\n", path.display());
        }
    }

    if let Some(out_dir) = &args.out_dir {
        let written = flush_store(store.as_ref(), plugin.synthesizer().virtual_base(), out_dir)?;
        println!("Wrote {written} files to {}", out_dir.display());
    }

    info!("Processed {} fonts in {:.2}s", results.len(), start.elapsed().as_secs_f64());
    Ok(())
}
