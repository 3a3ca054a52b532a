//! Print a font's naming metadata and the descriptors it resolves to.

use std::path::Path;

use anyhow::{Context, Result};
use fontface_core::{
    Descriptors, MetadataExtractor, NameTableExtractor, Rule, descriptors::sub_family,
    options::kebab_case,
};

use crate::io::FontFile;

pub async fn inspect(font: &Path) -> Result<()> {
    let data = FontFile::new(font).read()?;
    let info = NameTableExtractor
        .extract(&data)
        .await
        .with_context(|| format!("Failed to read metadata from {}", font.display()))?;

    println!("{}", font.display());
    for (field, value) in info.fields() {
        if let Some(value) = value {
            println!("  {field:<26} {value}");
        }
    }

    let descriptors = Descriptors::resolve(&info, &Rule::default());
    println!("\nsub-family: {:?}", sub_family(&info));
    for (name, value) in descriptors.all.iter().filter(|(_, value)| value.is_truthy()) {
        println!("{}: {value};", kebab_case(name));
    }
    Ok(())
}
