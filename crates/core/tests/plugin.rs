//! Module interception and loading through [`FontfacePlugin`].

use std::{path::Path, sync::Arc};

use fontface_core::{
    ArtifactStore, Encoders, FontFormat, FontfacePlugin, Loader, MemoryStore, ModuleRequest,
    ModuleType, NameTableExtractor, Options, Rule,
};
use write_fonts::{
    FontBuilder,
    tables::name::{Name, NameRecord},
    types::NameId,
};

/// A font carrying only a `name` table.
fn named_font(family: &str, sub_family: &str) -> Vec<u8> {
    let records = [(1, family), (2, sub_family), (6, "Brand-Italic")]
        .into_iter()
        .map(|(id, value)| NameRecord::new(3, 1, 0x409, NameId::new(id), value.to_string().into()))
        .collect();
    let mut builder = FontBuilder::new();
    builder.add_table(&Name::new(records)).unwrap();
    builder.build()
}

fn options() -> Options {
    Options {
        rules: vec![
            Rule::new("**/icons/*.ttf")
                .unwrap()
                .with_only(&[FontFormat::Ttf])
                .with_local("Icons"),
            Rule::new("*.ttf")
                .unwrap()
                .with_only(&[FontFormat::Eot, FontFormat::Woff, FontFormat::Ttf]),
        ],
        ..Options::default()
    }
}

fn plugin() -> FontfacePlugin<NameTableExtractor, MemoryStore> {
    FontfacePlugin::with_defaults("/app", options())
}

#[test]
fn test_claims_matching_font() {
    let plugin = plugin();
    let mut request = ModuleRequest::new("/app/src/fonts/Brand-Italic.ttf");
    request.loaders.push(Loader::External("file-loader".to_string()));

    assert!(plugin.create_module(&mut request));
    assert_eq!(request.module_type, ModuleType::JavascriptAuto);
    assert_eq!(
        request.loaders,
        [Loader::Fontface { rule: 1 }, Loader::External("file-loader".to_string())]
    );
}

#[test]
fn test_first_rule_wins() {
    let plugin = plugin();
    let mut request = ModuleRequest::new("/app/src/icons/Icons.ttf");

    assert!(plugin.create_module(&mut request));
    assert_eq!(request.loaders, [Loader::Fontface { rule: 0 }]);
}

#[test]
fn test_ignores_unmatched_and_generated() {
    let plugin = plugin();

    let mut other = ModuleRequest::new("/app/src/fonts/Brand.woff");
    assert!(!plugin.create_module(&mut other));
    assert_eq!(other, ModuleRequest::new("/app/src/fonts/Brand.woff"));

    let generated = "/app/__GENERATED_WEBPACK_FONTFACE__/src/fonts/Brand.ttf/Brand.ttf";
    let mut request = ModuleRequest::new(generated);
    assert!(plugin.is_generated(Path::new(generated)));
    assert!(!plugin.create_module(&mut request));
    assert_eq!(request.module_type, ModuleType::Asset);
}

#[tokio::test]
async fn test_load_unclaimed_is_none() {
    let plugin = plugin();
    let request = ModuleRequest::new("/app/src/fonts/Brand-Italic.ttf");
    assert!(plugin.load(&request, b"ignored").await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_generates_artifacts() {
    let store = Arc::new(MemoryStore::new());
    let plugin = FontfacePlugin::new(
        "/app",
        options(),
        NameTableExtractor,
        Encoders::builtin(),
        Arc::clone(&store),
    );
    let font = named_font("Brand", "Italic");
    let mut request = ModuleRequest::new("/app/src/fonts/Brand-Italic.ttf");
    assert!(plugin.create_module(&mut request));

    let module = plugin.load(&request, &font).await.unwrap().unwrap();

    assert!(module.contains("export const fontFamily = \"Brand\";"));
    assert!(module.contains("export const fontStyle = \"italic\";"));
    assert!(module.contains("export const fontWeight = 400;"));

    let dir = Path::new("/app/__GENERATED_WEBPACK_FONTFACE__/src/fonts/Brand-Italic.ttf");
    assert_eq!(&*store.read(&dir.join("Brand-Italic.ttf")).unwrap(), font.as_slice());
    assert!(store.read(&dir.join("Brand-Italic.eot")).unwrap().ends_with(&font));
    assert_eq!(&store.read(&dir.join("Brand-Italic.woff")).unwrap()[..4], b"wOFF");
    assert!(store.read(&dir.join("Brand-Italic.woff2")).is_err());

    let css = String::from_utf8(store.read(&dir.join("stylesheet.css")).unwrap().to_vec()).unwrap();
    assert!(css.contains("\tsrc: url('./Brand-Italic.eot');\n"));
    assert!(css.contains("url('./Brand-Italic.ttf') format('truetype');"));

    let again = plugin.load(&request, &font).await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&module, &again));
}

#[tokio::test]
async fn test_load_rejects_non_font() {
    let plugin = plugin();
    let mut request = ModuleRequest::new("/app/src/fonts/Broken.ttf");
    assert!(plugin.create_module(&mut request));

    let err = plugin.load(&request, b"this is not a font").await.unwrap_err();
    assert!(err.to_string().contains("Malformed font data"));
}
