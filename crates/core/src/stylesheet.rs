//! `@font-face` stylesheet and module source rendering.

use std::path::Path;

use serde_json::Value;

use crate::{
    descriptors::Descriptors,
    format::FontFormat,
    options::{DescriptorValue, Rule, kebab_case},
};

/// File name of the generated stylesheet inside a font's artifact directory.
pub const STYLESHEET_NAME: &str = "stylesheet.css";

fn indent(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| format!("\t{line}")).collect()
}

/// Entries of the combined `src` list, without separators.
pub fn src_entries(basename: &str, rule: &Rule, postscript_name: Option<&str>) -> Vec<String> {
    let locals = rule
        .locals
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| format!("local({name})"));

    let urls = rule.formats().map(|format| {
        let url = match format {
            FontFormat::Eot => format!("./{basename}.eot?#iefix"),
            FontFormat::Svg => match postscript_name {
                Some(name) => format!("./{basename}.svg#{name}"),
                None => format!("./{basename}.svg"),
            },
            _ => format!("./{basename}.{}", format.extension()),
        };
        format!("url('{url}') format('{}')", format.css_format())
    });

    locals.chain(urls).collect()
}

/// Render the `@font-face` block for one font.
///
/// Falsy descriptors are skipped. EOT adds the legacy single-`src` line
/// before the combined list, whose entries are comma-separated and
/// terminated by a semicolon.
pub fn render_stylesheet(
    basename: &str,
    rule: &Rule,
    descriptors: &Descriptors,
    postscript_name: Option<&str>,
) -> String {
    let mut body: Vec<String> = descriptors
        .all
        .iter()
        .filter(|(_, value)| value.is_truthy())
        .map(|(name, value)| format!("{}: {value};", kebab_case(name)))
        .collect();

    if rule.use_eot {
        body.push(format!("src: url('./{basename}.eot');"));
    }

    let entries = src_entries(basename, rule, postscript_name);
    if !entries.is_empty() {
        let last = entries.len() - 1;
        let list: Vec<String> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| format!("{entry}{}", if index == last { ';' } else { ',' }))
            .collect();
        body.push("src:".to_string());
        body.extend(indent(&list));
    }

    let mut lines = vec!["@font-face {".to_string()];
    lines.extend(indent(&body));
    lines.push("}".to_string());
    lines.join("\n")
}

fn json_value(value: &DescriptorValue) -> Value {
    match value {
        DescriptorValue::Integer(value) => Value::from(*value),
        DescriptorValue::Float(value) => Value::from(*value),
        DescriptorValue::Text(value) => Value::from(value.as_str()),
    }
}

/// Render the module source that stands in for the font in the build graph.
///
/// It imports the stylesheet for its side effect and exports the resolved
/// family, style and weight both by name and as the default export.
pub fn render_module(stylesheet: &Path, descriptors: &Descriptors) -> String {
    let family = json_value(&descriptors.font_family);
    let style = json_value(&descriptors.font_style);
    let weight = json_value(&descriptors.font_weight);

    let mut default = serde_json::Map::new();
    default.insert("fontFamily".to_string(), family.clone());
    default.insert("fontStyle".to_string(), style.clone());
    default.insert("fontWeight".to_string(), weight.clone());

    [
        format!("import {};", Value::from(stylesheet.to_string_lossy().as_ref())),
        format!("export const fontFamily = {family};"),
        format!("export const fontStyle = {style};"),
        format!("export const fontWeight = {weight};"),
        format!("export default {};", Value::Object(default)),
    ]
    .join("\n")
}
