//! Resolve `@font-face` descriptors from font metadata and rule overrides.

use fontface_font_info::FontInfo;
use indexmap::IndexMap;

use crate::options::{DescriptorValue, Rule};

pub const FONT_FAMILY: &str = "fontFamily";
pub const FONT_STYLE: &str = "fontStyle";
pub const FONT_WEIGHT: &str = "fontWeight";

/// Weight used when neither an override nor the sub-family names one.
pub const DEFAULT_WEIGHT: u16 = 400;

/// Sub-family words and the weight they imply, tried top to bottom.
///
/// Multi-word names come first so "extra-light" wins over "light".
pub const SUB_FAMILY_WEIGHTS: &[(&str, u16)] = &[
    ("extra-light", 200),
    ("ultra-light", 200),
    ("semi-bold", 600),
    ("demi-bold", 600),
    ("extra-bold", 800),
    ("ultra-bold", 800),
    ("hairline", 100),
    ("thin", 100),
    ("light", 300),
    ("normal", 400),
    ("medium", 500),
    ("bold", 700),
    ("black", 900),
    ("heavy", 900),
];

/// Lower-case a sub-family name and collapse each run of non-letters to `-`.
///
/// `"Extra Light Italic"` becomes `"extra-light-italic"`.
pub fn normalize_sub_family(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_gap = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('-');
            in_gap = true;
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `word` occurs in `haystack` delimited by word boundaries.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Weight implied by a normalized sub-family, if any row of the table matches.
pub fn infer_weight(sub_family: &str) -> Option<u16> {
    SUB_FAMILY_WEIGHTS
        .iter()
        .find(|(word, _)| contains_word(sub_family, word))
        .map(|(_, weight)| *weight)
}

/// First of `preferred` and `fallback` that holds a non-empty name.
fn first_named<'a>(
    preferred: &'a Option<String>,
    fallback: &'a Option<String>,
) -> Option<&'a str> {
    [preferred, fallback].into_iter().flatten().map(String::as_str).find(|s| !s.is_empty())
}

/// Normalized sub-family of a font, preferring the typographic sub-family.
pub fn sub_family(info: &FontInfo) -> String {
    first_named(&info.preferred_sub_family, &info.font_sub_family)
        .map(normalize_sub_family)
        .unwrap_or_default()
}

/// Resolved `@font-face` descriptors for one font.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptors {
    pub font_family: DescriptorValue,
    pub font_style: DescriptorValue,
    pub font_weight: DescriptorValue,
    /// Rule overrides merged with the three resolved values, in render order.
    pub all: IndexMap<String, DescriptorValue>,
}

impl Descriptors {
    /// Resolve family, style and weight, letting truthy rule overrides win.
    pub fn resolve(info: &FontInfo, rule: &Rule) -> Self {
        let sub_family = sub_family(info);

        let font_family = rule.descriptor(FONT_FAMILY).cloned().unwrap_or_else(|| {
            DescriptorValue::from(
                first_named(&info.preferred_family, &info.font_family).unwrap_or_default(),
            )
        });

        let font_style = rule.descriptor(FONT_STYLE).cloned().unwrap_or_else(|| {
            let italic = contains_word(&sub_family, "italic");
            DescriptorValue::from(if italic { "italic" } else { "normal" })
        });

        let font_weight = rule.descriptor(FONT_WEIGHT).cloned().unwrap_or_else(|| {
            DescriptorValue::from(infer_weight(&sub_family).unwrap_or(DEFAULT_WEIGHT))
        });

        let mut all = rule.descriptors.clone();
        all.insert(FONT_FAMILY.to_string(), font_family.clone());
        all.insert(FONT_STYLE.to_string(), font_style.clone());
        all.insert(FONT_WEIGHT.to_string(), font_weight.clone());

        Self { font_family, font_style, font_weight, all }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(family: &str, sub_family: &str) -> FontInfo {
        FontInfo {
            font_family: Some(family.to_string()),
            font_sub_family: Some(sub_family.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_sub_family() {
        assert_eq!(normalize_sub_family("Extra Light Italic"), "extra-light-italic");
        assert_eq!(normalize_sub_family("SemiBold_Italic 2"), "semibold-italic-");
        assert_eq!(normalize_sub_family("  Bold"), "-bold");
        assert_eq!(normalize_sub_family(""), "");
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("bold-italic", "bold"));
        assert!(contains_word("bold-italic", "italic"));
        assert!(contains_word("semi-bold", "bold"));
        assert!(!contains_word("semibold", "bold"));
        assert!(!contains_word("italics", "italic"));
    }

    #[test]
    fn test_weight_table_priority() {
        assert_eq!(infer_weight("extra-light-italic"), Some(200));
        assert_eq!(infer_weight("ultra-light"), Some(200));
        assert_eq!(infer_weight("demi-bold"), Some(600));
        assert_eq!(infer_weight("extra-bold-italic"), Some(800));
        assert_eq!(infer_weight("hairline"), Some(100));
        assert_eq!(infer_weight("light"), Some(300));
        assert_eq!(infer_weight("medium-italic"), Some(500));
        assert_eq!(infer_weight("bold"), Some(700));
        assert_eq!(infer_weight("heavy"), Some(900));
        assert_eq!(infer_weight("regular"), None);
        // No boundary before "bold" in "semibold".
        assert_eq!(infer_weight("semibold"), None);
    }

    #[test]
    fn test_extra_light_italic() {
        let resolved =
            Descriptors::resolve(&info("MyFont", "Extra Light Italic"), &Rule::default());
        assert_eq!(resolved.font_weight, DescriptorValue::Integer(200));
        assert_eq!(resolved.font_style, DescriptorValue::from("italic"));
    }

    #[test]
    fn test_bold() {
        let resolved = Descriptors::resolve(&info("MyFont", "Bold"), &Rule::default());
        assert_eq!(resolved.font_family, DescriptorValue::from("MyFont"));
        assert_eq!(resolved.font_style, DescriptorValue::from("normal"));
        assert_eq!(resolved.font_weight, DescriptorValue::Integer(700));
    }

    #[test]
    fn test_defaults_without_sub_family() {
        let info = FontInfo { font_family: Some("Plain".into()), ..Default::default() };
        let resolved = Descriptors::resolve(&info, &Rule::default());
        assert_eq!(resolved.font_style, DescriptorValue::from("normal"));
        assert_eq!(resolved.font_weight, DescriptorValue::Integer(400));
    }

    #[test]
    fn test_preferred_names_win() {
        let info = FontInfo {
            font_family: Some("MyFont Light".into()),
            font_sub_family: Some("Regular".into()),
            preferred_family: Some("MyFont".into()),
            preferred_sub_family: Some("Light".into()),
            ..Default::default()
        };
        let resolved = Descriptors::resolve(&info, &Rule::default());
        assert_eq!(resolved.font_family, DescriptorValue::from("MyFont"));
        assert_eq!(resolved.font_weight, DescriptorValue::Integer(300));
    }

    #[test]
    fn test_empty_preferred_names_fall_back() {
        let info = FontInfo {
            font_family: Some("MyFont".into()),
            font_sub_family: Some("Bold".into()),
            preferred_family: Some(String::new()),
            preferred_sub_family: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(sub_family(&info), "bold");
        let resolved = Descriptors::resolve(&info, &Rule::default());
        assert_eq!(resolved.font_family, DescriptorValue::from("MyFont"));
        assert_eq!(resolved.font_weight, DescriptorValue::Integer(700));
    }

    #[test]
    fn test_family_override_wins() {
        let info = FontInfo {
            font_family: Some("Extracted".into()),
            preferred_family: Some("Preferred".into()),
            ..Default::default()
        };
        for name in ["Brand", "x", "Brand Sans Display"] {
            let rule = Rule::default().with_descriptor("fontFamily", name);
            let resolved = Descriptors::resolve(&info, &rule);
            assert_eq!(resolved.font_family, DescriptorValue::from(name));
        }
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let rule =
            Rule::default().with_descriptor("fontFamily", "").with_descriptor("fontWeight", 0);
        let resolved = Descriptors::resolve(&info("MyFont", "Black"), &rule);
        assert_eq!(resolved.font_family, DescriptorValue::from("MyFont"));
        assert_eq!(resolved.font_weight, DescriptorValue::Integer(900));
    }

    #[test]
    fn test_style_override_is_verbatim() {
        let rule = Rule::default().with_descriptor("fontStyle", "oblique 10deg");
        let resolved = Descriptors::resolve(&info("MyFont", "Regular"), &rule);
        assert_eq!(resolved.font_style, DescriptorValue::from("oblique 10deg"));

        // Overrides for other descriptors do not affect style.
        let rule = Rule::default().with_descriptor("fontDisplay", "swap");
        let resolved = Descriptors::resolve(&info("MyFont", "Regular"), &rule);
        assert_eq!(resolved.font_style, DescriptorValue::from("normal"));
    }

    #[test]
    fn test_merge_order() {
        let rule = Rule::default()
            .with_descriptor("fontDisplay", "swap")
            .with_descriptor("fontWeight", "100 900")
            .with_descriptor("unicodeRange", "U+0000-00FF");
        let resolved = Descriptors::resolve(&info("MyFont", "Bold"), &rule);
        let names: Vec<_> = resolved.all.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            ["fontDisplay", "fontWeight", "unicodeRange", "fontFamily", "fontStyle"]
        );
        assert_eq!(resolved.all["fontWeight"], DescriptorValue::from("100 900"));
    }
}
