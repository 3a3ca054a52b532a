//! Plugin options and per-font rules.
//!
//! Options come either from code ([`Options::default`], [`Rule::new`]) or
//! from a TOML file:
//!
//! ```toml
//! virtual_path = "__GENERATED_WEBPACK_FONTFACE__"
//!
//! [[rules]]
//! test = "**/icons/*.ttf"
//! use_svg = false
//! locals = ["Icons"]
//!
//! [rules.descriptors]
//! fontDisplay = "block"
//! ```
//!
//! Every field is optional; a rule's omitted fields take the default rule's
//! values. Unknown fields, wrongly typed values and invalid glob patterns
//! are rejected when the options are built.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use globset::{Glob, GlobMatcher};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, format::FontFormat};

/// Default directory, relative to the build context, holding generated files.
pub const DEFAULT_VIRTUAL_PATH: &str = "__GENERATED_WEBPACK_FONTFACE__";

/// Default rule pattern.
pub const DEFAULT_TEST: &str = "*.ttf";

/// A CSS descriptor value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptorValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DescriptorValue {
    /// Empty strings and zero are falsy and never rendered.
    pub fn is_truthy(&self) -> bool {
        match self {
            DescriptorValue::Integer(value) => *value != 0,
            DescriptorValue::Float(value) => *value != 0.0 && !value.is_nan(),
            DescriptorValue::Text(value) => !value.is_empty(),
        }
    }
}

impl fmt::Display for DescriptorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorValue::Integer(value) => write!(f, "{value}"),
            DescriptorValue::Float(value) => write!(f, "{value}"),
            DescriptorValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for DescriptorValue {
    fn from(value: &str) -> Self {
        DescriptorValue::Text(value.to_string())
    }
}

impl From<String> for DescriptorValue {
    fn from(value: String) -> Self {
        DescriptorValue::Text(value)
    }
}

impl From<i64> for DescriptorValue {
    fn from(value: i64) -> Self {
        DescriptorValue::Integer(value)
    }
}

impl From<u16> for DescriptorValue {
    fn from(value: u16) -> Self {
        DescriptorValue::Integer(i64::from(value))
    }
}

/// Normalize a descriptor name to camelCase (`font-display` → `fontDisplay`).
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Render a camelCase descriptor name as a CSS property (`fontDisplay` → `font-display`).
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Raw rule as it appears in an options file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub test: Option<String>,
    pub use_eot: Option<bool>,
    pub use_svg: Option<bool>,
    pub use_ttf: Option<bool>,
    pub use_woff: Option<bool>,
    pub use_woff2: Option<bool>,
    pub descriptors: Option<IndexMap<String, DescriptorValue>>,
    pub locals: Option<Vec<String>>,
}

/// Raw options as they appear in an options file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsConfig {
    pub virtual_path: Option<String>,
    pub rules: Option<Vec<RuleConfig>>,
}

/// Which fonts a rule applies to and what it generates for them.
#[derive(Debug, Clone)]
pub struct Rule {
    test: String,
    matcher: GlobMatcher,
    pub use_eot: bool,
    pub use_svg: bool,
    pub use_ttf: bool,
    pub use_woff: bool,
    pub use_woff2: bool,
    /// Descriptor overrides keyed by camelCase name, in configured order.
    pub descriptors: IndexMap<String, DescriptorValue>,
    /// `local()` font names tried before any downloaded format.
    pub locals: Vec<String>,
}

impl Rule {
    /// A rule matching `test` with every format enabled.
    pub fn new(test: &str) -> Result<Self, ConfigError> {
        let matcher = Glob::new(test)
            .map_err(|source| ConfigError::Pattern { pattern: test.to_string(), source })?
            .compile_matcher();
        Ok(Self {
            test: test.to_string(),
            matcher,
            use_eot: true,
            use_svg: true,
            use_ttf: true,
            use_woff: true,
            use_woff2: true,
            descriptors: IndexMap::new(),
            locals: Vec::new(),
        })
    }

    /// Build a rule from its file form, filling omitted fields from the default rule.
    pub fn from_config(config: RuleConfig) -> Result<Self, ConfigError> {
        let mut rule = Self::new(config.test.as_deref().unwrap_or(DEFAULT_TEST))?;
        rule.use_eot = config.use_eot.unwrap_or(rule.use_eot);
        rule.use_svg = config.use_svg.unwrap_or(rule.use_svg);
        rule.use_ttf = config.use_ttf.unwrap_or(rule.use_ttf);
        rule.use_woff = config.use_woff.unwrap_or(rule.use_woff);
        rule.use_woff2 = config.use_woff2.unwrap_or(rule.use_woff2);
        for (name, value) in config.descriptors.unwrap_or_default() {
            if name.trim_matches('-').is_empty() {
                return Err(ConfigError::EmptyDescriptorName);
            }
            rule.descriptors.insert(camel_case(&name), value);
        }
        rule.locals = config.locals.unwrap_or_default();
        Ok(rule)
    }

    /// The glob pattern this rule was built from.
    pub fn test(&self) -> &str {
        &self.test
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.matcher.is_match(path)
    }

    /// Whether this rule emits `format`.
    pub fn enabled(&self, format: FontFormat) -> bool {
        match format {
            FontFormat::Eot => self.use_eot,
            FontFormat::Woff2 => self.use_woff2,
            FontFormat::Woff => self.use_woff,
            FontFormat::Ttf => self.use_ttf,
            FontFormat::Svg => self.use_svg,
        }
    }

    /// Enabled formats in `src` order.
    pub fn formats(&self) -> impl Iterator<Item = FontFormat> + '_ {
        FontFormat::SRC_ORDER.into_iter().filter(|format| self.enabled(*format))
    }

    pub fn with_format(mut self, format: FontFormat, enabled: bool) -> Self {
        match format {
            FontFormat::Eot => self.use_eot = enabled,
            FontFormat::Woff2 => self.use_woff2 = enabled,
            FontFormat::Woff => self.use_woff = enabled,
            FontFormat::Ttf => self.use_ttf = enabled,
            FontFormat::Svg => self.use_svg = enabled,
        }
        self
    }

    /// Enable exactly the given formats.
    pub fn with_only(mut self, formats: &[FontFormat]) -> Self {
        for format in FontFormat::SRC_ORDER {
            self = self.with_format(format, formats.contains(&format));
        }
        self
    }

    pub fn with_descriptor(mut self, name: &str, value: impl Into<DescriptorValue>) -> Self {
        self.descriptors.insert(camel_case(name), value.into());
        self
    }

    pub fn with_local(mut self, name: impl Into<String>) -> Self {
        self.locals.push(name.into());
        self
    }

    /// A truthy override for a camelCase descriptor name.
    pub fn descriptor(&self, name: &str) -> Option<&DescriptorValue> {
        self.descriptors.get(name).filter(|value| value.is_truthy())
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new(DEFAULT_TEST).expect("default rule pattern is a valid glob")
    }
}

/// Options for one plugin instance.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory, relative to the build context, that holds generated files.
    pub virtual_path: PathBuf,
    /// Rules in priority order; the first match wins.
    pub rules: Vec<Rule>,
}

impl Default for Options {
    fn default() -> Self {
        Self { virtual_path: PathBuf::from(DEFAULT_VIRTUAL_PATH), rules: vec![Rule::default()] }
    }
}

impl Options {
    /// Validate raw options.
    pub fn from_config(config: OptionsConfig) -> Result<Self, ConfigError> {
        let virtual_path = match config.virtual_path {
            Some(path) if path.is_empty() => return Err(ConfigError::EmptyVirtualPath),
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_VIRTUAL_PATH),
        };
        let rules = match config.rules {
            Some(rules) => rules.into_iter().map(Rule::from_config).collect::<Result<_, _>>()?,
            None => vec![Rule::default()],
        };
        Ok(Self { virtual_path, rules })
    }

    /// Parse and validate TOML options.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::from_config(toml::from_str(source)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&source)
    }

    /// The first rule matching `resource`.
    pub fn find_rule(&self, resource: &Path) -> Option<(usize, &Rule)> {
        self.rules.iter().enumerate().find(|(_, rule)| rule.is_match(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.virtual_path, Path::new(DEFAULT_VIRTUAL_PATH));
        assert_eq!(options.rules.len(), 1);
        let rule = &options.rules[0];
        assert_eq!(rule.test(), "*.ttf");
        assert_eq!(rule.formats().count(), 5);
        assert!(rule.descriptors.is_empty());
        assert!(rule.locals.is_empty());
        assert!(rule.is_match(Path::new("/project/fonts/MyFont-Bold.ttf")));
        assert!(!rule.is_match(Path::new("/project/fonts/MyFont-Bold.otf")));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let options = Options::from_toml("").unwrap();
        assert_eq!(options.virtual_path, Path::new(DEFAULT_VIRTUAL_PATH));
        assert_eq!(options.rules.len(), 1);
    }

    #[test]
    fn test_rule_fields_default_individually() {
        let options = Options::from_toml(
            r#"
            virtual_path = "generated"

            [[rules]]
            test = "**/icons/*.ttf"
            use_eot = false
            use_svg = false
            locals = ["Icons", "Icons Regular"]

            [rules.descriptors]
            font-display = "block"
            unicodeRange = "U+E000-F8FF"
            fontWeight = 500
            "#,
        )
        .unwrap();

        assert_eq!(options.virtual_path, Path::new("generated"));
        let rule = &options.rules[0];
        assert_eq!(rule.test(), "**/icons/*.ttf");
        assert_eq!(
            rule.formats().collect::<Vec<_>>(),
            [FontFormat::Woff2, FontFormat::Woff, FontFormat::Ttf]
        );
        assert_eq!(rule.locals, ["Icons", "Icons Regular"]);
        let names: Vec<_> = rule.descriptors.keys().map(String::as_str).collect();
        assert_eq!(names, ["fontDisplay", "unicodeRange", "fontWeight"]);
        assert_eq!(rule.descriptor("fontWeight"), Some(&DescriptorValue::Integer(500)));
    }

    #[test]
    fn test_rule_without_test_uses_default_pattern() {
        let options = Options::from_toml("[[rules]]\nuse_ttf = false\n").unwrap();
        assert_eq!(options.rules[0].test(), DEFAULT_TEST);
        assert!(!options.rules[0].use_ttf);
        assert!(options.rules[0].use_woff2);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = Options::from_toml("virtualPath = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = Options::from_toml("[[rules]]\nuse_otf = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = Options::from_toml("[[rules]]\nuse_eot = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = Options::from_toml("rules = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let err = Options::from_toml("[[rules]]\ntest = \"fonts/[.ttf\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }

    #[test]
    fn test_empty_virtual_path_rejected() {
        let err = Options::from_toml("virtual_path = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyVirtualPath));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let options = Options {
            virtual_path: PathBuf::from(DEFAULT_VIRTUAL_PATH),
            rules: vec![
                Rule::new("**/icons/*.ttf").unwrap().with_only(&[FontFormat::Woff2]),
                Rule::new("*.ttf").unwrap(),
                Rule::new("**/icons/Icons.ttf").unwrap(),
            ],
        };

        let (index, rule) = options.find_rule(Path::new("/app/icons/Icons.ttf")).unwrap();
        assert_eq!(index, 0);
        assert_eq!(rule.formats().collect::<Vec<_>>(), [FontFormat::Woff2]);

        let (index, _) = options.find_rule(Path::new("/app/fonts/Body.ttf")).unwrap();
        assert_eq!(index, 1);

        assert!(options.find_rule(Path::new("/app/fonts/Body.woff")).is_none());
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(camel_case("font-feature-settings"), "fontFeatureSettings");
        assert_eq!(camel_case("fontDisplay"), "fontDisplay");
        assert_eq!(kebab_case("fontFeatureSettings"), "font-feature-settings");
        assert_eq!(kebab_case("src"), "src");
    }

    #[test]
    fn test_truthiness() {
        assert!(!DescriptorValue::from("").is_truthy());
        assert!(!DescriptorValue::Integer(0).is_truthy());
        assert!(DescriptorValue::from("swap").is_truthy());
        assert!(DescriptorValue::Float(1.5).is_truthy());
    }
}
