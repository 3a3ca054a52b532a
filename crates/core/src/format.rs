//! Distribution formats a rule can emit.

use std::fmt;

/// A font distribution format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    Eot,
    Woff2,
    Woff,
    Ttf,
    Svg,
}

impl FontFormat {
    /// Formats in the order they appear in a stylesheet `src` list.
    pub const SRC_ORDER: [FontFormat; 5] =
        [FontFormat::Eot, FontFormat::Woff2, FontFormat::Woff, FontFormat::Ttf, FontFormat::Svg];

    /// File extension without the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            FontFormat::Eot => "eot",
            FontFormat::Woff2 => "woff2",
            FontFormat::Woff => "woff",
            FontFormat::Ttf => "ttf",
            FontFormat::Svg => "svg",
        }
    }

    /// Value of the CSS `format()` hint.
    pub const fn css_format(self) -> &'static str {
        match self {
            FontFormat::Eot => "embedded-opentype",
            FontFormat::Woff2 => "woff2",
            FontFormat::Woff => "woff",
            FontFormat::Ttf => "truetype",
            FontFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontFormat::Eot => "EOT",
            FontFormat::Woff2 => "WOFF2",
            FontFormat::Woff => "WOFF",
            FontFormat::Ttf => "TTF",
            FontFormat::Svg => "SVG",
        })
    }
}
