//! Binary encoders for each distribution format.

use std::fmt;

use anyhow::Result;
use fontface_font_eot::ttf_to_eot;
use fontface_font_svg::ttf_to_svg;
use fontface_font_woff::ttf_to_woff;
use fontface_font_woff2::convert_to_woff2;

use crate::format::FontFormat;

/// Converts TrueType data to another format.
pub trait FontEncoder: Send + Sync {
    fn encode(&self, ttf: &[u8]) -> Result<Vec<u8>>;
}

impl<F> FontEncoder for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync,
{
    fn encode(&self, ttf: &[u8]) -> Result<Vec<u8>> {
        self(ttf)
    }
}

/// One encoder per non-TrueType format. TrueType passes through unchanged.
pub struct Encoders {
    eot: Box<dyn FontEncoder>,
    svg: Box<dyn FontEncoder>,
    woff: Box<dyn FontEncoder>,
    woff2: Box<dyn FontEncoder>,
}

impl Encoders {
    pub fn new(
        eot: impl FontEncoder + 'static,
        svg: impl FontEncoder + 'static,
        woff: impl FontEncoder + 'static,
        woff2: impl FontEncoder + 'static,
    ) -> Self {
        Self {
            eot: Box::new(eot),
            svg: Box::new(svg),
            woff: Box::new(woff),
            woff2: Box::new(woff2),
        }
    }

    /// The workspace's own converters.
    pub fn builtin() -> Self {
        Self::new(ttf_to_eot, ttf_to_svg, ttf_to_woff, convert_to_woff2)
    }

    pub fn encode(&self, format: FontFormat, ttf: &[u8]) -> Result<Vec<u8>> {
        match format {
            FontFormat::Ttf => Ok(ttf.to_vec()),
            FontFormat::Eot => self.eot.encode(ttf),
            FontFormat::Svg => self.svg.encode(ttf),
            FontFormat::Woff => self.woff.encode(ttf),
            FontFormat::Woff2 => self.woff2.encode(ttf),
        }
    }
}

impl Default for Encoders {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Encoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoders").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;

    #[test]
    fn test_ttf_passthrough() {
        let encoders = Encoders::new(
            |_: &[u8]| -> Result<Vec<u8>> { bail!("unused") },
            |_: &[u8]| -> Result<Vec<u8>> { bail!("unused") },
            |_: &[u8]| -> Result<Vec<u8>> { bail!("unused") },
            |data: &[u8]| -> Result<Vec<u8>> { Ok(data.iter().rev().copied().collect()) },
        );
        assert_eq!(encoders.encode(FontFormat::Ttf, &[1, 2, 3]).unwrap(), [1, 2, 3]);
        assert_eq!(encoders.encode(FontFormat::Woff2, &[1, 2, 3]).unwrap(), [3, 2, 1]);
        assert!(encoders.encode(FontFormat::Eot, &[1, 2, 3]).is_err());
    }
}
