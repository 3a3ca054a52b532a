//! TrueType to SVG font conversion.
//!
//! Emits an SVG 1.1 `<font>` document with one `<glyph>` per character
//! mapping. Outlines are drawn unhinted at the font's design units, so the
//! y-up coordinate system of the font is kept as SVG fonts expect.

use std::fmt::Write;

use anyhow::{Context, Result, anyhow};
use log::warn;
use skrifa::{
    FontRef, GlyphId, MetadataProvider,
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
    string::StringId,
};

/// Fallback `<font>` id when the font has no PostScript name.
const DEFAULT_FONT_ID: &str = "font";

/// Format a coordinate with at most two decimals and no trailing zeros.
fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let mut s = format!("{rounded:.2}");
        while s.ends_with('0') {
            s.pop();
        }
        s
    }
}

/// Escape text for use inside a double-quoted XML attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Collects outline commands as SVG path data.
#[derive(Debug, Default)]
struct SvgPathPen {
    d: String,
}

impl SvgPathPen {
    fn command(&mut self, op: char, coords: &[f32]) {
        self.d.push(op);
        let args: Vec<String> = coords.iter().map(|v| fmt_num(*v)).collect();
        self.d.push_str(&args.join(" "));
    }
}

impl OutlinePen for SvgPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.command('M', &[x, y]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.command('L', &[x, y]);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.command('Q', &[cx0, cy0, x, y]);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.command('C', &[cx0, cy0, cx1, cy1, x, y]);
    }

    fn close(&mut self) {
        self.d.push('Z');
    }
}

/// Convert TrueType data to an SVG font document.
///
/// The `<font>` element's id is the PostScript name, matching the URL
/// fragment used by `format('svg')` sources.
pub fn ttf_to_svg(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let location = LocationRef::default();
    let metrics = font.metrics(Size::unscaled(), location);
    let glyph_metrics = font.glyph_metrics(Size::unscaled(), location);
    let outlines = font.outline_glyphs();

    let english = |id: StringId| {
        font.localized_strings(id).english_or_first().map(|s| s.to_string())
    };
    let font_id =
        english(StringId::POSTSCRIPT_NAME).unwrap_or_else(|| DEFAULT_FONT_ID.to_string());
    let family = english(StringId::FAMILY_NAME).unwrap_or_default();

    let advance = |gid: GlyphId| fmt_num(glyph_metrics.advance_width(gid).unwrap_or(0.0));
    let draw = |gid: GlyphId| -> Result<String> {
        let Some(glyph) = outlines.get(gid) else {
            return Ok(String::new());
        };
        let mut pen = SvgPathPen::default();
        glyph
            .draw(DrawSettings::unhinted(Size::unscaled(), location), &mut pen)
            .map_err(|err| anyhow!("Failed to draw glyph {}: {err:?}", gid.to_u32()))?;
        Ok(pen.d)
    };

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\n");
    svg.push_str(concat!(
        "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" ",
        "\"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
    ));
    svg.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\">\n<defs>\n");
    writeln!(
        svg,
        "<font id=\"{}\" horiz-adv-x=\"{}\">",
        escape_attr(&font_id),
        advance(GlyphId::NOTDEF)
    )?;
    writeln!(
        svg,
        "<font-face font-family=\"{}\" units-per-em=\"{}\" ascent=\"{}\" descent=\"{}\" />",
        escape_attr(&family),
        metrics.units_per_em,
        fmt_num(metrics.ascent),
        fmt_num(metrics.descent)
    )?;
    writeln!(
        svg,
        "<missing-glyph horiz-adv-x=\"{}\" d=\"{}\" />",
        advance(GlyphId::NOTDEF),
        draw(GlyphId::NOTDEF)?
    )?;

    for (codepoint, gid) in font.charmap().mappings() {
        let path = match draw(gid) {
            Ok(path) => path,
            Err(err) => {
                warn!("{err:#}, emitting an empty glyph");
                String::new()
            }
        };
        write!(svg, "<glyph unicode=\"&#x{codepoint:x};\" horiz-adv-x=\"{}\"", advance(gid))?;
        if !path.is_empty() {
            write!(svg, " d=\"{path}\"")?;
        }
        svg.push_str(" />\n");
    }

    svg.push_str("</font>\n</defs>\n</svg>\n");
    Ok(svg.into_bytes())
}
