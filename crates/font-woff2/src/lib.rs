//! WOFF2 conversion with automatic problematic glyph handling.
//!
//! Some codepoints (like U+F8FF, the Apple logo) reference `.notdef` as a
//! composite component, which browsers' OTS validation rejects after WOFF2
//! decompression. Fonts that map one of them are subset without it before
//! compression; every other font is compressed as-is.
//!
//! # Example
//!
//! ```no_run
//! use fontface_font_woff2::convert_to_woff2;
//!
//! let ttf_data: &[u8] = &[];
//! let woff2_data = convert_to_woff2(ttf_data).unwrap();
//! ```

use anyhow::{Context, Result, anyhow, bail};
use hb_subset::{Blob, FontFace, SubsetInput, Tag};
use log::debug;
use read_fonts::{
    FontRef, TableProvider,
    tables::cmap::{Cmap, CmapSubtable},
};
use ttf2woff2::{BrotliQuality, encode};

/// Codepoints known to cause WOFF2 OTS validation errors.
pub const PROBLEMATIC_CODEPOINTS: &[u32] = &[0xF8FF];

/// Layout features to retain during subsetting.
const LAYOUT_FEATURES: &[&[u8; 4]] = &[
    b"aalt", b"ccmp", b"dlig", b"fwid", b"hwid", b"liga", b"locl", b"pwid", b"vert", b"vrt2",
    b"halt", b"vhal", b"kern", b"mark", b"mkmk", b"calt", b"rvrn", b"dnom", b"numr", b"frac",
    b"ordn", b"sups", b"subs", b"sinf", b"case", b"zero", b"ss01", b"ss02", b"ss03", b"ss04",
    b"ss05", b"ss06", b"ss07", b"ss08", b"ss09", b"ss10", b"ss11", b"ss12", b"ss13", b"ss14",
    b"ss15", b"ss16", b"ss17", b"ss18", b"ss19", b"ss20",
];

/// Convert TrueType data to WOFF2.
pub fn convert_to_woff2(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;

    let subset;
    let source = match font.cmap() {
        Ok(cmap) if maps_problematic(&cmap) => {
            debug!(
                "Subsetting out {} problematic codepoint(s) before WOFF2",
                PROBLEMATIC_CODEPOINTS.len()
            );
            subset = subset_for_woff2(data)?;
            subset.as_slice()
        }
        _ => data,
    };

    encode(source, BrotliQuality::default())
        .map_err(|err| anyhow!("WOFF2 compression failed: {err:?}"))
}

fn maps_problematic(cmap: &Cmap) -> bool {
    PROBLEMATIC_CODEPOINTS
        .iter()
        .any(|cp| cmap.map_codepoint(*cp).is_some_and(|gid| gid.to_u32() != 0))
}

/// Subsets font data excluding problematic codepoints for WOFF2 conversion.
///
/// Reads the font's cmap table to get all mapped codepoints, then creates
/// a subset that excludes [`PROBLEMATIC_CODEPOINTS`].
pub fn subset_for_woff2(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let cmap = font.cmap().context("Failed to read cmap table")?;

    let codepoints: Vec<u32> = mapped_codepoints(&cmap)
        .into_iter()
        .filter(|cp| !PROBLEMATIC_CODEPOINTS.contains(cp))
        .collect();

    if codepoints.is_empty() {
        bail!("No valid codepoints found in font");
    }

    let mut input = SubsetInput::new()?;

    {
        let mut feature_set = input.layout_feature_tag_set();
        for tag in LAYOUT_FEATURES {
            feature_set.insert(Tag::new(*tag));
        }
    }

    {
        let mut unicode_set = input.unicode_set();
        for c in codepoints.iter().filter_map(|cp| char::from_u32(*cp)) {
            unicode_set.insert(c);
        }
    }

    let font_face = FontFace::new(Blob::from_bytes(data)?)?;
    let subset_font = input.subset_font(&font_face)?;
    Ok(subset_font.underlying_blob().to_vec())
}

/// Codepoints mapped to a real glyph, preferring the full-Unicode subtable.
fn mapped_codepoints(cmap: &Cmap) -> Vec<u32> {
    let records = cmap.encoding_records();
    let subtables: Vec<_> =
        records.iter().filter_map(|record| record.subtable(cmap.offset_data()).ok()).collect();

    if let Some(CmapSubtable::Format12(f12)) =
        subtables.iter().find(|s| matches!(s, CmapSubtable::Format12(_)))
    {
        return f12.iter().filter(|(_, gid)| gid.to_u32() != 0).map(|(cp, _)| cp).collect();
    }

    if let Some(CmapSubtable::Format4(f4)) =
        subtables.iter().find(|s| matches!(s, CmapSubtable::Format4(_)))
    {
        return f4.iter().filter(|(_, gid)| gid.to_u32() != 0).map(|(cp, _)| cp).collect();
    }

    Vec::new()
}
