//! Font naming metadata extraction.
//!
//! [`FontInfo`] mirrors the `name` table: one optional string per name ID
//! from 0 (copyright) to 22 (WWS subfamily). [`NameTableExtractor`] fills it
//! from raw font bytes and is the default [`MetadataExtractor`].

use std::future::Future;

use fontface_font_ops::preferred_names;
use log::debug;
use read_fonts::{FontRef, ReadError, TableProvider};

/// Field names in name ID order.
pub const FIELD_NAMES: [&str; 23] = [
    "copyright",
    "fontFamily",
    "fontSubFamily",
    "fontIdentifier",
    "fontName",
    "fontVersion",
    "postscriptName",
    "trademark",
    "manufacturer",
    "designer",
    "description",
    "vendorURL",
    "designerURL",
    "license",
    "licenseURL",
    "reserved",
    "preferredFamily",
    "preferredSubFamily",
    "compatibleFullName",
    "sampleText",
    "postScriptCIDfindfontName",
    "WWSFamilyName",
    "WWSSubFamilyName",
];

/// Errors raised while decoding font metadata.
#[derive(Debug, thiserror::Error)]
pub enum FontDecodeError {
    /// The data is not a readable sfnt.
    #[error("Malformed font data: {0}")]
    Parse(#[from] ReadError),

    /// A table needed for metadata is absent.
    #[error("Font has no '{0}' table")]
    MissingTable(&'static str),
}

/// Naming metadata read from a font's `name` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontInfo {
    pub copyright: Option<String>,
    pub font_family: Option<String>,
    pub font_sub_family: Option<String>,
    pub font_identifier: Option<String>,
    pub font_name: Option<String>,
    pub font_version: Option<String>,
    pub postscript_name: Option<String>,
    pub trademark: Option<String>,
    pub manufacturer: Option<String>,
    pub designer: Option<String>,
    pub description: Option<String>,
    pub vendor_url: Option<String>,
    pub designer_url: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,
    pub reserved: Option<String>,
    pub preferred_family: Option<String>,
    pub preferred_sub_family: Option<String>,
    pub compatible_full_name: Option<String>,
    pub sample_text: Option<String>,
    pub postscript_cid_findfont_name: Option<String>,
    pub wws_family_name: Option<String>,
    pub wws_sub_family_name: Option<String>,
}

impl FontInfo {
    /// Read naming metadata from raw font bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FontDecodeError> {
        let font = FontRef::new(data)?;
        Self::from_font(&font)
    }

    /// Read naming metadata from a parsed font.
    pub fn from_font(font: &FontRef) -> Result<Self, FontDecodeError> {
        let name = font.name().map_err(|_| FontDecodeError::MissingTable("name"))?;

        let mut info = Self::default();
        for (name_id, value) in preferred_names(&name) {
            if let Some(slot) = info.slot_mut(name_id) {
                *slot = Some(value);
            }
        }
        Ok(info)
    }

    /// Value for a name ID, if the font carries it.
    pub fn get(&self, name_id: u16) -> Option<&str> {
        let slot = match name_id {
            0 => &self.copyright,
            1 => &self.font_family,
            2 => &self.font_sub_family,
            3 => &self.font_identifier,
            4 => &self.font_name,
            5 => &self.font_version,
            6 => &self.postscript_name,
            7 => &self.trademark,
            8 => &self.manufacturer,
            9 => &self.designer,
            10 => &self.description,
            11 => &self.vendor_url,
            12 => &self.designer_url,
            13 => &self.license,
            14 => &self.license_url,
            15 => &self.reserved,
            16 => &self.preferred_family,
            17 => &self.preferred_sub_family,
            18 => &self.compatible_full_name,
            19 => &self.sample_text,
            20 => &self.postscript_cid_findfont_name,
            21 => &self.wws_family_name,
            22 => &self.wws_sub_family_name,
            _ => return None,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, name_id: u16) -> Option<&mut Option<String>> {
        Some(match name_id {
            0 => &mut self.copyright,
            1 => &mut self.font_family,
            2 => &mut self.font_sub_family,
            3 => &mut self.font_identifier,
            4 => &mut self.font_name,
            5 => &mut self.font_version,
            6 => &mut self.postscript_name,
            7 => &mut self.trademark,
            8 => &mut self.manufacturer,
            9 => &mut self.designer,
            10 => &mut self.description,
            11 => &mut self.vendor_url,
            12 => &mut self.designer_url,
            13 => &mut self.license,
            14 => &mut self.license_url,
            15 => &mut self.reserved,
            16 => &mut self.preferred_family,
            17 => &mut self.preferred_sub_family,
            18 => &mut self.compatible_full_name,
            19 => &mut self.sample_text,
            20 => &mut self.postscript_cid_findfont_name,
            21 => &mut self.wws_family_name,
            22 => &mut self.wws_sub_family_name,
            _ => return None,
        })
    }

    /// Iterate `(field name, value)` pairs in name ID order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        FIELD_NAMES.iter().zip(0u16..).map(|(field, id)| (*field, self.get(id)))
    }
}

/// Source of [`FontInfo`] for raw font bytes.
///
/// Extraction may suspend; callers await it once per regeneration.
pub trait MetadataExtractor: Send + Sync {
    fn extract(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<FontInfo, FontDecodeError>> + Send;
}

/// Extracts [`FontInfo`] from the font's own `name` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameTableExtractor;

impl MetadataExtractor for NameTableExtractor {
    async fn extract(&self, data: &[u8]) -> Result<FontInfo, FontDecodeError> {
        let info = FontInfo::from_bytes(data)?;
        debug!(
            "Extracted name table: family={:?} subfamily={:?}",
            info.font_family, info.font_sub_family
        );
        Ok(info)
    }
}
