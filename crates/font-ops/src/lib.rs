//! Generic font table reading utilities.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use read_fonts::{
    FontRef,
    tables::name::{Name, NameRecord},
    types::Tag,
};

/// Platform IDs used in `name` records.
pub const PLATFORM_MAC: u16 = 1;
pub const PLATFORM_WINDOWS: u16 = 3;

/// Windows Unicode BMP encoding.
const ENCODING_WINDOWS_BMP: u16 = 1;
/// Mac Roman encoding.
const ENCODING_MAC_ROMAN: u16 = 0;
/// Windows en-US language ID.
const LANGUAGE_WINDOWS_EN_US: u16 = 0x409;
/// Mac English language ID.
const LANGUAGE_MAC_ENGLISH: u16 = 0;

/// How desirable a name record is when several carry the same name ID.
///
/// Lower ranks win.
fn record_rank(record: &NameRecord) -> u8 {
    let platform = record.platform_id();
    let encoding = record.encoding_id();
    let language = record.language_id();

    match (platform, encoding, language) {
        (PLATFORM_WINDOWS, ENCODING_WINDOWS_BMP, LANGUAGE_WINDOWS_EN_US) => 0,
        (PLATFORM_WINDOWS, _, _) => 1,
        (PLATFORM_MAC, ENCODING_MAC_ROMAN, LANGUAGE_MAC_ENGLISH) => 2,
        _ => 3,
    }
}

/// Collect the preferred string for every name ID in a `name` table.
///
/// Records whose string cannot be decoded are skipped. When a name ID has
/// several records, the Windows en-US one wins, then any Windows record,
/// then Mac Roman English, then whatever comes first.
pub fn preferred_names(name: &Name) -> BTreeMap<u16, String> {
    let mut best: BTreeMap<u16, (u8, String)> = BTreeMap::new();

    for record in name.name_record() {
        let Ok(string) = record.string(name.string_data()) else {
            continue;
        };
        let rank = record_rank(record);
        let name_id = record.name_id().to_u16();

        match best.get(&name_id) {
            Some((current, _)) if *current <= rank => {}
            _ => {
                best.insert(name_id, (rank, string.chars().collect()));
            }
        }
    }

    best.into_iter().map(|(id, (_, value))| (id, value)).collect()
}

/// Borrow the raw bytes of a table, failing with the table tag in the message.
pub fn table_bytes<'a>(font: &FontRef<'a>, tag: Tag) -> Result<&'a [u8]> {
    font.table_data(tag)
        .map(|data| data.as_bytes())
        .with_context(|| format!("Font has no {tag} table"))
}

#[cfg(test)]
mod tests {
    use read_fonts::TableProvider;
    use write_fonts::{
        FontBuilder,
        tables::name::{Name as NameTable, NameRecord as NameRecordBuilder},
        types::NameId,
    };

    use super::*;

    fn font_with_names(records: &[(u16, u16, u16, u16, &str)]) -> Vec<u8> {
        let records = records
            .iter()
            .map(|&(platform, encoding, language, id, value)| {
                NameRecordBuilder::new(
                    platform,
                    encoding,
                    language,
                    NameId::new(id),
                    value.to_string().into(),
                )
            })
            .collect();
        let mut builder = FontBuilder::new();
        builder.add_table(&NameTable::new(records)).unwrap();
        builder.build()
    }

    #[test]
    fn test_windows_english_wins() {
        let data = font_with_names(&[
            (PLATFORM_MAC, 0, 0, 1, "Mac Family"),
            (PLATFORM_WINDOWS, 1, 0x411, 1, "Japanese Family"),
            (PLATFORM_WINDOWS, 1, 0x409, 1, "Windows Family"),
        ]);
        let font = FontRef::new(&data).unwrap();
        let names = preferred_names(&font.name().unwrap());
        assert_eq!(names.get(&1).map(String::as_str), Some("Windows Family"));
    }

    #[test]
    fn test_mac_fallback() {
        let data = font_with_names(&[
            (PLATFORM_MAC, 0, 0, 2, "Bold"),
            (PLATFORM_WINDOWS, 1, 0x409, 1, "Family"),
        ]);
        let font = FontRef::new(&data).unwrap();
        let names = preferred_names(&font.name().unwrap());
        assert_eq!(names.get(&1).map(String::as_str), Some("Family"));
        assert_eq!(names.get(&2).map(String::as_str), Some("Bold"));
        assert!(!names.contains_key(&6));
    }

    #[test]
    fn test_table_bytes_missing() {
        let data = font_with_names(&[(PLATFORM_WINDOWS, 1, 0x409, 1, "Family")]);
        let font = FontRef::new(&data).unwrap();
        assert!(table_bytes(&font, Tag::new(b"name")).is_ok());
        let err = table_bytes(&font, Tag::new(b"glyf")).unwrap_err();
        assert!(err.to_string().contains("glyf"));
    }
}
