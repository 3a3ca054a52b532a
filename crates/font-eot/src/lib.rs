//! TrueType to Embedded OpenType (EOT) conversion.
//!
//! Produces an uncompressed version 0x00020001 EOT: a little-endian header
//! derived from the `OS/2`, `head` and `name` tables, followed by the
//! unmodified TrueType data.

use anyhow::{Context, Result};
use fontface_font_ops::preferred_names;
use read_fonts::{FontRef, TableProvider};

/// EOT header version carrying a root string.
pub const EOT_VERSION: u32 = 0x0002_0001;

/// Magic number stored after `fsType`.
pub const EOT_MAGIC: u16 = 0x504C;

/// `DEFAULT_CHARSET`.
const CHARSET_DEFAULT: u8 = 1;

/// `fsSelection` italic bit.
const FS_SELECTION_ITALIC: u16 = 1;

const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_VERSION: u16 = 5;
const NAME_ID_FULL_NAME: u16 = 4;

/// Header fields copied out of the `OS/2` and `head` tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeaderFields {
    panose: [u8; 10],
    italic: bool,
    weight: u16,
    fs_type: u16,
    unicode_ranges: [u32; 4],
    code_page_ranges: [u32; 2],
    checksum_adjustment: u32,
}

impl HeaderFields {
    fn read(font: &FontRef) -> Self {
        let mut fields = Self::default();

        if let Ok(os2) = font.os2() {
            let panose = os2.panose_10();
            let len = panose.len().min(fields.panose.len());
            fields.panose[..len].copy_from_slice(&panose[..len]);
            fields.italic = os2.fs_selection().bits() & FS_SELECTION_ITALIC != 0;
            fields.weight = os2.us_weight_class();
            fields.fs_type = os2.fs_type();
            fields.unicode_ranges = [
                os2.ul_unicode_range_1(),
                os2.ul_unicode_range_2(),
                os2.ul_unicode_range_3(),
                os2.ul_unicode_range_4(),
            ];
            fields.code_page_ranges = [
                os2.ul_code_page_range_1().unwrap_or(0),
                os2.ul_code_page_range_2().unwrap_or(0),
            ];
        }

        if let Ok(head) = font.head() {
            fields.checksum_adjustment = head.checksum_adjustment();
        }

        fields
    }
}

/// Little-endian writer for the EOT header.
#[derive(Default)]
struct HeaderWriter {
    buf: Vec<u8>,
}

impl HeaderWriter {
    fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Size-prefixed UTF-16LE string.
    fn name(&mut self, value: &str) -> Result<()> {
        let bytes: Vec<u8> = value.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let size = u16::try_from(bytes.len()).context("Name string too long for EOT")?;
        self.u16(size);
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }
}

/// Convert TrueType data to an EOT file.
///
/// Missing `OS/2` or `head` tables leave their header fields zeroed; a
/// missing `name` table leaves the name strings empty.
pub fn ttf_to_eot(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let fields = HeaderFields::read(&font);
    let names = font.name().map(|name| preferred_names(&name)).unwrap_or_default();
    let name = |id: u16| names.get(&id).map(String::as_str).unwrap_or_default();

    let font_data_size = u32::try_from(data.len()).context("Font too large for EOT")?;

    let mut header = HeaderWriter::default();
    // EOTSize is patched once the header length is known.
    header.u32(0);
    header.u32(font_data_size);
    header.u32(EOT_VERSION);
    header.u32(0);
    header.buf.extend_from_slice(&fields.panose);
    header.u8(CHARSET_DEFAULT);
    header.u8(u8::from(fields.italic));
    header.u32(u32::from(fields.weight));
    header.u16(fields.fs_type);
    header.u16(EOT_MAGIC);
    for range in fields.unicode_ranges {
        header.u32(range);
    }
    for range in fields.code_page_ranges {
        header.u32(range);
    }
    header.u32(fields.checksum_adjustment);
    for _ in 0..4 {
        header.u32(0);
    }

    header.u16(0);
    header.name(name(NAME_ID_FAMILY))?;
    header.u16(0);
    header.name(name(NAME_ID_SUBFAMILY))?;
    header.u16(0);
    header.name(name(NAME_ID_VERSION))?;
    header.u16(0);
    header.name(name(NAME_ID_FULL_NAME))?;
    header.u16(0);
    // RootString
    header.name("")?;

    let mut out = header.buf;
    let eot_size = u32::try_from(out.len() + data.len()).context("Font too large for EOT")?;
    out[..4].copy_from_slice(&eot_size.to_le_bytes());
    out.extend_from_slice(data);
    Ok(out)
}
