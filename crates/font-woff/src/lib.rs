//! TrueType to WOFF 1.0 conversion.
//!
//! Each table is zlib-compressed and stored compressed only when that saves
//! space, as the WOFF 1.0 recommendation requires.

use std::io::Write;

use anyhow::{Context, Result};
use flate2::{Compression, write::ZlibEncoder};
use fontface_font_ops::table_bytes;
use read_fonts::FontRef;

/// `wOFF` signature.
pub const WOFF_SIGNATURE: u32 = 0x774F_4646;

const HEADER_SIZE: usize = 44;
const DIRECTORY_ENTRY_SIZE: usize = 20;
const SFNT_HEADER_SIZE: usize = 12;
const SFNT_ENTRY_SIZE: usize = 16;

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

struct Entry<'a> {
    tag: [u8; 4],
    checksum: u32,
    orig_length: u32,
    data: Stored<'a>,
}

enum Stored<'a> {
    Raw(&'a [u8]),
    Compressed(Vec<u8>),
}

impl Stored<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Stored::Raw(data) => data,
            Stored::Compressed(data) => data,
        }
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Convert TrueType (or CFF-flavored OpenType) data to WOFF.
pub fn ttf_to_woff(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let directory = &font.table_directory;

    let mut entries = Vec::new();
    for record in directory.table_records() {
        let tag = record.tag();
        let table = table_bytes(&font, tag)?;
        let compressed = compress(table).with_context(|| format!("Failed to compress {tag}"))?;
        let stored = if compressed.len() < table.len() {
            Stored::Compressed(compressed)
        } else {
            Stored::Raw(table)
        };
        entries.push(Entry {
            tag: tag.to_be_bytes(),
            checksum: record.checksum(),
            orig_length: u32::try_from(table.len()).context("Table too large")?,
            data: stored,
        });
    }
    entries.sort_by_key(|entry| entry.tag);

    let num_tables = u16::try_from(entries.len()).context("Too many tables")?;
    let total_sfnt_size = SFNT_HEADER_SIZE
        + SFNT_ENTRY_SIZE * entries.len()
        + entries.iter().map(|e| padded(e.orig_length as usize)).sum::<usize>();

    let mut offset = HEADER_SIZE + DIRECTORY_ENTRY_SIZE * entries.len();
    let mut directory_bytes = Vec::with_capacity(DIRECTORY_ENTRY_SIZE * entries.len());
    let mut table_data = Vec::new();
    for entry in &entries {
        let stored = entry.data.bytes();
        directory_bytes.extend_from_slice(&entry.tag);
        directory_bytes.extend_from_slice(&(offset as u32).to_be_bytes());
        directory_bytes.extend_from_slice(&(stored.len() as u32).to_be_bytes());
        directory_bytes.extend_from_slice(&entry.orig_length.to_be_bytes());
        directory_bytes.extend_from_slice(&entry.checksum.to_be_bytes());

        table_data.extend_from_slice(stored);
        table_data.resize(padded(table_data.len()), 0);
        offset += padded(stored.len());
    }

    let length = u32::try_from(offset).context("WOFF output too large")?;
    let mut out = Vec::with_capacity(offset);
    out.extend_from_slice(&WOFF_SIGNATURE.to_be_bytes());
    out.extend_from_slice(&directory.sfnt_version().to_be_bytes());
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(total_sfnt_size as u32).to_be_bytes());
    // majorVersion, minorVersion
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    // No metadata or private blocks.
    out.extend_from_slice(&[0u8; 20]);
    out.extend_from_slice(&directory_bytes);
    out.extend_from_slice(&table_data);
    Ok(out)
}
