//! Windows-1252 decoding.
//!
//! Bytes below 0x80 and 0xA0..=0xFF map straight to the same code point;
//! 0x80..=0x9F use the table below. Five positions are undefined in cp1252
//! and are rejected, like a strict decoder would.

use thiserror::Error;

/// A byte with no cp1252 mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("byte 0x{byte:02X} at offset {offset} is undefined in cp1252")]
pub struct InvalidCp1252Byte {
    pub offset: usize,
    pub byte: u8,
}

/// Code points for 0x80..=0x9F; `None` marks undefined bytes.
const HIGH_TABLE: [Option<char>; 32] = [
    Some('\u{20AC}'), // 0x80 €
    None,             // 0x81
    Some('\u{201A}'), // 0x82 ‚
    Some('\u{0192}'), // 0x83 ƒ
    Some('\u{201E}'), // 0x84 „
    Some('\u{2026}'), // 0x85 …
    Some('\u{2020}'), // 0x86 †
    Some('\u{2021}'), // 0x87 ‡
    Some('\u{02C6}'), // 0x88 ˆ
    Some('\u{2030}'), // 0x89 ‰
    Some('\u{0160}'), // 0x8A Š
    Some('\u{2039}'), // 0x8B ‹
    Some('\u{0152}'), // 0x8C Œ
    None,             // 0x8D
    Some('\u{017D}'), // 0x8E Ž
    None,             // 0x8F
    None,             // 0x90
    Some('\u{2018}'), // 0x91 ‘
    Some('\u{2019}'), // 0x92 ’
    Some('\u{201C}'), // 0x93 “
    Some('\u{201D}'), // 0x94 ”
    Some('\u{2022}'), // 0x95 •
    Some('\u{2013}'), // 0x96 –
    Some('\u{2014}'), // 0x97 —
    Some('\u{02DC}'), // 0x98 ˜
    Some('\u{2122}'), // 0x99 ™
    Some('\u{0161}'), // 0x9A š
    Some('\u{203A}'), // 0x9B ›
    Some('\u{0153}'), // 0x9C œ
    None,             // 0x9D
    Some('\u{017E}'), // 0x9E ž
    Some('\u{0178}'), // 0x9F Ÿ
];

/// Decode cp1252 bytes into a `String`.
pub fn decode_cp1252(bytes: &[u8]) -> Result<String, InvalidCp1252Byte> {
    let mut out = String::with_capacity(bytes.len());
    for (offset, &byte) in bytes.iter().enumerate() {
        let ch = match byte {
            0x80..=0x9F => HIGH_TABLE[usize::from(byte - 0x80)]
                .ok_or(InvalidCp1252Byte { offset, byte })?,
            _ => char::from(byte),
        };
        out.push(ch);
    }
    Ok(out)
}
