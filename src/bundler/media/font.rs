//! Font descriptor validation.
//!
//! `mkbcfnt` only needs to be handed something that is really a font; a
//! structurally sound sfnt table directory is enough to tell a TrueType or
//! OpenType file from a mislabeled one.

use crate::bundler::error::{Error, Result};
use std::path::Path;

const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// Validates that `data` starts with a TrueType/OpenType table directory or
/// a font collection header.
pub fn validate_font_bytes(path: &Path, data: &[u8]) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidFont {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if data.len() < SFNT_HEADER_LEN {
        return Err(invalid("file too short for a font header"));
    }

    match &data[..4] {
        b"ttcf" => {
            let fonts = read_u32(data, 8);
            if fonts == 0 {
                return Err(invalid("font collection contains no fonts"));
            }
            Ok(())
        }
        [0x00, 0x01, 0x00, 0x00] | b"OTTO" | b"true" | b"typ1" => {
            let tables = read_u16(data, 4) as usize;
            if tables == 0 {
                return Err(invalid("font has no tables"));
            }
            if data.len() < SFNT_HEADER_LEN + tables * TABLE_RECORD_LEN {
                return Err(invalid("table directory is truncated"));
            }
            Ok(())
        }
        _ => Err(invalid("unrecognized font signature")),
    }
}

/// Reads `path` and validates it with [`validate_font_bytes`].
pub fn validate_font(path: &Path) -> Result<()> {
    let data = std::fs::read(path).map_err(|e| Error::InvalidFont {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_font_bytes(path, &data)
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
pub(crate) fn minimal_truetype() -> Vec<u8> {
    let mut data = vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00];
    data.extend_from_slice(b"head");
    data.extend_from_slice(&[0u8; 12]);
    data
}
