//! Tolerant text decoding.
//!
//! The store document and the decoded game files are edited by hand in
//! whatever editor the operator has open, so nothing here assumes UTF-8.
//! Decoding sniffs a BOM first, accepts valid UTF-8, and falls back to
//! Windows-1252 for everything else.

use std::path::Path;

use anyhow::{Context, Result};

pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

pub fn read_to_string(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(decode_text(&bytes))
}
