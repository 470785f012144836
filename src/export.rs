use std::path::Path;

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use log::info;

use crate::{
    common::{PALETTE_COLORS, PALETTE_COUNT},
    gfx::encode_tiles,
    palette::{serialize_palettes, Endianness},
    state::{Palette, Sheet},
};

pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    info!("Exporting {} bytes to {}", data.len(), path.display());
    std::fs::write(path, data).with_context(|| format!("unable to write {}", path.display()))
}

pub fn export_tiles(sheets: &[Sheet]) -> Vec<u8> {
    encode_tiles(sheets.iter().flat_map(|s| &s.tiles))
}

/// Serializes the document's palettes, refusing the blob if any color failed
/// to parse.
pub fn export_palettes(palettes: &[Palette], endianness: Endianness) -> Result<Vec<u8>> {
    let out = serialize_palettes(palettes, PALETTE_COUNT, PALETTE_COLORS, endianness);
    if !out.is_complete() {
        let listing = out
            .failures
            .iter()
            .map(|f| format!("palette {} color {}: {:?}", f.palette, f.entry, f.raw))
            .join(", ");
        bail!("{} invalid color(s): {}", out.failures.len(), listing);
    }
    Ok(out.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::SHEET_TILES, state::Document};

    #[test]
    fn tiles_export_in_storage_order() {
        let mut doc = Document::default();
        doc.sheets.push(Sheet::default());
        doc.sheets[1].set_pixel(0, 0, 0, 1);
        let data = export_tiles(&doc.sheets);
        assert_eq!(data.len(), 2 * SHEET_TILES * 32);
        assert_eq!(data[SHEET_TILES * 32], 0x80);
    }

    #[test]
    fn invalid_palette_color_blocks_export() {
        let mut doc = Document::default();
        assert_eq!(export_palettes(&doc.palettes, Endianness::Little).unwrap().len(), 256);
        doc.palettes[2].colors[5] = "chartreuse".to_string();
        let err = export_palettes(&doc.palettes, Endianness::Little).unwrap_err();
        assert!(err.to_string().contains("palette 2 color 5"));
    }
}
