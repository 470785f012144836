use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::{
    common::SHEET_TILES,
    error::CodecError,
    gfx::decode_tiles,
    palette::{deserialize_palettes, Endianness},
    state::{Palette, Sheet, Tile},
};

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    info!("Importing from {}", path.display());
    std::fs::read(path).with_context(|| format!("unable to read {}", path.display()))
}

/// Splits a headerless tile file into sheets of 256 tiles in storage order,
/// padding the last sheet with blank tiles.
pub fn import_tiles(data: &[u8]) -> Result<Vec<Sheet>, CodecError> {
    let tiles = decode_tiles(data)?;
    if tiles.is_empty() {
        return Err(CodecError::EmptySheet);
    }
    let sheets: Vec<Sheet> = tiles
        .chunks(SHEET_TILES)
        .map(|chunk| {
            let mut tiles = chunk.to_vec();
            tiles.resize(SHEET_TILES, Tile::default());
            Sheet { tiles }
        })
        .collect();
    info!("Imported {} tiles into {} sheet(s)", tiles.len(), sheets.len());
    Ok(sheets)
}

pub fn import_palettes(
    data: &[u8],
    expected_count: usize,
    entries_per_palette: usize,
    endianness: Endianness,
) -> Result<Vec<Palette>, CodecError> {
    let palettes = deserialize_palettes(data, expected_count, entries_per_palette, endianness)?;
    info!("Imported {} palette(s)", palettes.len());
    Ok(palettes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::encode_tiles;

    #[test]
    fn partial_sheet_is_padded() {
        let mut tile = Tile::default();
        tile.pixels[0][0] = 5;
        let data = encode_tiles(&vec![tile; SHEET_TILES + 3]);
        let sheets = import_tiles(&data).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[1].tiles.len(), SHEET_TILES);
        assert_eq!(sheets[1].tiles[2], tile);
        assert_eq!(sheets[1].tiles[3], Tile::default());
    }

    #[test]
    fn malformed_tile_files_are_rejected() {
        assert_eq!(import_tiles(&[]), Err(CodecError::EmptySheet));
        assert_eq!(import_tiles(&[0; 40]), Err(CodecError::SheetSize { len: 40 }));
    }
}
