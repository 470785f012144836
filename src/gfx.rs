// Native 4bpp planar tile format: bytes 0-15 hold bitplanes 0 and 1 (two bytes
// per row), bytes 16-31 hold bitplanes 2 and 3. Bit 7 of each plane byte is
// the leftmost pixel.

use crate::{
    common::{TILE_BYTES, TILE_SIZE},
    error::CodecError,
    state::Tile,
};

pub fn encode_tile(tile: &Tile) -> [u8; TILE_BYTES] {
    let mut out = [0; TILE_BYTES];
    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            let c = tile.pixels[y][x] & 0xF;
            let shift = 7 - x;
            out[y * 2] |= (c & 1) << shift;
            out[y * 2 + 1] |= ((c >> 1) & 1) << shift;
            out[y * 2 + 16] |= ((c >> 2) & 1) << shift;
            out[y * 2 + 17] |= ((c >> 3) & 1) << shift;
        }
    }
    out
}

pub fn decode_tile(data: &[u8]) -> Result<Tile, CodecError> {
    if data.len() < TILE_BYTES {
        return Err(CodecError::InvalidSize { actual: data.len() });
    }
    let mut tile = Tile::default();
    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            let c0 = (data[y * 2] >> (7 - x)) & 1;
            let c1 = (data[y * 2 + 1] >> (7 - x)) & 1;
            let c2 = (data[y * 2 + 16] >> (7 - x)) & 1;
            let c3 = (data[y * 2 + 17] >> (7 - x)) & 1;
            tile.pixels[y][x] = c0 | (c1 << 1) | (c2 << 2) | (c3 << 3);
        }
    }
    Ok(tile)
}

/// Decodes a headerless tile file (N * 32 bytes) into tiles in storage order.
pub fn decode_tiles(data: &[u8]) -> Result<Vec<Tile>, CodecError> {
    if data.len() % TILE_BYTES != 0 {
        return Err(CodecError::SheetSize { len: data.len() });
    }
    data.chunks_exact(TILE_BYTES).map(decode_tile).collect()
}

pub fn encode_tiles<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Vec<u8> {
    tiles.into_iter().flat_map(encode_tile).collect()
}
