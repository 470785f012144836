// Rectangular copy/paste/clear over a sheet's tile grid. Geometry is never
// an error: regions are clamped to the grid and paste skips off-grid cells.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::{
    address::row_col_to_index,
    common::{ColorIdx, TileCoord, SHEET_COLS, SHEET_ROWS, TILE_SIZE},
    state::{Sheet, Tile},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_row: TileCoord,
    pub start_col: TileCoord,
    pub rows: TileCoord,
    pub cols: TileCoord,
}

impl Region {
    pub fn new(start_row: TileCoord, start_col: TileCoord, rows: TileCoord, cols: TileCoord) -> Self {
        Region {
            start_row,
            start_col,
            rows,
            cols,
        }
    }

    pub fn single(row: TileCoord, col: TileCoord) -> Self {
        Region::new(row, col, 1, 1)
    }

    // Returns (row, col, rows, cols) inside the sheet.
    fn clamped(&self) -> (usize, usize, usize, usize) {
        let (row, rows) = clamp_axis(self.start_row, self.rows, SHEET_ROWS);
        let (col, cols) = clamp_axis(self.start_col, self.cols, SHEET_COLS);
        (row, col, rows, cols)
    }
}

// Both edges are clamped into [0, size - 1] before the extent is computed,
// so a rectangle hanging off the grid still covers its nearest edge cell.
fn clamp_axis(start: TileCoord, len: TileCoord, size: usize) -> (usize, usize) {
    let last = size as TileCoord - 1;
    let first = start.clamp(0, last);
    if len <= 0 {
        return (first as usize, 0);
    }
    let end = start.saturating_add(len - 1).clamp(0, last);
    (first as usize, (end - first + 1) as usize)
}

/// Clipboard content: tiles copied out of a sheet in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPayload {
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<Tile>,
}

impl RegionPayload {
    pub fn get(&self, row: usize, col: usize) -> Option<&Tile> {
        if col >= self.cols {
            return None;
        }
        self.tiles.get(row * self.cols + col)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PasteMode {
    #[default]
    #[serde(rename = "as-is")]
    AsIs,
    #[serde(rename = "xor")]
    Xor,
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "and")]
    And,
}

impl PasteMode {
    fn merge(self, dst: ColorIdx, src: ColorIdx) -> ColorIdx {
        let v = match self {
            PasteMode::AsIs => src,
            PasteMode::Xor => dst ^ src,
            PasteMode::Or => dst | src,
            PasteMode::And => dst & src,
        };
        v & 0xF
    }

    fn apply(self, dst: &Tile, src: &Tile, include_zero_source: bool) -> Tile {
        if self == PasteMode::AsIs {
            return *src;
        }
        let mut out = *dst;
        for (y, x) in iproduct!(0..TILE_SIZE, 0..TILE_SIZE) {
            let s = src.pixels[y][x] & 0xF;
            if s == 0 && !include_zero_source {
                continue;
            }
            out.pixels[y][x] = self.merge(dst.pixels[y][x], s);
        }
        out
    }
}

pub fn extract(sheet: &Sheet, region: Region) -> RegionPayload {
    let (row, col, rows, cols) = region.clamped();
    let tiles = iproduct!(row..row + rows, col..col + cols)
        .map(|(r, c)| {
            let idx = row_col_to_index(r, c, SHEET_COLS);
            sheet.tiles.get(idx).copied().unwrap_or_default()
        })
        .collect();
    RegionPayload { rows, cols, tiles }
}

pub fn paste(
    sheet: &Sheet,
    payload: &RegionPayload,
    dest: (TileCoord, TileCoord),
    mode: PasteMode,
    include_zero_source: bool,
) -> Sheet {
    let mut out = sheet.clone();
    for (r, c) in iproduct!(0..payload.rows, 0..payload.cols) {
        let Some(src) = payload.get(r, c) else {
            continue;
        };
        let dest_row = dest.0 as i64 + r as i64;
        let dest_col = dest.1 as i64 + c as i64;
        if !(0..SHEET_ROWS as i64).contains(&dest_row) || !(0..SHEET_COLS as i64).contains(&dest_col) {
            continue;
        }
        let idx = row_col_to_index(dest_row as usize, dest_col as usize, SHEET_COLS);
        if let Some(dst) = out.tiles.get_mut(idx) {
            *dst = mode.apply(dst, src, include_zero_source);
        }
    }
    out
}

pub fn clear(sheet: &Sheet, region: Region) -> Sheet {
    let (row, col, rows, cols) = region.clamped();
    let mut out = sheet.clone();
    for (r, c) in iproduct!(row..row + rows, col..col + cols) {
        if let Some(t) = out.tiles.get_mut(row_col_to_index(r, c, SHEET_COLS)) {
            *t = Tile::default();
        }
    }
    out
}
