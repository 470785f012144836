// Conversion between a tile's linear storage index and its position in the
// sheet grid. The hardware stores tiles in bands of two rows: within a band,
// each pair of columns is laid out as top-left, top-right, bottom-left,
// bottom-right before moving on to the next pair.

use crate::common::TileIdx;

pub fn index_to_row_col(index: TileIdx, cols: usize) -> (usize, usize) {
    let band = index / (2 * cols);
    let offset = index % (2 * cols);
    let row_in_band = (offset >> 1) & 1;
    let base = offset - 2 * row_in_band;
    let col = base - base / 2;
    (2 * band + row_in_band, col)
}

pub fn row_col_to_index(row: usize, col: usize, cols: usize) -> TileIdx {
    let pair_base = (row / 2) * 2 * cols;
    let col_skew = 2 * col - (col % 2);
    let row_offset = (row % 2) * 2;
    pair_base + col_skew + row_offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{SHEET_COLS, SHEET_TILES};

    #[test]
    fn first_tiles_follow_band_order() {
        assert_eq!(index_to_row_col(0, SHEET_COLS), (0, 0));
        assert_eq!(index_to_row_col(1, SHEET_COLS), (0, 1));
        assert_eq!(index_to_row_col(2, SHEET_COLS), (1, 0));
        assert_eq!(index_to_row_col(3, SHEET_COLS), (1, 1));
        assert_eq!(index_to_row_col(4, SHEET_COLS), (0, 2));
    }

    #[test]
    fn second_band_starts_on_row_two() {
        assert_eq!(index_to_row_col(32, SHEET_COLS), (2, 0));
        assert_eq!(index_to_row_col(255, SHEET_COLS), (15, 15));
        assert_eq!(row_col_to_index(2, 0, SHEET_COLS), 32);
    }

    #[test]
    fn every_index_round_trips() {
        for i in 0..SHEET_TILES {
            let (row, col) = index_to_row_col(i, SHEET_COLS);
            assert!(row < 16 && col < 16, "index {i} mapped off-grid");
            assert_eq!(row_col_to_index(row, col, SHEET_COLS), i);
        }
    }

    #[test]
    fn mapping_is_a_bijection() {
        let mut seen = [false; SHEET_TILES];
        for i in 0..SHEET_TILES {
            let (row, col) = index_to_row_col(i, SHEET_COLS);
            let cell = row * SHEET_COLS + col;
            assert!(!seen[cell]);
            seen[cell] = true;
        }
    }
}
