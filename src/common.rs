pub type ColorValue = u8; // 8-bit color channel (0-255)
pub type ColorIdx = u8; // Index into 4bpp palette (0-15)
pub type PaletteIdx = usize; // Index into the document's palette list
pub type SheetIdx = usize; // Index into the document's sheet list
pub type TileIdx = usize; // Linear index into a sheet (0-255)
pub type TileCoord = i32; // Row or column in the tile grid; may point off-grid
pub type PixelCoord = usize; // Pixel row or column inside a tile (0-7)
pub type ColorWord = u16; // 15-bit BGR hardware color

pub type ColorRGB = (ColorValue, ColorValue, ColorValue);

pub const TILE_SIZE: usize = 8;
pub const TILE_BYTES: usize = 32;
pub const SHEET_COLS: usize = 16;
pub const SHEET_ROWS: usize = 16;
pub const SHEET_TILES: usize = SHEET_COLS * SHEET_ROWS;
pub const PALETTE_COLORS: usize = 16;
pub const PALETTE_COUNT: usize = 8;
