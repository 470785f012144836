use std::time::Instant;

use crate::{
    common::{ColorIdx, PaletteIdx, PixelCoord, SheetIdx, TileCoord, TileIdx},
    region::{PasteMode, Region},
    state::Document,
};

#[derive(Debug, Clone)]
pub enum Message {
    Tick(Instant),
    Undo,
    Redo,
    SelectSheet(SheetIdx),
    SelectPalette(PaletteIdx),
    SelectColor(ColorIdx),
    SelectRegion(Option<Region>),
    BeginStroke,
    PaintPixel {
        tile_idx: TileIdx,
        x: PixelCoord,
        y: PixelCoord,
    },
    SetPixel {
        tile_idx: TileIdx,
        x: PixelCoord,
        y: PixelCoord,
        color_idx: ColorIdx,
    },
    BrushColor {
        palette_idx: PaletteIdx,
        color_idx: ColorIdx,
        color: String,
    },
    AddSheet,
    DeleteSheet,
    Copy,
    Cut,
    Paste {
        dest: (TileCoord, TileCoord),
        mode: PasteMode,
        include_zero: bool,
    },
    Clear,
    ImportTiles(Vec<u8>),
    ImportPalettes(Vec<u8>),
    LoadDocument(Box<Document>),
}
