use anyhow::{bail, Context, Result};
use log::info;
use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    common::{
        ColorIdx, PaletteIdx, PixelCoord, SheetIdx, TileIdx, PALETTE_COLORS, PALETTE_COUNT,
        SHEET_TILES, TILE_SIZE,
    },
    history::History,
    palette::Endianness,
    persist::{self, FileStore, Persist, Persister, Store},
    region::{Region, RegionPayload},
};

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub pixels: [[ColorIdx; TILE_SIZE]; TILE_SIZE],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub tiles: Vec<Tile>,
}

impl Default for Sheet {
    fn default() -> Self {
        Sheet {
            tiles: vec![Tile::default(); SHEET_TILES],
        }
    }
}

impl Sheet {
    pub fn pixel(&self, tile_idx: TileIdx, x: PixelCoord, y: PixelCoord) -> Option<ColorIdx> {
        if x >= TILE_SIZE || y >= TILE_SIZE {
            return None;
        }
        self.tiles.get(tile_idx).map(|t| t.pixels[y][x])
    }

    pub fn set_pixel(&mut self, tile_idx: TileIdx, x: PixelCoord, y: PixelCoord, color_idx: ColorIdx) {
        if x >= TILE_SIZE || y >= TILE_SIZE {
            return;
        }
        if let Some(tile) = self.tiles.get_mut(tile_idx) {
            tile.pixels[y][x] = color_idx & 0xF;
        }
    }

    // Sheets read from storage may be short, long, or carry stray high bits.
    fn normalize(&mut self) {
        self.tiles.resize(SHEET_TILES, Tile::default());
        for tile in &mut self.tiles {
            for row in &mut tile.pixels {
                for c in row.iter_mut() {
                    *c &= 0xF;
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<String>,
}

impl Palette {
    pub fn blank(name: &str) -> Self {
        Palette {
            name: name.to_string(),
            colors: vec!["#000000".to_string(); PALETTE_COLORS],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub sheet_idx: SheetIdx,
    pub palette_idx: PaletteIdx,
    pub color_idx: ColorIdx,
    pub region: Option<Region>,
}

fn legacy_version() -> u32 {
    1
}

/// The full editable state; this is what the undo history snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub sheets: Vec<Sheet>,
    pub palettes: Vec<Palette>,
    #[serde(default)]
    pub selection: Selection,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            version: DOCUMENT_VERSION,
            sheets: vec![Sheet::default()],
            palettes: (0..PALETTE_COUNT)
                .map(|i| Palette::blank(&format!("Palette {}", i)))
                .collect(),
            selection: Selection::default(),
        }
    }
}

impl Document {
    pub fn sheet(&self) -> Option<&Sheet> {
        self.sheets.get(self.selection.sheet_idx)
    }

    pub fn sheet_mut(&mut self) -> Option<&mut Sheet> {
        self.sheets.get_mut(self.selection.sheet_idx)
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palettes.get(self.selection.palette_idx)
    }

    /// Repairs a document that came from outside the editor so that the
    /// selected sheet always exists.
    pub fn normalize(&mut self) {
        if self.sheets.is_empty() {
            self.sheets.push(Sheet::default());
        }
        for sheet in &mut self.sheets {
            sheet.normalize();
        }
        self.selection.sheet_idx = self.selection.sheet_idx.min(self.sheets.len() - 1);
        self.selection.color_idx &= 0xF;
    }
}

impl Persist for Document {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut doc: Document = serde_json::from_slice(bytes)?;
        if doc.version > DOCUMENT_VERSION {
            bail!(
                "document version {} is newer than supported version {}",
                doc.version,
                DOCUMENT_VERSION
            );
        }
        doc.version = DOCUMENT_VERSION;
        doc.normalize();
        Ok(doc)
    }
}

fn default_history_limit() -> usize {
    100
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_storage_key() -> String {
    "document".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_debounce_ms")]
    pub persist_debounce_ms: u64,
    #[serde(default)]
    pub palette_endianness: Endianness,
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            modified: false,
            history_limit: default_history_limit(),
            persist_debounce_ms: default_debounce_ms(),
            palette_endianness: Endianness::default(),
            storage_dir: None,
            storage_key: default_storage_key(),
        }
    }
}

impl GlobalConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}

pub struct EditorState {
    pub global_config_path: PathBuf,
    pub global_config: GlobalConfig,

    // Project data, with undo history:
    pub history: History<Document>,

    // Temporary editor state:
    pub clipboard: Option<RegionPayload>,
}

impl EditorState {
    /// Builds editor state around an explicit store, hydrating the document
    /// from it when a persisted copy exists.
    pub fn new(global_config_path: PathBuf, global_config: GlobalConfig, store: Box<dyn Store>) -> Self {
        let persister = Persister::new(store, global_config.storage_key.clone(), global_config.debounce());
        let history = History::hydrate(Document::default(), global_config.history_limit, persister);
        EditorState {
            global_config_path,
            global_config,
            history,
            clipboard: None,
        }
    }

    pub fn document(&self) -> &Document {
        self.history.present()
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "SnesTileEditor")
        .context("Unable to open global config directory.")
}

fn get_global_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn get_storage_dir(config: &GlobalConfig) -> Result<PathBuf> {
    match &config.storage_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(project_dirs()?.data_dir().to_owned()),
    }
}

pub fn get_initial_state() -> Result<EditorState> {
    let global_config_path = get_global_config_path()?;
    let global_config = persist::load_global_config(&global_config_path)?;
    let storage_dir = get_storage_dir(&global_config)?;
    info!("Using document storage at {}", storage_dir.display());
    let store = FileStore::new(storage_dir);
    Ok(EditorState::new(global_config_path, global_config, Box::new(store)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_blank() {
        let doc = Document::default();
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.sheets.len(), 1);
        assert_eq!(doc.sheets[0].tiles.len(), SHEET_TILES);
        assert_eq!(doc.palettes.len(), PALETTE_COUNT);
        assert!(doc.palettes.iter().all(|p| p.colors.len() == PALETTE_COLORS));
    }

    #[test]
    fn set_pixel_masks_and_ignores_out_of_range() {
        let mut sheet = Sheet::default();
        sheet.set_pixel(3, 2, 1, 0x1F);
        assert_eq!(sheet.pixel(3, 2, 1), Some(0xF));
        sheet.set_pixel(3, 8, 0, 1);
        sheet.set_pixel(SHEET_TILES, 0, 0, 1);
        assert_eq!(sheet.pixel(SHEET_TILES, 0, 0), None);
        assert_eq!(sheet.tiles.iter().filter(|t| **t != Tile::default()).count(), 1);
    }

    #[test]
    fn document_without_version_loads_as_legacy() {
        let json = r#"{"sheets":[{"tiles":[]}],"palettes":[]}"#;
        let doc = Document::from_bytes(json.as_bytes()).unwrap();
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.sheets[0].tiles.len(), SHEET_TILES);
        assert_eq!(doc.selection, Selection::default());
    }

    #[test]
    fn newer_document_version_is_rejected() {
        let json = r#"{"version":99,"sheets":[],"palettes":[]}"#;
        assert!(Document::from_bytes(json.as_bytes()).is_err());
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut doc = Document::default();
        doc.sheets[0].set_pixel(10, 4, 4, 7);
        doc.selection.region = Some(Region::new(1, 2, 3, 4));
        let bytes = doc.to_bytes().unwrap();
        assert_eq!(Document::from_bytes(&bytes).unwrap(), doc);
    }

    #[test]
    fn config_fields_default_when_missing() {
        let config: GlobalConfig = serde_json::from_str(r#"{"history_limit": 5}"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.persist_debounce_ms, 500);
        assert_eq!(config.storage_key, "document");
        assert_eq!(config.palette_endianness, Endianness::Little);
    }
}
