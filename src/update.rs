use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use crate::{
    common::{PALETTE_COLORS, PALETTE_COUNT},
    import,
    message::Message,
    palette::{format_color, parse_color},
    region::{self, Region},
    state::{Document, EditorState, Sheet},
    undo::{history_action, HistoryAction},
};

pub fn update(state: &mut EditorState, message: Message) -> Result<()> {
    let action = history_action(&message);
    match message {
        Message::Tick(now) => {
            state.history.tick(now);
        }
        Message::Undo => {
            if !state.history.undo() {
                debug!("Nothing to undo.");
            }
        }
        Message::Redo => {
            if !state.history.redo() {
                debug!("Nothing to redo.");
            }
        }
        Message::SelectSheet(idx) => {
            if idx >= state.document().sheets.len() {
                warn!("Sheet {} does not exist.", idx);
                return Ok(());
            }
            apply(state, action, move |mut doc| {
                doc.selection.sheet_idx = idx;
                doc
            });
        }
        Message::SelectPalette(idx) => {
            if idx >= state.document().palettes.len() {
                warn!("Palette {} does not exist.", idx);
                return Ok(());
            }
            apply(state, action, move |mut doc| {
                doc.selection.palette_idx = idx;
                doc
            });
        }
        Message::SelectColor(color_idx) => {
            apply(state, action, move |mut doc| {
                doc.selection.color_idx = color_idx & 0xF;
                doc
            });
        }
        Message::SelectRegion(region) => {
            apply(state, action, move |mut doc| {
                doc.selection.region = region;
                doc
            });
        }
        Message::BeginStroke => {
            state.history.checkpoint();
        }
        Message::PaintPixel { tile_idx, x, y } => {
            apply(state, action, move |mut doc| {
                let color_idx = doc.selection.color_idx;
                if let Some(sheet) = doc.sheet_mut() {
                    sheet.set_pixel(tile_idx, x, y, color_idx);
                }
                doc
            });
        }
        Message::SetPixel {
            tile_idx,
            x,
            y,
            color_idx,
        } => {
            apply(state, action, move |mut doc| {
                if let Some(sheet) = doc.sheet_mut() {
                    sheet.set_pixel(tile_idx, x, y, color_idx);
                }
                doc
            });
        }
        Message::BrushColor {
            palette_idx,
            color_idx,
            color,
        } => {
            let rgb = parse_color(&color).with_context(|| format!("invalid color {:?}", color))?;
            let doc = state.document();
            let palette = doc.palettes.get(palette_idx).context("palette not found")?;
            if color_idx as usize >= palette.colors.len() {
                bail!("palette {} has no color {}", palette_idx, color_idx);
            }
            let text = format_color(rgb);
            apply(state, action, move |mut doc| {
                doc.palettes[palette_idx].colors[color_idx as usize] = text;
                doc
            });
        }
        Message::AddSheet => {
            apply(state, action, |mut doc| {
                doc.sheets.push(Sheet::default());
                doc.selection.sheet_idx = doc.sheets.len() - 1;
                doc
            });
        }
        Message::DeleteSheet => {
            if state.document().sheets.len() <= 1 {
                warn!("Not allowed to delete the last sheet.");
                return Ok(());
            }
            apply(state, action, |mut doc| {
                let idx = doc.selection.sheet_idx.min(doc.sheets.len() - 1);
                doc.sheets.remove(idx);
                if idx == doc.sheets.len() {
                    doc.selection.sheet_idx = idx - 1;
                }
                doc
            });
        }
        Message::Copy => {
            if let Some(payload) = copy_selection(state.document()) {
                state.clipboard = Some(payload);
            }
        }
        Message::Cut => {
            let Some(payload) = copy_selection(state.document()) else {
                return Ok(());
            };
            state.clipboard = Some(payload);
            clear_selection(state, action);
        }
        Message::Paste {
            dest,
            mode,
            include_zero,
        } => {
            let Some(payload) = state.clipboard.clone() else {
                warn!("Clipboard is empty.");
                return Ok(());
            };
            apply(state, action, move |mut doc| {
                if let Some(sheet) = doc.sheet_mut() {
                    *sheet = region::paste(sheet, &payload, dest, mode, include_zero);
                }
                doc.selection.region = Some(Region::new(
                    dest.0,
                    dest.1,
                    payload.rows as i32,
                    payload.cols as i32,
                ));
                doc
            });
        }
        Message::Clear => {
            clear_selection(state, action);
        }
        Message::ImportTiles(data) => {
            let sheets = import::import_tiles(&data)?;
            apply(state, action, move |mut doc| {
                doc.sheets = sheets;
                doc.selection.sheet_idx = 0;
                doc.selection.region = None;
                doc
            });
        }
        Message::ImportPalettes(data) => {
            let endianness = state.global_config.palette_endianness;
            let palettes = import::import_palettes(&data, PALETTE_COUNT, PALETTE_COLORS, endianness)?;
            apply(state, action, move |mut doc| {
                doc.palettes = palettes;
                doc.selection.palette_idx = 0;
                doc
            });
        }
        Message::LoadDocument(mut doc) => {
            info!("Loading document with {} sheet(s)", doc.sheets.len());
            doc.normalize();
            state.history.replace(*doc);
            state.history.clear();
        }
    }
    Ok(())
}

fn apply(state: &mut EditorState, action: HistoryAction, updater: impl FnOnce(Document) -> Document) {
    match action {
        HistoryAction::Live => state.history.mutate(updater),
        HistoryAction::Record => state.history.set(updater),
        _ => warn!("Unexpected history action {:?} for document edit", action),
    }
}

fn copy_selection(doc: &Document) -> Option<region::RegionPayload> {
    let Some(selected) = doc.selection.region else {
        warn!("No region selected.");
        return None;
    };
    let sheet = doc.sheet()?;
    let payload = region::extract(sheet, selected);
    debug!("Copied {}x{} tiles", payload.rows, payload.cols);
    Some(payload)
}

fn clear_selection(state: &mut EditorState, action: HistoryAction) {
    let Some(selected) = state.document().selection.region else {
        warn!("No region selected.");
        return;
    };
    apply(state, action, move |mut doc| {
        if let Some(sheet) = doc.sheet_mut() {
            *sheet = region::clear(sheet, selected);
        }
        doc
    });
}
