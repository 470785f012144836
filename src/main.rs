use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::error;

use snes_tile_editor::{
    common::TileCoord,
    import::read_file,
    message::Message,
    palette::Endianness,
    persist::{self, FileStore, Store},
    region::Region,
    state::{self, EditorState, Tile},
    update::update,
};

#[derive(Parser, Debug)]
#[command(about = "Edit the stored tile document from the command line")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise the stored document
    Info,
    /// Replace all sheets with a raw 4bpp tile file
    ImportTiles { path: PathBuf },
    /// Replace all palettes with a raw 15-bit color file
    ImportPalettes { path: PathBuf },
    /// Blank a rectangle of tiles in the selected sheet
    Clear {
        #[arg(long)]
        row: TileCoord,
        #[arg(long)]
        col: TileCoord,
        #[arg(long, default_value_t = 1)]
        rows: TileCoord,
        #[arg(long, default_value_t = 1)]
        cols: TileCoord,
    },
    /// Change global settings
    Config {
        #[arg(long)]
        history_limit: Option<usize>,
        #[arg(long)]
        debounce_ms: Option<u64>,
        #[arg(long)]
        big_endian: Option<bool>,
    },
}

fn print_info(state: &EditorState) -> Result<()> {
    let doc = state.document();
    println!("Document version {}", doc.version);
    for (i, sheet) in doc.sheets.iter().enumerate() {
        let used = sheet.tiles.iter().filter(|t| **t != Tile::default()).count();
        println!("Sheet {}: {} of {} tiles used", i, used, sheet.tiles.len());
    }
    for (i, pal) in doc.palettes.iter().enumerate() {
        println!("Palette {} ({}): {}", i, pal.name, pal.colors.join(" "));
    }
    if let Some(pal) = doc.palette() {
        println!("Selected: sheet {}, {}, color {}", doc.selection.sheet_idx, pal.name, doc.selection.color_idx);
    }
    let store = FileStore::new(state::get_storage_dir(&state.global_config)?);
    println!("Stored documents: {}", store.keys()?.join(", "));
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut state = state::get_initial_state()?;
    match args.command {
        Command::Info => print_info(&state)?,
        Command::ImportTiles { path } => {
            update(&mut state, Message::ImportTiles(read_file(&path)?))?;
        }
        Command::ImportPalettes { path } => {
            update(&mut state, Message::ImportPalettes(read_file(&path)?))?;
        }
        Command::Clear {
            row,
            col,
            rows,
            cols,
        } => {
            let region = Region::new(row, col, rows, cols);
            update(&mut state, Message::SelectRegion(Some(region)))?;
            update(&mut state, Message::Clear)?;
        }
        Command::Config {
            history_limit,
            debounce_ms,
            big_endian,
        } => {
            let config = &mut state.global_config;
            if let Some(limit) = history_limit {
                config.history_limit = limit;
            }
            if let Some(ms) = debounce_ms {
                config.persist_debounce_ms = ms;
            }
            if let Some(big) = big_endian {
                config.palette_endianness = if big {
                    Endianness::Big
                } else {
                    Endianness::Little
                };
            }
            config.modified = true;
        }
    }
    state.history.flush();
    persist::save_global_config(&state.global_config_path, &mut state.global_config)?;
    Ok(())
}

pub fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
