use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use log::error;

use snes_tile_editor::{
    export::{export_palettes, export_tiles, write_file},
    palette::Endianness,
    state::get_initial_state,
};

#[derive(Parser, Debug)]
#[command(about = "Export the stored tile document to native binary files")]
struct Args {
    /// Output path for 4bpp tile data (32 bytes per tile, all sheets)
    #[arg(long)]
    tiles: Option<PathBuf>,
    /// Output path for palette data (8 palettes of 16 colors)
    #[arg(long)]
    palettes: Option<PathBuf>,
    /// Write palette words big-endian regardless of the configured order
    #[arg(long)]
    big_endian: bool,
}

fn run(args: Args) -> Result<()> {
    ensure!(
        args.tiles.is_some() || args.palettes.is_some(),
        "nothing to export; pass --tiles and/or --palettes"
    );
    let state = get_initial_state()?;
    let doc = state.document();
    if let Some(path) = &args.tiles {
        write_file(path, &export_tiles(&doc.sheets))?;
    }
    if let Some(path) = &args.palettes {
        let endianness = if args.big_endian {
            Endianness::Big
        } else {
            state.global_config.palette_endianness
        };
        write_file(path, &export_palettes(&doc.palettes, endianness)?)?;
    }
    Ok(())
}

pub fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
