pub mod address;
pub mod common;
pub mod error;
pub mod export;
pub mod gfx;
pub mod history;
pub mod import;
pub mod message;
pub mod palette;
pub mod persist;
pub mod region;
pub mod state;
pub mod undo;
pub mod update;
