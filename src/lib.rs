//! Block Hop core crate.
//!
//! A character hops diagonally across a pyramid of blocks; every landing
//! rotates a block, and the level is cleared once every block shows the
//! level's reference face. Jumping off the pyramid kills the character, who
//! respawns at the apex after a short delay.
//!
//! The level logic (`level`, `character`, `process`, `scheduler`) is plain Rust
//! and runs natively under `cargo test`; `web` wires it to a canvas.

use wasm_bindgen::prelude::*;

pub mod character;
pub mod config;
pub mod error;
pub mod level;
pub mod listeners;
mod logging;
pub mod process;
pub mod scheduler;
mod web;

pub use character::{Character, CharacterEvent, Direction, Hopper};
pub use config::{CharacterTimings, GameConfig, LevelConfig};
pub use error::{LevelError, LevelResult};
pub use level::{
    Block, BlockGrid, BlockKind, GridCoord, LevelCleared, LevelController, LevelSpec,
    is_level_cleared, levels,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::Level::Info);
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start_game_mode()
}
