//! Tunables for level layout, respawn policy and character timing.
//!
//! Defaults reproduce the arcade pyramid: 13 layout columns placed two units
//! apart starting at column 3, so the spawn point (row 3, column 15) sits on
//! the apex block of every catalogue level.

use crate::error::{LevelError, LevelResult};
use crate::level::GridCoord;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelConfig {
    /// Grid coordinate of layout entry `[0][0]`.
    pub origin: GridCoord,
    pub column_distance: i32,
    pub row_distance: i32,
    pub spawn: GridCoord,
    pub respawn_delay_ms: f64,
    /// Celebratory parameter handed to the character's win process.
    pub win_cycles: u32,
    pub rotate_duration_ms: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            origin: GridCoord::new(3, 3),
            column_distance: 2,
            row_distance: 2,
            spawn: GridCoord::new(3, 15),
            respawn_delay_ms: 500.0,
            win_cycles: 3,
            rotate_duration_ms: 250.0,
        }
    }
}

impl LevelConfig {
    /// Grid coordinate of the layout entry at `[row_index][column_index]`.
    pub fn cell_coord(&self, row_index: usize, column_index: usize) -> GridCoord {
        self.origin.offset(
            row_index as i32 * self.row_distance,
            column_index as i32 * self.column_distance,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharacterTimings {
    pub jump_ms: f64,
    pub die_ms: f64,
    pub spawn_ms: f64,
    pub win_cycle_ms: f64,
}

impl Default for CharacterTimings {
    fn default() -> Self {
        Self {
            jump_ms: 400.0,
            die_ms: 900.0,
            spawn_ms: 600.0,
            win_cycle_ms: 350.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub level: LevelConfig,
    pub character: CharacterTimings,
}

impl GameConfig {
    /// A block's rotation has to finish no later than the jump that started
    /// it, otherwise clearance found on the last hop misses that hop's landing.
    pub fn validate(&self) -> LevelResult<()> {
        let rotate = self.level.rotate_duration_ms;
        let jump = self.character.jump_ms;
        if !(0.0..=jump).contains(&rotate) {
            return Err(LevelError::InvalidLevelData(format!(
                "rotate_duration_ms ({rotate}) must lie within 0..={jump} (jump_ms)"
            )));
        }
        Ok(())
    }

    /// Missing fields fall back to their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> LevelResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| LevelError::InvalidLevelData(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
