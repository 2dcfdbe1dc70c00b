//! Level logic: block grid construction, character lifecycle wiring and
//! clearance tracking.
//!
//! A level turns the character's process events into grid mutations:
//! - jump start rotates the block under the character,
//! - a rotation that lands on the reference face marks the block cleared and
//!   re-checks the whole grid,
//! - jump end either starts the win sequence (level cleared), kills the
//!   character (landed in a pit) or does nothing,
//! - death end schedules a respawn, spawn end gives jumping back.
//!
//! Clearance found during a jump only takes effect at that jump's end, so the
//! rotation finishes on screen before the win sequence starts.

use std::cell::RefCell;
use std::rc::Rc;

use crate::character::{Character, CharacterEvent, Direction};
use crate::config::LevelConfig;
use crate::error::{LevelError, LevelResult};
use crate::listeners::{ListenerId, Listeners};
use crate::scheduler::{Scheduler, TaskHandle};

mod block;
mod clearance;
mod grid;

mod level1;
mod level2;
mod level3;

pub use block::{Block, BlockKind, Face, RotateEndHandler};
pub use clearance::is_level_cleared;
pub use grid::{BlockGrid, GridCoord};

/// Structural contract for level data: one row per line of the pyramid,
/// `None` for a pit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LevelSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub ref_block: BlockKind,
    pub blocks: Vec<Vec<Option<BlockKind>>>,
}

impl LevelSpec {
    /// Builds a layout from ASCII rows: `#` places a `kind` block, anything else is a pit.
    pub fn from_pattern(name: &str, ref_block: &str, kind: &str, rows: &[&str]) -> Self {
        let blocks = rows
            .iter()
            .map(|line| {
                line.chars()
                    .map(|c| (c == '#').then(|| BlockKind::from(kind)))
                    .collect()
            })
            .collect();
        Self {
            name: name.to_string(),
            ref_block: BlockKind::from(ref_block),
            blocks,
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.iter().flatten().filter(|b| b.is_some()).count()
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> LevelResult<Self> {
        serde_json::from_str(text).map_err(|e| LevelError::InvalidLevelData(e.to_string()))
    }
}

/// Catalogue in play order.
pub fn levels() -> &'static [LevelSpec] {
    use std::sync::OnceLock;
    static LEVELS: OnceLock<Vec<LevelSpec>> = OnceLock::new();
    LEVELS.get_or_init(|| vec![level1::level1(), level2::level2(), level3::level3()])
}

/// Payload handed to level-cleared listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelCleared {
    pub name: String,
    pub blocks: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deferred {
    Spawn(GridCoord),
}

pub struct LevelController<C: Character> {
    name: String,
    config: LevelConfig,
    grid: BlockGrid,
    target: BlockKind,
    character: C,
    cleared: bool,
    cleared_notified: bool,
    // filled by block rotate-end handlers, drained after the blocks update
    rotation_checks: Rc<RefCell<Vec<GridCoord>>>,
    listeners: Listeners<LevelCleared>,
    scheduler: Scheduler<Deferred>,
    pending_respawn: Option<TaskHandle>,
}

impl<C: Character> LevelController<C> {
    pub fn new(spec: &LevelSpec, config: &LevelConfig, character: C) -> LevelResult<Self> {
        let rotation_checks: Rc<RefCell<Vec<GridCoord>>> = Rc::new(RefCell::new(Vec::new()));
        let mut grid = BlockGrid::new();
        for (row_index, line) in spec.blocks.iter().enumerate() {
            for (column_index, entry) in line.iter().enumerate() {
                let Some(kind) = entry else { continue };
                let coord = config.cell_coord(row_index, column_index);
                let mut block = Block::new(
                    kind.clone(),
                    spec.ref_block.clone(),
                    config.rotate_duration_ms,
                );
                let checks = rotation_checks.clone();
                block.set_rotate_end_handler(move |_| checks.borrow_mut().push(coord));
                grid.set(coord.row, coord.column, block);
            }
        }
        if grid.is_empty() {
            return Err(LevelError::EmptyLayout);
        }
        log::info!(
            "level '{}' ready: {} blocks, reference face '{}'",
            spec.name,
            grid.len(),
            spec.ref_block
        );
        Ok(Self {
            name: spec.name.clone(),
            config: config.clone(),
            grid,
            target: spec.ref_block.clone(),
            character,
            cleared: false,
            cleared_notified: false,
            rotation_checks,
            listeners: Listeners::new(),
            scheduler: Scheduler::new(),
            pending_respawn: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    pub fn target_face(&self) -> &BlockKind {
        &self.target
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn character(&self) -> &C {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut C {
        &mut self.character
    }

    pub fn has_pending_respawn(&self) -> bool {
        self.pending_respawn.is_some()
    }

    pub fn on_level_cleared(&mut self, listener: impl FnMut(&LevelCleared) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_level_cleared_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Per-frame entry point.
    ///
    /// Events queued since the last frame (a jump taken from input) are
    /// handled before anything advances, so a jump start always sees the
    /// take-off cell and its rotation gets the whole frame. Then blocks,
    /// then the character, then deferred tasks. Every event is handled and
    /// the scheduler always advances; the first error is returned afterwards.
    pub fn update(&mut self, dt_ms: f64) -> LevelResult<()> {
        let mut first_error = None;
        self.dispatch_events(&mut first_error);

        for block in self.grid.blocks_mut() {
            block.update(dt_ms);
        }
        self.apply_rotation_checks();

        self.character.update(dt_ms);
        self.dispatch_events(&mut first_error);

        for task in self.scheduler.advance(dt_ms) {
            match task {
                Deferred::Spawn(at) => {
                    self.pending_respawn = None;
                    log::trace!("respawning at {at}");
                    self.character.start_spawn(at);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn dispatch_events(&mut self, first_error: &mut Option<LevelError>) {
        for event in self.character.drain_events() {
            let Err(err) = self.handle_character_event(event) else { continue };
            // only the first error is returned, later ones are logged here
            if first_error.is_some() {
                log::error!("level '{}': {err}", self.name);
            } else {
                *first_error = Some(err);
            }
        }
    }

    pub fn handle_character_event(&mut self, event: CharacterEvent) -> LevelResult<()> {
        match event {
            CharacterEvent::JumpStarted(direction) => self.on_jump_start(direction),
            CharacterEvent::JumpEnded => {
                self.on_jump_end();
                Ok(())
            }
            CharacterEvent::DieEnded => self.on_die_end(),
            CharacterEvent::SpawnEnded => {
                self.character.enable_jump();
                Ok(())
            }
            CharacterEvent::WinEnded => {
                log::debug!("win sequence finished on level '{}'", self.name);
                Ok(())
            }
        }
    }

    /// Cancels the pending respawn and drops every level-cleared listener.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending_respawn.take() {
            self.scheduler.cancel(handle);
        }
        self.scheduler.clear();
        self.listeners.clear();
        self.rotation_checks.borrow_mut().clear();
    }

    fn on_jump_start(&mut self, direction: Direction) -> LevelResult<()> {
        let pos = self.character.position();
        let block = self
            .grid
            .at_mut(pos)
            .ok_or(LevelError::GridInconsistency(pos))?;
        log::trace!("jump {direction:?} from {pos}, rotating block");
        block.rotate(direction);
        Ok(())
    }

    fn on_jump_end(&mut self) {
        if self.cleared {
            if self.cleared_notified {
                log::debug!("level '{}' already celebrated; ignoring jump end", self.name);
                return;
            }
            self.cleared_notified = true;
            self.character.start_win(self.config.win_cycles);
            let event = LevelCleared {
                name: self.name.clone(),
                blocks: self.grid.len(),
            };
            self.listeners.notify(&event);
            return;
        }
        let pos = self.character.position();
        if !self.grid.contains(pos) {
            log::debug!("landed in a pit at {pos}");
            self.character.disable_jump();
            self.character.start_die();
        }
    }

    fn on_die_end(&mut self) -> LevelResult<()> {
        if let Some(coord) = self.grid.rotating() {
            return Err(LevelError::RotationInFlight(coord));
        }
        if let Some(previous) = self.pending_respawn.take() {
            self.scheduler.cancel(previous);
        }
        let spawn = self.config.spawn;
        self.pending_respawn = Some(
            self.scheduler
                .schedule(self.config.respawn_delay_ms, Deferred::Spawn(spawn)),
        );
        Ok(())
    }

    fn apply_rotation_checks(&mut self) {
        let checks: Vec<GridCoord> = self.rotation_checks.borrow_mut().drain(..).collect();
        for coord in checks {
            self.check_block(coord);
        }
    }

    fn check_block(&mut self, coord: GridCoord) {
        let Some(block) = self.grid.at_mut(coord) else {
            log::warn!("rotation reported for {coord}, which holds no block");
            return;
        };
        if block.current_face() != &self.target {
            return;
        }
        block.mark_as_cleared();
        if !self.cleared && is_level_cleared(&self.grid, &self.target) {
            log::info!("level '{}' cleared", self.name);
            self.cleared = true;
        }
    }
}

impl<C: Character> Drop for LevelController<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pattern_places_blocks_and_pits() {
        let spec = LevelSpec::from_pattern("t", "A", "B", &[".#.", "#.#"]);
        assert_eq!(spec.block_count(), 3);
        assert_eq!(spec.blocks[0][0], None);
        assert_eq!(spec.blocks[0][1], Some(BlockKind::from("B")));
        assert_eq!(spec.ref_block.as_str(), "A");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_level_spec_from_json_uses_ref_block_key() {
        let spec = LevelSpec::from_json(
            r#"{ "refBlock": "blue", "blocks": [[null, "yellow"], ["yellow", null]] }"#,
        )
        .unwrap();
        assert_eq!(spec.ref_block, BlockKind::from("blue"));
        assert_eq!(spec.block_count(), 2);
        assert!(spec.name.is_empty());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_level_spec_from_json_rejects_garbage() {
        assert!(matches!(
            LevelSpec::from_json("{ \"blocks\": 3 }"),
            Err(LevelError::InvalidLevelData(_))
        ));
    }
}
