//! The controlled character: the contract the level core consumes, and the
//! hopping implementation the browser game plays with.

use crate::config::{CharacterTimings, LevelConfig};
use crate::level::GridCoord;
use crate::process::Process;

/// Diagonal hop directions on the pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Signed (rows, columns) step in layout cells.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "q" | "Q" => Some(Direction::UpLeft),
            "ArrowUp" | "e" | "E" => Some(Direction::UpRight),
            "ArrowDown" | "a" | "A" => Some(Direction::DownLeft),
            "ArrowRight" | "d" | "D" => Some(Direction::DownRight),
            _ => None,
        }
    }
}

/// Completion / start notifications of the character's processes, in the
/// order they happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CharacterEvent {
    JumpStarted(Direction),
    JumpEnded,
    DieEnded,
    SpawnEnded,
    WinEnded,
}

pub trait Character {
    fn position(&self) -> GridCoord;
    fn start_win(&mut self, cycles: u32);
    fn start_die(&mut self);
    fn start_spawn(&mut self, at: GridCoord);
    fn enable_jump(&mut self);
    fn disable_jump(&mut self);
    fn update(&mut self, dt_ms: f64);
    fn drain_events(&mut self) -> Vec<CharacterEvent>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HopperPhase {
    Idle,
    Jumping,
    Dying,
    Spawning,
    Celebrating,
}

/// Snapshot used for drawing; positions are fractional grid units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HopperRenderState {
    pub row: f64,
    pub column: f64,
    /// Height of the hop arc in grid rows.
    pub lift: f64,
    pub phase: HopperPhase,
    pub phase_progress: f64,
}

#[derive(Debug)]
pub struct Hopper {
    pos: GridCoord,
    from: GridCoord,
    target: GridCoord,
    step_rows: i32,
    step_columns: i32,
    win_cycle_ms: f64,
    jump: Process,
    die: Process,
    spawn: Process,
    win: Process,
    jump_enabled: bool,
    events: Vec<CharacterEvent>,
}

impl Hopper {
    pub fn new(spawn: GridCoord, level: &LevelConfig, timings: &CharacterTimings) -> Self {
        Self {
            pos: spawn,
            from: spawn,
            target: spawn,
            step_rows: level.row_distance,
            step_columns: level.column_distance,
            win_cycle_ms: timings.win_cycle_ms,
            jump: Process::new(timings.jump_ms),
            die: Process::new(timings.die_ms),
            spawn: Process::new(timings.spawn_ms),
            win: Process::new(timings.win_cycle_ms),
            jump_enabled: true,
            events: Vec::new(),
        }
    }

    pub fn is_jump_enabled(&self) -> bool {
        self.jump_enabled
    }

    pub fn phase(&self) -> HopperPhase {
        if self.jump.is_active() {
            HopperPhase::Jumping
        } else if self.die.is_active() {
            HopperPhase::Dying
        } else if self.spawn.is_active() {
            HopperPhase::Spawning
        } else if self.win.is_active() {
            HopperPhase::Celebrating
        } else {
            HopperPhase::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase() != HopperPhase::Idle
    }

    /// Starts a hop if jumping is enabled and nothing else is playing.
    /// `JumpStarted` is queued right away, while the position still holds
    /// the take-off cell.
    pub fn jump(&mut self, direction: Direction) -> bool {
        if !self.jump_enabled || self.is_busy() {
            return false;
        }
        let (rows, columns) = direction.step();
        self.from = self.pos;
        self.target = self
            .pos
            .offset(rows * self.step_rows, columns * self.step_columns);
        self.jump.start();
        self.events.push(CharacterEvent::JumpStarted(direction));
        true
    }

    pub fn render_state(&self) -> HopperRenderState {
        let (row, column) = (self.pos.row as f64, self.pos.column as f64);
        match self.phase() {
            HopperPhase::Jumping => {
                let t = self.jump.progress().unwrap_or(1.0);
                let lerp = |a: i32, b: i32| a as f64 + (b - a) as f64 * t;
                HopperRenderState {
                    row: lerp(self.from.row, self.target.row),
                    column: lerp(self.from.column, self.target.column),
                    // parabola peaking at mid-hop
                    lift: (0.25 - (t - 0.5).powi(2)) * 4.0 * self.step_rows as f64 * 0.6,
                    phase: HopperPhase::Jumping,
                    phase_progress: t,
                }
            }
            phase => {
                let progress = match phase {
                    HopperPhase::Dying => self.die.progress(),
                    HopperPhase::Spawning => self.spawn.progress(),
                    HopperPhase::Celebrating => self.win.progress(),
                    _ => None,
                };
                HopperRenderState {
                    row,
                    column,
                    lift: 0.0,
                    phase,
                    phase_progress: progress.unwrap_or(0.0),
                }
            }
        }
    }
}

impl Character for Hopper {
    fn position(&self) -> GridCoord {
        self.pos
    }

    fn start_win(&mut self, cycles: u32) {
        self.win.set_duration(self.win_cycle_ms * cycles.max(1) as f64);
        self.win.start();
    }

    fn start_die(&mut self) {
        self.die.start();
    }

    fn start_spawn(&mut self, at: GridCoord) {
        self.pos = at;
        self.from = at;
        self.target = at;
        self.spawn.start();
    }

    fn enable_jump(&mut self) {
        self.jump_enabled = true;
    }

    fn disable_jump(&mut self) {
        self.jump_enabled = false;
    }

    fn update(&mut self, dt_ms: f64) {
        if self.jump.update(dt_ms) {
            self.pos = self.target;
            self.events.push(CharacterEvent::JumpEnded);
        }
        if self.die.update(dt_ms) {
            self.events.push(CharacterEvent::DieEnded);
        }
        if self.spawn.update(dt_ms) {
            self.events.push(CharacterEvent::SpawnEnded);
        }
        if self.win.update(dt_ms) {
            self.events.push(CharacterEvent::WinEnded);
        }
    }

    fn drain_events(&mut self) -> Vec<CharacterEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hopper() -> Hopper {
        Hopper::new(
            GridCoord::new(3, 15),
            &LevelConfig::default(),
            &CharacterTimings::default(),
        )
    }

    #[test]
    fn test_jump_moves_on_landing_only() {
        let mut h = hopper();
        assert!(h.jump(Direction::DownLeft));
        assert_eq!(h.drain_events(), vec![CharacterEvent::JumpStarted(Direction::DownLeft)]);
        assert_eq!(h.position(), GridCoord::new(3, 15));
        h.update(399.0);
        assert!(h.drain_events().is_empty());
        h.update(1.0);
        assert_eq!(h.drain_events(), vec![CharacterEvent::JumpEnded]);
        assert_eq!(h.position(), GridCoord::new(5, 13));
    }

    #[test]
    fn test_jump_refused_while_busy_or_disabled() {
        let mut h = hopper();
        assert!(h.jump(Direction::UpRight));
        assert!(!h.jump(Direction::UpRight));
        h.update(400.0);
        h.disable_jump();
        assert!(!h.jump(Direction::UpRight));
        h.enable_jump();
        h.start_win(3);
        assert!(!h.jump(Direction::UpRight));
    }

    #[test]
    fn test_die_spawn_and_win_report_completion() {
        let mut h = hopper();
        h.start_die();
        assert_eq!(h.phase(), HopperPhase::Dying);
        h.update(900.0);
        assert_eq!(h.drain_events(), vec![CharacterEvent::DieEnded]);

        h.start_spawn(GridCoord::new(7, 7));
        assert_eq!(h.position(), GridCoord::new(7, 7));
        h.update(600.0);
        assert_eq!(h.drain_events(), vec![CharacterEvent::SpawnEnded]);

        h.start_win(3);
        h.update(3.0 * 350.0 - 1.0);
        assert!(h.drain_events().is_empty());
        h.update(1.0);
        assert_eq!(h.drain_events(), vec![CharacterEvent::WinEnded]);
    }

    #[test]
    fn test_render_state_peaks_mid_hop() {
        let mut h = hopper();
        h.jump(Direction::DownRight);
        h.update(200.0);
        let s = h.render_state();
        assert_eq!(s.phase, HopperPhase::Jumping);
        assert!((s.row - 4.0).abs() < 1e-9);
        assert!((s.column - 16.0).abs() < 1e-9);
        assert!(s.lift > 0.0);
    }

    #[test]
    fn test_arrow_keys_map_to_diagonals() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::UpRight));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::DownLeft));
        assert_eq!(Direction::from_key("Enter"), None);
    }
}
