//! A single playfield tile with two faces.

use std::fmt;

use crate::character::Direction;
use crate::process::Process;

/// Block type / face identifier as written in level data (e.g. `"yellow"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BlockKind(String);

impl BlockKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockKind {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Base,
    Target,
}

impl Face {
    fn flipped(self) -> Self {
        match self {
            Face::Base => Face::Target,
            Face::Target => Face::Base,
        }
    }
}

pub type RotateEndHandler = Box<dyn FnMut(&Block)>;

/// Rotation flips the logical face straight away; the animation plays out
/// over `rotation` and the handler runs when it finishes.
pub struct Block {
    base: BlockKind,
    target: BlockKind,
    face: Face,
    cleared: bool,
    rotation: Process,
    rotation_direction: Option<Direction>,
    on_rotate_end: Option<RotateEndHandler>,
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("base", &self.base)
            .field("target", &self.target)
            .field("face", &self.face)
            .field("cleared", &self.cleared)
            .field("rotating", &self.is_rotating())
            .finish()
    }
}

impl Block {
    pub fn new(base: BlockKind, target: BlockKind, rotate_duration_ms: f64) -> Self {
        Self {
            base,
            target,
            face: Face::Base,
            cleared: false,
            rotation: Process::new(rotate_duration_ms),
            rotation_direction: None,
            on_rotate_end: None,
        }
    }

    /// Replaces any previously registered handler.
    pub fn set_rotate_end_handler(&mut self, handler: impl FnMut(&Block) + 'static) {
        self.on_rotate_end = Some(Box::new(handler));
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn current_face(&self) -> &BlockKind {
        self.face_kind(self.face)
    }

    pub fn face_kind(&self, face: Face) -> &BlockKind {
        match face {
            Face::Base => &self.base,
            Face::Target => &self.target,
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn mark_as_cleared(&mut self) {
        self.cleared = true;
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_active()
    }

    /// Direction and progress of the rotation animation in flight.
    pub fn rotation(&self) -> Option<(Direction, f64)> {
        self.rotation_direction.zip(self.rotation.progress())
    }

    /// `direction` only steers the animation, never the resulting face.
    pub fn rotate(&mut self, direction: Direction) {
        self.face = self.face.flipped();
        self.rotation_direction = Some(direction);
        if !self.rotation.start() {
            // Already spinning: restart the animation so exactly one completion
            // reports the latest face.
            self.rotation = Process::new(self.rotation.duration_ms());
            self.rotation.start();
        }
    }

    pub fn update(&mut self, dt_ms: f64) {
        if !self.rotation.update(dt_ms) {
            return;
        }
        self.rotation_direction = None;
        if let Some(mut handler) = self.on_rotate_end.take() {
            handler(self);
            self.on_rotate_end = Some(handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn block() -> Block {
        Block::new(BlockKind::from("B"), BlockKind::from("A"), 200.0)
    }

    #[test]
    fn test_rotate_alternates_between_two_faces() {
        let mut b = block();
        let initial = b.current_face().clone();
        let dirs = [
            Direction::UpLeft,
            Direction::DownRight,
            Direction::UpRight,
            Direction::DownLeft,
        ];
        let mut seen = Vec::new();
        for d in dirs {
            b.rotate(d);
            seen.push(b.current_face().as_str().to_string());
        }
        assert_eq!(seen, vec!["A", "B", "A", "B"]);
        assert_eq!(b.current_face(), &initial);
    }

    #[test]
    fn test_mark_as_cleared_is_idempotent() {
        let mut b = block();
        assert!(!b.is_cleared());
        b.mark_as_cleared();
        b.mark_as_cleared();
        assert!(b.is_cleared());
        // rotating away never un-clears
        b.rotate(Direction::UpLeft);
        assert!(b.is_cleared());
    }

    #[test]
    fn test_handler_runs_once_when_rotation_finishes() {
        let faces = Rc::new(RefCell::new(Vec::new()));
        let mut b = block();
        {
            let faces = faces.clone();
            b.set_rotate_end_handler(move |blk| faces.borrow_mut().push(blk.current_face().clone()));
        }
        b.rotate(Direction::DownRight);
        assert!(b.rotation().is_some());
        b.update(150.0);
        assert!(faces.borrow().is_empty());
        b.update(60.0);
        assert_eq!(*faces.borrow(), vec![BlockKind::from("A")]);
        b.update(500.0);
        assert_eq!(faces.borrow().len(), 1);
        assert!(b.rotation().is_none());
    }

    #[test]
    fn test_rotate_mid_animation_reports_latest_face_once() {
        let faces = Rc::new(RefCell::new(Vec::new()));
        let mut b = block();
        {
            let faces = faces.clone();
            b.set_rotate_end_handler(move |blk| faces.borrow_mut().push(blk.face()));
        }
        b.rotate(Direction::DownRight);
        b.update(100.0);
        b.rotate(Direction::UpLeft);
        b.update(150.0);
        assert!(faces.borrow().is_empty());
        b.update(50.0);
        assert_eq!(*faces.borrow(), vec![Face::Base]);
    }
}
