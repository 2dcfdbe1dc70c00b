//! Timed one-shot processes (jump, die, spawn, win, block rotation).
//!
//! Every animated activity in the game follows the same life cycle:
//! `Idle -> Active -> Done`, with exactly one completion reported on the
//! `Active -> Done` frame. A finished process may be started again.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProcessState {
    Idle,
    Active { elapsed_ms: f64 },
    Done,
}

#[derive(Clone, Debug)]
pub struct Process {
    duration_ms: f64,
    state: ProcessState,
}

impl Process {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            state: ProcessState::Idle,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Only takes effect for the next activation.
    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms.max(0.0);
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ProcessState::Active { .. })
    }

    /// Returns false (and leaves the running activation alone) if already active.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = ProcessState::Active { elapsed_ms: 0.0 };
        true
    }

    /// Advances the process; true exactly once, on the frame it finishes.
    pub fn update(&mut self, dt_ms: f64) -> bool {
        let ProcessState::Active { elapsed_ms } = self.state else {
            return false;
        };
        let elapsed_ms = elapsed_ms + dt_ms.max(0.0);
        if elapsed_ms >= self.duration_ms {
            self.state = ProcessState::Done;
            true
        } else {
            self.state = ProcessState::Active { elapsed_ms };
            false
        }
    }

    /// Fraction in `0.0..=1.0` while active.
    pub fn progress(&self) -> Option<f64> {
        match self.state {
            ProcessState::Active { elapsed_ms } if self.duration_ms > 0.0 => {
                Some((elapsed_ms / self.duration_ms).clamp(0.0, 1.0))
            }
            ProcessState::Active { .. } => Some(1.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_reports_completion_once() {
        let mut p = Process::new(100.0);
        assert!(!p.update(50.0), "idle process must not advance");
        assert!(p.start());
        assert!(!p.update(60.0));
        assert!((p.progress().unwrap() - 0.6).abs() < 1e-9);
        assert!(p.update(60.0));
        assert_eq!(p.state(), ProcessState::Done);
        assert!(!p.update(60.0));
    }

    #[test]
    fn test_process_start_while_active_is_ignored() {
        let mut p = Process::new(100.0);
        assert!(p.start());
        p.update(70.0);
        assert!(!p.start());
        assert!(p.update(30.0));
        // restart after completion
        assert!(p.start());
        assert!(p.is_active());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_update() {
        let mut p = Process::new(0.0);
        p.start();
        assert_eq!(p.progress(), Some(1.0));
        assert!(p.update(0.0));
    }
}
