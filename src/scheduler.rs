//! Deferred one-shot actions on the game's own timeline.
//!
//! Time only moves when the frame loop calls [`Scheduler::advance`], so a
//! dropped or cleared scheduler can never fire a stale action.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledTask<A> {
    handle: TaskHandle,
    due_ms: f64,
    action: A,
}

#[derive(Debug)]
pub struct Scheduler<A> {
    now_ms: f64,
    next_id: u64,
    tasks: Vec<ScheduledTask<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: f64, action: A) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            handle,
            due_ms: self.now_ms + delay_ms.max(0.0),
            action,
        });
        handle
    }

    /// Returns false if the task already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Moves the clock forward and hands back every due action, earliest first.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<A> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due_ms <= now);
        self.tasks = waiting;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|t| t.action).collect()
    }
}
