//! Cooperative scheduler
//!
//! Timers (`setTimeout`) and animation frames (`requestAnimationFrame`)
//! on a virtual millisecond clock. Every task is tagged with the
//! controller that queued it and a token the controller chose, so each
//! controller reads back only its own work.

/// Index of a controller within its site
pub type ControllerId = usize;

/// Controller-chosen task tag. `lane` separates sub-components sharing a
/// controller; `seq` identifies the task within the lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken {
    pub lane: u32,
    pub seq: u32,
}

impl TaskToken {
    pub const fn new(lane: u32, seq: u32) -> Self {
        Self { lane, seq }
    }
}

/// Timer handle returned by `set_timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Frame,
    Timer,
}

/// A task ready to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub owner: ControllerId,
    pub token: TaskToken,
    pub kind: TaskKind,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    due: f64,
    owner: ControllerId,
    token: TaskToken,
}

/// Timer and frame queues
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    frames: Vec<(ControllerId, TaskToken)>,
    timers: Vec<Timer>,
    next_timer_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds (`performance.now()`)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward; time never goes backwards
    pub fn advance_to(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Queue a callback for the next frame
    pub fn request_animation_frame(&mut self, owner: ControllerId, token: TaskToken) {
        self.frames.push((owner, token));
    }

    /// Queue a callback after `delay_ms`
    pub fn set_timeout(&mut self, owner: ControllerId, token: TaskToken, delay_ms: f64) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay_ms.max(0.0),
            owner,
            token,
        });
        id
    }

    /// Cancel a timer, returns false if it already ran
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Remove and return timers due at the current time, oldest first
    pub fn take_due_timers(&mut self) -> Vec<ScheduledTask> {
        let now = self.now;
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter()
            .map(|t| ScheduledTask { owner: t.owner, token: t.token, kind: TaskKind::Timer })
            .collect()
    }

    /// Remove and return this frame's callbacks. Callbacks queued while
    /// these run land in the next frame.
    pub fn take_frames(&mut self) -> Vec<ScheduledTask> {
        std::mem::take(&mut self.frames)
            .into_iter()
            .map(|(owner, token)| ScheduledTask { owner, token, kind: TaskKind::Frame })
            .collect()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.frames.is_empty() || !self.timers.is_empty()
    }
}
