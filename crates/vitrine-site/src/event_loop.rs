//! Event Loop
//!
//! Virtual-clock loop serializing timers and animation frames. The host
//! advances time; the loop hands back one step at a time (a due timer or a
//! rendering frame) so the caller can run it with full access to the page.

use vitrine_dom::NodeId;

/// Work the loop can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Carousel auto-advance tick
    CarouselAutoAdvance,
    /// One count-up step for a stat counter
    CounterFrame(NodeId),
}

/// Timer task
#[derive(Debug, Clone)]
pub struct Timer {
    pub id: u32,
    pub task: Task,
    pub delay_ms: u64,
    pub scheduled_at: u64,
    pub is_interval: bool,
}

impl Timer {
    /// None once the deadline is past the end of the clock
    fn due_at(&self) -> Option<u64> {
        self.scheduled_at.checked_add(self.delay_ms)
    }
}

/// A unit of work handed back by `EventLoop::poll`
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A timer came due
    Timer { id: u32, task: Task },
    /// A rendering opportunity with the animation callbacks queued for it
    Frame { timestamp: f64, callbacks: Vec<Task> },
}

/// Event loop over a virtual millisecond clock
#[derive(Debug)]
pub struct EventLoop {
    /// Pending timers
    timers: Vec<Timer>,
    /// Callbacks for the next frame
    animation_frames: Vec<(u32, Task)>,
    next_timer_id: u32,
    next_frame_id: u32,
    /// Current time (ms)
    current_time: u64,
    frame_interval: u64,
    /// None once the frame clock has run past `u64::MAX`
    next_frame_at: Option<u64>,
    /// Something visible changed since the last frame
    needs_render: bool,
}

impl EventLoop {
    pub fn new(frame_interval_ms: u64) -> Self {
        let frame_interval = frame_interval_ms.max(1);
        Self {
            timers: Vec::new(),
            animation_frames: Vec::new(),
            next_timer_id: 1,
            next_frame_id: 1,
            current_time: 0,
            frame_interval,
            next_frame_at: Some(frame_interval),
            needs_render: true,
        }
    }

    fn add_timer(&mut self, task: Task, delay_ms: u64, is_interval: bool) -> u32 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        self.timers.push(Timer {
            id,
            task,
            // A zero-delay interval would never let the clock move
            delay_ms: delay_ms.max(1),
            scheduled_at: self.current_time,
            is_interval,
        });
        id
    }

    /// Set a timeout
    pub fn set_timeout(&mut self, task: Task, delay_ms: u64) -> u32 {
        self.add_timer(task, delay_ms, false)
    }

    /// Set an interval
    pub fn set_interval(&mut self, task: Task, delay_ms: u64) -> u32 {
        self.add_timer(task, delay_ms, true)
    }

    /// Clear a timeout/interval. Returns true if it existed.
    pub fn clear_timer(&mut self, id: u32) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Queue a callback for the next frame
    pub fn request_animation_frame(&mut self, task: Task) -> u32 {
        let id = self.next_frame_id;
        self.next_frame_id += 1;
        self.animation_frames.push((id, task));
        id
    }

    pub fn cancel_animation_frame(&mut self, id: u32) {
        self.animation_frames.retain(|(fid, _)| *fid != id);
    }

    /// Ask for a rendering frame even if no animation callback is queued
    pub fn request_render(&mut self) {
        self.needs_render = true;
    }

    /// Move the frame clock to the first boundary at or after `horizon`
    fn skip_idle_frames(&mut self, horizon: u64) {
        let Some(next) = self.next_frame_at else { return };
        if next >= horizon {
            return;
        }
        let skipped = (horizon - next).div_ceil(self.frame_interval);
        self.next_frame_at = skipped
            .checked_mul(self.frame_interval)
            .and_then(|d| next.checked_add(d));
    }

    /// Next unit of work due at or before `until`, advancing the clock to it.
    ///
    /// Timers due at the same instant as a frame run first. Frames with no
    /// callbacks and nothing to render are skipped. Returns None (with the
    /// clock at `until`) when nothing else is due.
    pub fn poll(&mut self, until: u64) -> Option<Step> {
        let next_timer = self
            .timers
            .iter()
            .filter_map(|t| Some((t.due_at()?, t.id)))
            .min();

        if !self.needs_render && self.animation_frames.is_empty() {
            let horizon = next_timer.map_or(until, |(due, _)| due.min(until));
            self.skip_idle_frames(horizon);
        }
        let frame_due = self.next_frame_at.filter(|&at| at <= until);

        match next_timer {
            Some((due, id)) if due <= until && frame_due.is_none_or(|at| due <= at) => {
                self.current_time = self.current_time.max(due);
                let timer = self.timers.iter_mut().find(|t| t.id == id)?;
                let task = timer.task;
                if timer.is_interval {
                    timer.scheduled_at = due;
                } else {
                    self.timers.retain(|t| t.id != id);
                }
                Some(Step::Timer { id, task })
            }
            _ if frame_due.is_some() => {
                self.current_time = frame_due?;
                self.next_frame_at = self.current_time.checked_add(self.frame_interval);
                self.needs_render = false;
                let callbacks = std::mem::take(&mut self.animation_frames)
                    .into_iter()
                    .map(|(_, task)| task)
                    .collect();
                Some(Step::Frame {
                    timestamp: self.current_time as f64,
                    callbacks,
                })
            }
            _ => {
                self.current_time = self.current_time.max(until);
                None
            }
        }
    }

    /// Check if there's pending work
    pub fn has_pending_work(&self) -> bool {
        !self.timers.is_empty() || !self.animation_frames.is_empty()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Get current time (ms)
    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    pub fn frame_interval(&self) -> u64 {
        self.frame_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(loop_: &mut EventLoop, until: u64) -> Vec<Step> {
        std::iter::from_fn(|| loop_.poll(until)).collect()
    }

    fn frame_stamps(steps: &[Step]) -> Vec<f64> {
        steps
            .iter()
            .map(|s| match s {
                Step::Frame { timestamp, .. } => *timestamp,
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_idle_frames_are_skipped() {
        let mut loop_ = EventLoop::new(16);
        // The first frame always renders
        assert_eq!(frame_stamps(&drain(&mut loop_, 50)), vec![16.0]);
        assert_eq!(loop_.current_time(), 50);

        // Frames stay on the 16ms grid
        loop_.request_render();
        assert_eq!(frame_stamps(&drain(&mut loop_, 100)), vec![64.0]);
    }

    #[test]
    fn test_frames_continue_while_callbacks_queued() {
        let mut loop_ = EventLoop::new(16);
        let node = vitrine_dom::NodeId::ROOT;
        let mut stamps = Vec::new();
        while let Some(step) = loop_.poll(200) {
            if let Step::Frame { timestamp, .. } = step {
                stamps.push(timestamp);
                if timestamp < 64.0 {
                    loop_.request_animation_frame(Task::CounterFrame(node));
                }
            }
        }
        assert_eq!(stamps, vec![16.0, 32.0, 48.0, 64.0]);
    }

    #[test]
    fn test_poll_to_end_of_clock_terminates() {
        let mut loop_ = EventLoop::new(16);
        loop_.set_timeout(Task::CarouselAutoAdvance, 100);
        let steps = drain(&mut loop_, u64::MAX);
        assert_eq!(steps.iter().filter(|s| matches!(s, Step::Timer { .. })).count(), 1);
        assert_eq!(loop_.current_time(), u64::MAX);

        // An interval whose next deadline would overflow never fires again
        let mut loop_ = EventLoop::new(16);
        loop_.set_interval(Task::CarouselAutoAdvance, u64::MAX - 10);
        let fired = drain(&mut loop_, u64::MAX)
            .into_iter()
            .filter(|s| matches!(s, Step::Timer { .. }))
            .count();
        assert_eq!(fired, 1);
        assert!(loop_.poll(u64::MAX).is_none());
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut loop_ = EventLoop::new(1000);
        loop_.set_timeout(Task::CarouselAutoAdvance, 100);

        assert!(drain(&mut loop_, 99).is_empty());
        let steps = drain(&mut loop_, 150);
        assert_eq!(steps.len(), 1);
        assert!(matches!(steps[0], Step::Timer { task: Task::CarouselAutoAdvance, .. }));
        assert!(!loop_.has_pending_work());
    }

    #[test]
    fn test_interval_repeats_without_drift() {
        let mut loop_ = EventLoop::new(10_000);
        let id = loop_.set_interval(Task::CarouselAutoAdvance, 5000);

        let fired = drain(&mut loop_, 9_999)
            .into_iter()
            .filter(|s| matches!(s, Step::Timer { .. }))
            .count();
        assert_eq!(fired, 1);

        let fired = drain(&mut loop_, 15_000)
            .into_iter()
            .filter(|s| matches!(s, Step::Timer { .. }))
            .count();
        assert_eq!(fired, 2);

        assert!(loop_.clear_timer(id));
        assert!(!loop_.clear_timer(id));
    }

    #[test]
    fn test_timer_runs_before_frame_at_same_instant() {
        let mut loop_ = EventLoop::new(16);
        loop_.set_timeout(Task::CarouselAutoAdvance, 16);
        let steps = drain(&mut loop_, 16);
        assert!(matches!(steps[0], Step::Timer { .. }));
        assert!(matches!(steps[1], Step::Frame { .. }));
    }

    #[test]
    fn test_animation_frames_run_next_frame_only() {
        let mut loop_ = EventLoop::new(16);
        let node = vitrine_dom::NodeId::ROOT;
        loop_.request_animation_frame(Task::CounterFrame(node));

        match loop_.poll(16) {
            Some(Step::Frame { callbacks, .. }) => assert_eq!(callbacks, vec![Task::CounterFrame(node)]),
            other => panic!("unexpected {other:?}"),
        }
        match loop_.poll(32) {
            Some(Step::Frame { callbacks, .. }) => assert!(callbacks.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_cancel_animation_frame() {
        let mut loop_ = EventLoop::new(16);
        let id = loop_.request_animation_frame(Task::CarouselAutoAdvance);
        loop_.cancel_animation_frame(id);
        assert!(!loop_.has_pending_work());
    }
}
