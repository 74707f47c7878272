use super::mode::{CYCLES_PER_LONG_BREAK, PomodoroMode};

/// Outcome of a finished session: which mode ended, which mode is now
/// loaded, and the notification text that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub finished: PomodoroMode,
    pub next: PomodoroMode,
    pub title: &'static str,
    pub body: &'static str,
}

/// Countdown state owned by a single widget instance.
///
/// Plain data plus the transitions on it. Scheduling and side effects
/// live in [`super::widget::PomodoroWidget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    mode: PomodoroMode,
    remaining_seconds: u32,
    running: bool,
    completed_focus_count: u32,
    cycle_count: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self {
            mode: PomodoroMode::Focus,
            remaining_seconds: PomodoroMode::Focus.duration(),
            running: false,
            completed_focus_count: 0,
            cycle_count: 0,
        }
    }

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn duration(&self) -> u32 {
        self.mode.duration()
    }

    /// Fraction of the current session already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.duration() as f64;
        (total - self.remaining_seconds as f64) / total
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub(crate) fn reset(&mut self) {
        self.remaining_seconds = self.duration();
        self.running = false;
    }

    pub(crate) fn switch_mode(&mut self, mode: PomodoroMode) {
        self.mode = mode;
        self.remaining_seconds = mode.duration();
        self.running = false;
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completion when this tick ends the session. A tick
    /// never completes more than one session.
    pub(crate) fn tick(&mut self) -> Option<Completion> {
        if self.remaining_seconds == 0 {
            return Some(self.complete_session());
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            return Some(self.complete_session());
        }
        None
    }

    pub(crate) fn complete_session(&mut self) -> Completion {
        let finished = self.mode;
        if finished == PomodoroMode::Focus {
            self.completed_focus_count += 1;
            self.cycle_count += 1;
            let next = if self.cycle_count % CYCLES_PER_LONG_BREAK == 0 {
                PomodoroMode::LongBreak
            } else {
                PomodoroMode::ShortBreak
            };
            self.switch_mode(next);
            return Completion {
                finished,
                next,
                title: "Focus session complete!",
                body: "Time for a break.",
            };
        }

        self.switch_mode(PomodoroMode::Focus);
        Completion {
            finished,
            next: PomodoroMode::Focus,
            title: "Break complete!",
            body: "Get back to focused work.",
        }
    }

    #[cfg(test)]
    pub(crate) fn with_remaining(mut self, remaining_seconds: u32) -> Self {
        self.remaining_seconds = remaining_seconds.min(self.duration());
        self
    }
}
