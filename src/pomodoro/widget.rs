use chrono::{DateTime, Local};
use tracing::{debug, info, trace};

use super::mode::PomodoroMode;
use super::render::{self, Presentation};
use super::state::{Completion, TimerState};
use crate::effects::alarm::AlarmPlayer;
use crate::effects::notify::{Notifier, Permission, PermissionRequest};
use crate::ticker::{TickId, TickSource};

struct ActiveTicker<H> {
    id: TickId,
    _handle: H,
}

/// A single Pomodoro timer instance.
///
/// Owns the countdown state, at most one armed tick handle, and the
/// alarm/notification collaborators. Every operation that stops the
/// countdown releases the handle before touching the state.
pub struct PomodoroWidget<T: TickSource> {
    state: TimerState,
    ticks: T,
    ticker: Option<ActiveTicker<T::Handle>>,
    next_tick_id: u64,
    alarm: Box<dyn AlarmPlayer>,
    notifier: Box<dyn Notifier>,
    started_at: DateTime<Local>,
}

impl<T: TickSource> PomodoroWidget<T> {
    pub fn new(ticks: T, alarm: Box<dyn AlarmPlayer>, notifier: Box<dyn Notifier>) -> Self {
        let started_at = Local::now();
        info!(
            "=== Session started at {} ===",
            started_at.format("%Y-%m-%d %H:%M:%S")
        );
        Self {
            state: TimerState::new(),
            ticks,
            ticker: None,
            next_tick_id: 0,
            alarm,
            notifier,
            started_at,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn active_tick(&self) -> Option<TickId> {
        self.ticker.as_ref().map(|t| t.id)
    }

    pub fn permission(&self) -> Permission {
        self.notifier.permission()
    }

    fn release_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!(id = %ticker.id, "ticker released");
        }
    }

    pub fn start(&mut self) {
        if self.state.is_running() {
            return;
        }
        self.release_ticker();
        self.next_tick_id += 1;
        let id = TickId(self.next_tick_id);
        let handle = self.ticks.arm(id);
        self.ticker = Some(ActiveTicker {
            id,
            _handle: handle,
        });
        self.state.set_running(true);
        info!(
            mode = self.state.mode().as_str(),
            remaining = self.state.remaining_seconds(),
            "countdown started"
        );
    }

    pub fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.release_ticker();
        self.state.set_running(false);
        info!(
            mode = self.state.mode().as_str(),
            remaining = self.state.remaining_seconds(),
            "countdown paused"
        );
    }

    pub fn toggle_start_pause(&mut self) {
        if self.state.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.release_ticker();
        self.state.reset();
        info!(mode = self.state.mode().as_str(), "countdown reset");
    }

    pub fn switch_mode(&mut self, mode: PomodoroMode) {
        self.release_ticker();
        self.state.switch_mode(mode);
        info!("{} Switched to {} mode", mode.emoji(), mode.as_str());
    }

    /// Deliver a tick from the scheduler. Ticks from released tickers are
    /// dropped. Returns whether the tick was applied.
    pub fn on_tick(&mut self, id: TickId) -> bool {
        if self.active_tick() != Some(id) {
            trace!(id = %id, "stale tick ignored");
            return false;
        }
        self.tick();
        true
    }

    /// One second of countdown. Does nothing while paused.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            return;
        }
        if let Some(completion) = self.state.tick() {
            self.release_ticker();
            self.announce(completion);
        }
    }

    /// End the current session immediately and load the next mode.
    pub fn complete_session(&mut self) -> Completion {
        self.release_ticker();
        let completion = self.state.complete_session();
        self.announce(completion.clone());
        completion
    }

    fn announce(&mut self, completion: Completion) {
        info!(
            finished = completion.finished.as_str(),
            next = completion.next.as_str(),
            completed_focus = self.state.completed_focus_count(),
            cycles = self.state.cycle_count(),
            "🔔 {}",
            completion.title
        );

        self.alarm.play();
        if self.notifier.permission() == Permission::Granted {
            self.notifier.notify(completion.title, completion.body);
        } else {
            debug!(permission = ?self.notifier.permission(), "notification skipped");
        }
    }

    /// Mark the permission as pending and hand back the blocking request
    /// for the host to run off the event loop. `None` when notifications
    /// are unsupported or a request is already in flight.
    pub fn request_notification_permission(&mut self) -> Option<PermissionRequest> {
        match self.notifier.permission() {
            Permission::Unsupported | Permission::Pending => {
                debug!(permission = ?self.notifier.permission(), "permission request ignored");
                None
            }
            _ => {
                self.notifier.set_permission(Permission::Pending);
                Some(self.notifier.permission_request())
            }
        }
    }

    pub fn resolve_notification_permission(&mut self, permission: Permission) {
        self.notifier.set_permission(permission);
    }

    pub fn render(&self) -> Presentation {
        render::present(&self.state, self.notifier.permission())
    }

    /// Log the end-of-session statistics.
    pub fn log_summary(&self) {
        let elapsed = Local::now() - self.started_at;
        info!("--- Session Statistics ---");
        info!("Session duration: {} minutes", elapsed.num_minutes());
        info!(
            "Completed focus sessions: {}",
            self.state.completed_focus_count()
        );
        info!("Cycles: {}", self.state.cycle_count());
    }
}

impl<T: TickSource> Drop for PomodoroWidget<T> {
    fn drop(&mut self) {
        self.release_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct TickLedger {
        armed: Vec<TickId>,
        live: usize,
        max_live: usize,
    }

    #[derive(Clone, Default)]
    struct FakeTicks {
        ledger: Rc<RefCell<TickLedger>>,
    }

    struct FakeHandle {
        ledger: Rc<RefCell<TickLedger>>,
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.ledger.borrow_mut().live -= 1;
        }
    }

    impl TickSource for FakeTicks {
        type Handle = FakeHandle;

        fn arm(&mut self, id: TickId) -> FakeHandle {
            let mut ledger = self.ledger.borrow_mut();
            ledger.armed.push(id);
            ledger.live += 1;
            ledger.max_live = ledger.max_live.max(ledger.live);
            FakeHandle {
                ledger: Rc::clone(&self.ledger),
            }
        }
    }

    #[derive(Clone, Default)]
    struct CountingAlarm {
        plays: Rc<Cell<u32>>,
    }

    impl AlarmPlayer for CountingAlarm {
        fn play(&self) {
            self.plays.set(self.plays.get() + 1);
        }
    }

    #[derive(Clone)]
    struct RecordingNotifier {
        permission: Rc<Cell<Permission>>,
        grant_on_request: bool,
        sent: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl RecordingNotifier {
        fn new(permission: Permission) -> Self {
            Self {
                permission: Rc::new(Cell::new(permission)),
                grant_on_request: true,
                sent: Rc::default(),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> Permission {
            self.permission.get()
        }

        fn set_permission(&mut self, permission: Permission) {
            if self.permission.get() != Permission::Unsupported {
                self.permission.set(permission);
            }
        }

        fn permission_request(&self) -> PermissionRequest {
            let grant = self.grant_on_request;
            Box::new(move || {
                if grant {
                    Permission::Granted
                } else {
                    Permission::Denied
                }
            })
        }

        fn notify(&self, title: &str, body: &str) {
            self.sent
                .borrow_mut()
                .push((title.to_string(), body.to_string()));
        }
    }

    struct Harness {
        widget: PomodoroWidget<FakeTicks>,
        ticks: FakeTicks,
        alarm: CountingAlarm,
        notifier: RecordingNotifier,
    }

    fn harness(permission: Permission) -> Harness {
        let ticks = FakeTicks::default();
        let alarm = CountingAlarm::default();
        let notifier = RecordingNotifier::new(permission);
        let widget = PomodoroWidget::new(
            ticks.clone(),
            Box::new(alarm.clone()),
            Box::new(notifier.clone()),
        );
        Harness {
            widget,
            ticks,
            alarm,
            notifier,
        }
    }

    #[test]
    fn test_start_arms_single_ticker() {
        let mut h = harness(Permission::NotRequested);
        h.widget.start();
        h.widget.start();

        let ledger = h.ticks.ledger.borrow();
        assert_eq!(ledger.armed, vec![TickId(1)]);
        assert_eq!(ledger.live, 1);
        assert!(h.widget.state().is_running());
    }

    #[test]
    fn test_pause_releases_ticker() {
        let mut h = harness(Permission::NotRequested);
        h.widget.start();
        h.widget.pause();
        assert!(!h.widget.state().is_running());
        assert_eq!(h.widget.active_tick(), None);
        assert_eq!(h.ticks.ledger.borrow().live, 0);

        // Pausing an idle widget is a no-op
        h.widget.pause();
        assert_eq!(h.ticks.ledger.borrow().live, 0);
    }

    #[test]
    fn test_toggle_start_pause() {
        let mut h = harness(Permission::NotRequested);
        h.widget.toggle_start_pause();
        assert!(h.widget.state().is_running());
        h.widget.toggle_start_pause();
        assert!(!h.widget.state().is_running());
        h.widget.toggle_start_pause();
        assert_eq!(h.widget.active_tick(), Some(TickId(2)));
        assert_eq!(h.ticks.ledger.borrow().max_live, 1);
    }

    #[test]
    fn test_focus_runs_to_short_break() {
        let mut h = harness(Permission::NotRequested);
        h.widget.start();
        let id = h.widget.active_tick().unwrap();
        for _ in 0..1500 {
            h.widget.on_tick(id);
        }

        let state = h.widget.state();
        assert_eq!(state.mode(), PomodoroMode::ShortBreak);
        assert_eq!(state.remaining_seconds(), 300);
        assert_eq!(state.completed_focus_count(), 1);
        assert_eq!(state.cycle_count(), 1);
        assert!(!state.is_running());
        assert_eq!(h.widget.active_tick(), None);
        assert_eq!(h.ticks.ledger.borrow().live, 0);
        assert_eq!(h.alarm.plays.get(), 1);
    }

    #[test]
    fn test_switch_mode_while_running_cancels_countdown() {
        let mut h = harness(Permission::NotRequested);
        h.widget.start();
        let old = h.widget.active_tick().unwrap();
        h.widget.on_tick(old);
        assert_eq!(h.widget.state().remaining_seconds(), 1499);

        h.widget.switch_mode(PomodoroMode::ShortBreak);
        assert_eq!(h.ticks.ledger.borrow().live, 0);

        // A tick queued by the released ticker must not decrement
        assert!(!h.widget.on_tick(old));
        assert_eq!(h.widget.state().remaining_seconds(), 300);
        assert!(!h.widget.state().is_running());
    }

    #[test]
    fn test_stale_tick_after_restart_is_ignored() {
        let mut h = harness(Permission::NotRequested);
        h.widget.start();
        let old = h.widget.active_tick().unwrap();
        h.widget.reset();
        h.widget.start();
        let current = h.widget.active_tick().unwrap();
        assert_ne!(old, current);

        assert!(!h.widget.on_tick(old));
        assert!(h.widget.on_tick(current));
        assert_eq!(h.widget.state().remaining_seconds(), 1499);
        assert_eq!(h.ticks.ledger.borrow().max_live, 1);
    }

    #[test]
    fn test_reset_restores_duration_only() {
        let mut h = harness(Permission::NotRequested);
        h.widget.complete_session();
        h.widget.start();
        let id = h.widget.active_tick().unwrap();
        h.widget.on_tick(id);
        h.widget.on_tick(id);

        h.widget.reset();
        let state = h.widget.state();
        assert_eq!(state.mode(), PomodoroMode::ShortBreak);
        assert_eq!(state.remaining_seconds(), 300);
        assert_eq!(state.completed_focus_count(), 1);
        assert_eq!(state.cycle_count(), 1);
        assert!(!state.is_running());
    }

    #[test]
    fn test_tick_while_paused_does_nothing() {
        let mut h = harness(Permission::NotRequested);
        h.widget.tick();
        assert_eq!(h.widget.state().remaining_seconds(), 1500);
    }

    #[test]
    fn test_notification_requires_grant() {
        let mut h = harness(Permission::NotRequested);
        h.widget.complete_session();
        assert_eq!(h.alarm.plays.get(), 1);
        assert!(h.notifier.sent.borrow().is_empty());

        let request = h
            .widget
            .request_notification_permission()
            .expect("request issued");
        assert_eq!(h.widget.permission(), Permission::Pending);
        h.widget.complete_session();
        assert!(h.notifier.sent.borrow().is_empty());

        h.widget.resolve_notification_permission(request());
        assert_eq!(h.widget.permission(), Permission::Granted);
        h.widget.complete_session();
        assert_eq!(h.alarm.plays.get(), 3);
        assert_eq!(
            *h.notifier.sent.borrow(),
            vec![(
                "Focus session complete!".to_string(),
                "Time for a break.".to_string()
            )]
        );
    }

    #[test]
    fn test_denied_request_blocks_notifications() {
        let mut h = harness(Permission::NotRequested);
        h.notifier.grant_on_request = false;
        let mut widget = PomodoroWidget::new(
            h.ticks.clone(),
            Box::new(h.alarm.clone()),
            Box::new(h.notifier.clone()),
        );
        let request = widget.request_notification_permission().expect("request");
        widget.resolve_notification_permission(request());
        assert_eq!(widget.permission(), Permission::Denied);
        assert_eq!(widget.render().notification_label, "Notifications Blocked");

        widget.complete_session();
        assert_eq!(h.alarm.plays.get(), 1);
        assert!(h.notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_unsupported_notifications_never_request() {
        let mut h = harness(Permission::Unsupported);
        assert!(h.widget.request_notification_permission().is_none());
        assert_eq!(h.notifier.permission.get(), Permission::Unsupported);
        assert!(!h.widget.render().notification_control_enabled);
    }

    #[test]
    fn test_no_second_request_while_pending() {
        let mut h = harness(Permission::NotRequested);
        assert!(h.widget.request_notification_permission().is_some());
        assert!(h.widget.request_notification_permission().is_none());
        assert_eq!(h.widget.render().notification_label, "Requesting Permission...");
    }

    #[test]
    fn test_fourth_focus_earns_long_break() {
        let mut h = harness(Permission::Granted);
        let mut breaks = Vec::new();
        for _ in 0..4 {
            h.widget.switch_mode(PomodoroMode::Focus);
            breaks.push(h.widget.complete_session().next);
        }
        assert_eq!(breaks.last(), Some(&PomodoroMode::LongBreak));
        assert_eq!(h.notifier.sent.borrow().len(), 4);
        assert_eq!(h.alarm.plays.get(), 4);
    }

    #[test]
    fn test_drop_releases_ticker() {
        let h = harness(Permission::NotRequested);
        let ledger = Rc::clone(&h.ticks.ledger);
        let mut widget = h.widget;
        widget.start();
        assert_eq!(ledger.borrow().live, 1);
        drop(widget);
        assert_eq!(ledger.borrow().live, 0);
    }
}
