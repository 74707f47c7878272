//! Pure projection from timer state to what the host displays.

use std::f64::consts::PI;

use serde::Serialize;

use super::mode::PomodoroMode;
use super::state::TimerState;
use crate::effects::notify::Permission;

pub const RING_RADIUS: f64 = 104.0;

/// Circumference of the progress ring.
pub fn ring_length() -> f64 {
    2.0 * PI * RING_RADIUS
}

/// Format whole seconds as zero-padded `MM:SS`.
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn status_text(state: &TimerState) -> &'static str {
    if !state.is_running() {
        "Ready to focus"
    } else if state.mode().is_break() {
        "Taking a break..."
    } else {
        "Focusing..."
    }
}

pub fn notification_label(permission: Permission) -> &'static str {
    match permission {
        Permission::NotRequested => "Enable Notifications",
        Permission::Pending => "Requesting Permission...",
        Permission::Granted => "Notifications Enabled",
        Permission::Denied => "Notifications Blocked",
        Permission::Unsupported => "Notifications Unsupported",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeTab {
    pub mode: PomodoroMode,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub time_text: String,
    pub status_text: &'static str,
    pub progress: f64,
    pub ring_dash_offset: f64,
    pub mode: PomodoroMode,
    pub color: String,
    pub tabs: Vec<ModeTab>,
    pub start_pause_label: &'static str,
    pub completed_focus_text: String,
    pub cycle_text: String,
    pub notification_label: &'static str,
    pub notification_control_enabled: bool,
}

pub fn present(state: &TimerState, permission: Permission) -> Presentation {
    let progress = state.progress();
    let mode = state.mode();
    Presentation {
        time_text: format_time(state.remaining_seconds()),
        status_text: status_text(state),
        progress,
        ring_dash_offset: ring_length() * progress,
        mode,
        color: mode.color_hex(),
        tabs: PomodoroMode::ALL
            .iter()
            .map(|m| ModeTab {
                mode: *m,
                label: m.label(),
                active: *m == mode,
            })
            .collect(),
        start_pause_label: if state.is_running() { "Pause" } else { "Start" },
        completed_focus_text: state.completed_focus_count().to_string(),
        cycle_text: state.cycle_count().to_string(),
        notification_label: notification_label(permission),
        notification_control_enabled: !matches!(
            permission,
            Permission::Unsupported | Permission::Pending
        ),
    }
}
