//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::pomodoro::PomodoroMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleStartPause,
    Reset,
    SwitchMode(PomodoroMode),
    NextMode,
    RequestNotifications,
    Quit,
}

pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char(' ') | KeyCode::Char('s') => Some(Action::ToggleStartPause),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('1') => Some(Action::SwitchMode(PomodoroMode::Focus)),
        KeyCode::Char('2') => Some(Action::SwitchMode(PomodoroMode::ShortBreak)),
        KeyCode::Char('3') => Some(Action::SwitchMode(PomodoroMode::LongBreak)),
        KeyCode::Tab => Some(Action::NextMode),
        KeyCode::Char('n') => Some(Action::RequestNotifications),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}
