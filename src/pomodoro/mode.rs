use serde::Serialize;

pub const TICK_INTERVAL_MS: u64 = 1000; // One countdown step per second
pub const FOCUS_SECONDS: u32 = 25 * 60;
pub const SHORT_BREAK_SECONDS: u32 = 5 * 60;
pub const LONG_BREAK_SECONDS: u32 = 15 * 60;
pub const CYCLES_PER_LONG_BREAK: u32 = 4; // Every 4th completed focus earns a long break

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub const ALL: [PomodoroMode; 3] = [
        PomodoroMode::Focus,
        PomodoroMode::ShortBreak,
        PomodoroMode::LongBreak,
    ];

    /// Full length of a session in this mode, in seconds.
    pub fn duration(&self) -> u32 {
        match self {
            PomodoroMode::Focus => FOCUS_SECONDS,
            PomodoroMode::ShortBreak => SHORT_BREAK_SECONDS,
            PomodoroMode::LongBreak => LONG_BREAK_SECONDS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroMode::Focus => "FOCUS",
            PomodoroMode::ShortBreak => "SHORT BREAK",
            PomodoroMode::LongBreak => "LONG BREAK",
        }
    }

    /// Label used on the mode selection controls.
    pub fn label(&self) -> &'static str {
        match self {
            PomodoroMode::Focus => "Focus",
            PomodoroMode::ShortBreak => "Short Break",
            PomodoroMode::LongBreak => "Long Break",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PomodoroMode::Focus => "🍅",
            PomodoroMode::ShortBreak => "☕",
            PomodoroMode::LongBreak => "🌴",
        }
    }

    /// Accent color as an `(r, g, b)` triple.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            PomodoroMode::Focus => (0xfb, 0x71, 0x85),
            PomodoroMode::ShortBreak => (0x34, 0xd3, 0x99),
            PomodoroMode::LongBreak => (0xf5, 0x9e, 0x0b),
        }
    }

    pub fn color_hex(&self) -> String {
        let (r, g, b) = self.color();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, PomodoroMode::Focus)
    }

    /// Next mode in display order, wrapping around.
    pub fn next(&self) -> PomodoroMode {
        match self {
            PomodoroMode::Focus => PomodoroMode::ShortBreak,
            PomodoroMode::ShortBreak => PomodoroMode::LongBreak,
            PomodoroMode::LongBreak => PomodoroMode::Focus,
        }
    }
}
