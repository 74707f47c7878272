pub mod mode;
pub mod render;
pub mod state;
pub mod widget;

pub use mode::PomodoroMode;
pub use render::{Presentation, format_time};
pub use state::{Completion, TimerState};
pub use widget::PomodoroWidget;
