pub mod cli;
pub mod effects;
pub mod error;
pub mod logging;
pub mod pomodoro;
pub mod ticker;
pub mod tui;

pub use error::{Error, Result};
