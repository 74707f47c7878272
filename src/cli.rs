use std::path::PathBuf;

use clap::Parser;

use crate::logging;

const HELP_EPILOG: &str = r#"Keys:
  space/s  start or pause     r  reset
  1 2 3    focus/short/long   tab  next mode
  n        enable notifications
  q/esc    quit

Session lengths are fixed: focus 25m, short break 5m, long break 15m.
Log level is read from $TOMATO_LOG (e.g. TOMATO_LOG=debug).
"#;

#[derive(Debug, Parser)]
#[command(
    name = "tomato_timer",
    version,
    about = "Pomodoro countdown timer for the terminal",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Do not play the alarm sound when a session ends
    #[arg(long, conflicts_with = "sound")]
    pub no_sound: bool,

    /// Sound clip to play when a session ends
    #[arg(long, value_name = "PATH")]
    pub sound: Option<PathBuf>,

    /// Disable desktop notifications entirely
    #[arg(long, conflicts_with = "notify")]
    pub no_notify: bool,

    /// Request notification permission at startup
    #[arg(long)]
    pub notify: bool,

    /// Directory for log files (default: ~/.local/share/tomato_timer/logs)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print the initial display state as JSON and exit
    #[arg(long)]
    pub print_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSetting {
    Off,
    Default,
    Clip(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifySetting {
    Disabled,
    OnDemand,
    AtStartup,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub sound: SoundSetting,
    pub notify: NotifySetting,
    pub log_dir: PathBuf,
    pub print_state: bool,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        let sound = match (cli.no_sound, cli.sound) {
            (true, _) => SoundSetting::Off,
            (false, Some(path)) => SoundSetting::Clip(path),
            (false, None) => SoundSetting::Default,
        };
        let notify = if cli.no_notify {
            NotifySetting::Disabled
        } else if cli.notify {
            NotifySetting::AtStartup
        } else {
            NotifySetting::OnDemand
        };
        Self {
            sound,
            notify,
            log_dir: cli.log_dir.unwrap_or_else(logging::default_log_directory),
            print_state: cli.print_state,
        }
    }
}
