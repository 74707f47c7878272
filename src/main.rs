use clap::Parser;

use tomato_timer::cli::{Cli, Settings};
use tomato_timer::pomodoro::{TimerState, render};
use tomato_timer::{Result, effects, logging, tui};

#[tokio::main]
async fn main() -> Result<()> {
    let settings: Settings = Cli::parse().into();

    if settings.print_state {
        let notifier = effects::build_notifier(&settings);
        let view = render::present(&TimerState::new(), notifier.permission());
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let _log_guard = logging::init(&settings.log_dir)?;
    tui::run(&settings).await
}
