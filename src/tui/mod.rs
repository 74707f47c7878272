//! Terminal host for the timer widget.

pub mod input;
pub mod view;

use std::io::{self, Write};

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use tracing::{debug, info, warn};

use crate::cli::{NotifySetting, Settings};
use crate::effects::notify::{Permission, PermissionRequest};
use crate::effects::{self, EffectEvent, EffectReceiver, EffectSender, create_effect_channel};
use crate::error::{Error, Result};
use crate::pomodoro::PomodoroWidget;
use crate::ticker::{IntervalTicks, TickReceiver, TickSource, create_tick_channel};
use input::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply a user action to the widget.
pub fn apply<T: TickSource>(
    widget: &mut PomodoroWidget<T>,
    action: Action,
    effects: &EffectSender,
) -> Flow {
    debug!(?action, "user action");
    match action {
        Action::ToggleStartPause => widget.toggle_start_pause(),
        Action::Reset => widget.reset(),
        Action::SwitchMode(mode) => widget.switch_mode(mode),
        Action::NextMode => {
            let next = widget.state().mode().next();
            widget.switch_mode(next);
        }
        Action::RequestNotifications => {
            if let Some(request) = widget.request_notification_permission() {
                spawn_permission_request(request, effects.clone());
            }
        }
        Action::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Run the request on the blocking pool and report the outcome back to
/// the event loop.
fn spawn_permission_request(request: PermissionRequest, effects: EffectSender) {
    tokio::spawn(async move {
        let permission = match tokio::task::spawn_blocking(request).await {
            Ok(permission) => permission,
            Err(e) => {
                warn!(error = %e, "permission request task failed");
                Permission::Denied
            }
        };
        let _ = effects.send(EffectEvent::PermissionResolved(permission));
    });
}

/// Apply a side-effect result on the loop. The bell goes through `out`, the
/// same writer the terminal draws to, between frames.
pub fn handle_effect<T: TickSource, W: Write>(
    widget: &mut PomodoroWidget<T>,
    event: EffectEvent,
    out: &mut W,
) -> io::Result<()> {
    match event {
        EffectEvent::RingBell => {
            out.write_all(b"\x07")?;
            out.flush()
        }
        EffectEvent::PermissionResolved(permission) => {
            widget.resolve_notification_permission(permission);
            Ok(())
        }
    }
}

/// Run the timer in the terminal until the user quits.
pub async fn run(settings: &Settings) -> Result<()> {
    let (tick_tx, mut tick_rx) = create_tick_channel();
    let (effect_tx, mut effect_rx) = create_effect_channel();
    let mut widget = PomodoroWidget::new(
        IntervalTicks::new(tick_tx),
        effects::build_alarm(settings, effect_tx.clone()),
        effects::build_notifier(settings),
    );

    if settings.notify == NotifySetting::AtStartup {
        apply(&mut widget, Action::RequestNotifications, &effect_tx);
    }

    let mut terminal =
        ratatui::try_init().map_err(|e| Error::terminal(format!("failed to initialize: {e}")))?;
    let result = event_loop(
        &mut terminal,
        &mut widget,
        &mut tick_rx,
        &effect_tx,
        &mut effect_rx,
    )
    .await;

    finish(&widget, result, ratatui::try_restore)
}

/// Log the session summary, then restore the terminal. A loop error takes
/// precedence over a restore error.
fn finish<T, F>(widget: &PomodoroWidget<T>, result: Result<()>, restore: F) -> Result<()>
where
    T: TickSource,
    F: FnOnce() -> io::Result<()>,
{
    widget.log_summary();
    let restored =
        restore().map_err(|e| Error::terminal(format!("failed to restore: {e}")));
    if let Err(e) = &restored {
        warn!(error = %e, "terminal restore failed");
    }
    info!("Tomato Timer exiting");
    result.and(restored)
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    widget: &mut PomodoroWidget<IntervalTicks>,
    ticks: &mut TickReceiver,
    effect_tx: &EffectSender,
    effect_rx: &mut EffectReceiver,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        let view = widget.render();
        terminal.draw(|frame| view::draw(frame, &view))?;

        tokio::select! {
            Some(id) = ticks.recv() => {
                widget.on_tick(id);
            }
            Some(effect) = effect_rx.recv() => {
                handle_effect(widget, effect, terminal.backend_mut())?;
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = input::action_for_key(key) {
                        if apply(widget, action, effect_tx) == Flow::Quit {
                            break;
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}
