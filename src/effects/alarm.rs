use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{EffectEvent, EffectSender};

const DEFAULT_SOUNDS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga",
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/System/Library/Sounds/Glass.aiff",
];

/// Plays the end-of-session cue. Playback failure is never reported back.
pub trait AlarmPlayer {
    fn play(&self);
}

/// Plays a sound clip through the first audio player that succeeds on the
/// host. When none does, asks the event loop to ring the terminal bell.
#[derive(Debug, Clone)]
pub struct SoundCommand {
    clip: Option<PathBuf>,
    effects: EffectSender,
}

impl SoundCommand {
    pub fn new(clip: Option<PathBuf>, effects: EffectSender) -> Self {
        let clip = clip.or_else(|| {
            DEFAULT_SOUNDS
                .iter()
                .map(PathBuf::from)
                .find(|p| p.exists())
        });
        debug!(clip = ?clip, "alarm sound selected");
        Self { clip, effects }
    }
}

/// Player invocations to try in order for a clip. `aplay` only decodes WAV.
pub fn candidate_commands(clip: &Path) -> Vec<(&'static str, PathBuf)> {
    let is_wav = clip
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    let mut players = vec!["paplay"];
    if is_wav {
        players.push("aplay");
    }
    players.push("afplay");
    players
        .into_iter()
        .map(|player| (player, clip.to_path_buf()))
        .collect()
}

/// Run candidates until one exits successfully. `run` reports whether the
/// player ran to a successful exit.
fn play_first_available<F>(candidates: &[(&'static str, PathBuf)], mut run: F) -> bool
where
    F: FnMut(&str, &Path) -> io::Result<bool>,
{
    for (player, path) in candidates {
        match run(player, path) {
            Ok(true) => return true,
            Ok(false) => debug!(player, "audio player exited with failure"),
            Err(e) => debug!(player, error = %e, "audio player unavailable"),
        }
    }
    false
}

fn run_player(player: &str, path: &Path) -> io::Result<bool> {
    let status = Command::new(player)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    Ok(status.success())
}

impl AlarmPlayer for SoundCommand {
    fn play(&self) {
        let Some(clip) = self.clip.clone() else {
            let _ = self.effects.send(EffectEvent::RingBell);
            return;
        };

        let effects = self.effects.clone();
        tokio::task::spawn_blocking(move || {
            if !play_first_available(&candidate_commands(&clip), run_player) {
                debug!("no audio player succeeded; falling back to terminal bell");
                let _ = effects.send(EffectEvent::RingBell);
            }
        });
    }
}

/// Used with `--no-sound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlarm;

impl AlarmPlayer for SilentAlarm {
    fn play(&self) {
        debug!("alarm muted");
    }
}
