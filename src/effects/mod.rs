pub mod alarm;
pub mod notify;

use tokio::sync::mpsc;

use crate::cli::{NotifySetting, Settings, SoundSetting};
use alarm::{AlarmPlayer, SilentAlarm, SoundCommand};
use notify::{DesktopNotifier, DisabledNotifier, Notifier, Permission};

/// Results of side effects that must be applied on the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    /// No audio player could play the clip; ring the terminal bell.
    RingBell,
    PermissionResolved(Permission),
}

pub type EffectSender = mpsc::UnboundedSender<EffectEvent>;
pub type EffectReceiver = mpsc::UnboundedReceiver<EffectEvent>;

pub fn create_effect_channel() -> (EffectSender, EffectReceiver) {
    mpsc::unbounded_channel()
}

pub fn build_alarm(settings: &Settings, effects: EffectSender) -> Box<dyn AlarmPlayer> {
    match &settings.sound {
        SoundSetting::Off => Box::new(SilentAlarm),
        SoundSetting::Default => Box::new(SoundCommand::new(None, effects)),
        SoundSetting::Clip(path) => Box::new(SoundCommand::new(Some(path.clone()), effects)),
    }
}

pub fn build_notifier(settings: &Settings) -> Box<dyn Notifier> {
    match settings.notify {
        NotifySetting::Disabled => Box::new(DisabledNotifier),
        NotifySetting::OnDemand | NotifySetting::AtStartup => Box::new(DesktopNotifier::detect()),
    }
}
