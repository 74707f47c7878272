use notify_rust::Notification;
use serde::Serialize;
use tracing::{debug, info, warn};

const APP_NAME: &str = "Tomato Timer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    NotRequested,
    /// A request is in flight off the event loop.
    Pending,
    Granted,
    Denied,
    /// The host has no notification capability; the control is disabled.
    Unsupported,
}

/// Blocking permission request, run on the blocking pool by the host.
pub type PermissionRequest = Box<dyn FnOnce() -> Permission + Send + 'static>;

/// Desktop notification collaborator.
pub trait Notifier {
    fn permission(&self) -> Permission;

    fn set_permission(&mut self, permission: Permission);

    /// Build the user-initiated request. It may block, so it must not run
    /// on the event loop.
    fn permission_request(&self) -> PermissionRequest;

    /// Fire-and-forget delivery. Callers check [`Notifier::permission`] first.
    fn notify(&self, title: &str, body: &str);
}

#[derive(Debug)]
pub struct DesktopNotifier {
    permission: Permission,
}

impl DesktopNotifier {
    /// Probe the host for a notification service.
    pub fn detect() -> Self {
        let permission = if notification_service_available() {
            Permission::NotRequested
        } else {
            Permission::Unsupported
        };
        info!(?permission, "notification capability detected");
        Self { permission }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn notification_service_available() -> bool {
    match notify_rust::get_server_information() {
        Ok(server) => {
            debug!(name = %server.name, vendor = %server.vendor, "notification server found");
            true
        }
        Err(e) => {
            warn!(error = %e, "no notification server on the session bus");
            false
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn notification_service_available() -> bool {
    debug!("no server probe on this platform; assuming notifications are available");
    true
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn set_permission(&mut self, permission: Permission) {
        if self.permission != Permission::Unsupported {
            info!(?permission, "notification permission updated");
            self.permission = permission;
        }
    }

    fn permission_request(&self) -> PermissionRequest {
        Box::new(|| {
            let result = Notification::new()
                .appname(APP_NAME)
                .summary("Notifications enabled")
                .body("You will be notified when a session ends.")
                .show();
            match result {
                Ok(_) => Permission::Granted,
                Err(e) => {
                    warn!(error = %e, "notification request failed");
                    Permission::Denied
                }
            }
        })
    }

    fn notify(&self, title: &str, body: &str) {
        let title = title.to_string();
        let body = body.to_string();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Notification::new()
                .appname(APP_NAME)
                .summary(&title)
                .body(&body)
                .show()
            {
                warn!(error = %e, "failed to send notification");
            }
        });
    }
}

/// Used with `--no-notify`: reports the capability as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn permission(&self) -> Permission {
        Permission::Unsupported
    }

    fn set_permission(&mut self, _permission: Permission) {}

    fn permission_request(&self) -> PermissionRequest {
        Box::new(|| Permission::Unsupported)
    }

    fn notify(&self, _title: &str, _body: &str) {}
}
