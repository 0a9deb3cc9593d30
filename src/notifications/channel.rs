//! Latest-toast channel

use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use super::models::{Toast, ToastType};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Holds the toast to display and lets any number of observers watch it.
///
/// There is no queue: each new toast replaces the previous one, shown or not.
pub struct NotificationChannel {
    sender: watch::Sender<Toast>,
    default_duration: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl NotificationChannel {
    pub fn new(default_duration: Duration) -> Self {
        let (sender, _) = watch::channel(Toast {
            duration: default_duration.as_millis() as u64,
            ..Toast::default()
        });
        NotificationChannel {
            sender,
            default_duration,
        }
    }

    /// Replaces the current toast. `duration` falls back to the channel
    /// default.
    pub fn notify(
        &self,
        toast_type: ToastType,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) {
        let toast = Toast {
            show: true,
            toast_type,
            message: message.into(),
            duration: duration.unwrap_or(self.default_duration).as_millis() as u64,
        };
        debug!("Toast {:?}: {}", toast.toast_type, toast.message);
        self.sender.send_replace(toast);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(ToastType::Success, message, None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(ToastType::Error, message, None);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(ToastType::Warning, message, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(ToastType::Info, message, None);
    }

    /// Hides the current toast, keeping its content.
    pub fn dismiss(&self) {
        self.sender.send_modify(|toast| toast.show = false);
    }

    pub fn current(&self) -> Toast {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Toast> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_toast_is_hidden() {
        let channel = NotificationChannel::default();
        let toast = channel.current();
        assert!(!toast.show);
        assert_eq!(toast.duration, 5000);
    }

    #[test]
    fn test_severity_helpers_set_type_and_default_duration() {
        let channel = NotificationChannel::new(Duration::from_millis(1500));

        channel.success("Saved");
        assert_eq!(channel.current().toast_type, ToastType::Success);

        channel.error("Broken");
        assert_eq!(channel.current().toast_type, ToastType::Error);

        channel.warning("Careful");
        assert_eq!(channel.current().toast_type, ToastType::Warning);

        channel.info("FYI");
        let toast = channel.current();
        assert_eq!(toast.toast_type, ToastType::Info);
        assert_eq!(toast.message, "FYI");
        assert_eq!(toast.duration, 1500);
        assert!(toast.show);
    }

    #[test]
    fn test_new_toast_overwrites_undismissed_one() {
        let channel = NotificationChannel::default();
        channel.error("first");
        channel.success("second");

        let toast = channel.current();
        assert!(toast.show);
        assert_eq!(toast.toast_type, ToastType::Success);
        assert_eq!(toast.message, "second");
    }

    #[test]
    fn test_dismiss_keeps_content() {
        let channel = NotificationChannel::default();
        channel.notify(ToastType::Warning, "Low stock", Some(Duration::from_secs(2)));
        channel.dismiss();

        let toast = channel.current();
        assert!(!toast.show);
        assert_eq!(toast.toast_type, ToastType::Warning);
        assert_eq!(toast.message, "Low stock");
        assert_eq!(toast.duration, 2000);
    }

    #[tokio::test]
    async fn test_subscribers_see_latest_toast() {
        let channel = NotificationChannel::default();
        let mut receiver = channel.subscribe();

        channel.info("one");
        channel.success("two");

        receiver.changed().await.unwrap();
        let toast = receiver.borrow_and_update().clone();
        assert_eq!(toast.message, "two");
        assert_eq!(toast.toast_type, ToastType::Success);
    }
}
