//! Toast notifications for the front end

mod channel;
mod models;

pub use channel::{NotificationChannel, DEFAULT_TOAST_DURATION};
pub use models::{Toast, ToastType};
