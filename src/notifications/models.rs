//! Toast data models

use serde::{Deserialize, Serialize};

/// Toast severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastType {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// The toast currently on screen, or the last one if `show` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub show: bool,
    #[serde(rename = "type")]
    pub toast_type: ToastType,
    pub message: String,
    /// How long the toast stays up, in milliseconds.
    pub duration: u64,
}

impl Default for Toast {
    fn default() -> Self {
        Toast {
            show: false,
            toast_type: ToastType::Info,
            message: String::new(),
            duration: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_type_serialization() {
        let serialized = serde_json::to_string(&ToastType::Warning).unwrap();
        assert_eq!(serialized, "\"warning\"");

        let deserialized: ToastType = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(deserialized, ToastType::Success);
    }

    #[test]
    fn test_toast_serialization() {
        let toast = Toast {
            show: true,
            toast_type: ToastType::Error,
            message: "Brand not found".to_string(),
            duration: 3000,
        };

        let value = serde_json::to_value(&toast).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "show": true,
                "type": "error",
                "message": "Brand not found",
                "duration": 3000
            })
        );
    }

    #[test]
    fn test_default_toast_is_hidden_info() {
        let toast = Toast::default();
        assert!(!toast.show);
        assert_eq!(toast.toast_type, ToastType::Info);
        assert!(toast.message.is_empty());
        assert_eq!(toast.duration, 5000);
    }
}
