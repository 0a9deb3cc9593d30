use rand::Rng;
use rand_distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// The one account allowed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        AdminCredentials {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl AdminCredentials {
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// The logged-in user, persisted as JSON under the user data key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: usize,
    pub username: String,
    pub role: String,
    pub name: String,
}

impl SessionUser {
    pub fn administrator(username: &str) -> Self {
        SessionUser {
            id: 1,
            username: username.to_string(),
            role: "administrator".to_string(),
            name: "Administrator".to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn generate() -> SessionToken {
        let rng = rand::rng();
        let random_string: String = rng
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        SessionToken(random_string)
    }
}

/// Result of a login attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credentials() {
        let credentials = AdminCredentials::default();
        assert!(credentials.matches("admin", "admin123"));
        assert!(!credentials.matches("admin", "admin"));
        assert!(!credentials.matches("Admin", "admin123"));
    }

    #[test]
    fn test_generated_tokens_differ() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_eq!(a.0.len(), 32);
        assert!(a.0.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_user_round_trips_through_json() {
        let user = SessionUser::administrator("admin");
        let json = serde_json::to_string(&user).unwrap();
        let parsed: SessionUser = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, user);
        assert_eq!(parsed.role, "administrator");
    }
}
