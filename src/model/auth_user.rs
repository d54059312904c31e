use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a successful `accounts:signInWithPassword` or `accounts:signInWithIdp` call.
#[derive(Serialize, Deserialize, Debug)]
pub struct SignInResponse {
    #[serde(rename = "localId")]
    pub local_id: String,

    #[serde(rename = "email")]
    pub email: Option<String>,

    #[serde(rename = "displayName")]
    pub display_name: Option<String>,

    #[serde(rename = "idToken")]
    pub id_token: String,

    #[serde(rename = "refreshToken")]
    pub refresh_token: String,

    /// Lifetime of `id_token` in seconds, sent as a string.
    #[serde(rename = "expiresIn")]
    pub expires_in: String,

    #[serde(rename = "providerId")]
    pub provider_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    #[serde(rename = "error")]
    pub error: ErrorBody,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    #[serde(rename = "code")]
    pub code: u16,

    #[serde(rename = "message")]
    pub message: String,
}

/// The signed-in user as the rest of the application sees it.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub provider_id: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthUser {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Display name, else the local part of the email, else "Student".
    pub fn friendly_name(&self) -> &str {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
            return name;
        }
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("Student")
    }

    pub fn provider_label(&self) -> &str {
        self.provider_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("Email / password")
    }
}
