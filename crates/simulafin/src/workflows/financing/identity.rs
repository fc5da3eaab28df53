use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header carrying the authenticated user id, set by the upstream auth provider.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's e-mail.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// The signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
}

/// Explicit caller context for privileged operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub email: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user: &AuthenticatedUser) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            is_admin: false,
        }
    }

    pub fn admin(user: &AuthenticatedUser) -> Self {
        Self {
            is_admin: true,
            ..Self::user(user)
        }
    }
}

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Resolve the current user from request headers; blank or missing values mean anonymous.
pub fn current_user(headers: &HeaderMap) -> Option<AuthenticatedUser> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    Some(AuthenticatedUser {
        id: UserId(read(USER_ID_HEADER)?),
        email: read(USER_EMAIL_HEADER)?,
    })
}
