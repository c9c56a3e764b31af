use serde::{Deserialize, Serialize};

use crate::users::{validation::UserDraft, Role, SocialLinks, User};

/// Request body for user registration. Every field is optional at the wire
/// level so that missing values surface as validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub social_links: Option<SocialLinks>,
}

impl RegisterRequest {
    pub fn into_draft(self, username: String) -> UserDraft {
        UserDraft {
            username: Some(username),
            email: self.email,
            password: self.password,
            role: self.role,
            first_name: self.first_name,
            last_name: self.last_name,
            social_links: self.social_links,
        }
    }
}

/// Response returned after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}
