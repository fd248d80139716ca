/*
 * Responsibility
 * - Users request/response DTOs (wire names: `username`, `email`, `avatar`)
 * - Success envelope (`data` / `message`)
 * - Field rules are the service's job; DTOs only shape JSON
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NewUser, User, UserChanges};

/// `{"data": ...}` or `{"message": ...}`, never both empty keys on the wire.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.username,
            email: req.email,
            avatar: req.avatar,
        }
    }
}

/// Full-field update: omitted `avatar` clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.username,
            email: req.email,
            avatar: req.avatar,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.name,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_omits_empty_side() {
        let data = serde_json::to_value(ApiResponse::data(CreatedUser { id: "u-1".into() })).unwrap();
        assert_eq!(data, json!({ "data": { "id": "u-1" } }));

        let message = serde_json::to_value(ApiResponse::message("user deleted successfully")).unwrap();
        assert_eq!(message, json!({ "message": "user deleted successfully" }));
    }

    #[test]
    fn request_uses_username_on_the_wire() {
        let req: CreateUserRequest =
            serde_json::from_value(json!({ "username": "Ann", "email": "ann@x.com" })).unwrap();
        let user = NewUser::from(req);
        assert_eq!(user.name, "Ann");
        assert_eq!(user.avatar, None);
    }

    #[test]
    fn role_cannot_be_smuggled_in() {
        let req: CreateUserRequest = serde_json::from_value(
            json!({ "username": "Ann", "email": "ann@x.com", "role": "admin" }),
        )
        .unwrap();
        assert_eq!(NewUser::from(req).name, "Ann");
    }
}
