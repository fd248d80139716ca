/*
 * Responsibility
 * - Storage-independent user types (User / NewUser)
 * - Field rules shared by the service (name / email shape)
 */
use chrono::{DateTime, Utc};

/// Role assigned to every user created through the public API.
pub const DEFAULT_ROLE: &str = "customer";

/// Role required by administrative routes.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for `create`. `id`, `role` and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Full replacement of the client-editable fields of an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl User {
    /// Overwrite name / email / avatar; `id`, `role` and `created_at` stay.
    pub fn apply(self, changes: UserChanges) -> Self {
        Self {
            name: changes.name,
            email: changes.email,
            avatar: changes.avatar,
            ..self
        }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Shape check only: `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
