//! In-process `UserRepository` (`DATABASE_URL=memory://`).
//!
//! Same contract as `PgUserRepo`: duplicate email -> `Conflict`, missing id ->
//! `NotFound`. The lock is only held for the map operation itself.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{NewUser, User, user::DEFAULT_ROLE};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::UserRepository;

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<String, User>, email: &str, except_id: Option<&str>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(u.id.as_str()) != except_id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn create(&self, user: &NewUser) -> RepoResult<String> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(RepoError::Conflict);
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        users.insert(
            id.clone(),
            User {
                id: id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                avatar: user.avatar.clone(),
                role: DEFAULT_ROLE.to_string(),
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<User> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, Some(&user.id)) {
            return Err(RepoError::Conflict);
        }

        let stored = users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.avatar = user.avatar.clone();
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}
