/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone-cheap: everything behind Arc
 */
use std::sync::Arc;

use crate::repos::UserRepository;
use crate::services::{UserService, auth::TokenVerifier};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub auth: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(repo: Arc<dyn UserRepository>, auth: Arc<TokenVerifier>) -> Self {
        Self {
            users: Arc::new(UserService::new(repo)),
            auth,
        }
    }
}
