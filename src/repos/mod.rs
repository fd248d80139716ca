pub mod error;
pub mod memory_user_repo;
pub mod user_repo;

pub use error::RepoError;
pub use memory_user_repo::InMemoryUserRepo;
pub use user_repo::{PgUserRepo, UserRepository};
