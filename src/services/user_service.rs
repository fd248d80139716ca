/*
 * Responsibility
 * - Business rules in front of UserRepository (input checks, existence checks)
 * - RepoError -> AppError (the only place storage failures are translated)
 *
 * Notes
 * - Every check runs before the first write; a rejected call leaves storage untouched
 * - No retries
 */
use std::sync::Arc;

use crate::api::v1::extractors::Identity;
use crate::domain::user::{NewUser, User, UserChanges, is_blank, is_well_formed_email};
use crate::error::AppError;
use crate::repos::{RepoError, UserRepository};

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

fn map_repo_error(op: &'static str, err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::UserNotFound,
        RepoError::Conflict => AppError::UserExists,
        RepoError::Db(e) => {
            tracing::error!(op, error = %e, "user storage failure");
            AppError::Internal
        }
    }
}

fn check_fields(name: &str, email: &str) -> Result<(), AppError> {
    if is_blank(name) {
        return Err(AppError::InvalidName);
    }
    if !is_well_formed_email(email) {
        return Err(AppError::InvalidEmail);
    }
    Ok(())
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, AppError> {
        if is_blank(id) {
            return Err(AppError::InvalidId);
        }
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| map_repo_error("get_by_id", e))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        if is_blank(email) {
            return Err(AppError::InvalidEmail);
        }
        self.repo
            .get_by_email(email)
            .await
            .map_err(|e| map_repo_error("get_by_email", e))
    }

    /// The caller's own record.
    pub async fn get_me(&self, identity: &Identity) -> Result<User, AppError> {
        if is_blank(identity.subject()) {
            return Err(AppError::InvalidId);
        }
        self.get_by_id(identity.subject()).await
    }

    pub async fn create(&self, user: NewUser) -> Result<String, AppError> {
        check_fields(&user.name, &user.email)?;

        let id = self
            .repo
            .create(&user)
            .await
            .map_err(|e| map_repo_error("create", e))?;

        tracing::info!(user_id = %id, "user created");
        Ok(id)
    }

    /// Full overwrite of name / email / avatar for an existing user.
    pub async fn update(&self, id: &str, changes: UserChanges) -> Result<(), AppError> {
        if is_blank(id) {
            return Err(AppError::InvalidId);
        }
        check_fields(&changes.name, &changes.email)?;

        let current = self.get_by_id(id).await?;
        self.repo
            .update(&current.apply(changes))
            .await
            .map_err(|e| map_repo_error("update", e))?;

        tracing::info!(user_id = %id, "user updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if is_blank(id) {
            return Err(AppError::InvalidId);
        }

        self.get_by_id(id).await?;
        self.repo
            .delete(id)
            .await
            .map_err(|e| map_repo_error("delete", e))?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::InMemoryUserRepo;
    use crate::repos::error::RepoResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the in-memory store and counts write calls.
    #[derive(Default)]
    struct CountingRepo {
        inner: InMemoryUserRepo,
        writes: AtomicUsize,
    }

    impl CountingRepo {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserRepository for CountingRepo {
        async fn create(&self, user: &NewUser) -> RepoResult<String> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.create(user).await
        }

        async fn get_by_id(&self, id: &str) -> RepoResult<User> {
            self.inner.get_by_id(id).await
        }

        async fn get_by_email(&self, email: &str) -> RepoResult<User> {
            self.inner.get_by_email(email).await
        }

        async fn update(&self, user: &User) -> RepoResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.update(user).await
        }

        async fn delete(&self, id: &str) -> RepoResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await
        }
    }

    /// Every call fails the way a dropped connection would.
    struct BrokenRepo;

    #[async_trait]
    impl UserRepository for BrokenRepo {
        async fn create(&self, _: &NewUser) -> RepoResult<String> {
            Err(RepoError::Db(sqlx::Error::PoolTimedOut))
        }
        async fn get_by_id(&self, _: &str) -> RepoResult<User> {
            Err(RepoError::Db(sqlx::Error::PoolTimedOut))
        }
        async fn get_by_email(&self, _: &str) -> RepoResult<User> {
            Err(RepoError::Db(sqlx::Error::PoolTimedOut))
        }
        async fn update(&self, _: &User) -> RepoResult<()> {
            Err(RepoError::Db(sqlx::Error::PoolTimedOut))
        }
        async fn delete(&self, _: &str) -> RepoResult<()> {
            Err(RepoError::Db(sqlx::Error::PoolTimedOut))
        }
    }

    fn service() -> (UserService, Arc<CountingRepo>) {
        let repo = Arc::new(CountingRepo::default());
        (UserService::new(repo.clone()), repo)
    }

    fn ann() -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: "ann@x.com".into(),
            avatar: None,
        }
    }

    fn changes(name: &str, email: &str) -> UserChanges {
        UserChanges {
            name: name.into(),
            email: email.into(),
            avatar: Some("https://img.example/ann.png".into()),
        }
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let (svc, _) = service();
        let id = svc.create(ann()).await.unwrap();

        let user = svc.get_by_id(&id).await.unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.role, "customer");
        assert_eq!(svc.get_by_email("ann@x.com").await.unwrap().id, id);
    }

    #[tokio::test]
    async fn create_rejects_bad_input_without_writing() {
        let (svc, repo) = service();

        let blank_name = NewUser {
            name: "  ".into(),
            ..ann()
        };
        assert_eq!(svc.create(blank_name).await, Err(AppError::InvalidName));

        let bad_email = NewUser {
            email: "not-an-email".into(),
            ..ann()
        };
        assert_eq!(svc.create(bad_email).await, Err(AppError::InvalidEmail));

        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_user_exists() {
        let (svc, _) = service();
        svc.create(ann()).await.unwrap();

        let again = NewUser {
            name: "Another Ann".into(),
            ..ann()
        };
        assert_eq!(svc.create(again).await, Err(AppError::UserExists));
    }

    #[tokio::test]
    async fn blank_lookups_are_invalid() {
        let (svc, _) = service();
        assert_eq!(svc.get_by_id(" ").await, Err(AppError::InvalidId));
        assert_eq!(svc.get_by_email("").await, Err(AppError::InvalidEmail));
        assert_eq!(
            svc.get_me(&Identity::new("", "customer")).await,
            Err(AppError::InvalidId)
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (svc, _) = service();
        assert_eq!(svc.get_by_id("nope").await, Err(AppError::UserNotFound));
        assert_eq!(
            svc.get_by_email("ghost@x.com").await,
            Err(AppError::UserNotFound)
        );
    }

    #[tokio::test]
    async fn get_me_reads_the_subject() {
        let (svc, _) = service();
        let id = svc.create(ann()).await.unwrap();

        let me = svc
            .get_me(&Identity::new(id.clone(), "customer"))
            .await
            .unwrap();
        assert_eq!(me.id, id);
    }

    #[tokio::test]
    async fn update_overwrites_editable_fields() {
        let (svc, _) = service();
        let id = svc.create(ann()).await.unwrap();

        svc.update(&id, changes("Ann B", "annb@x.com")).await.unwrap();

        let user = svc.get_by_id(&id).await.unwrap();
        assert_eq!(user.name, "Ann B");
        assert_eq!(user.email, "annb@x.com");
        assert_eq!(user.avatar.as_deref(), Some("https://img.example/ann.png"));
        assert_eq!(user.role, "customer");
    }

    #[tokio::test]
    async fn update_of_missing_user_never_writes() {
        let (svc, repo) = service();

        assert_eq!(
            svc.update("missing", changes("Ann", "ann@x.com")).await,
            Err(AppError::UserNotFound)
        );
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn update_validates_before_lookup() {
        let (svc, repo) = service();

        assert_eq!(
            svc.update("", changes("Ann", "ann@x.com")).await,
            Err(AppError::InvalidId)
        );
        assert_eq!(
            svc.update("missing", changes("", "ann@x.com")).await,
            Err(AppError::InvalidName)
        );
        assert_eq!(
            svc.update("missing", changes("Ann", "ann")).await,
            Err(AppError::InvalidEmail)
        );
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn update_to_taken_email_is_user_exists() {
        let (svc, _) = service();
        svc.create(ann()).await.unwrap();
        let bob = svc
            .create(NewUser {
                name: "Bob".into(),
                email: "bob@x.com".into(),
                avatar: None,
            })
            .await
            .unwrap();

        assert_eq!(
            svc.update(&bob, changes("Bob", "ann@x.com")).await,
            Err(AppError::UserExists)
        );
        assert_eq!(svc.get_by_id(&bob).await.unwrap().email, "bob@x.com");
    }

    #[tokio::test]
    async fn delete_twice_is_not_found_without_second_write() {
        let (svc, repo) = service();
        let id = svc.create(ann()).await.unwrap();

        svc.delete(&id).await.unwrap();
        let writes = repo.writes();

        assert_eq!(svc.delete(&id).await, Err(AppError::UserNotFound));
        assert_eq!(repo.writes(), writes);
        assert_eq!(svc.get_by_id(&id).await, Err(AppError::UserNotFound));
    }

    #[tokio::test]
    async fn storage_failures_are_internal() {
        let svc = UserService::new(Arc::new(BrokenRepo));

        assert_eq!(svc.get_by_id("u-1").await, Err(AppError::Internal));
        assert_eq!(svc.create(ann()).await, Err(AppError::Internal));
        assert_eq!(svc.delete("u-1").await, Err(AppError::Internal));
    }
}
