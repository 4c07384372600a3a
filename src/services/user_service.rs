use crate::auth::Identity;
use crate::models::{NewUser, Studio, User, UserProfile, UserSearchResult};
use crate::repositories::{user_repository::UserRepository, RepositoryError};
use axum::http::StatusCode;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("No authenticated identity")]
    Unauthenticated,
    #[error("User could not be created")]
    NotCreated,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("No authenticated identity")]
    Unauthenticated,
    #[error("No users matched")]
    NoMatches,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Outcome of [`UserService::ensure_user`].
#[derive(Debug, Clone)]
pub enum EnsuredUser {
    Existing(UserProfile),
    Created(UserProfile),
}

impl EnsuredUser {
    pub fn status(&self) -> StatusCode {
        match self {
            EnsuredUser::Existing(_) => StatusCode::OK,
            EnsuredUser::Created(_) => StatusCode::CREATED,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        match self {
            EnsuredUser::Existing(profile) | EnsuredUser::Created(profile) => profile,
        }
    }

    pub fn into_profile(self) -> UserProfile {
        match self {
            EnsuredUser::Existing(profile) | EnsuredUser::Created(profile) => profile,
        }
    }
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Returns the user for this identity, minting it with its default bundle on first sight.
    ///
    /// Safe to call on every authenticated request. Two concurrent first calls for the
    /// same identity race on the `external_id` unique constraint; the loser re-reads
    /// the winner's row.
    pub async fn ensure_user(
        &self,
        identity: Option<&Identity>,
    ) -> Result<EnsuredUser, OnboardingError> {
        let identity = identity.ok_or(OnboardingError::Unauthenticated)?;

        if let Some(profile) = self.repository.find_by_external_id(&identity.id).await? {
            return Ok(EnsuredUser::Existing(profile));
        }

        match self
            .repository
            .create_with_defaults(NewUser::from(identity))
            .await
        {
            Ok(profile) => {
                tracing::info!(
                    "Created user {} for identity {}",
                    profile.user.id,
                    identity.id
                );
                Ok(EnsuredUser::Created(profile))
            }
            Err(RepositoryError::AlreadyExists) => {
                tracing::debug!("Identity {} was created concurrently", identity.id);
                self.repository
                    .find_by_external_id(&identity.id)
                    .await?
                    .map(EnsuredUser::Existing)
                    .ok_or(OnboardingError::NotCreated)
            }
            Err(RepositoryError::NotFound) => Err(OnboardingError::NotCreated),
            Err(e) => Err(OnboardingError::RepositoryError(e)),
        }
    }

    pub async fn search_users(
        &self,
        identity: Option<&Identity>,
        query: &str,
    ) -> Result<Vec<UserSearchResult>, SearchError> {
        let identity = identity.ok_or(SearchError::Unauthenticated)?;

        let users = self.repository.search(query, &identity.id).await?;
        if users.is_empty() {
            return Err(SearchError::NoMatches);
        }

        Ok(users)
    }

    pub async fn find_studio(&self, user_id: &str) -> Result<Option<Studio>, RepositoryError> {
        self.repository.find_studio(user_id).await
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, RepositoryError> {
        self.repository.list_users(limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubscriptionPlan, SubscriptionSummary};
    use crate::repositories::user_repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn identity() -> Identity {
        Identity {
            id: "user_alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: Some("alice".to_string()),
            last_name: None,
            image_url: None,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            user: User {
                id: "u-1".to_string(),
                external_id: "user_alice".to_string(),
                email: "alice@example.com".to_string(),
                first_name: Some("alice".to_string()),
                last_name: None,
                image: None,
                created_at: Utc::now(),
            },
            workspaces: vec![],
            subscription: Some(SubscriptionSummary {
                plan: SubscriptionPlan::Free,
            }),
        }
    }

    #[tokio::test]
    async fn test_ensure_user_without_identity() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let result = service.ensure_user(None).await;
        assert!(matches!(result, Err(OnboardingError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_ensure_user_returns_existing() {
        let mut mock_repo = MockUserRepository::new();
        let existing = profile();
        mock_repo
            .expect_find_by_external_id()
            .with(eq("user_alice"))
            .times(1)
            .returning(move |_| {
                let profile = existing.clone();
                Box::pin(async move { Ok(Some(profile)) })
            });
        mock_repo.expect_create_with_defaults().never();

        let service = UserService::new(Arc::new(mock_repo));
        let result = service
            .ensure_user(Some(&identity()))
            .await
            .expect("Expected Ok result");

        assert!(matches!(result, EnsuredUser::Existing(_)));
        assert_eq!(result.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ensure_user_recovers_from_lost_race() {
        let mut mock_repo = MockUserRepository::new();
        let mut seq = mockall::Sequence::new();
        let winner = profile();

        mock_repo
            .expect_find_by_external_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Box::pin(async { Ok(None) }));
        mock_repo
            .expect_create_with_defaults()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Box::pin(async { Err(RepositoryError::AlreadyExists) }));
        mock_repo
            .expect_find_by_external_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| {
                let profile = winner.clone();
                Box::pin(async move { Ok(Some(profile)) })
            });

        let service = UserService::new(Arc::new(mock_repo));
        let result = service
            .ensure_user(Some(&identity()))
            .await
            .expect("Expected Ok result");

        assert!(matches!(result, EnsuredUser::Existing(_)));
        assert_eq!(result.profile().user.id, "u-1");
    }

    #[tokio::test]
    async fn test_ensure_user_no_row_created() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_external_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        mock_repo
            .expect_create_with_defaults()
            .returning(|_| Box::pin(async { Err(RepositoryError::NotFound) }));

        let service = UserService::new(Arc::new(mock_repo));
        let result = service.ensure_user(Some(&identity())).await;

        assert!(matches!(result, Err(OnboardingError::NotCreated)));
    }

    #[tokio::test]
    async fn test_ensure_user_database_fault() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_external_id().returning(|_| {
            Box::pin(async { Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)) })
        });

        let service = UserService::new(Arc::new(mock_repo));
        let result = service.ensure_user(Some(&identity())).await;

        assert!(matches!(result, Err(OnboardingError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn test_search_users_excludes_caller_identity() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_search()
            .with(eq("car"), eq("user_alice"))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let service = UserService::new(Arc::new(mock_repo));
        let result = service.search_users(Some(&identity()), "car").await;

        assert!(matches!(result, Err(SearchError::NoMatches)));
    }

    #[tokio::test]
    async fn test_search_users_without_identity() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let result = service.search_users(None, "car").await;
        assert!(matches!(result, Err(SearchError::Unauthenticated)));
    }
}
