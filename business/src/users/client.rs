//! The user directory client: cached reads, validated writes.
//!
//! Reads go through the shared [`QueryCache`]:
//!
//! | read | key | provides |
//! |---|---|---|
//! | `list_users(page, limit)` | `users/list?page=..&limit=..` | `Users:LIST` + `Users:{id}` per user |
//! | `get_user(id)` | `users/{id}` | `Users:{id}` |
//!
//! Writes invalidate once the service has accepted them (any 2xx), before the
//! reply body is decoded; a rejected write invalidates nothing:
//!
//! | write | invalidates |
//! |---|---|
//! | `create_user` | `Users:LIST` |
//! | `update_user(id)` | `Users:{id}`, `Users:LIST` |
//! | `delete_user(id)` | `Users:LIST` |
//!
//! Invalidation is lazy; the next read of an affected key refetches.

use std::future::Future;
use std::sync::Arc;

use log::{debug, info};
use userdir_states::{QueryCache, QueryKey, Subscription, Tag};

use super::error::{UserDirectoryError, UserDirectoryResult};
use super::types::{GenericResponse, MutateUserRequest, User, UserId};
use super::{api, envelope};
use super::validation::validate;
use crate::BusinessConfig;
use crate::http::HttpClient;

/// Tag kind for user resources.
pub const USERS: &str = "Users";

pub fn list_key(page: u32, limit: u32) -> QueryKey {
    QueryKey::from(format!("users/list?page={page}&limit={limit}"))
}

pub fn user_key(id: &UserId) -> QueryKey {
    QueryKey::from(format!("users/{id}"))
}

pub fn list_tag() -> Tag {
    Tag::list(USERS)
}

pub fn user_tag(id: &UserId) -> Tag {
    Tag::new(USERS, id.as_str())
}

/// Single point of contact with the user service.
///
/// Cloning is cheap; clones share the HTTP client, cookie store and cache.
#[derive(Debug, Clone)]
pub struct UserDirectoryClient {
    config: Arc<BusinessConfig>,
    http: HttpClient,
    cache: QueryCache,
}

impl UserDirectoryClient {
    pub fn new(config: BusinessConfig) -> UserDirectoryResult<Self> {
        let http = HttpClient::new(config.cookie.clone())?;
        let cache = QueryCache::new(config.retention);
        Ok(Self {
            config: Arc::new(config),
            http,
            cache,
        })
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Fresh cached value, or fetch it once even with concurrent callers.
    async fn cached<T, F, Fut>(&self, key: QueryKey, fetch: F) -> UserDirectoryResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = UserDirectoryResult<(T, Vec<Tag>)>>,
    {
        if let Some(value) = self.cache.get::<T>(&key)? {
            return Ok(value);
        }

        let gate = self.cache.fetch_gate(&key);
        let _guard = gate.lock().await;

        // Someone else may have fetched it while we waited.
        if let Some(value) = self.cache.get::<T>(&key)? {
            return Ok(value);
        }

        let ticket = self.cache.begin_fetch();
        let (value, tags) = fetch().await?;
        self.cache.insert(key, value.clone(), tags, ticket);
        Ok(value)
    }

    fn check_id(id: &UserId) -> UserDirectoryResult<()> {
        if id.is_empty() {
            return Err(UserDirectoryError::InvalidArgument(
                "user id must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// One page of users, in the order the service returns them.
    pub async fn list_users(&self, page: u32, limit: u32) -> UserDirectoryResult<Vec<User>> {
        if page < 1 || limit < 1 {
            return Err(UserDirectoryError::InvalidArgument(format!(
                "page and limit must be at least 1 (page={page}, limit={limit})"
            )));
        }

        self.cached(list_key(page, limit), || async move {
            let users = api::list_users(&self.http, self.config.api_url(), page, limit).await?;
            let tags = std::iter::once(list_tag())
                .chain(users.iter().map(|user| user_tag(&user.id)))
                .collect();
            debug!("Fetched {} users (page={page}, limit={limit})", users.len());
            Ok((users, tags))
        })
        .await
    }

    pub async fn get_user(&self, id: UserId) -> UserDirectoryResult<User> {
        Self::check_id(&id)?;

        self.cached(user_key(&id), || async move {
            let user = api::get_user(&self.http, self.config.api_url(), &id).await?;
            Ok((user, vec![user_tag(&id)]))
        })
        .await
    }

    /// Create a user. An accepted create invalidates the list even when its
    /// reply cannot be decoded; the `Decode` error is still returned.
    pub async fn create_user(&self, payload: &MutateUserRequest) -> UserDirectoryResult<User> {
        let payload = validate(payload)?;

        let response = api::create_user(&self.http, self.config.api_url(), &payload).await?;
        self.cache.invalidate(&[list_tag()]);

        let user = envelope::user_from(&response)?;
        info!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: UserId,
        payload: &MutateUserRequest,
    ) -> UserDirectoryResult<User> {
        Self::check_id(&id)?;
        let payload = validate(payload)?;

        let response =
            api::update_user(&self.http, self.config.api_url(), &id, &payload).await?;
        self.cache.invalidate(&[user_tag(&id), list_tag()]);

        let user = envelope::user_from(&response)?;
        info!("Updated user {id}");
        Ok(user)
    }

    /// Delete a user. Callers are expected to have confirmed with the operator.
    ///
    /// The user's own entry is left to idle out; only the list is invalidated.
    pub async fn delete_user(&self, id: UserId) -> UserDirectoryResult<GenericResponse> {
        Self::check_id(&id)?;

        let response = api::delete_user(&self.http, self.config.api_url(), &id).await?;
        self.cache.invalidate(&[list_tag()]);

        let response = envelope::generic_from(&response);
        info!("Deleted user {id}: {}", response.message);
        Ok(response)
    }

    /// Force the next list read to refetch.
    pub fn invalidate_list(&self) -> usize {
        self.cache.invalidate(&[list_tag()])
    }

    /// Force the next read of `id` (and of lists containing it) to refetch.
    pub fn invalidate_user(&self, id: &UserId) -> usize {
        self.cache.invalidate(&[user_tag(id)])
    }

    pub fn subscribe_list(&self, page: u32, limit: u32) -> Subscription {
        self.cache.subscribe(list_key(page, limit))
    }

    pub fn subscribe_user(&self, id: &UserId) -> Subscription {
        self.cache.subscribe(user_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_and_tags() {
        assert_eq!(list_key(2, 10).as_str(), "users/list?page=2&limit=10");
        assert_eq!(user_key(&UserId::new("7")).as_str(), "users/7");
        assert_eq!(list_tag().to_string(), "Users:LIST");
        assert_eq!(user_tag(&UserId::new("7")).to_string(), "Users:7");
    }

    fn client() -> UserDirectoryClient {
        // Port 9 (discard) on localhost: nothing should ever be sent there in
        // these tests, every call fails before dispatch.
        UserDirectoryClient::new(BusinessConfig::new("http://127.0.0.1:9")).unwrap()
    }

    #[tokio::test]
    async fn test_list_users_rejects_zero_page_or_limit() {
        let client = client();
        assert!(matches!(
            client.list_users(0, 10).await,
            Err(UserDirectoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.list_users(1, 0).await,
            Err(UserDirectoryError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_get_user_rejects_empty_id() {
        let result = client().get_user(UserId::new("  ")).await;
        assert!(matches!(result, Err(UserDirectoryError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_create_user_validates_before_dispatch() {
        let result = client().create_user(&MutateUserRequest::default()).await;
        let errors = result.unwrap_err();
        let errors = errors.validation_errors().unwrap();
        assert!(errors.contains("email"));
        assert!(errors.contains("username"));
    }

    #[tokio::test]
    async fn test_update_user_validates_before_dispatch() {
        let result = client()
            .update_user(UserId::new("1"), &MutateUserRequest::default())
            .await;
        assert!(matches!(result, Err(UserDirectoryError::Validation(_))));
    }
}
