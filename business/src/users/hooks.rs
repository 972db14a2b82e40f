//! Presentation-facing handles over [`UserDirectoryClient`].
//!
//! - [`ListUsersQuery`]: a list read exposing `{loading, error, success, data}`.
//!   It holds a cache subscription, so its page stays cached while the handle
//!   is alive.
//! - [`UserMutation`]: a write exposing `call(input)` and
//!   `{loading, error, success}`; one alias per write
//!   ([`CreateUserMutation`], [`UpdateUserMutation`], [`DeleteUserMutation`]).
//!
//! State is published on a `tokio::sync::watch` channel so a UI can either
//! poll [`ListUsersQuery::state`] or await changes on [`ListUsersQuery::watch`].

use std::future::Future;
use std::marker::PhantomData;

use tokio::sync::watch;
use userdir_states::{MutationStatus, QueryKey, QueryStatus, Subscription};

use super::client::UserDirectoryClient;
use super::error::UserDirectoryResult;
use super::types::{GenericResponse, MutateUserRequest, User, UserId};

pub type UsersStatus = QueryStatus<Vec<User>>;

/// Live handle on one page of the user list.
pub struct ListUsersQuery {
    client: UserDirectoryClient,
    page: u32,
    limit: u32,
    status: watch::Sender<UsersStatus>,
    subscription: Subscription,
}

impl ListUsersQuery {
    pub fn new(client: &UserDirectoryClient, page: u32, limit: u32) -> Self {
        let (status, _) = watch::channel(UsersStatus::Idle);
        Self {
            client: client.clone(),
            page,
            limit,
            status,
            subscription: client.subscribe_list(page, limit),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Cache key this handle keeps alive.
    pub fn cache_key(&self) -> &QueryKey {
        self.subscription.key()
    }

    /// Switch to another page. The previous page's entry starts idling.
    pub fn set_page(&mut self, page: u32, limit: u32) {
        self.page = page;
        self.limit = limit;
        self.subscription = self.client.subscribe_list(page, limit);
        self.status.send_replace(UsersStatus::Idle);
    }

    /// Read the page, from cache when fresh, and publish the outcome.
    pub async fn refresh(&self) -> UsersStatus {
        self.status.send_replace(UsersStatus::Loading);

        let next = match self.client.list_users(self.page, self.limit).await {
            Ok(users) => UsersStatus::Loaded(users),
            Err(err) => UsersStatus::Error(err.to_string()),
        };

        self.status.send_replace(next.clone());
        next
    }

    /// Drop the cached list and read it again.
    pub async fn refetch(&self) -> UsersStatus {
        self.client.invalidate_list();
        self.refresh().await
    }

    pub fn state(&self) -> UsersStatus {
        self.status.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<UsersStatus> {
        self.status.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.status.borrow().is_loading()
    }

    pub fn success(&self) -> bool {
        self.status.borrow().is_success()
    }

    pub fn error(&self) -> Option<String> {
        self.status.borrow().error_message().map(str::to_owned)
    }

    pub fn data(&self) -> Option<Vec<User>> {
        self.status.borrow().data().cloned()
    }
}

impl std::fmt::Debug for ListUsersQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListUsersQuery")
            .field("page", &self.page)
            .field("limit", &self.limit)
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

/// One kind of write the presentation layer can trigger.
pub trait MutationKind {
    type Input;
    type Output: Clone;

    fn run(
        client: &UserDirectoryClient,
        input: Self::Input,
    ) -> impl Future<Output = UserDirectoryResult<Self::Output>>;
}

#[derive(Debug)]
pub struct CreateUser;

impl MutationKind for CreateUser {
    type Input = MutateUserRequest;
    type Output = User;

    async fn run(client: &UserDirectoryClient, input: Self::Input) -> UserDirectoryResult<User> {
        client.create_user(&input).await
    }
}

#[derive(Debug)]
pub struct UpdateUser;

impl MutationKind for UpdateUser {
    type Input = (UserId, MutateUserRequest);
    type Output = User;

    async fn run(
        client: &UserDirectoryClient,
        (id, input): Self::Input,
    ) -> UserDirectoryResult<User> {
        client.update_user(id, &input).await
    }
}

#[derive(Debug)]
pub struct DeleteUser;

impl MutationKind for DeleteUser {
    type Input = UserId;
    type Output = GenericResponse;

    async fn run(
        client: &UserDirectoryClient,
        id: Self::Input,
    ) -> UserDirectoryResult<GenericResponse> {
        client.delete_user(id).await
    }
}

/// Handle on a write and the status of its last call.
pub struct UserMutation<K: MutationKind> {
    client: UserDirectoryClient,
    status: watch::Sender<MutationStatus<K::Output>>,
    _kind: PhantomData<K>,
}

pub type CreateUserMutation = UserMutation<CreateUser>;
pub type UpdateUserMutation = UserMutation<UpdateUser>;
pub type DeleteUserMutation = UserMutation<DeleteUser>;

impl<K: MutationKind> UserMutation<K> {
    pub fn new(client: &UserDirectoryClient) -> Self {
        let (status, _) = watch::channel(MutationStatus::Idle);
        Self {
            client: client.clone(),
            status,
            _kind: PhantomData,
        }
    }

    /// Run the write. The full error (including per-field validation
    /// failures) is returned; the published status keeps its message.
    pub async fn call(&self, input: K::Input) -> UserDirectoryResult<K::Output> {
        self.status.send_replace(MutationStatus::Pending);

        let result = K::run(&self.client, input).await;
        self.status.send_replace(match &result {
            Ok(output) => MutationStatus::Success(output.clone()),
            Err(err) => MutationStatus::Error(err.to_string()),
        });
        result
    }

    /// Back to `Idle`, e.g. when the form is closed.
    pub fn reset(&self) {
        self.status.send_replace(MutationStatus::Idle);
    }

    pub fn state(&self) -> MutationStatus<K::Output> {
        self.status.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<MutationStatus<K::Output>> {
        self.status.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.status.borrow().is_loading()
    }

    pub fn success(&self) -> bool {
        self.status.borrow().is_success()
    }

    pub fn error(&self) -> Option<String> {
        self.status.borrow().error_message().map(str::to_owned)
    }
}

impl<K: MutationKind> std::fmt::Debug for UserMutation<K>
where
    K::Output: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserMutation")
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}
