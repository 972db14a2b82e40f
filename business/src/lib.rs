//! Client for a remote user directory service.
//!
//! [`UserDirectoryClient`] lists, fetches, creates, updates and deletes users.
//! Reads are cached in a tag-indexed [`userdir_states::QueryCache`]; writes are
//! validated locally and invalidate the tags they touch on success.

mod config;
pub mod http;
pub mod users;

pub use config::{BusinessConfig, ConfigError, DEFAULT_API_BASE_URL, ENV_PREFIX};
pub use users::{
    Address, CreateUser, CreateUserMutation, DeleteUser, DeleteUserMutation, GenericResponse,
    Geolocation, ListUsersQuery, MutateUserRequest, MutationKind, UpdateUser, UpdateUserMutation,
    User, UserDirectoryClient, UserDirectoryError, UserDirectoryResult, UserId, UserMutation,
    UserName, UsersStatus, ValidationErrors, validate,
};
pub use userdir_states::{MutationStatus, QueryStatus};
