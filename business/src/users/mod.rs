//! User directory domain module.
//!
//! - `types`: user records and request/response bodies
//! - `validation`: local checks run before any write is sent
//! - `api`: raw HTTP calls against the user service
//! - `client`: [`UserDirectoryClient`], cached reads and invalidating writes
//! - `hooks`: list-query and mutation handles for the presentation layer

pub mod api;
pub mod client;
pub mod envelope;
pub mod error;
pub mod hooks;
pub mod types;
pub mod validation;

pub use client::{USERS, UserDirectoryClient, list_key, list_tag, user_key, user_tag};
pub use error::{UserDirectoryError, UserDirectoryResult};
pub use hooks::{
    CreateUser, CreateUserMutation, DeleteUser, DeleteUserMutation, ListUsersQuery, MutationKind,
    UpdateUser, UpdateUserMutation, UserMutation, UsersStatus,
};
pub use types::{Address, GenericResponse, Geolocation, MutateUserRequest, User, UserId, UserName};
pub use validation::{ValidationErrors, validate};
