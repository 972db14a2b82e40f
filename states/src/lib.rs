//! Query cache primitives for the user directory client.
//!
//! - [`QueryCache`]: tag-indexed read cache with lazy invalidation and idle
//!   retention.
//! - [`QueryStatus`] / [`MutationStatus`]: the status shapes the presentation
//!   layer reads.

mod cache;
mod error;
mod status;
mod tag;

pub use cache::{DEFAULT_RETENTION, FetchTicket, QueryCache, Subscription};
pub use error::Error;
pub use status::{MutationStatus, QueryStatus};
pub use tag::{LIST_ID, QueryKey, Tag};
