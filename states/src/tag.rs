//! Cache tags and query keys.
//!
//! A [`Tag`] names a logical resource a cached query depends on
//! (`Users:7`, `Users:LIST`). A [`QueryKey`] names one cached query result.
//! Resource kinds are a fixed handful of names and are interned with `Ustr`.
//! Ids and keys come from remote data, so they are reference-counted instead:
//! they are freed once their last cache entry is evicted.

use std::fmt;
use std::sync::Arc;

use ustr::Ustr;

/// Id used by the aggregate tag of a resource kind.
pub const LIST_ID: &str = "LIST";

/// Label attached to cache entries, used to bulk-invalidate related entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    kind: Ustr,
    id: Arc<str>,
}

impl Tag {
    pub fn new(kind: &str, id: &str) -> Self {
        Self {
            kind: Ustr::from(kind),
            id: Arc::from(id),
        }
    }

    /// The aggregate tag for `kind`, e.g. `Users:LIST`.
    pub fn list(kind: &str) -> Self {
        Self::new(kind, LIST_ID)
    }

    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_list(&self) -> bool {
        &*self.id == LIST_ID
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Key of one cached query result. Cloning shares the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Arc<str>);

impl QueryKey {
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QueryKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QueryKey {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
