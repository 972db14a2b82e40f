//! Request status types read by the presentation layer.
//!
//! A list query exposes `{loading, error, success, data}`; a mutation exposes
//! `{loading, error, success}` plus its last result. Both are plain enums so
//! a UI can match on them or use the accessors.

/// Status/result of a cached read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryStatus<T> {
    /// No request has been made yet.
    #[default]
    Idle,

    /// A request is in flight.
    Loading,

    /// The last request succeeded with this value.
    Loaded(T),

    /// The last request failed with this message.
    Error(String),
}

impl<T> QueryStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Status/result of a write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MutationStatus<T> {
    /// Not called yet.
    #[default]
    Idle,
    /// Call in progress.
    Pending,
    /// The last call succeeded.
    Success(T),
    /// The last call failed with this message.
    Error(String),
}

impl<T> MutationStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        if let Self::Error(msg) = self {
            Some(msg)
        } else {
            None
        }
    }

    pub fn success_response(&self) -> Option<&T> {
        if let Self::Success(response) = self {
            Some(response)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_status_default_is_idle() {
        let status: QueryStatus<Vec<u8>> = QueryStatus::default();
        assert_eq!(status, QueryStatus::Idle);
        assert!(!status.is_loading());
        assert!(status.data().is_none());
    }

    #[test]
    fn test_query_status_accessors() {
        let loaded = QueryStatus::Loaded(vec![1, 2]);
        assert!(loaded.is_success());
        assert_eq!(loaded.data(), Some(&vec![1, 2]));

        let failed: QueryStatus<()> = QueryStatus::Error("boom".to_owned());
        assert!(failed.is_error());
        assert_eq!(failed.error_message(), Some("boom"));
    }

    #[test]
    fn test_mutation_status_accessors() {
        let pending: MutationStatus<u32> = MutationStatus::Pending;
        assert!(pending.is_loading());

        let done = MutationStatus::Success(7_u32);
        assert!(done.is_success());
        assert_eq!(done.success_response(), Some(&7));
        assert!(done.error_message().is_none());
    }
}
