use thiserror::Error;

use crate::QueryKey;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Cache entry {key} does not hold a value of type {expected}")]
    TypeMismatch {
        key: QueryKey,
        expected: &'static str,
    },
}

impl Error {
    pub fn type_mismatch<T>(key: QueryKey) -> Self {
        Self::TypeMismatch {
            key,
            expected: std::any::type_name::<T>(),
        }
    }
}
