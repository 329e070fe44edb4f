//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Actor name must not be empty")]
    EmptyActorName,

    #[error("Actor '{0}' is already in the pool")]
    AlreadyActive(String),

    #[error("Pool is full ({0} members)")]
    PoolFull(usize),

    #[error("Actor '{0}' cannot join the pool (role: {1})")]
    NotPoolEligible(String, String),

    #[error("Actor '{0}' cannot generate text")]
    CannotGenerate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_full_display() {
        let error = DomainError::PoolFull(5);
        assert_eq!(error.to_string(), "Pool is full (5 members)");
    }
}
