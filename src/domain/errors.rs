use thiserror::Error;

/// Coarse classification of a [`DomainError`], stable across layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Transient,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Internal error: {0}")]
    Transient(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Unauthenticated => ErrorKind::Auth,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Transient(_) => ErrorKind::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(
            DomainError::Validation("x".to_string()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(DomainError::Unauthenticated.kind(), ErrorKind::Auth);
        assert_eq!(DomainError::NotFound("Order").kind(), ErrorKind::NotFound);
        assert_eq!(
            DomainError::Transient("db down".to_string()).kind(),
            ErrorKind::Transient
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(DomainError::NotFound("User").to_string(), "User not found");
    }
}
