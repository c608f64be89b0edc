//! Request-scoped workflows: role check, backend calls, derivation into DTOs.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;

pub mod assignments;
pub mod documents;
pub mod feedback;
pub mod work_logs;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Access denied")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    #[error("Not found")]
    NotFound,

    #[error("Form error: {0}")]
    Form(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Invalid value: {0}")]
    TypeConstraint(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unauthorized => ServiceError::SessionExpired,
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Rejected(message) => ServiceError::Rejected(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless the user holds `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::SERVICE_ACCESS_ROLE;
    use crate::models::auth::AuthenticatedUser;

    pub fn bookkeeper() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "17".to_string(),
            email: "jamie@books.example".to_string(),
            name: "Jamie".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
            token: "token-17".to_string(),
        }
    }

    pub fn outsider() -> AuthenticatedUser {
        AuthenticatedUser {
            roles: vec!["payroll".to_string()],
            ..bookkeeper()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{bookkeeper, outsider};

    #[test]
    fn backend_unauthorized_means_expired_session() {
        assert_eq!(
            ServiceError::from(RepositoryError::Unauthorized),
            ServiceError::SessionExpired
        );
        assert_eq!(
            ServiceError::from(RepositoryError::Rejected("locked".into())),
            ServiceError::Rejected("locked".into())
        );
        assert!(matches!(
            ServiceError::from(RepositoryError::Transport("timeout".into())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn role_check() {
        assert!(ensure_role(&bookkeeper(), crate::SERVICE_ACCESS_ROLE).is_ok());
        assert_eq!(
            ensure_role(&outsider(), crate::SERVICE_ACCESS_ROLE),
            Err(ServiceError::Unauthorized)
        );
    }
}
