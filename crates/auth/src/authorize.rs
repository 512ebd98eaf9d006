use thiserror::Error;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing role '{0}'")]
    MissingRole(Role),
}

/// Require `required` among the principal's roles.
///
/// - No IO
/// - No panics
pub fn require_role(roles: &[Role], required: &Role) -> Result<(), AuthzError> {
    if roles.iter().any(|r| r == required) {
        Ok(())
    } else {
        Err(AuthzError::MissingRole(required.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_grants_admin_routes() {
        assert!(require_role(&[Role::USER, Role::ADMIN], &Role::ADMIN).is_ok());
    }

    #[test]
    fn other_roles_are_rejected() {
        assert_eq!(
            require_role(&[Role::USER], &Role::ADMIN),
            Err(AuthzError::MissingRole(Role::ADMIN))
        );
        assert!(require_role(&[Role::new("admin")], &Role::ADMIN).is_err());
        assert!(require_role(&[], &Role::ADMIN).is_err());
    }
}
