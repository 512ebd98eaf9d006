//! Authorization guards applied before dispatch.

use bistro_auth::{AuthzError, Role, require_role};

use crate::context::PrincipalContext;

/// Restaurant management is reserved to the `Admin` role.
pub fn authorize_admin(principal: &PrincipalContext) -> Result<(), AuthzError> {
    require_role(principal.roles(), &Role::ADMIN)
}
