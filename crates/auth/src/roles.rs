use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role carried in a token and checked by route guards.
///
/// Role names compare exactly (`Admin` is not `admin`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Full access to restaurant management.
    pub const ADMIN: Role = Role(Cow::Borrowed("Admin"));
    /// Authenticated, no management rights.
    pub const USER: Role = Role(Cow::Borrowed("User"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
