//! In-memory user directory backing the login endpoint.

use crate::Role;

/// A user that passed credential checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
}

#[derive(Clone)]
struct UserRecord {
    username: String,
    password: String,
    role: Role,
}

/// Fixed set of users. Usernames match case-insensitively, passwords
/// exactly.
#[derive(Clone)]
pub struct InMemoryUserDirectory {
    users: Vec<UserRecord>,
}

impl InMemoryUserDirectory {
    pub fn empty() -> Self {
        Self { users: Vec::new() }
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        self.users.push(UserRecord {
            username: username.into(),
            password: password.into(),
            role,
        });
        self
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<AuthenticatedUser> {
        self.users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username) && u.password == password)
            .map(|u| AuthenticatedUser {
                username: u.username.clone(),
                role: u.role.clone(),
            })
    }
}

impl Default for InMemoryUserDirectory {
    /// The development accounts: `admin`/`admin123` (Admin) and
    /// `user`/`user123` (User).
    fn default() -> Self {
        Self::empty()
            .with_user("admin", "admin123", Role::ADMIN)
            .with_user("user", "user123", Role::USER)
    }
}

impl core::fmt::Debug for InMemoryUserDirectory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<_> = self.users.iter().map(|u| u.username.as_str()).collect();
        f.debug_struct("InMemoryUserDirectory").field("users", &names).finish()
    }
}
