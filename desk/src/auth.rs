//! Demo credential check.
//!
//! There is no real authentication: two hardcoded accounts are recognized and
//! resolved against the seeded users by email.

use crate::error::AuthError;
use crate::store::EntityStore;
use crate::telemetry::LOGIN_FAILED;
use crate::types::User;
use metrics::counter;

/// A recognized email/password pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoAccount {
    /// Login email
    pub email: &'static str,
    /// Password
    pub password: &'static str,
}

/// The accounts accepted by [`login`]
pub const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "admin@example.com",
        password: "password",
    },
    DemoAccount {
        email: "user@example.com",
        password: "password",
    },
];

/// Checks `email`/`password` against the demo accounts
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] if the pair is not a demo
/// account or no seeded user has that email.
pub fn login(store: &EntityStore, email: &str, password: &str) -> Result<User, AuthError> {
    let email = email.trim();
    let recognized = DEMO_ACCOUNTS
        .iter()
        .any(|account| account.email.eq_ignore_ascii_case(email) && account.password == password);

    let user = recognized
        .then(|| store.user_by_email(email))
        .flatten()
        .cloned();

    if let Some(user) = user {
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    } else {
        tracing::warn!(email, "Login failed");
        counter!(LOGIN_FAILED).increment(1);
        Err(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::seed::Seed;
    use crate::types::{Role, UserId};
    use deskflow_core::environment::Clock;
    use deskflow_testing::{SequentialIdGenerator, test_clock};

    fn store() -> EntityStore {
        EntityStore::init(Seed::demo(test_clock().now(), &SequentialIdGenerator::new()))
    }

    #[test]
    fn admin_account_resolves_to_admin() {
        let user = login(&store(), "admin@example.com", "password").unwrap();
        assert_eq!(user.id, UserId::new("2"));
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn user_account_resolves_to_user() {
        let user = login(&store(), " User@Example.com ", "password").unwrap();
        assert_eq!(user.id, UserId::new("1"));
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn wrong_password_fails() {
        assert_eq!(
            login(&store(), "admin@example.com", "hunter2"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn seeded_user_without_demo_account_fails() {
        assert_eq!(
            login(&store(), "mike@example.com", "password"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn demo_account_missing_from_seed_fails() {
        let mut seed = Seed::demo(test_clock().now(), &SequentialIdGenerator::new());
        seed.users.retain(|user| user.role != Role::Admin);
        let store = EntityStore::init(seed);
        assert_eq!(
            login(&store, "admin@example.com", "password"),
            Err(AuthError::InvalidCredentials)
        );
    }
}
