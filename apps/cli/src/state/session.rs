//! # Session
//!
//! Login and the inactivity timeout.
//!
//! ```text
//!   login(user, password) ──► Session { user, role, last_activity }
//!        │
//!        ▼
//!   each command: check() ──► expired? ──yes──► SESSION_EXPIRED (shell ends)
//!        │                        │
//!        │                        no
//!        ▼                        ▼
//!   authorize(action)          touch()
//! ```
//!
//! Passwords are compared as SHA-256 hex digests.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::{Role, UserEntry};
use crate::error::{CliError, CliResult, ErrorCode};

/// Hex SHA-256 of a password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Things a role may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Ingredients, recipes, modifiers, prices and inventory.
    ManageCatalog,
    /// Cart and checkout.
    Sell,
    /// Sales history.
    ViewHistory,
    /// Dashboard and restock plan.
    ViewReports,
}

impl Action {
    pub fn describe(&self) -> &'static str {
        match self {
            Action::ManageCatalog => "manage the catalog",
            Action::Sell => "sell",
            Action::ViewHistory => "view the sales history",
            Action::ViewReports => "view reports",
        }
    }
}

impl Role {
    pub fn can(&self, action: Action) -> bool {
        match self {
            Role::Admin => true,
            Role::Seller => matches!(action, Action::Sell | Action::ViewHistory),
        }
    }

    /// Whether money columns are shown in the history.
    pub fn sees_money(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A logged-in operator.
#[derive(Debug, Clone)]
pub struct Session {
    user: String,
    role: Role,
    timeout: Duration,
    last_activity: Instant,
}

impl Session {
    /// Checks the credentials against the configured users.
    pub fn login(
        users: &BTreeMap<String, UserEntry>,
        user: &str,
        password: &str,
        timeout: Duration,
    ) -> CliResult<Self> {
        let user = user.trim();
        let entry = users.get(user).ok_or_else(|| {
            warn!(%user, "Login for unknown user");
            CliError::auth_failed()
        })?;

        if !entry.password_hash.trim().eq_ignore_ascii_case(&hash_password(password)) {
            warn!(%user, "Login with wrong password");
            return Err(CliError::auth_failed());
        }

        info!(%user, role = %entry.role, "Logged in");
        Ok(Session {
            user: user.to_string(),
            role: entry.role,
            timeout,
            last_activity: Instant::now(),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) >= self.timeout
    }

    /// Fails once the session has been idle for the timeout, otherwise
    /// records activity.
    pub fn check_at(&mut self, now: Instant) -> CliResult<()> {
        if self.is_expired_at(now) {
            info!(user = %self.user, "Session expired");
            return Err(CliError::new(
                ErrorCode::SessionExpired,
                format!(
                    "Session expired after {} minutes of inactivity; log in again",
                    self.timeout.as_secs() / 60
                ),
            ));
        }
        self.last_activity = now;
        Ok(())
    }

    pub fn check(&mut self) -> CliResult<()> {
        self.check_at(Instant::now())
    }

    pub fn authorize(&self, action: Action) -> CliResult<()> {
        if self.role.can(action) {
            Ok(())
        } else {
            Err(CliError::forbidden(self.role, action.describe()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> BTreeMap<String, UserEntry> {
        let mut users = BTreeMap::new();
        users.insert(
            "ana".to_string(),
            UserEntry {
                password_hash: hash_password("s3cret"),
                role: Role::Admin,
            },
        );
        users.insert(
            "luis".to_string(),
            UserEntry {
                password_hash: hash_password("caja").to_uppercase(),
                role: Role::Seller,
            },
        );
        users
    }

    #[test]
    fn test_hash_password() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_login() {
        let timeout = Duration::from_secs(300);
        let session = Session::login(&users(), " ana ", "s3cret", timeout).unwrap();
        assert_eq!(session.user(), "ana");
        assert_eq!(session.role(), Role::Admin);

        assert!(Session::login(&users(), "luis", "caja", timeout).is_ok());

        let err = Session::login(&users(), "ana", "wrong", timeout).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);
        assert!(Session::login(&users(), "nobody", "s3cret", timeout).is_err());
    }

    #[test]
    fn test_inactivity_timeout() {
        let mut session = Session::login(&users(), "ana", "s3cret", Duration::from_secs(300)).unwrap();
        let start = Instant::now();

        assert!(session.check_at(start + Duration::from_secs(240)).is_ok());
        // activity at 240s pushes the deadline to 540s
        assert!(session.check_at(start + Duration::from_secs(500)).is_ok());

        let err = session.check_at(start + Duration::from_secs(900)).unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExpired);
    }

    #[test]
    fn test_roles() {
        let seller = Session::login(&users(), "luis", "caja", Duration::from_secs(60)).unwrap();
        assert!(seller.authorize(Action::Sell).is_ok());
        assert!(seller.authorize(Action::ViewHistory).is_ok());
        assert_eq!(
            seller.authorize(Action::ManageCatalog).unwrap_err().code,
            ErrorCode::Forbidden
        );
        assert!(!seller.role().sees_money());
        assert!(Role::Admin.can(Action::ViewReports));
    }
}
