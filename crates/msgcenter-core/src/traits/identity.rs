//! Secondary identity lookup.
//!
//! Several inbox channels match events authored on the code-hosting
//! platform, so they need the user's login there rather than the internal
//! user id.

use async_trait::async_trait;

use crate::result::AppResult;

/// Outcome of a successful secondary identity lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryIdentity {
    /// The user has a non-empty login on the platform.
    Known(String),
    /// The lookup succeeded but the user has no login there.
    Absent,
}

impl SecondaryIdentity {
    /// Build from a possibly blank login; blank means [`SecondaryIdentity::Absent`].
    pub fn from_login(login: Option<&str>) -> Self {
        match login.map(str::trim) {
            Some(login) if !login.is_empty() => Self::Known(login.to_string()),
            _ => Self::Absent,
        }
    }

    /// Return the login if known.
    pub fn login(&self) -> Option<&str> {
        match self {
            Self::Known(login) => Some(login),
            Self::Absent => None,
        }
    }
}

/// Resolves the secondary (code-hosting) identity of an internal user.
///
/// Implementations return `Ok(SecondaryIdentity::Absent)` when the user
/// simply has no such identity and an
/// [`ErrorKind::IdentityUnresolved`](crate::error::ErrorKind::IdentityUnresolved)
/// error when the lookup itself failed.
#[async_trait]
pub trait SecondaryIdentityResolver: Send + Sync + 'static {
    /// Look up the platform login for `user_id`.
    async fn resolve(&self, user_id: &str) -> AppResult<SecondaryIdentity>;
}
