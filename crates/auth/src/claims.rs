use serde::{Deserialize, Serialize};

use orderdesk_core::UserId;

use crate::Role;

/// JWT claims model.
///
/// This is the complete set of claims a verified token carries: the subject
/// is the username, `uid` and `role` are the custom claims business logic
/// consumes, `iat`/`exp` are standard numeric-date timestamps (seconds since
/// the Unix epoch) evaluated by the codec at verification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account's username.
    pub sub: String,

    /// Account identifier.
    pub uid: UserId,

    /// Role granted at issue time. Stateless: a later role change does not
    /// affect tokens already in flight.
    pub role: Role,

    /// Issued-at (Unix seconds).
    pub iat: i64,

    /// Expiration (Unix seconds).
    pub exp: i64,
}
