//! `orderdesk-auth` — identity, tokens, and the RBAC policy table.
//!
//! This crate is intentionally decoupled from HTTP and storage: the token
//! codec is pure computation over a shared secret, and the policy is a pure
//! decision function. Transport (bearer headers, 401 bodies) and persistence
//! (user lookup) live elsewhere.

pub mod claims;
pub mod policy;
pub mod role;
pub mod token;
pub mod user;

pub use claims::Claims;
pub use policy::{authorize, list_scope, Action, ListScope, Ownership, PolicyError};
pub use role::Role;
pub use token::{TokenCodec, TokenError};
pub use user::User;
