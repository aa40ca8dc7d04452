//! Central RBAC policy.
//!
//! Every entry point calls [`authorize`] instead of re-deriving role rules
//! inline, so the same operation cannot drift into two competing checks.

use thiserror::Error;

use orderdesk_core::DomainError;

use crate::Role;

/// Operations subject to role-based authorization.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    ProductCreate,
    ProductUpdate,
    ProductDelete,
    ProductList,
    CustomerCreate,
    CustomerUpdate,
    CustomerDelete,
    CustomerList,
    RelationAssign,
    RelationUnassign,
    SellCreate,
    /// Content edit of a pending order.
    SellEdit,
    SellDelete,
    /// Approve or reject (toggle validity).
    SellReview,
    /// Mark paid/unpaid.
    SellMarkPaid,
    SellList,
}

/// Result of the caller's ownership check, where the action needs one.
///
/// `Owned` means the STAFF caller is the assigned owner of the customer, or
/// the creator of the sell order. Actions without an ownership dimension pass
/// `NotApplicable`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ownership {
    NotApplicable,
    Owned,
    NotOwned,
}

/// How a listing is scoped for the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Full set.
    All,
    /// Only resources owned by / created by the caller.
    Mine,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no permission to {0}")]
pub struct PolicyError(pub String);

impl From<PolicyError> for DomainError {
    fn from(e: PolicyError) -> Self {
        DomainError::PermissionDenied(e.0)
    }
}

fn deny(what: &str) -> Result<(), PolicyError> {
    Err(PolicyError(what.to_string()))
}

/// Pure decision function over (role, action, ownership).
///
/// Lifecycle state (an approved order being immutable) is *not* decided here;
/// that is the order's own guard. This function answers only "may this role
/// attempt the action at all".
pub fn authorize(role: Role, action: Action, ownership: Ownership) -> Result<(), PolicyError> {
    use Action::*;

    match action {
        ProductCreate | ProductUpdate | ProductDelete => match role {
            Role::Owner | Role::Auditor => Ok(()),
            Role::Staff => deny("manage products"),
        },

        CustomerUpdate | CustomerDelete => match role {
            Role::Owner | Role::Auditor => Ok(()),
            Role::Staff if ownership == Ownership::Owned => Ok(()),
            Role::Staff => deny("operate on this customer"),
        },

        RelationAssign | RelationUnassign => match role {
            Role::Owner | Role::Auditor => Ok(()),
            Role::Staff => deny("manage ownership assignments"),
        },

        SellEdit | SellDelete => match role {
            Role::Owner | Role::Auditor => Ok(()),
            Role::Staff if ownership == Ownership::Owned => Ok(()),
            Role::Staff => deny("operate on this sell order"),
        },

        SellReview => match role {
            Role::Owner | Role::Auditor => Ok(()),
            Role::Staff => deny("review sell orders"),
        },

        SellMarkPaid => match role {
            Role::Owner => Ok(()),
            Role::Auditor | Role::Staff => deny("update payment status"),
        },

        // Any authenticated role; listings are narrowed by `list_scope`.
        ProductList | CustomerList | SellList | CustomerCreate | SellCreate => Ok(()),
    }
}

/// Listing scope for read paths: OWNER/AUDITOR see everything, STAFF sees
/// only self-assigned resources (or self-created orders).
pub fn list_scope(role: Role) -> ListScope {
    match role {
        Role::Owner | Role::Auditor => ListScope::All,
        Role::Staff => ListScope::Mine,
    }
}
