use std::collections::HashSet;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orderdesk_core::{CustomerId, DomainError, DomainResult, ProductId, UserId};

/// What kind of resource an ownership relation points at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Customer,
    Product,
}

impl ResourceKind {
    fn noun(self) -> &'static str {
        match self {
            ResourceKind::Customer => "customer",
            ResourceKind::Product => "product",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct Relation {
    user: UserId,
    kind: ResourceKind,
    resource: Uuid,
}

/// Many-to-many ownership relations between users and customers/products.
///
/// Invariant: at most one relation per (user, resource, kind). The store does
/// not verify that the user or resource exists; callers check their entity
/// stores first and invoke the cascade helpers when deleting either side.
#[derive(Debug, Default)]
pub struct InMemoryRelations {
    inner: RwLock<HashSet<Relation>>,
}

fn poisoned() -> DomainError {
    DomainError::storage("relation store lock poisoned")
}

impl InMemoryRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&self, user: UserId, kind: ResourceKind, resource: Uuid) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if !inner.insert(Relation { user, kind, resource }) {
            return Err(DomainError::conflict(format!(
                "user already manages this {}",
                kind.noun()
            )));
        }
        Ok(())
    }

    pub fn unassign(&self, user: UserId, kind: ResourceKind, resource: Uuid) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if !inner.remove(&Relation { user, kind, resource }) {
            return Err(DomainError::not_found("ownership relation"));
        }
        Ok(())
    }

    /// Assign a batch atomically: if any pair already exists, nothing is
    /// written.
    pub fn assign_many(&self, user: UserId, kind: ResourceKind, resources: &[Uuid]) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        for &resource in resources {
            if inner.contains(&Relation { user, kind, resource }) {
                return Err(DomainError::conflict(format!(
                    "user already manages this {}",
                    kind.noun()
                )));
            }
        }
        for &resource in resources {
            inner.insert(Relation { user, kind, resource });
        }
        Ok(())
    }

    /// Unassign a batch; pairs that were not assigned are skipped.
    pub fn unassign_many(&self, user: UserId, kind: ResourceKind, resources: &[Uuid]) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        for &resource in resources {
            inner.remove(&Relation { user, kind, resource });
        }
        Ok(())
    }

    pub fn exists(&self, user: UserId, kind: ResourceKind, resource: Uuid) -> DomainResult<bool> {
        Ok(self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .contains(&Relation { user, kind, resource }))
    }

    pub fn owns_customer(&self, user: UserId, customer: CustomerId) -> DomainResult<bool> {
        self.exists(user, ResourceKind::Customer, customer.into())
    }

    pub fn owns_product(&self, user: UserId, product: ProductId) -> DomainResult<bool> {
        self.exists(user, ResourceKind::Product, product.into())
    }

    pub fn resources_for(&self, user: UserId, kind: ResourceKind) -> DomainResult<Vec<Uuid>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .iter()
            .filter(|r| r.user == user && r.kind == kind)
            .map(|r| r.resource)
            .collect())
    }

    pub fn users_for(&self, kind: ResourceKind, resource: Uuid) -> DomainResult<Vec<UserId>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .iter()
            .filter(|r| r.kind == kind && r.resource == resource)
            .map(|r| r.user)
            .collect())
    }

    /// Cascade: drop every relation held by a deleted user.
    pub fn remove_all_for_user(&self, user: UserId) -> DomainResult<usize> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let before = inner.len();
        inner.retain(|r| r.user != user);
        Ok(before - inner.len())
    }

    /// Cascade: drop every relation pointing at a deleted resource.
    pub fn remove_all_for_resource(&self, kind: ResourceKind, resource: Uuid) -> DomainResult<usize> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let before = inner.len();
        inner.retain(|r| !(r.kind == kind && r.resource == resource));
        Ok(before - inner.len())
    }
}
