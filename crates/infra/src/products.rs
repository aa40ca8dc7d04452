use std::collections::HashMap;
use std::sync::RwLock;

use orderdesk_core::{DomainError, DomainResult, ProductId};
use orderdesk_products::Product;

/// In-memory product store. The `(name, expiry month)` registration conflict
/// is enforced here under the write lock for both insert and update.
#[derive(Debug, Default)]
pub struct InMemoryProducts {
    inner: RwLock<HashMap<ProductId, Product>>,
}

fn poisoned() -> DomainError {
    DomainError::storage("product store lock poisoned")
}

fn duplicate() -> DomainError {
    DomainError::conflict("product already registered")
}

impl InMemoryProducts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: Product) -> DomainResult<Product> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.values().any(|p| p.same_registration(&product)) {
            return Err(duplicate());
        }
        inner.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn find_by_id(&self, id: ProductId) -> DomainResult<Option<Product>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    pub fn exists(&self, id: ProductId) -> DomainResult<bool> {
        Ok(self.inner.read().map_err(|_| poisoned())?.contains_key(&id))
    }

    /// Atomic read-guard-write; re-checks the registration conflict against
    /// every other product before committing.
    pub fn mutate<R>(
        &self,
        id: ProductId,
        f: impl FnOnce(&mut Product) -> DomainResult<R>,
    ) -> DomainResult<(Product, R)> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let mut candidate = inner
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product"))?;
        let out = f(&mut candidate)?;
        if inner
            .values()
            .any(|p| p.id != id && p.same_registration(&candidate))
        {
            return Err(duplicate());
        }
        inner.insert(id, candidate.clone());
        Ok((candidate, out))
    }

    pub fn remove(&self, id: ProductId) -> DomainResult<Product> {
        self.inner
            .write()
            .map_err(|_| poisoned())?
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("product"))
    }

    pub fn list(&self, pred: impl Fn(&Product) -> bool) -> DomainResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .values()
            .filter(|p| pred(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}
