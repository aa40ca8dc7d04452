use std::collections::HashMap;
use std::sync::RwLock;

use orderdesk_core::{CustomerId, DomainError, DomainResult};
use orderdesk_customers::Customer;

/// In-memory customer store.
#[derive(Debug, Default)]
pub struct InMemoryCustomers {
    inner: RwLock<HashMap<CustomerId, Customer>>,
}

fn poisoned() -> DomainError {
    DomainError::storage("customer store lock poisoned")
}

impl InMemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, customer: Customer) -> DomainResult<Customer> {
        self.inner
            .write()
            .map_err(|_| poisoned())?
            .insert(customer.id, customer.clone());
        Ok(customer)
    }

    pub fn find_by_id(&self, id: CustomerId) -> DomainResult<Option<Customer>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    pub fn exists(&self, id: CustomerId) -> DomainResult<bool> {
        Ok(self.inner.read().map_err(|_| poisoned())?.contains_key(&id))
    }

    /// Atomic read-guard-write; an error from `f` leaves the record unchanged.
    pub fn mutate<R>(
        &self,
        id: CustomerId,
        f: impl FnOnce(&mut Customer) -> DomainResult<R>,
    ) -> DomainResult<(Customer, R)> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let customer = inner
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("customer"))?;
        let mut candidate = customer.clone();
        let out = f(&mut candidate)?;
        *customer = candidate.clone();
        Ok((candidate, out))
    }

    pub fn remove(&self, id: CustomerId) -> DomainResult<Customer> {
        self.inner
            .write()
            .map_err(|_| poisoned())?
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("customer"))
    }

    /// All customers matching `pred`, newest first.
    pub fn list(&self, pred: impl Fn(&Customer) -> bool) -> DomainResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .values()
            .filter(|c| pred(c))
            .cloned()
            .collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderdesk_customers::CustomerDraft;

    fn customer(name: &str) -> Customer {
        Customer::create(
            CustomerDraft {
                name: name.to_string(),
                phone: "13800000000".to_string(),
                address: "1 Main St".to_string(),
                company: None,
                province: "Guangdong".to_string(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn insert_find_remove() {
        let store = InMemoryCustomers::new();
        let c = store.insert(customer("Li Wei")).unwrap();
        assert!(store.exists(c.id).unwrap());
        assert_eq!(store.find_by_id(c.id).unwrap().unwrap().name, "Li Wei");

        store.remove(c.id).unwrap();
        assert!(!store.exists(c.id).unwrap());
        assert!(matches!(store.remove(c.id).unwrap_err(), DomainError::NotFound(_)));
    }

    #[test]
    fn list_filters_with_predicate() {
        let store = InMemoryCustomers::new();
        store.insert(customer("Li Wei")).unwrap();
        store.insert(customer("Zhang San")).unwrap();

        let hits = store.list(|c| c.name.contains("Li")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(store.list(|_| true).unwrap().len(), 2);
    }
}
