use std::collections::HashMap;
use std::sync::RwLock;

use orderdesk_core::{DomainError, DomainResult, SellId};
use orderdesk_sells::Sell;

/// In-memory sell-order store.
///
/// `mutate` and `remove_if` hold the write lock for the whole read-guard-
/// write span, which is what prevents two concurrent approve/edit calls on
/// the same order from interleaving.
#[derive(Debug, Default)]
pub struct InMemorySells {
    inner: RwLock<HashMap<SellId, Sell>>,
}

fn poisoned() -> DomainError {
    DomainError::storage("sell store lock poisoned")
}

// Entry vanished between check and remove under the same lock; cannot happen.
fn poisoned_as_missing() -> DomainError {
    DomainError::storage("sell store entry lost under write lock")
}

impl InMemorySells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, sell: Sell) -> DomainResult<Sell> {
        self.inner
            .write()
            .map_err(|_| poisoned())?
            .insert(sell.id, sell.clone());
        Ok(sell)
    }

    pub fn find_by_id(&self, id: SellId) -> DomainResult<Option<Sell>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    pub fn exists(&self, id: SellId) -> DomainResult<bool> {
        Ok(self.inner.read().map_err(|_| poisoned())?.contains_key(&id))
    }

    /// Atomic read-guard-write; an error from `f` leaves the order unchanged.
    pub fn mutate<R>(
        &self,
        id: SellId,
        f: impl FnOnce(&mut Sell) -> DomainResult<R>,
    ) -> DomainResult<(Sell, R)> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let sell = inner
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("sell order"))?;
        let mut candidate = sell.clone();
        let out = f(&mut candidate)?;
        *sell = candidate.clone();
        Ok((candidate, out))
    }

    /// Remove the order only if `guard` passes while the lock is held.
    pub fn remove_if(&self, id: SellId, guard: impl FnOnce(&Sell) -> DomainResult<()>) -> DomainResult<Sell> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let sell = inner
            .get(&id)
            .ok_or_else(|| DomainError::not_found("sell order"))?;
        guard(sell)?;
        inner.remove(&id).ok_or_else(poisoned_as_missing)
    }

    pub fn list(&self, pred: impl Fn(&Sell) -> bool) -> DomainResult<Vec<Sell>> {
        let mut sells: Vec<Sell> = self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .values()
            .filter(|s| pred(s))
            .cloned()
            .collect();
        sells.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use orderdesk_sells::SellDraft;

    fn sell(seller: &str) -> Sell {
        Sell::create(
            seller,
            SellDraft {
                kind: "retail".to_string(),
                sell_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                product_name: "Amoxicillin".to_string(),
                product_quantity: 3,
                product_spec: "box".to_string(),
                product_price: 1500,
                total_price: 4500,
                customer_company: None,
                customer_name: "Li Wei".to_string(),
                customer_address: "1 Main St".to_string(),
                customer_phone: "13800000000".to_string(),
                customer_province: "Guangdong".to_string(),
                pay_method: None,
                payment_screenshot_url: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn guarded_remove_refuses_and_keeps_the_order() {
        let store = InMemorySells::new();
        let mut approved = sell("alice");
        approved.approve(Utc::now()).unwrap();
        let id = store.insert(approved).unwrap().id;

        let err = store.remove_if(id, |s| s.ensure_deletable()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(store.exists(id).unwrap());
    }

    #[test]
    fn failed_mutation_is_not_visible() {
        let store = InMemorySells::new();
        let id = store.insert(sell("alice")).unwrap().id;

        let _ = store.mutate(id, |s| {
            s.set_paid(true, Utc::now());
            Err::<(), _>(DomainError::validation("boom"))
        });

        assert!(!store.find_by_id(id).unwrap().unwrap().is_paid);
    }

    #[test]
    fn list_scopes_by_seller() {
        let store = InMemorySells::new();
        store.insert(sell("alice")).unwrap();
        store.insert(sell("alice")).unwrap();
        store.insert(sell("bob")).unwrap();

        assert_eq!(store.list(|s| s.is_created_by("alice")).unwrap().len(), 2);
        assert_eq!(store.list(|_| true).unwrap().len(), 3);
    }
}
