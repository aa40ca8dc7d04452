use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{CustomerId, DomainError, DomainResult};

/// Customer record.
///
/// Ownership (which STAFF accounts may manage a customer) is not stored on
/// the record itself; it lives in the ownership-relation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub company: Option<String>,
    pub province: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied customer fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub company: Option<String>,
    pub province: String,
}

impl CustomerDraft {
    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("customer name must not be empty"));
        }
        if self.province.trim().is_empty() {
            return Err(DomainError::validation("customer province must not be empty"));
        }
        Ok(())
    }
}

impl Customer {
    pub fn create(draft: CustomerDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id: CustomerId::new(),
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
            company: draft.company,
            province: draft.province,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, draft: CustomerDraft, now: DateTime<Utc>) -> DomainResult<()> {
        draft.validate()?;
        self.name = draft.name;
        self.phone = draft.phone;
        self.address = draft.address;
        self.company = draft.company;
        self.province = draft.province;
        self.updated_at = now;
        Ok(())
    }
}
