use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, ProductId};

/// Expiry month of a product batch (year + month, no day).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpiryMonth {
    pub year: i32,
    pub month: u32,
}

impl ExpiryMonth {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation("expiry month must be 1-12"));
        }
        Ok(Self { year, month })
    }
}

impl core::fmt::Display for ExpiryMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Product catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub base_price: Option<u64>,
    pub stock_quantity: i64,
    pub expiry: Option<ExpiryMonth>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied product fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<u64>,
    pub stock_quantity: i64,
    pub expiry: Option<ExpiryMonth>,
}

impl ProductDraft {
    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if self.stock_quantity < 0 {
            return Err(DomainError::validation("stock quantity must not be negative"));
        }
        if let Some(expiry) = self.expiry {
            // Re-validate: deserialization bypasses ExpiryMonth::new.
            ExpiryMonth::new(expiry.year, expiry.month)?;
        }
        Ok(())
    }

}

impl Product {
    /// Two products are the same registration when both name and expiry
    /// month match. Products without an expiry month never collide.
    pub fn same_registration(&self, other: &Product) -> bool {
        match (self.expiry, other.expiry) {
            (Some(a), Some(b)) => a == b && self.name == other.name,
            _ => false,
        }
    }

    pub fn create(draft: ProductDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id: ProductId::new(),
            name: draft.name,
            manufacturer: draft.manufacturer,
            description: draft.description,
            base_price: draft.base_price,
            stock_quantity: draft.stock_quantity,
            expiry: draft.expiry,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, draft: ProductDraft, now: DateTime<Utc>) -> DomainResult<()> {
        draft.validate()?;
        self.name = draft.name;
        self.manufacturer = draft.manufacturer;
        self.description = draft.description;
        self.base_price = draft.base_price;
        self.stock_quantity = draft.stock_quantity;
        self.expiry = draft.expiry;
        self.updated_at = now;
        Ok(())
    }
}
