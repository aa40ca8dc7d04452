use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, SellId};

/// Sell order: a product/customer snapshot submitted for approval.
///
/// # Lifecycle invariants
/// - New orders start with `is_valid = false` (pending) and `is_paid = false`.
/// - Once `is_valid = true`, content fields are immutable and the order
///   cannot be deleted; only `is_paid` may still change.
/// - `is_paid` is an orthogonal toggle with no dependency on validity.
///
/// Every guard here is check-then-write: a refused call leaves the order
/// untouched. Role guards (who may approve, who may mark paid) are the policy
/// layer's job, not this type's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sell {
    pub id: SellId,
    pub kind: String,
    /// Username of the creator. Ownership checks match against this.
    pub seller_name: String,
    pub sell_date: NaiveDate,
    pub product_name: String,
    pub product_quantity: u32,
    /// Unit of sale, e.g. "vial" or "box".
    pub product_spec: String,
    /// Quoted unit price in smallest currency unit (e.g., cents).
    pub product_price: u64,
    pub total_price: u64,
    pub customer_company: Option<String>,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub customer_province: String,
    pub pay_method: Option<String>,
    pub payment_screenshot_url: Option<String>,
    pub is_paid: bool,
    pub is_valid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied content fields, shared by create and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellDraft {
    pub kind: String,
    pub sell_date: NaiveDate,
    pub product_name: String,
    pub product_quantity: u32,
    pub product_spec: String,
    pub product_price: u64,
    pub total_price: u64,
    pub customer_company: Option<String>,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub customer_province: String,
    pub pay_method: Option<String>,
    pub payment_screenshot_url: Option<String>,
}

impl SellDraft {
    fn validate(&self) -> DomainResult<()> {
        if self.product_name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if self.product_quantity == 0 {
            return Err(DomainError::validation("product quantity must be positive"));
        }
        if self.customer_name.trim().is_empty() {
            return Err(DomainError::validation("customer name must not be empty"));
        }
        Ok(())
    }
}

/// Optional query filters for sell listings, applied after role scoping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellFilter {
    pub seller_name: Option<String>,
    pub product_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_company: Option<String>,
    pub customer_province: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub is_paid: Option<bool>,
    pub is_valid: Option<bool>,
}

impl SellFilter {
    pub fn matches(&self, sell: &Sell) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle.as_deref().is_none_or(|n| haystack.contains(n))
        }

        contains(&sell.seller_name, &self.seller_name)
            && contains(&sell.product_name, &self.product_name)
            && contains(&sell.customer_name, &self.customer_name)
            && contains(sell.customer_company.as_deref().unwrap_or(""), &self.customer_company)
            && self
                .customer_province
                .as_deref()
                .is_none_or(|p| sell.customer_province == p)
            && self.date_from.is_none_or(|d| sell.sell_date >= d)
            && self.date_to.is_none_or(|d| sell.sell_date <= d)
            && self.is_paid.is_none_or(|p| sell.is_paid == p)
            && self.is_valid.is_none_or(|v| sell.is_valid == v)
    }
}

impl Sell {
    /// Submit a new order. Initial state is always pending and unpaid.
    pub fn create(seller_name: impl Into<String>, draft: SellDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id: SellId::new(),
            kind: draft.kind,
            seller_name: seller_name.into(),
            sell_date: draft.sell_date,
            product_name: draft.product_name,
            product_quantity: draft.product_quantity,
            product_spec: draft.product_spec,
            product_price: draft.product_price,
            total_price: draft.total_price,
            customer_company: draft.customer_company,
            customer_name: draft.customer_name,
            customer_address: draft.customer_address,
            customer_phone: draft.customer_phone,
            customer_province: draft.customer_province,
            pay_method: draft.pay_method,
            payment_screenshot_url: draft.payment_screenshot_url,
            is_paid: false,
            is_valid: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_created_by(&self, username: &str) -> bool {
        self.seller_name == username
    }

    /// Replace content fields. Refused once the order is approved.
    pub fn edit(&mut self, draft: SellDraft, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_valid {
            return Err(DomainError::invariant("an approved sell order cannot be modified"));
        }
        draft.validate()?;
        self.kind = draft.kind;
        self.sell_date = draft.sell_date;
        self.product_name = draft.product_name;
        self.product_quantity = draft.product_quantity;
        self.product_spec = draft.product_spec;
        self.product_price = draft.product_price;
        self.total_price = draft.total_price;
        self.customer_company = draft.customer_company;
        self.customer_name = draft.customer_name;
        self.customer_address = draft.customer_address;
        self.customer_phone = draft.customer_phone;
        self.customer_province = draft.customer_province;
        self.pay_method = draft.pay_method;
        self.payment_screenshot_url = draft.payment_screenshot_url;
        self.updated_at = now;
        Ok(())
    }

    /// Pending → approved. Approving twice is a lifecycle violation.
    pub fn approve(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_valid {
            return Err(DomainError::invariant("sell order is already approved"));
        }
        self.is_valid = true;
        self.updated_at = now;
        Ok(())
    }

    /// Mark a not-yet-approved order explicitly invalid. It stays editable
    /// and re-approvable. An approved order can no longer be rejected.
    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_valid {
            return Err(DomainError::invariant("an approved sell order cannot be rejected"));
        }
        self.is_valid = false;
        self.updated_at = now;
        Ok(())
    }

    /// Deletion is refused once approved; the caller performs the actual
    /// removal only after this passes.
    pub fn ensure_deletable(&self) -> DomainResult<()> {
        if self.is_valid {
            return Err(DomainError::invariant("an approved sell order cannot be deleted"));
        }
        Ok(())
    }

    /// Toggle payment. No dependency on validity.
    pub fn set_paid(&mut self, paid: bool, now: DateTime<Utc>) {
        self.is_paid = paid;
        self.updated_at = now;
    }
}
