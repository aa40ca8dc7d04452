//! Business orchestration over the stores.
//!
//! Each mutating operation follows the same order: RBAC policy (with the
//! ownership input computed where the table needs one) → lifecycle guard →
//! write, with guard and write inside a single store-lock span.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use orderdesk_auth::{
    authorize, list_scope, Action, ListScope, Ownership, Role, TokenCodec, User,
};
use orderdesk_core::{CustomerId, DomainError, DomainResult, ProductId, SellId, UserId};
use orderdesk_customers::{Customer, CustomerDraft};
use orderdesk_infra::{ResourceKind, Stores};
use orderdesk_products::{Product, ProductDraft};
use orderdesk_sells::{Sell, SellDraft, SellFilter};

use crate::context::AuthContext;

pub struct AppServices {
    pub stores: Stores,
    pub codec: Arc<TokenCodec>,
}

fn ownership(is_owned: bool) -> Ownership {
    if is_owned { Ownership::Owned } else { Ownership::NotOwned }
}

impl AppServices {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self {
            stores: Stores::new(),
            codec,
        }
    }

    // ── auth ────────────────────────────────────────────────────────────

    /// Check credentials and mint a token. `None` covers both unknown
    /// username and wrong password; the route collapses it into one generic
    /// 401 so usernames cannot be enumerated.
    pub fn login(&self, username: &str, password: &str) -> DomainResult<Option<(String, User)>> {
        let Some(user) = self.stores.users.find_by_username(username)? else {
            return Ok(None);
        };
        if !user.verify_password(password) {
            return Ok(None);
        }
        let token = self
            .codec
            .issue(&user.username, user.id, user.role)
            .map_err(|e| DomainError::storage(format!("token issue failed: {e}")))?;
        Ok(Some((token, user)))
    }

    /// Self-service signup: always STAFF.
    pub fn register(&self, username: &str, password: &str) -> DomainResult<User> {
        let user = User::register(username, password, Utc::now())?;
        self.stores.users.insert(user)
    }

    // ── users ───────────────────────────────────────────────────────────

    pub fn create_user(
        &self,
        ctx: &AuthContext,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> DomainResult<User> {
        let role = role.unwrap_or(Role::Staff);
        if role != Role::Staff && ctx.role() != Role::Owner {
            return Err(DomainError::denied("create privileged accounts"));
        }
        let user = User::with_role(username, password, role, Utc::now())?;
        self.stores.users.insert(user)
    }

    pub fn list_users(&self) -> DomainResult<Vec<User>> {
        self.stores.users.list()
    }

    pub fn get_user(&self, id: UserId) -> DomainResult<User> {
        self.stores
            .users
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("user"))
    }

    pub fn get_user_by_username(&self, username: &str) -> DomainResult<User> {
        self.stores
            .users
            .find_by_username(username)?
            .ok_or_else(|| DomainError::not_found("user"))
    }

    pub fn username_exists(&self, username: &str) -> DomainResult<bool> {
        self.stores.users.exists_by_username(username)
    }

    /// Credentials are mutable by the account itself, or by an OWNER.
    pub fn update_user(
        &self,
        ctx: &AuthContext,
        id: UserId,
        username: &str,
        password: &str,
    ) -> DomainResult<User> {
        if ctx.uid() != id && ctx.role() != Role::Owner {
            return Err(DomainError::denied("update other accounts"));
        }
        let (user, ()) = self.stores.users.mutate(id, |user, taken| {
            if user.username != username && taken(username) {
                return Err(DomainError::conflict("username already exists"));
            }
            user.update_credentials(username, password, Utc::now())
        })?;
        Ok(user)
    }

    /// Role changes are the privileged operation: OWNER only.
    pub fn change_user_role(&self, ctx: &AuthContext, id: UserId, role: Role) -> DomainResult<User> {
        if ctx.role() != Role::Owner {
            return Err(DomainError::denied("change account roles"));
        }
        let (user, ()) = self.stores.users.mutate(id, |user, _| {
            user.change_role(role, Utc::now());
            Ok(())
        })?;
        Ok(user)
    }

    pub fn delete_user(&self, ctx: &AuthContext, id: UserId) -> DomainResult<()> {
        if ctx.role() != Role::Owner {
            return Err(DomainError::denied("delete accounts"));
        }
        let user = self.stores.users.remove(id)?;
        // Cascade: relations referencing the identity go first.
        let dropped = self.stores.relations.remove_all_for_user(user.id)?;
        tracing::info!(username = %user.username, relations = dropped, "deleted user");
        Ok(())
    }

    // ── customers ───────────────────────────────────────────────────────

    /// STAFF creators are auto-assigned as owners of the new customer.
    pub fn create_customer(&self, ctx: &AuthContext, draft: CustomerDraft) -> DomainResult<Customer> {
        authorize(ctx.role(), Action::CustomerCreate, Ownership::NotApplicable)?;
        let customer = Customer::create(draft, Utc::now())?;
        let customer = self.stores.customers.insert(customer)?;
        if ctx.role() == Role::Staff {
            self.stores
                .relations
                .assign(ctx.uid(), ResourceKind::Customer, customer.id.into())?;
        }
        Ok(customer)
    }

    pub fn get_customer(&self, id: CustomerId) -> DomainResult<Customer> {
        self.stores
            .customers
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("customer"))
    }

    pub fn list_customers(
        &self,
        ctx: &AuthContext,
        name: Option<&str>,
        company: Option<&str>,
        province: Option<&str>,
    ) -> DomainResult<Vec<Customer>> {
        authorize(ctx.role(), Action::CustomerList, Ownership::NotApplicable)?;
        let mine: Option<HashSet<Uuid>> = match list_scope(ctx.role()) {
            ListScope::All => None,
            ListScope::Mine => Some(
                self.stores
                    .relations
                    .resources_for(ctx.uid(), ResourceKind::Customer)?
                    .into_iter()
                    .collect(),
            ),
        };

        self.stores.customers.list(|c| {
            mine.as_ref().is_none_or(|owned| owned.contains(c.id.as_uuid()))
                && name.is_none_or(|n| c.name.contains(n))
                && company.is_none_or(|n| c.company.as_deref().unwrap_or("").contains(n))
                && province.is_none_or(|p| c.province == p)
        })
    }

    fn customer_ownership(&self, ctx: &AuthContext, id: CustomerId) -> DomainResult<Ownership> {
        if ctx.role() != Role::Staff {
            return Ok(Ownership::NotApplicable);
        }
        Ok(ownership(self.stores.relations.owns_customer(ctx.uid(), id)?))
    }

    pub fn update_customer(
        &self,
        ctx: &AuthContext,
        id: CustomerId,
        draft: CustomerDraft,
    ) -> DomainResult<Customer> {
        authorize(ctx.role(), Action::CustomerUpdate, self.customer_ownership(ctx, id)?)?;
        let (customer, ()) = self
            .stores
            .customers
            .mutate(id, |customer| customer.apply(draft, Utc::now()))?;
        Ok(customer)
    }

    pub fn delete_customer(&self, ctx: &AuthContext, id: CustomerId) -> DomainResult<()> {
        authorize(ctx.role(), Action::CustomerDelete, self.customer_ownership(ctx, id)?)?;
        let customer = self.stores.customers.remove(id)?;
        self.stores
            .relations
            .remove_all_for_resource(ResourceKind::Customer, customer.id.into())?;
        Ok(())
    }

    // ── products ────────────────────────────────────────────────────────

    pub fn create_product(&self, ctx: &AuthContext, draft: ProductDraft) -> DomainResult<Product> {
        authorize(ctx.role(), Action::ProductCreate, Ownership::NotApplicable)?;
        let product = Product::create(draft, Utc::now())?;
        self.stores.products.insert(product)
    }

    pub fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        self.stores
            .products
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("product"))
    }

    pub fn list_products(&self, ctx: &AuthContext, name: Option<&str>) -> DomainResult<Vec<Product>> {
        authorize(ctx.role(), Action::ProductList, Ownership::NotApplicable)?;
        let mine: Option<HashSet<Uuid>> = match list_scope(ctx.role()) {
            ListScope::All => None,
            ListScope::Mine => Some(
                self.stores
                    .relations
                    .resources_for(ctx.uid(), ResourceKind::Product)?
                    .into_iter()
                    .collect(),
            ),
        };

        self.stores.products.list(|p| {
            mine.as_ref().is_none_or(|owned| owned.contains(p.id.as_uuid()))
                && name.is_none_or(|n| p.name.contains(n))
        })
    }

    pub fn update_product(
        &self,
        ctx: &AuthContext,
        id: ProductId,
        draft: ProductDraft,
    ) -> DomainResult<Product> {
        authorize(ctx.role(), Action::ProductUpdate, Ownership::NotApplicable)?;
        let (product, ()) = self
            .stores
            .products
            .mutate(id, |product| product.apply(draft, Utc::now()))?;
        Ok(product)
    }

    pub fn delete_product(&self, ctx: &AuthContext, id: ProductId) -> DomainResult<()> {
        authorize(ctx.role(), Action::ProductDelete, Ownership::NotApplicable)?;
        let product = self.stores.products.remove(id)?;
        self.stores
            .relations
            .remove_all_for_resource(ResourceKind::Product, product.id.into())?;
        Ok(())
    }

    // ── sell orders ─────────────────────────────────────────────────────

    /// The creator reference is always the verified caller, never payload.
    pub fn create_sell(&self, ctx: &AuthContext, draft: SellDraft) -> DomainResult<Sell> {
        authorize(ctx.role(), Action::SellCreate, Ownership::NotApplicable)?;
        let sell = Sell::create(ctx.username(), draft, Utc::now())?;
        self.stores.sells.insert(sell)
    }

    pub fn get_sell(&self, id: SellId) -> DomainResult<Sell> {
        self.stores
            .sells
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("sell order"))
    }

    pub fn list_sells(&self, ctx: &AuthContext, filter: &SellFilter) -> DomainResult<Vec<Sell>> {
        authorize(ctx.role(), Action::SellList, Ownership::NotApplicable)?;
        let scope = list_scope(ctx.role());
        self.stores.sells.list(|s| {
            (match scope {
                ListScope::All => true,
                ListScope::Mine => s.is_created_by(ctx.username()),
            }) && filter.matches(s)
        })
    }

    fn sell_ownership(ctx: &AuthContext, sell: &Sell) -> Ownership {
        if ctx.role() != Role::Staff {
            return Ownership::NotApplicable;
        }
        ownership(sell.is_created_by(ctx.username()))
    }

    pub fn update_sell(&self, ctx: &AuthContext, id: SellId, draft: SellDraft) -> DomainResult<Sell> {
        let (sell, ()) = self.stores.sells.mutate(id, |sell| {
            authorize(ctx.role(), Action::SellEdit, Self::sell_ownership(ctx, sell))?;
            sell.edit(draft, Utc::now())
        })?;
        Ok(sell)
    }

    pub fn delete_sell(&self, ctx: &AuthContext, id: SellId) -> DomainResult<()> {
        self.stores.sells.remove_if(id, |sell| {
            authorize(ctx.role(), Action::SellDelete, Self::sell_ownership(ctx, sell))?;
            sell.ensure_deletable()
        })?;
        Ok(())
    }

    pub fn approve_sell(&self, ctx: &AuthContext, id: SellId) -> DomainResult<Sell> {
        authorize(ctx.role(), Action::SellReview, Ownership::NotApplicable)?;
        let (sell, ()) = self.stores.sells.mutate(id, |sell| sell.approve(Utc::now()))?;
        Ok(sell)
    }

    pub fn reject_sell(&self, ctx: &AuthContext, id: SellId) -> DomainResult<Sell> {
        authorize(ctx.role(), Action::SellReview, Ownership::NotApplicable)?;
        let (sell, ()) = self.stores.sells.mutate(id, |sell| sell.reject(Utc::now()))?;
        Ok(sell)
    }

    pub fn set_sell_paid(&self, ctx: &AuthContext, id: SellId, paid: bool) -> DomainResult<Sell> {
        authorize(ctx.role(), Action::SellMarkPaid, Ownership::NotApplicable)?;
        let (sell, ()) = self.stores.sells.mutate(id, |sell| {
            sell.set_paid(paid, Utc::now());
            Ok(())
        })?;
        Ok(sell)
    }

    // ── ownership relations ─────────────────────────────────────────────

    fn relation_user(&self, username: &str) -> DomainResult<User> {
        self.get_user_by_username(username)
    }

    fn ensure_customer_exists(&self, id: CustomerId) -> DomainResult<()> {
        if !self.stores.customers.exists(id)? {
            return Err(DomainError::not_found("customer"));
        }
        Ok(())
    }

    fn ensure_product_exists(&self, id: ProductId) -> DomainResult<()> {
        if !self.stores.products.exists(id)? {
            return Err(DomainError::not_found("product"));
        }
        Ok(())
    }

    pub fn assign_customer(&self, ctx: &AuthContext, username: &str, id: CustomerId) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationAssign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        self.ensure_customer_exists(id)?;
        self.stores.relations.assign(user.id, ResourceKind::Customer, id.into())
    }

    pub fn unassign_customer(&self, ctx: &AuthContext, username: &str, id: CustomerId) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationUnassign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        self.stores.relations.unassign(user.id, ResourceKind::Customer, id.into())
    }

    pub fn assign_customers(
        &self,
        ctx: &AuthContext,
        username: &str,
        ids: &[CustomerId],
    ) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationAssign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        for &id in ids {
            self.ensure_customer_exists(id)?;
        }
        let uuids: Vec<Uuid> = ids.iter().map(|&id| id.into()).collect();
        self.stores.relations.assign_many(user.id, ResourceKind::Customer, &uuids)
    }

    pub fn unassign_customers(
        &self,
        ctx: &AuthContext,
        username: &str,
        ids: &[CustomerId],
    ) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationUnassign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        let uuids: Vec<Uuid> = ids.iter().map(|&id| id.into()).collect();
        self.stores.relations.unassign_many(user.id, ResourceKind::Customer, &uuids)
    }

    pub fn customers_of(&self, username: &str) -> DomainResult<Vec<Customer>> {
        let user = self.relation_user(username)?;
        let owned: HashSet<Uuid> = self
            .stores
            .relations
            .resources_for(user.id, ResourceKind::Customer)?
            .into_iter()
            .collect();
        self.stores.customers.list(|c| owned.contains(c.id.as_uuid()))
    }

    pub fn users_of_customer(&self, id: CustomerId) -> DomainResult<Vec<User>> {
        self.ensure_customer_exists(id)?;
        let users = self.stores.relations.users_for(ResourceKind::Customer, id.into())?;
        let mut out = Vec::with_capacity(users.len());
        for uid in users {
            if let Some(user) = self.stores.users.find_by_id(uid)? {
                out.push(user);
            }
        }
        Ok(out)
    }

    pub fn has_customer_permission(&self, username: &str, id: CustomerId) -> DomainResult<bool> {
        let user = self.relation_user(username)?;
        self.stores.relations.owns_customer(user.id, id)
    }

    pub fn assign_product(&self, ctx: &AuthContext, username: &str, id: ProductId) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationAssign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        self.ensure_product_exists(id)?;
        self.stores.relations.assign(user.id, ResourceKind::Product, id.into())
    }

    pub fn unassign_product(&self, ctx: &AuthContext, username: &str, id: ProductId) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationUnassign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        self.stores.relations.unassign(user.id, ResourceKind::Product, id.into())
    }

    pub fn assign_products(
        &self,
        ctx: &AuthContext,
        username: &str,
        ids: &[ProductId],
    ) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationAssign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        for &id in ids {
            self.ensure_product_exists(id)?;
        }
        let uuids: Vec<Uuid> = ids.iter().map(|&id| id.into()).collect();
        self.stores.relations.assign_many(user.id, ResourceKind::Product, &uuids)
    }

    pub fn unassign_products(
        &self,
        ctx: &AuthContext,
        username: &str,
        ids: &[ProductId],
    ) -> DomainResult<()> {
        authorize(ctx.role(), Action::RelationUnassign, Ownership::NotApplicable)?;
        let user = self.relation_user(username)?;
        let uuids: Vec<Uuid> = ids.iter().map(|&id| id.into()).collect();
        self.stores.relations.unassign_many(user.id, ResourceKind::Product, &uuids)
    }

    pub fn products_of(&self, username: &str) -> DomainResult<Vec<Product>> {
        let user = self.relation_user(username)?;
        let owned: HashSet<Uuid> = self
            .stores
            .relations
            .resources_for(user.id, ResourceKind::Product)?
            .into_iter()
            .collect();
        self.stores.products.list(|p| owned.contains(p.id.as_uuid()))
    }

    pub fn users_of_product(&self, id: ProductId) -> DomainResult<Vec<User>> {
        self.ensure_product_exists(id)?;
        let users = self.stores.relations.users_for(ResourceKind::Product, id.into())?;
        let mut out = Vec::with_capacity(users.len());
        for uid in users {
            if let Some(user) = self.stores.users.find_by_id(uid)? {
                out.push(user);
            }
        }
        Ok(out)
    }

    pub fn has_product_permission(&self, username: &str, id: ProductId) -> DomainResult<bool> {
        let user = self.relation_user(username)?;
        self.stores.relations.owns_product(user.id, id)
    }
}
