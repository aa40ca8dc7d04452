//! `orderdesk-infra` — the storage collaborator.
//!
//! In-process stores with the contract the core expects: atomic find/save/
//! exists/delete per entity, plus the ownership-relation store. Every
//! mutating call takes a single write lock for its whole read-guard-write
//! span, so two concurrent guard evaluations on the same entity cannot
//! interleave.

pub mod customers;
pub mod products;
pub mod relations;
pub mod sells;
pub mod users;

pub use customers::InMemoryCustomers;
pub use products::InMemoryProducts;
pub use relations::{InMemoryRelations, ResourceKind};
pub use sells::InMemorySells;
pub use users::InMemoryUsers;

/// All stores bundled for wiring into the API layer.
#[derive(Default)]
pub struct Stores {
    pub users: InMemoryUsers,
    pub customers: InMemoryCustomers,
    pub products: InMemoryProducts,
    pub sells: InMemorySells,
    pub relations: InMemoryRelations,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}
