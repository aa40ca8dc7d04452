//! `orderdesk-products` — product catalog records.

pub mod product;

pub use product::{ExpiryMonth, Product, ProductDraft};
