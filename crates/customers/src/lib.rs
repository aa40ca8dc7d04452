//! `orderdesk-customers` — customer records.

pub mod customer;

pub use customer::{Customer, CustomerDraft};
