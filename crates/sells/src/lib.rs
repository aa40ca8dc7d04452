//! `orderdesk-sells` — sell orders and their approval/payment lifecycle.

pub mod sell;

pub use sell::{Sell, SellDraft, SellFilter};
