//! Savings records: the money a user sets aside, which caps what they may spend.

mod core;
mod create_endpoint;
mod list_endpoint;

pub use core::{Savings, create_savings, create_savings_table, list_savings};
pub use create_endpoint::create_savings_endpoint;
pub use list_endpoint::list_savings_endpoint;
