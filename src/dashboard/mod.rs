//! Dashboard module
//!
//! Provides an overview page with today's spending, the month's totals and
//! charts of recent daily spending per category.

mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
