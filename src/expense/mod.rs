//! Expense records: the store, the JSON endpoints and the expenses page.

mod category;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod expenses_page;
mod filter;
mod form;
mod list_endpoint;

pub use category::Category;
pub use core::{
    Expense, ExpenseFields, create_expense, create_expense_table, delete_expense, get_expense,
    list_expenses, parse_amount, update_expense, validate_amount,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use expenses_page::get_expenses_page;
pub use list_endpoint::list_expenses_endpoint;
