//! The form used to create and edit expenses.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    date_key::DateKey,
    expense::{Category, ExpenseFields, parse_amount},
};

/// Expense fields as typed into a form, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// What the money was spent on.
    pub name: String,
    /// The amount in dollars.
    pub amount: String,
    /// The category name.
    pub category: String,
    /// The day, as YYYY-MM-DD or DD-MM-YYYY.
    pub date: String,
}

impl ExpenseForm {
    /// Validate every field.
    ///
    /// # Errors
    /// Returns the first validation error, checking the name, amount,
    /// category and date in that order.
    pub fn into_fields(&self) -> Result<ExpenseFields, Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyExpenseName);
        }

        let amount = parse_amount(&self.amount)?;
        let category = Category::new(&self.category)?;
        let date = DateKey::parse_input(&self.date)?;

        ExpenseFields::new(&self.name, amount, category, date)
    }
}
