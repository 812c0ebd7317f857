//! The expenses page: a filterable table of expenses and forms to add expenses and savings.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    expense::{
        Category, Expense,
        filter::{ALL_CATEGORIES, ExpenseQuery},
        list_expenses,
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency, loading_spinner,
    },
    navigation::NavBar,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expenses page.
///
/// An invalid filter is reported above the table and the table shows every expense.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = list_expenses(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not list expenses: {error}"))?;
    let categories = category_options(&expenses);

    let (shown, filter_error) = match query.parse() {
        Ok(filter) => (filter.apply(expenses), None),
        Err(error) => (expenses, Some(error.to_string())),
    };

    Ok(expenses_view(&shown, &categories, &query, filter_error.as_deref()).into_response())
}

/// The well-known categories followed by any other category the user has used.
fn category_options(expenses: &[Expense]) -> Vec<Category> {
    let mut categories = Category::KNOWN.to_vec();

    for expense in expenses {
        if !categories.contains(&expense.category) {
            categories.push(expense.category.clone());
        }
    }

    categories
}

fn expenses_view(
    expenses: &[Expense],
    categories: &[Category],
    query: &ExpenseQuery,
    filter_error: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4" id="expenses-content"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }
                    span class="text-sm" { "Total shown: " (format_currency(total)) }
                }

                (filter_form(categories, query, filter_error))

                div class="overflow-x-auto rounded"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for expense in expenses {
                                (expense_row_view(expense))
                            }

                            @if expenses.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No expenses to show."
                                    }
                                }
                            }
                        }
                    }
                }

                div class="grid grid-cols-1 lg:grid-cols-2 gap-8"
                {
                    (new_expense_form(categories))
                    (new_savings_form())
                }
            }
        }
    };

    base("Expenses", &[], &content)
}

fn expense_row_view(expense: &Expense) -> Markup {
    let delete_url = format_endpoint(endpoints::EXPENSE, expense.id);
    let confirm_message = format!(
        "Are you sure you want to delete the expense '{}'? This cannot be undone.",
        expense.name
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (expense.date) }
            td class=(TABLE_CELL_STYLE) { (expense.name) }
            td class=(TABLE_CELL_STYLE)
            {
                span
                    class=(CATEGORY_BADGE_STYLE)
                    style={ "background-color: " (expense.category.color()) }
                {
                    (expense.category)
                }
            }
            td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm=(confirm_message)
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn filter_form(
    categories: &[Category],
    query: &ExpenseQuery,
    filter_error: Option<&str>,
) -> Markup {
    let selected_category = query.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let start = query.start.as_deref().unwrap_or_default();
    let end = query.end.as_deref().unwrap_or_default();

    html! {
        form
            method="get"
            action=(endpoints::EXPENSES_VIEW)
            id="expense-filters"
            class="flex flex-wrap items-end gap-4 bg-gray-50 dark:bg-gray-800 p-4 rounded-lg"
        {
            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="filter-category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL_CATEGORIES) selected[selected_category == ALL_CATEGORIES]
                    {
                        (ALL_CATEGORIES)
                    }

                    @for category in categories {
                        option
                            value=(category)
                            selected[selected_category == category.as_str()]
                        {
                            (category)
                        }
                    }
                }
            }

            div
            {
                label for="filter-start" class=(FORM_LABEL_STYLE) { "From" }
                input type="date" id="filter-start" name="start" value=(start) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-end" class=(FORM_LABEL_STYLE) { "To" }
                input type="date" id="filter-end" name="end" value=(end) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
            }

            @if let Some(filter_error) = filter_error {
                p class="w-full text-red-500 text-base" { (filter_error) }
            }
        }
    }
}

fn new_expense_form(categories: &[Category]) -> Markup {
    html! {
        form
            id="new-expense"
            hx-post=(endpoints::EXPENSES_API)
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "Add an expense" }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                input type="text" id="name" name="name" required class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    type="number"
                    id="amount"
                    name="amount"
                    min="0"
                    step="0.01"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                input
                    type="text"
                    id="category"
                    name="category"
                    list="category-options"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
                datalist id="category-options"
                {
                    @for category in categories {
                        option value=(category) {}
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input type="date" id="date" name="date" required class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Add expense"
            }
        }
    }
}

fn new_savings_form() -> Markup {
    html! {
        form
            id="new-savings"
            hx-post=(endpoints::SAVINGS_API)
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "Add savings" }

            div
            {
                label for="savings-amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    type="number"
                    id="savings-amount"
                    name="amount"
                    min="0"
                    step="0.01"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="savings-date" class=(FORM_LABEL_STYLE) { "Date" }
                input type="date" id="savings-date" name="date" required class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add savings" }
        }
    }
}
