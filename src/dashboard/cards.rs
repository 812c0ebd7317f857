//! Cards summarising today's spending and the month so far.

use maud::{Markup, html};

use crate::{
    html::{CATEGORY_BADGE_STYLE, format_currency},
    summary::{MonthlySummary, TodaySummary},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-3";

pub(super) fn today_card(summary: &TodaySummary) -> Markup {
    html! {
        div id="today-card" class=(CARD_STYLE)
        {
            h3 class="text-lg font-semibold" { "Today" }

            p class="text-3xl font-bold tabular-nums" { (format_currency(summary.total_amount)) }

            @if summary.per_category.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" { "Nothing spent today." }
            } @else {
                ul class="space-y-1"
                {
                    @for entry in &summary.per_category {
                        li class="flex justify-between gap-4"
                        {
                            span
                                class=(CATEGORY_BADGE_STYLE)
                                style={ "background-color: " (entry.category.color()) }
                            {
                                (entry.category)
                            }
                            span class="tabular-nums" { (format_currency(entry.total_amount)) }
                        }
                    }
                }
            }
        }
    }
}

/// Expenses and savings for the month, and what is left to spend.
pub(super) fn month_card(summary: &MonthlySummary, month_label: &str) -> Markup {
    let remaining = summary.total_savings - summary.total_expenses;
    let remaining_style = if remaining < 0.0 {
        "tabular-nums text-red-700 dark:text-red-300"
    } else {
        "tabular-nums text-green-700 dark:text-green-300"
    };

    html! {
        div id="month-card" class=(CARD_STYLE)
        {
            div class="flex justify-between items-baseline"
            {
                h3 class="text-lg font-semibold" { "This month" }
                span class="text-sm text-gray-600 dark:text-gray-400" { "Since " (month_label) }
            }

            dl class="grid grid-cols-2 gap-2"
            {
                dt { "Expenses" }
                dd class="tabular-nums text-right" { (format_currency(summary.total_expenses)) }
                dt { "Savings" }
                dd class="tabular-nums text-right" { (format_currency(summary.total_savings)) }
                dt class="font-semibold" { "Remaining" }
                dd class={ "text-right font-semibold " (remaining_style) } { (format_currency(remaining)) }
            }
        }
    }
}

#[cfg(test)]
mod card_tests {
    use scraper::{Html, Selector};

    use crate::{
        dashboard::cards::{month_card, today_card},
        expense::Category,
        summary::{CategoryTotal, MonthlySummary, TodaySummary},
    };

    fn text_of(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[test]
    fn today_card_lists_categories() {
        let summary = TodaySummary {
            username: "alice".to_owned(),
            total_amount: 14.5,
            per_category: vec![
                CategoryTotal {
                    category: Category::Food,
                    total_amount: 12.0,
                },
                CategoryTotal {
                    category: Category::Transport,
                    total_amount: 2.5,
                },
            ],
        };

        let html = Html::parse_fragment(&today_card(&summary).into_string());

        assert_eq!(text_of(&html, "li span:first-child"), ["Food", "Transport"]);
        assert_eq!(text_of(&html, "p.text-3xl"), ["$14.50"]);
    }

    #[test]
    fn today_card_without_spending() {
        let summary = TodaySummary {
            username: "alice".to_owned(),
            total_amount: 0.0,
            per_category: vec![],
        };

        let html = Html::parse_fragment(&today_card(&summary).into_string());

        assert!(text_of(&html, "li").is_empty());
        assert_eq!(text_of(&html, "p.text-sm"), ["Nothing spent today."]);
    }

    #[test]
    fn month_card_shows_remaining_savings() {
        let summary = MonthlySummary {
            total_expenses: 120.0,
            total_savings: 500.0,
        };

        let html = Html::parse_fragment(&month_card(&summary, "01-03-2024").into_string());

        assert_eq!(text_of(&html, "dd"), ["$120.00", "$500.00", "$380.00"]);
    }

    #[test]
    fn month_card_shows_overspending_in_red() {
        let summary = MonthlySummary {
            total_expenses: 600.0,
            total_savings: 500.0,
        };

        let html = Html::parse_fragment(&month_card(&summary, "01-03-2024").into_string());

        let remaining = html
            .select(&Selector::parse("dd.font-semibold").unwrap())
            .next()
            .unwrap();
        assert!(remaining.value().attr("class").unwrap().contains("text-red-700"));
        assert_eq!(remaining.text().collect::<String>(), "-$100.00");
    }
}
