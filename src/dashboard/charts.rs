//! Stacked bar charts of daily spending per category.
//!
//! Each chart is an ECharts option object built with `charming` from a
//! [TimeSeries] and initialised by a small script in the page head.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, ItemStyle,
        JsFunction, Tooltip, Trigger,
    },
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, summary::TimeSeries};

/// A chart with the ID of the element it is drawn into.
pub(super) struct DashboardChart {
    /// The HTML element ID (kebab-case).
    pub id: &'static str,
    /// The ECharts options as JSON.
    pub options: String,
}

impl DashboardChart {
    /// Build a stacked bar chart of `series` drawn into the element `id`.
    pub(super) fn new(id: &'static str, title: &str, subtitle: &str, series: &TimeSeries) -> Self {
        Self {
            id,
            options: spending_chart(title, subtitle, series).to_string(),
        }
    }
}

pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-3 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        data-chart="true"
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// A script that draws every chart once the page has loaded and redraws them on resize.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let init_calls = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', () => chart.resize());
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{init_calls}\n}});"
    )))
}

/// One stacked bar per day, one bar segment per category.
pub(super) fn spending_chart(title: &str, subtitle: &str, series: &TimeSeries) -> Chart {
    let labels: Vec<String> = series.days.iter().map(ToString::to_string).collect();

    let mut chart = Chart::new()
        .title(Title::new().text(title).subtext(subtitle).left(20).top("1%"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(200).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for category in &series.series {
        chart = chart.series(
            bar::Bar::new()
                .name(category.label.as_str())
                .stack("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .item_style(ItemStyle::new().color(category.color.as_str()))
                .data(category.values.clone()),
        );
    }

    chart
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
