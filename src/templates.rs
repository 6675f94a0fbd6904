//! The "summary" and "expense" templates that make up a rendered summary.

use maud::{Markup, html};

use crate::{
    html::{
        ALERT_CONTAINER_SELECTOR, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    panels::ToggleControl,
    summary::{CategoryTotal, ExpenseRecord, GroupDetail},
};

/// Shown instead of a subtotal when the expense API did not send one.
pub const UNKNOWN_TOTAL: &str = "-";

/// Data for the summary header.
pub struct SummaryTemplate<'a> {
    /// The label of the selected month, `None` for the current month.
    pub year_and_month: Option<&'a str>,
    /// The sum of all expenses.
    pub total: f64,
}

pub fn summary_template(template: SummaryTemplate) -> Markup {
    html!(
        header class="summary-header w-full flex justify-between items-end mb-4"
        {
            h1 class="text-xl font-bold"
            {
                @match template.year_and_month {
                    Some(year_and_month) => {
                        "Expenses for "
                        span class="summary-period" { (year_and_month) }
                    }
                    None => {
                        "Expenses this month"
                    }
                }
            }

            p class="text-lg"
            {
                "Total: "
                span class="summary-total font-semibold" { (format_currency(template.total)) }
            }
        }
    )
}

/// Data for one group block.
pub struct ExpenseTemplate<'a> {
    /// The position of the block in the listing.
    pub index: usize,
    /// The group name.
    pub group: &'a str,
    /// The group's subtotal, if known.
    pub total: Option<f64>,
    /// The ID of the collapsible panel holding the group's details.
    pub panel_id: &'a str,
    /// The control that shows and hides the panel.
    pub toggle: &'a ToggleControl,
    /// Where the toggle control sends its requests.
    pub toggle_url: &'a str,
    /// The rendered group details, see [panel_body].
    pub body: &'a Markup,
}

pub fn expense_template(template: ExpenseTemplate) -> Markup {
    let total = template
        .total
        .map(format_currency)
        .unwrap_or_else(|| UNKNOWN_TOTAL.to_owned());

    html!(
        section
            class="group-block w-full mb-2 rounded border border-gray-200 bg-white
                dark:border-gray-700 dark:bg-gray-800"
            data-index=(template.index)
            data-group=(template.group)
        {
            div class="flex items-center gap-3 px-4 py-3"
            {
                (toggle_control(template.toggle, template.panel_id, template.toggle_url))

                h2 class="group-name flex-1 font-semibold" { (template.group) }

                span class="group-total tabular-nums" { (total) }
            }

            (panel(template.panel_id, template.toggle.is_open(), template.body, false))
        }
    )
}

/// The button that shows and hides the panel `panel_id`.
///
/// Clicking it posts to `toggle_url`, and the response replaces the button.
pub fn toggle_control(control: &ToggleControl, panel_id: &str, toggle_url: &str) -> Markup {
    let expanded = if control.is_open() { "true" } else { "false" };

    html!(
        button
            id=(control.id)
            type="button"
            class="toggle-control"
            hx-post=(toggle_url)
            hx-swap="outerHTML"
            hx-target-error=(ALERT_CONTAINER_SELECTOR)
            aria-controls=(panel_id)
            aria-expanded=(expanded)
        {
            span class=(control.icon_classes()) aria-hidden="true" {}
        }
    )
}

/// The collapsible region holding a group's details.
///
/// Set `out_of_band` to swap the panel into the page alongside another response.
pub fn panel(panel_id: &str, shown: bool, body: &Markup, out_of_band: bool) -> Markup {
    html!(
        div .collapse .show[shown] id=(panel_id) hx-swap-oob=[out_of_band.then_some("true")]
        {
            (body)
        }
    )
}

/// The details of a group: its category totals or its expenses.
pub fn panel_body(detail: &GroupDetail) -> Markup {
    match detail {
        GroupDetail::Categories(categories) => categories_table(categories),
        GroupDetail::Expenses(expenses) => expenses_table(expenses),
    }
}

fn categories_table(categories: &[CategoryTotal]) -> Markup {
    html!(
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                }
            }

            tbody
            {
                @for category in categories {
                    tr class=(TABLE_ROW_STYLE) data-category=(category.name)
                    {
                        td class=(TABLE_CELL_STYLE) { (category.name) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(category.total)) }
                    }
                }

                @if categories.is_empty() {
                    tr { td colspan="2" class=(TABLE_CELL_STYLE) { "No expenses" } }
                }
            }
        }
    )
}

fn expenses_table(expenses: &[ExpenseRecord]) -> Markup {
    html!(
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Cost" }
                }
            }

            tbody
            {
                @for expense in expenses {
                    tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
                    {
                        td class=(TABLE_CELL_STYLE) { (expense.created_at) }
                        td class=(TABLE_CELL_STYLE) { (expense.description) }
                        td class=(TABLE_CELL_STYLE) { (expense.category()) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(expense.cost)) }
                    }
                }

                @if expenses.is_empty() {
                    tr { td colspan="4" class=(TABLE_CELL_STYLE) { "No expenses" } }
                }
            }
        }
    )
}
