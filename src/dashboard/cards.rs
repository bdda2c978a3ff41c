//! Summary cards for the loan totals.

use maud::{Markup, html};

use crate::{html::format_currency, ledger::Aggregates};

fn summary_card(id: &str, title: &str, amount: f64, style: &str) -> Markup {
    html! {
        div
            id=(id)
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            p class={"text-2xl font-bold " (style)} { (format_currency(amount)) }
        }
    }
}

/// Renders the grid of loan totals.
pub(super) fn summary_cards_view(aggregates: &Aggregates) -> Markup {
    html! {
        section class="w-full grid grid-cols-2 md:grid-cols-3 lg:grid-cols-5 gap-4 mb-8"
        {
            (summary_card("current-principal", "Principal", aggregates.current_principal, ""))
            (summary_card("total-drawn", "Total drawn", aggregates.total_drawn, "text-red-600 dark:text-red-400"))
            (summary_card(
                "total-interest",
                "Total interest",
                aggregates.total_interest_accrued,
                "text-amber-600 dark:text-amber-400"
            ))
            (summary_card("total-repaid", "Total repaid", aggregates.total_repaid, "text-green-600 dark:text-green-400"))
            (summary_card("total-owed", "Total owed", aggregates.current_balance, "text-cyan-600 dark:text-cyan-400"))
        }
    }
}
