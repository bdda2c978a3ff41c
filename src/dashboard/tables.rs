//! The table of ledger entries.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    ledger::{LedgerEntry, TransactionType},
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";
const TABLE_CELL_AMBER_STYLE: &str = "text-amber-600 dark:text-amber-400";

/// Repayments reduce what is owed, so they are green. Draws and interest add to it.
fn amount_color_class(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Repayment => TABLE_CELL_GREEN_STYLE,
        TransactionType::Draw => TABLE_CELL_RED_STYLE,
        TransactionType::InterestCharge => TABLE_CELL_AMBER_STYLE,
    }
}

fn format_interest(interest_accrued: f64) -> String {
    if interest_accrued == 0.0 {
        "-".to_owned()
    } else {
        format_currency(interest_accrued)
    }
}

/// Renders `entries` in the order given.
pub(super) fn transactions_table(entries: &[LedgerEntry]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            table
                id="transactions-table"
                class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Principal" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Interest" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Total owed" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                    }
                }

                tbody
                {
                    @for entry in entries {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} { (entry.date) }
                            td class=(TABLE_CELL_STYLE) { (entry.kind.label()) }
                            td class={(TABLE_CELL_STYLE) " text-right " (amount_color_class(entry.kind))}
                            {
                                (format_currency(entry.amount))
                            }
                            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(entry.principal_balance)) }
                            td class={(TABLE_CELL_STYLE) " text-right"} { (format_interest(entry.interest_accrued)) }
                            td class={(TABLE_CELL_STYLE) " text-right font-semibold"} { (format_currency(entry.balance)) }
                            td class=(TABLE_CELL_STYLE) { (entry.notes.as_deref().unwrap_or_default()) }
                        }
                    }

                    @if entries.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="7" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions yet. Record a draw below to get started."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::ledger::{LedgerEntry, TransactionType};

    use super::transactions_table;

    #[test]
    fn one_row_per_entry() {
        let entries = [
            LedgerEntry {
                id: 2,
                date: date!(2024 - 01 - 31),
                kind: TransactionType::InterestCharge,
                amount: 50.0,
                balance: 1050.0,
                principal_balance: 1000.0,
                interest_accrued: 50.0,
                notes: Some("Monthly interest (5%)".to_owned()),
                interest_rate: 5.0,
            },
            LedgerEntry {
                id: 1,
                date: date!(2024 - 01 - 01),
                kind: TransactionType::Draw,
                amount: 1000.0,
                balance: 1000.0,
                principal_balance: 1000.0,
                interest_accrued: 0.0,
                notes: None,
                interest_rate: 5.0,
            },
        ];

        let html = Html::parse_fragment(&transactions_table(&entries).into_string());
        let rows: Vec<String> = html
            .select(&Selector::parse("tbody tr").unwrap())
            .map(|row| row.text().collect::<String>())
            .collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("2024-01-31"), "got {}", rows[0]);
        assert!(rows[0].contains("Interest"), "got {}", rows[0]);
        assert!(rows[0].contains("Monthly interest (5%)"), "got {}", rows[0]);
        assert!(rows[1].contains("Draw"), "got {}", rows[1]);
    }

    #[test]
    fn interest_column_shows_dash_without_interest() {
        let entries = [
            LedgerEntry {
                id: 2,
                date: date!(2024 - 01 - 31),
                kind: TransactionType::InterestCharge,
                amount: 50.0,
                balance: 1050.0,
                principal_balance: 1000.0,
                interest_accrued: 50.0,
                notes: None,
                interest_rate: 5.0,
            },
            LedgerEntry {
                id: 1,
                date: date!(2024 - 01 - 01),
                kind: TransactionType::Draw,
                amount: 100.0,
                balance: 100.0,
                principal_balance: 100.0,
                interest_accrued: 0.0,
                notes: None,
                interest_rate: 5.0,
            },
        ];

        let html = Html::parse_fragment(&transactions_table(&entries).into_string());
        let interest_cells: Vec<String> = html
            .select(&Selector::parse("tbody tr td:nth-child(5)").unwrap())
            .map(|cell| cell.text().collect::<String>())
            .collect();

        assert_eq!(interest_cells, vec!["฿50.00", "-"]);
    }

    #[test]
    fn empty_table_shows_prompt() {
        let html = Html::parse_fragment(&transactions_table(&[]).into_string());
        let text = html
            .select(&Selector::parse("tbody").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();

        assert!(text.contains("No transactions yet"), "got {text}");
    }
}
