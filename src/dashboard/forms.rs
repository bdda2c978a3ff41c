//! Forms and buttons for changing the ledger from the dashboard.

use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, format_currency, format_rate,
        loading_spinner,
    },
};

/// The form for recording a draw or repayment, dated `today` by default.
pub(super) fn transaction_form(today: Date) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            id="transaction-form"
            hx-post=(endpoints::TRANSACTIONS)
            hx-target-error="#alert-container"
            class=(FORM_CONTAINER_STYLE)
        {
            h3 class="text-lg font-semibold" { "Record a transaction" }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="type" id="type" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="Draw" selected { "Draw (lend more)" }
                    option value="Repayment" { "Repayment" }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount (฿)" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

                input
                    name="notes"
                    id="notes"
                    type="text"
                    placeholder="Optional"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                "Save"
            }
        }
    }
}

/// The form for charging interest at `rate` percent.
///
/// `rate` is `None` if the stored rate is invalid. `preview` is the interest
/// that would be charged now, or `None` if nothing can be charged, in which
/// case the button is disabled.
pub(super) fn interest_form(today: Date, rate: Option<f64>, preview: Option<f64>) -> Markup {
    let confirm = rate.zip(preview).map(|(rate, amount)| {
        format!(
            "Charge {} interest for {}?",
            format_rate(rate),
            format_currency(amount)
        )
    });

    html! {
        form
            id="interest-form"
            hx-post=(endpoints::INTEREST)
            hx-target-error="#alert-container"
            hx-confirm=[confirm]
            class=(FORM_CONTAINER_STYLE)
        {
            h3 class="text-lg font-semibold" { "Charge interest" }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                @match (rate, preview) {
                    (None, _) => {
                        "The stored interest rate is not valid. Fix it on the "
                        a href=(endpoints::SETTINGS_VIEW) class="underline" { "settings page" }
                        "."
                    }
                    (Some(rate), Some(amount)) => {
                        "Charges " (format_rate(rate)) " of the principal: " (format_currency(amount)) "."
                    }
                    (Some(_), None) => { "There is no principal to charge interest on." }
                }
            }

            div
            {
                label for="interest-date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="interest-date"
                    type="date"
                    value=(today)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" disabled[rate.is_none() || preview.is_none()] class=(BUTTON_SECONDARY_STYLE)
            {
                "Charge Interest"
            }
        }
    }
}

/// Links for exporting and resetting the ledger.
pub(super) fn ledger_actions() -> Markup {
    html! {
        div class="w-full flex flex-col sm:flex-row gap-4"
        {
            a
                id="export-link"
                href=(endpoints::EXPORT_API)
                download
                class={(BUTTON_SECONDARY_STYLE) " text-center"}
            {
                "Export CSV"
            }

            button
                id="reset-button"
                type="button"
                hx-delete=(endpoints::RESET_API)
                hx-swap="none"
                hx-confirm="Delete every transaction and restore the default settings? This cannot be undone."
                class=(BUTTON_DELETE_STYLE)
            {
                "Reset Ledger"
            }
        }
    }
}

/// Reloads the page after the ledger is reset, since the reset endpoint only returns JSON.
pub(super) fn reset_script() -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(
        r#"document.addEventListener('DOMContentLoaded', function() {
            document.body.addEventListener('htmx:afterRequest', function(event) {
                if (event.detail.elt.id === 'reset-button' && event.detail.successful) {
                    window.location.reload();
                }
            });
        });"#
            .to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::{assert_form_input, assert_hx_endpoint, must_get_form},
    };

    use super::{interest_form, ledger_actions, transaction_form};

    #[test]
    fn transaction_form_has_inputs() {
        let html = Html::parse_fragment(&transaction_form(date!(2024 - 05 - 01)).into_string());
        let form = must_get_form(&html, "transaction-form");

        assert_hx_endpoint(&form, endpoints::TRANSACTIONS, "hx-post");
        assert_form_input(&form, "type", "select", true);
        assert_form_input(&form, "amount", "number", true);
        assert_form_input(&form, "date", "date", true);
        assert_form_input(&form, "notes", "text", false);
    }

    #[test]
    fn interest_form_confirms_amount() {
        let html =
            Html::parse_fragment(&interest_form(date!(2024 - 05 - 01), Some(5.0), Some(50.0)).into_string());
        let form = must_get_form(&html, "interest-form");

        assert_hx_endpoint(&form, endpoints::INTEREST, "hx-post");
        assert_eq!(
            form.value().attr("hx-confirm"),
            Some("Charge 5% interest for ฿50.00?")
        );
        assert_form_input(&form, "date", "date", false);
    }

    #[test]
    fn interest_button_disabled_without_principal() {
        let html =
            Html::parse_fragment(&interest_form(date!(2024 - 05 - 01), Some(5.0), None).into_string());
        let form = must_get_form(&html, "interest-form");
        let button = form
            .select(&Selector::parse("button").unwrap())
            .next()
            .unwrap();

        assert!(button.value().attr("disabled").is_some());
        assert_eq!(form.value().attr("hx-confirm"), None);
    }

    #[test]
    fn invalid_rate_links_to_settings() {
        let html =
            Html::parse_fragment(&interest_form(date!(2024 - 05 - 01), None, None).into_string());
        let form = must_get_form(&html, "interest-form");
        let link = form
            .select(&Selector::parse("a").unwrap())
            .next()
            .expect("want a link to the settings page");
        let button = form
            .select(&Selector::parse("button").unwrap())
            .next()
            .unwrap();

        assert_eq!(link.value().attr("href"), Some(endpoints::SETTINGS_VIEW));
        assert!(button.value().attr("disabled").is_some());
    }

    #[test]
    fn reset_button_deletes() {
        let html = Html::parse_fragment(&ledger_actions().into_string());
        let button = html
            .select(&Selector::parse("#reset-button").unwrap())
            .next()
            .unwrap();

        assert_eq!(button.value().attr("hx-delete"), Some(endpoints::RESET_API));
    }
}
