//! Alert messages shown in the alert container after a form submission.

use maud::{Markup, html};

/// A success or error message with some details for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation worked.
    Success {
        /// The headline.
        message: String,
        /// A longer description.
        details: String,
    },
    /// The operation failed.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (message, details, style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
            ),
        };

        html! {
            div
                role="alert"
                class={"flex items-start p-4 mb-4 text-sm border rounded-lg " (style)}
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty()
                    {
                        p { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-3 font-bold"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let markup = Alert::Error {
            message: "Invalid transaction".to_owned(),
            details: "Enter an amount".to_owned(),
        }
        .into_html()
        .into_string();

        let fragment = Html::parse_fragment(&markup);
        let selector = Selector::parse("div[role=alert] p").unwrap();
        let paragraphs = fragment
            .select(&selector)
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();

        assert_eq!(paragraphs, vec!["Invalid transaction", "Enter an amount"]);
    }

    #[test]
    fn empty_details_are_omitted() {
        let markup = Alert::Success {
            message: "Saved".to_owned(),
            details: String::new(),
        }
        .into_html()
        .into_string();

        let fragment = Html::parse_fragment(&markup);
        let selector = Selector::parse("p").unwrap();

        assert_eq!(fragment.select(&selector).count(), 1);
    }
}
