//! The navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::{endpoints, settings::Theme};

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-cyan-700 rounded-sm md:bg-transparent
        md:text-cyan-700 md:p-0 dark:text-white md:dark:text-cyan-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        md:hover:bg-transparent md:border-0 md:hover:text-cyan-700 md:p-0
        dark:text-white md:dark:hover:text-cyan-500 dark:hover:bg-gray-700
        dark:hover:text-white md:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")] { (self.title) } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    theme: Theme,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    /// `theme` is the current theme, the toggle button switches to the other one.
    pub fn new(active_endpoint: &str, theme: Theme) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::SETTINGS_VIEW,
                title: "Settings",
                is_current: active_endpoint == endpoints::SETTINGS_VIEW,
            },
        ];

        NavBar { links, theme }
    }

    pub fn into_html(self) -> Markup {
        let next_theme = self.theme.toggled();
        let toggle_label = match next_theme {
            Theme::Dark => "Dark mode",
            Theme::Light => "Light mode",
        };

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Loan Ledger"
                        }
                    }

                    div class="flex items-center gap-6"
                    {
                        ul
                            class="font-medium flex flex-row space-x-6 rtl:space-x-reverse"
                        {
                            @for link in self.links {
                                li { (link.into_html()) }
                            }
                        }

                        form
                            id="theme-form"
                            hx-post=(endpoints::THEME)
                            hx-target-error="#alert-container"
                        {
                            input type="hidden" name="theme" value=(next_theme.as_str());

                            button
                                type="submit"
                                class="text-sm px-3 py-1 rounded border border-gray-300
                                    dark:border-gray-600 text-gray-700 dark:text-gray-200
                                    hover:bg-gray-100 dark:hover:bg-gray-700"
                            {
                                (toggle_label)
                            }
                        }
                    }
                }
            }
        )
    }
}
