use scraper::{ElementRef, Html, Selector};

/// Get the form with the HTML ID `id`.
#[track_caller]
pub(crate) fn must_get_form<'a>(html: &'a Html, id: &str) -> ElementRef<'a> {
    html.select(&Selector::parse(&format!("form#{id}")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No form found with id {id}"))
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_post = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_post, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_post:?}"
    );
}

/// Check the form has an input or select named `name` of type `type_`.
///
/// Use `"select"` as `type_` for a select element.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str, required: bool) {
    let selector = if type_ == "select" {
        Selector::parse("select").unwrap()
    } else {
        Selector::parse("input").unwrap()
    };

    for input in form.select(&selector) {
        if input.value().attr("name").unwrap_or_default() != name {
            continue;
        }

        if type_ != "select" {
            let input_type = input.value().attr("type").unwrap_or_default();
            assert_eq!(
                input_type, type_,
                "want input with type \"{type_}\", got {input_type:?}"
            );
        }

        assert_eq!(
            input.value().attr("required").is_some(),
            required,
            "want input with name {name} to have required={required}"
        );

        return;
    }

    panic!("No input found with name \"{name}\" and type \"{type_}\"");
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let submit_button = form
        .select(&Selector::parse("button").unwrap())
        .next()
        .expect("No button found");

    assert_eq!(
        submit_button.value().attr("type").unwrap_or_default(),
        "submit",
        "want submit button with type=\"submit\""
    );
    let got_text = submit_button.text().collect::<Vec<_>>().join("");
    assert_eq!(text, got_text.trim());
}
