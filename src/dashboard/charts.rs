//! The principal balance chart.
//!
//! Charts are built as ECharts options with charming and initialised by a
//! script in the page head.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};
use maud::PreEscaped;

use crate::{html::HeadElement, settings::Theme};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript that initialises each chart in `theme` and resizes it with the window.
pub(super) fn charts_script(charts: &[DashboardChart], theme: Theme) -> HeadElement {
    let echarts_theme = match theme {
        Theme::Dark => "dark",
        Theme::Light => "default",
    };

    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom, "{}");
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, echarts_theme, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A line chart of the principal balance at each of `points`, given as `(date, principal)`.
pub(super) fn principal_chart(points: &[(String, f64)]) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = points.iter().cloned().unzip();

    Chart::new()
        .title(
            Title::new()
                .text("Principal")
                .subtext("Most recent transactions"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Principal").data(values))
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('th-TH', {
              style: 'currency',
              currency: 'THB'
            });
            return currencyFormatter.format(number);",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line))
}
