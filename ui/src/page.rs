use app_shell::{Palette, SelectorState};
use leptos::ssr::render_to_string;
use leptos::*;
use serde_json::json;
use view_engine::ViewBundle;

use crate::components::{Card, ChartCard, Panels};

pub const PAGE_TITLE: &str = "Session Performance Dashboard";
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const DOCTYPE: &str = "<!DOCTYPE html>";

#[component]
fn Document(children: Children) -> impl IntoView {
    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width,initial-scale=1"/>
                <title>{PAGE_TITLE}</title>
                <link rel="stylesheet" href="/assets/theme.css"/>
            </head>
            <body>{children()}</body>
        </html>
    }
}

#[component]
fn SubjectSelector(selector: SelectorState) -> impl IntoView {
    let selected = selector.selected().to_string();
    let options = selector
        .options()
        .iter()
        .map(|subject| {
            let is_selected = *subject == selected;
            view! { <option value=subject.clone() selected=is_selected>{subject.clone()}</option> }
        })
        .collect_view();
    view! {
        <Card header="Select subject">
            <select id="subject-selector">
                <option value="">"Select a subject..."</option>
                {options}
            </select>
        </Card>
    }
}

/// Whole dashboard with the text panels already filled for `bundle`; the client
/// bridge draws the charts and swaps `#panels` on every selection change.
#[component]
pub fn DashboardPage(selector: SelectorState, palette: Palette, bundle: ViewBundle) -> impl IntoView {
    let boot = json!({ "palette": palette, "initial": selector.selected() }).to_string();
    view! {
        <Document>
            <main class="dashboard" id="dashboard" data-boot=boot>
                <header>
                    <h1 class="page-title">{PAGE_TITLE}</h1>
                    <p class="page-subtitle">
                        "Physical metrics, clustering and measured performance against declared state"
                    </p>
                </header>
                <SubjectSelector selector=selector/>
                <section class="panels" id="panels">
                    <Panels bundle=bundle/>
                </section>
                <div class="row row-2">
                    <ChartCard header="Embedding clusters - subject position" id="chart-embedding"/>
                    <ChartCard header="Performance evolution" id="chart-evolution"/>
                </div>
                <div class="row row-2">
                    <ChartCard header="Average physical metrics" id="chart-metrics"/>
                    <ChartCard header="Comparison with population average" id="chart-radar"/>
                </div>
                <ChartCard header="Evaluation distribution - all subjects" id="chart-distribution"/>
                <footer class="footer">"Session performance analytics"</footer>
            </main>
            <script src=PLOTLY_CDN></script>
            <script src="/assets/dashboard.js"></script>
        </Document>
    }
}

#[component]
pub fn MissingDataPage(problem: String, steps: Vec<String>) -> impl IntoView {
    view! {
        <Document>
            <div class="notice card">
                <div class="card-body">
                    <h1>"Data not available"</h1>
                    <hr/>
                    <p class="lead">{problem}</p>
                    <h4>"Steps to fix:"</h4>
                    <ol class="lead">
                        {steps.into_iter().map(|step| view! { <li>{step}</li> }).collect_view()}
                    </ol>
                </div>
            </div>
        </Document>
    }
}

pub fn render_dashboard(selector: &SelectorState, palette: &Palette, bundle: &ViewBundle) -> String {
    let (selector, palette, bundle) = (selector.clone(), palette.clone(), bundle.clone());
    let body = render_to_string(move || {
        view! { <DashboardPage selector=selector palette=palette bundle=bundle/> }
    });
    format!("{DOCTYPE}{body}")
}

/// Markup for `#panels` alone.
pub fn render_panels(bundle: &ViewBundle) -> String {
    let bundle = bundle.clone();
    render_to_string(move || view! { <Panels bundle=bundle/> }).to_string()
}

/// Shown instead of the dashboard when the dataset could not be loaded.
pub fn render_missing_data(problem: &str, steps: &[String]) -> String {
    let (problem, steps) = (problem.to_string(), steps.to_vec());
    let body = render_to_string(move || view! { <MissingDataPage problem=problem steps=steps/> });
    format!("{DOCTYPE}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_core::{parse_csv, ColumnMap, DashboardConfig, SessionTable};

    fn bundle_for(subject: &str) -> ViewBundle {
        let raw = parse_csv(
            "player_name_clean,partido_num,nivel_rendimiento,evaluacion,recomendacion\n\
             Ana,1,High,accurate,Keep going\n\
             Ana,2,Low,overestimated,Rest more\n\
             Leo,1,Medium,accurate,\n",
        )
        .unwrap();
        let table = SessionTable::from_raw(&raw, &ColumnMap::default());
        view_engine::build_view(&table, subject, &DashboardConfig::default())
    }

    fn option_tag<'a>(html: &'a str, value: &str) -> &'a str {
        let needle = format!(r#"value="{value}""#);
        html.split("<option")
            .find(|tag| tag.contains(&needle))
            .and_then(|tag| tag.split('>').next())
            .unwrap()
    }

    #[test]
    fn dashboard_marks_initial_selection() {
        let selector = SelectorState::new(vec!["Leo".into(), "Ana".into()]);
        let html = render_dashboard(&selector, &Palette::dark(), &bundle_for("Ana"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(option_tag(&html, "Ana").contains("selected"));
        assert!(!option_tag(&html, "Leo").contains("selected"));
        assert!(html.contains(r#"id="chart-radar""#));
        assert!(html.contains("data-boot="));
        assert!(html.contains("/assets/dashboard.js"));
    }

    #[test]
    fn initial_panels_are_server_rendered() {
        let selector = SelectorState::new(vec!["Ana".into(), "Leo".into()]);
        let html = render_dashboard(&selector, &Palette::dark(), &bundle_for("Ana"));
        assert!(html.contains("Rest more"));
        assert!(html.contains("kpi-value tone-danger"));
        assert!(html.contains(r#"class="history""#));
    }

    #[test]
    fn subject_names_are_escaped() {
        let selector = SelectorState::new(vec![r#"Ana & "Leo""#.into()]);
        let html = render_dashboard(&selector, &Palette::dark(), &bundle_for(""));
        assert!(html.contains(r#"value="Ana &amp; &quot;Leo&quot;""#));
        assert!(html.contains("Ana &amp; "));
    }

    #[test]
    fn placeholder_panels_have_no_history() {
        let html = render_panels(&bundle_for(""));
        assert_eq!(html.matches("kpi-value tone-neutral").count(), 4);
        assert!(html.contains("Total subjects: "));
        assert!(!html.contains(r#"class="history""#));
        assert!(!html.contains("profile-name"));
    }

    #[test]
    fn missing_data_page_lists_steps() {
        let steps = vec!["Run the notebook.".to_string(), "Restart.".to_string()];
        let html = render_missing_data("dataset <x.csv> not found", &steps);
        assert!(html.contains("Data not available"));
        assert!(html.contains("Run the notebook."));
        assert!(html.contains("Restart."));
        assert!(html.contains("&lt;x.csv&gt;"));
        assert!(!html.contains("subject-selector"));
    }
}
