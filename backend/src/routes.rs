use std::sync::Arc;
use std::time::Instant;

use app_shell::{Palette, SelectorState};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use session_core::{DashboardConfig, Dataset, DatasetError};
use tower_http::trace::TraceLayer;
use tracing::debug;
use view_engine::ViewBundle;

/// Why the dashboard is running without data.
#[derive(Debug, Clone)]
pub struct MissingData {
    pub problem: String,
    pub steps: Vec<String>,
}

impl From<&DatasetError> for MissingData {
    fn from(err: &DatasetError) -> Self {
        Self {
            problem: err.to_string(),
            steps: err.remediation(),
        }
    }
}

/// Read-only after startup; cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub dataset: Arc<Dataset>,
    pub config: Arc<DashboardConfig>,
    pub palette: Arc<Palette>,
    pub missing: Option<Arc<MissingData>>,
}

impl ServerState {
    pub fn ready(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
            palette: Arc::new(Palette::dark()),
            missing: None,
        }
    }

    /// Empty table; pages render the remediation steps instead of the dashboard.
    pub fn degraded(err: &DatasetError, config: DashboardConfig) -> Self {
        Self {
            missing: Some(Arc::new(MissingData::from(err))),
            ..Self::ready(Dataset::default(), config)
        }
    }

    /// Initial selection, overridden by `?subject=`; an empty value clears it.
    fn selector(&self, requested: Option<&str>) -> SelectorState {
        let mut selector = SelectorState::new(self.dataset.subjects.clone());
        match requested {
            Some("") => selector.clear(),
            Some(subject) => selector.select(subject),
            None => {}
        }
        selector
    }

    fn view(&self, subject: &str) -> ViewBundle {
        view_engine::build_view(&self.dataset.table, subject, &self.config)
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubjectsResponse {
    pub subjects: Vec<String>,
    pub initial: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
    pub subjects: usize,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/subjects", get(subjects_handler))
        .route("/api/view", get(view_handler))
        .route("/api/health", get(health_handler))
        .route("/fragments/panels", get(panels_handler))
        .route("/assets/theme.css", get(stylesheet_handler))
        .route("/assets/dashboard.js", get(script_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(
    State(state): State<ServerState>,
    Query(params): Query<ViewParams>,
) -> Html<String> {
    if let Some(missing) = &state.missing {
        return Html(ui::render_missing_data(&missing.problem, &missing.steps));
    }
    let selector = state.selector(params.subject.as_deref());
    let bundle = state.view(selector.selected());
    Html(ui::render_dashboard(&selector, &state.palette, &bundle))
}

async fn subjects_handler(State(state): State<ServerState>) -> Json<SubjectsResponse> {
    let selector = state.selector(None);
    Json(SubjectsResponse {
        initial: selector.selected().to_string(),
        subjects: selector.options().to_vec(),
    })
}

/// Rebuilds the whole bundle on every call; a missing `subject` yields the placeholder.
async fn view_handler(
    State(state): State<ServerState>,
    Query(params): Query<ViewParams>,
) -> Json<ViewBundle> {
    let subject = params.subject.unwrap_or_default();
    let started = Instant::now();
    let bundle = state.view(&subject);
    debug!(
        subject = %subject,
        placeholder = bundle.is_placeholder(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "view built"
    );
    Json(bundle)
}

/// Server-rendered text widgets for one selection.
async fn panels_handler(
    State(state): State<ServerState>,
    Query(params): Query<ViewParams>,
) -> Html<String> {
    let subject = params.subject.unwrap_or_default();
    Html(ui::render_panels(&state.view(&subject)))
}

async fn health_handler(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.missing.is_some() {
            "degraded"
        } else {
            "ok"
        },
        records: state.dataset.table.len(),
        subjects: state.dataset.subjects.len(),
    })
}

async fn stylesheet_handler(State(state): State<ServerState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        ui::stylesheet(&state.palette),
    )
}

async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        ui::DASHBOARD_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_core::{parse_csv, ColumnMap, SessionTable};
    use std::path::PathBuf;

    fn sample_state() -> ServerState {
        let raw = parse_csv(
            "player_name_clean,partido_num,nivel_rendimiento,evaluacion\n\
             Leo,1,High,accurate\n\
             Ana,1,High,accurate\n\
             Ana,2,Low,overestimated\n\
             Ana,3,Medium,underestimated\n",
        )
        .unwrap();
        let table = SessionTable::from_raw(&raw, &ColumnMap::default());
        ServerState::ready(Dataset::from_table(table), DashboardConfig::default())
    }

    #[tokio::test]
    async fn view_for_known_subject() {
        let Json(bundle) = view_handler(
            State(sample_state()),
            Query(ViewParams {
                subject: Some("Ana".into()),
            }),
        )
        .await;
        assert_eq!(bundle.subject, "Ana");
        assert_eq!(bundle.kpis.performance.value, "Medium");
        assert_eq!(bundle.history.len(), 3);
    }

    #[tokio::test]
    async fn view_without_subject_is_placeholder() {
        let state = sample_state();
        let Json(none) = view_handler(State(state.clone()), Query(ViewParams { subject: None })).await;
        let Json(unknown) = view_handler(
            State(state),
            Query(ViewParams {
                subject: Some("Carla".into()),
            }),
        )
        .await;
        assert!(none.is_placeholder());
        assert_eq!(none, unknown);
        assert_eq!(none.distribution.total(), 4);
    }

    #[tokio::test]
    async fn subjects_are_sorted_with_first_as_initial() {
        let Json(resp) = subjects_handler(State(sample_state())).await;
        assert_eq!(resp.subjects, vec!["Ana".to_string(), "Leo".to_string()]);
        assert_eq!(resp.initial, "Ana");
    }

    #[tokio::test]
    async fn subject_query_preselects_and_empty_clears() {
        let state = sample_state();
        let selector = state.selector(Some("Leo"));
        assert_eq!(selector.selected(), "Leo");
        let Html(page) = index_handler(
            State(state.clone()),
            Query(ViewParams {
                subject: Some("Leo".into()),
            }),
        )
        .await;
        assert!(page.contains("kpi-value tone-success"));

        let cleared = state.selector(Some(""));
        assert!(!cleared.has_selection());
        assert_eq!(state.selector(None).selected(), "Ana");
    }

    #[tokio::test]
    async fn panels_follow_the_requested_subject() {
        let state = sample_state();
        let Html(ana) = panels_handler(
            State(state.clone()),
            Query(ViewParams {
                subject: Some("Ana".into()),
            }),
        )
        .await;
        assert!(ana.contains("profile-name"));
        assert!(ana.contains("underestimated"));

        let Html(none) = panels_handler(State(state), Query(ViewParams { subject: None })).await;
        assert!(!none.contains("profile-name"));
        assert!(none.contains("Total records: "));
    }

    #[tokio::test]
    async fn degraded_mode_serves_instructions() {
        let err = DatasetError::Missing {
            path: PathBuf::from("datos_dashboard.csv"),
        };
        let state = ServerState::degraded(&err, DashboardConfig::default());

        let Html(page) = index_handler(State(state.clone()), Query(ViewParams { subject: None })).await;
        assert!(page.contains("Data not available"));
        assert!(page.contains("datos_dashboard.csv"));

        let Json(health) = health_handler(State(state.clone())).await;
        assert_eq!(health.status, "degraded");
        assert_eq!(health.records, 0);

        let Json(bundle) = view_handler(
            State(state),
            Query(ViewParams {
                subject: Some("Ana".into()),
            }),
        )
        .await;
        assert!(bundle.is_placeholder());
    }

    #[tokio::test]
    async fn index_renders_dashboard_when_ready() {
        let Html(page) = index_handler(State(sample_state()), Query(ViewParams { subject: None })).await;
        assert!(page.contains("subject-selector"));
        // Ana is first alphabetically and her latest session is "Medium".
        assert!(page.contains("kpi-value tone-warning"));
        let Json(health) = health_handler(State(sample_state())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.subjects, 2);
    }
}
