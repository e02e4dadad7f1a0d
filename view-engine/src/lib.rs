use serde::Serialize;
use session_core::{DashboardConfig, SessionRecord, SessionTable};
use tracing::debug;

pub mod charts;

pub use charts::{
    mean, metric_charts, normalize_to_population, outcome_tone, performance_tone,
    DistributionChart, DistributionSlice, EmbeddingChart, EvolutionChart, EvolutionPoint,
    LabeledPoint, MetricBar, MetricChart, RadarAxis, RadarChart, RADAR_REFERENCE,
};

/// KPI text shown while nothing is selected.
pub const PLACEHOLDER: &str = "--";
/// Field text when its column is absent or the cell is empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Semantic colour slot; the presentation layer maps it to a palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Accent,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub value: String,
    pub tone: Tone,
}

impl Kpi {
    fn new(value: impl Into<String>, tone: Tone) -> Self {
        Self {
            value: value.into(),
            tone,
        }
    }

    fn placeholder() -> Self {
        Self::new(PLACEHOLDER, Tone::Neutral)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub performance: Kpi,
    pub declared_state: Kpi,
    pub outcome: Kpi,
    pub sessions: Kpi,
}

impl Kpis {
    fn placeholder() -> Self {
        Self {
            performance: Kpi::placeholder(),
            declared_state: Kpi::placeholder(),
            outcome: Kpi::placeholder(),
            sessions: Kpi::placeholder(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulationSummary {
    pub subjects: usize,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub subject: String,
    pub age: String,
    pub height: String,
    pub level: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub session: String,
    pub performance: String,
    pub declared_state: String,
    pub outcome: String,
}

/// Everything the page shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewBundle {
    /// Selected subject, empty in the placeholder bundle.
    pub subject: String,
    pub summary: PopulationSummary,
    pub kpis: Kpis,
    pub recommendation: String,
    pub embedding: EmbeddingChart,
    pub evolution: EvolutionChart,
    pub metrics: MetricChart,
    pub radar: RadarChart,
    pub profile: Option<ProfileCard>,
    pub history: Vec<HistoryRow>,
    /// Population-wide, so it is filled in even without a selection.
    pub distribution: DistributionChart,
}

impl ViewBundle {
    pub fn is_placeholder(&self) -> bool {
        self.subject.is_empty()
    }
}

pub fn population_summary(table: &SessionTable) -> PopulationSummary {
    PopulationSummary {
        subjects: table.subjects().len(),
        records: table.len(),
    }
}

/// Bundle returned when nothing is selected or the selection has no records.
pub fn placeholder_view(table: &SessionTable, config: &DashboardConfig) -> ViewBundle {
    ViewBundle {
        subject: String::new(),
        summary: population_summary(table),
        kpis: Kpis::placeholder(),
        recommendation: String::new(),
        embedding: EmbeddingChart::default(),
        evolution: EvolutionChart::default(),
        metrics: MetricChart::default(),
        radar: RadarChart::default(),
        profile: None,
        history: Vec::new(),
        distribution: DistributionChart::build(table, &config.labels),
    }
}

/// Derive the full view for `selected`. Pure and total: unknown or empty selections
/// produce the placeholder bundle, absent columns degrade only their own field.
pub fn build_view(table: &SessionTable, selected: &str, config: &DashboardConfig) -> ViewBundle {
    let records = table.subject_records(selected);
    let (Some(first), Some(latest)) = (records.first().copied(), records.last().copied()) else {
        debug!(subject = selected, "no records for selection");
        return placeholder_view(table, config);
    };
    let labels = &config.labels;

    let performance = text_or_na(&latest.performance);
    let outcome = text_or_na(&latest.outcome);
    let kpis = Kpis {
        performance: Kpi::new(
            performance,
            latest
                .performance
                .as_deref()
                .map_or(Tone::Neutral, |v| performance_tone(v, labels)),
        ),
        declared_state: Kpi::new(text_or_na(&latest.declared_state), Tone::Neutral),
        outcome: Kpi::new(
            outcome,
            latest
                .outcome
                .as_deref()
                .map_or(Tone::Neutral, |v| outcome_tone(v, labels)),
        ),
        sessions: Kpi::new(records.len().to_string(), Tone::Accent),
    };

    let recommendation = latest
        .recommendation
        .clone()
        .unwrap_or_else(|| labels.no_recommendation.clone());

    let (metrics, radar) = metric_charts(table, &records);

    ViewBundle {
        subject: selected.to_string(),
        summary: population_summary(table),
        kpis,
        recommendation,
        embedding: EmbeddingChart::build(table, &records),
        evolution: EvolutionChart::build(table, &records, &config.performance_ticks),
        metrics,
        radar,
        profile: Some(profile_card(selected, first)),
        history: records.iter().map(|r| history_row(r)).collect(),
        distribution: DistributionChart::build(table, labels),
    }
}

/// Profile fields come from the first session, not the latest.
fn profile_card(subject: &str, first: &SessionRecord) -> ProfileCard {
    ProfileCard {
        subject: subject.to_string(),
        age: text_or_na(&first.profile.age),
        height: text_or_na(&first.profile.height),
        level: text_or_na(&first.profile.level),
        frequency: text_or_na(&first.profile.frequency),
    }
}

fn history_row(record: &SessionRecord) -> HistoryRow {
    let session = record
        .session_label
        .clone()
        .or_else(|| record.session.map(|s| s.to_string()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    HistoryRow {
        session,
        performance: text_or_na(&record.performance),
        declared_state: text_or_na(&record.declared_state),
        outcome: text_or_na(&record.outcome),
    }
}

fn text_or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
