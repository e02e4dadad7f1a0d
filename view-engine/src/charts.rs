use std::collections::BTreeMap;

use serde::Serialize;
use session_core::{EmbeddingPoint, Labels, PerformanceTick, SessionRecord, SessionTable};

use crate::Tone;

/// Value every radar axis is compared against (the population average).
pub const RADAR_REFERENCE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledPoint {
    pub x: f64,
    pub y: f64,
    pub session: Option<i64>,
    /// 1-based session rank, e.g. "P3".
    pub label: String,
}

/// Whole population in the background, selected subject highlighted on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmbeddingChart {
    pub background: Vec<EmbeddingPoint>,
    pub highlighted: Vec<LabeledPoint>,
}

impl EmbeddingChart {
    pub fn build(table: &SessionTable, subject: &[&SessionRecord]) -> Self {
        if !table.capabilities().has_embedding() {
            return Self::default();
        }
        let background = table.records().iter().filter_map(|r| r.embedding).collect();
        let highlighted = subject
            .iter()
            .enumerate()
            .filter_map(|(rank, r)| {
                r.embedding.map(|p| LabeledPoint {
                    x: p.x,
                    y: p.y,
                    session: r.session,
                    label: format!("P{}", rank + 1),
                })
            })
            .collect();
        Self {
            background,
            highlighted,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_empty() && self.highlighted.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvolutionPoint {
    pub session: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvolutionChart {
    pub points: Vec<EvolutionPoint>,
    pub ticks: Vec<PerformanceTick>,
}

impl EvolutionChart {
    pub fn build(
        table: &SessionTable,
        subject: &[&SessionRecord],
        ticks: &[PerformanceTick],
    ) -> Self {
        let points = if table
            .capabilities()
            .has(session_core::LogicalField::PerformanceCode)
        {
            subject
                .iter()
                .filter_map(|r| match (r.session, r.performance_code) {
                    (Some(session), Some(value)) => Some(EvolutionPoint { session, value }),
                    _ => None,
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            points,
            ticks: ticks.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricBar {
    pub column: String,
    pub label: String,
    /// Subject mean; `None` when the subject has no values for the metric.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricChart {
    pub bars: Vec<MetricBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub label: String,
    /// Subject mean as a percentage of the population mean.
    pub value: Option<f64>,
    pub reference: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RadarChart {
    pub axes: Vec<RadarAxis>,
}

/// Bar and radar charts share the same metric selection.
pub fn metric_charts(table: &SessionTable, subject: &[&SessionRecord]) -> (MetricChart, RadarChart) {
    let mut bars = Vec::with_capacity(table.metrics().len());
    let mut axes = Vec::with_capacity(table.metrics().len());
    for (idx, metric) in table.metrics().iter().enumerate() {
        let subject_mean = mean(subject.iter().map(|r| metric_value(r, idx)));
        let population_mean = mean(table.records().iter().map(|r| metric_value(r, idx)));
        bars.push(MetricBar {
            column: metric.column.clone(),
            label: metric.label.clone(),
            value: subject_mean,
        });
        axes.push(RadarAxis {
            label: metric.label.clone(),
            value: normalize_to_population(subject_mean, population_mean),
            reference: RADAR_REFERENCE,
        });
    }
    (MetricChart { bars }, RadarChart { axes })
}

fn metric_value(record: &SessionRecord, idx: usize) -> Option<f64> {
    record.metrics.get(idx).copied().flatten()
}

/// Arithmetic mean skipping missing values.
pub fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// `subject / population * 100`; a population mean of exactly zero maps to the reference.
pub fn normalize_to_population(subject: Option<f64>, population: Option<f64>) -> Option<f64> {
    match population {
        Some(p) if p == 0.0 => Some(RADAR_REFERENCE),
        Some(p) => subject.map(|s| s / p * RADAR_REFERENCE),
        None => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub outcome: String,
    pub count: usize,
    pub tone: Tone,
}

/// Outcome counts over the whole table, largest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionChart {
    pub slices: Vec<DistributionSlice>,
}

impl DistributionChart {
    pub fn build(table: &SessionTable, labels: &Labels) -> Self {
        if !table.capabilities().has(session_core::LogicalField::Outcome) {
            return Self::default();
        }
        let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
        for outcome in table.records().iter().filter_map(|r| r.outcome.as_deref()) {
            *tally.entry(outcome).or_insert(0) += 1;
        }
        // Stable sort keeps the map's label order among equal counts.
        let mut counts: Vec<(&str, usize)> = tally.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let slices = counts
            .into_iter()
            .map(|(outcome, count)| DistributionSlice {
                tone: outcome_tone(outcome, labels),
                outcome: outcome.to_string(),
                count,
            })
            .collect();
        Self { slices }
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }
}

pub fn outcome_tone(outcome: &str, labels: &Labels) -> Tone {
    if outcome == labels.accurate {
        Tone::Success
    } else if outcome == labels.overestimated {
        Tone::Warning
    } else {
        Tone::Danger
    }
}

/// Substring match against the configured level literals, high checked first.
pub fn performance_tone(value: &str, labels: &Labels) -> Tone {
    if value.contains(labels.high_level.as_str()) {
        Tone::Success
    } else if value.contains(labels.medium_level.as_str()) {
        Tone::Warning
    } else {
        Tone::Danger
    }
}
