use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

pub mod config;
pub mod loader;

pub use config::{load_config, ConfigError, DashboardConfig, Labels, PerformanceTick};
pub use loader::{load_dataset, parse_csv, Dataset, DatasetError};

/// Column-name fragments that mark a movement metric.
pub const METRIC_KEYWORDS: [&str; 4] = ["speed", "acceleration", "displacement", "distance"];

/// Metric columns shown in the bar and radar charts are capped at this many.
pub const MAX_METRICS: usize = 5;

/// Every field the dashboard knows how to read from the session table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Subject,
    Session,
    SessionLabel,
    Performance,
    PerformanceCode,
    DeclaredState,
    Outcome,
    Recommendation,
    EmbeddingX,
    EmbeddingY,
    Cluster,
    Age,
    Height,
    Level,
    Frequency,
}

impl LogicalField {
    pub const ALL: [LogicalField; 15] = [
        LogicalField::Subject,
        LogicalField::Session,
        LogicalField::SessionLabel,
        LogicalField::Performance,
        LogicalField::PerformanceCode,
        LogicalField::DeclaredState,
        LogicalField::Outcome,
        LogicalField::Recommendation,
        LogicalField::EmbeddingX,
        LogicalField::EmbeddingY,
        LogicalField::Cluster,
        LogicalField::Age,
        LogicalField::Height,
        LogicalField::Level,
        LogicalField::Frequency,
    ];
}

/// Physical column name for each logical field.
///
/// Defaults match the export written by the upstream analysis notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub subject: String,
    pub session: String,
    pub session_label: String,
    pub performance: String,
    pub performance_code: String,
    pub declared_state: String,
    pub outcome: String,
    pub recommendation: String,
    pub embedding_x: String,
    pub embedding_y: String,
    pub cluster: String,
    pub age: String,
    pub height: String,
    pub level: String,
    pub frequency: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            subject: "player_name_clean".into(),
            session: "partido_num".into(),
            session_label: "partido".into(),
            performance: "nivel_rendimiento".into(),
            performance_code: "nivel_num".into(),
            declared_state: "ESTADO_FISICO_first".into(),
            outcome: "evaluacion".into(),
            recommendation: "recomendacion".into(),
            embedding_x: "UMAP1".into(),
            embedding_y: "UMAP2".into(),
            cluster: "cluster_umap".into(),
            age: "EDAD_first".into(),
            height: "ESTATURA_first".into(),
            level: "NIVEL_ACTUAL_PADEL_first".into(),
            frequency: "FRECUENCIA_DEPORTE_first".into(),
        }
    }
}

impl ColumnMap {
    pub fn column(&self, field: LogicalField) -> &str {
        match field {
            LogicalField::Subject => &self.subject,
            LogicalField::Session => &self.session,
            LogicalField::SessionLabel => &self.session_label,
            LogicalField::Performance => &self.performance,
            LogicalField::PerformanceCode => &self.performance_code,
            LogicalField::DeclaredState => &self.declared_state,
            LogicalField::Outcome => &self.outcome,
            LogicalField::Recommendation => &self.recommendation,
            LogicalField::EmbeddingX => &self.embedding_x,
            LogicalField::EmbeddingY => &self.embedding_y,
            LogicalField::Cluster => &self.cluster,
            LogicalField::Age => &self.age,
            LogicalField::Height => &self.height,
            LogicalField::Level => &self.level,
            LogicalField::Frequency => &self.frequency,
        }
    }
}

/// Logical fields whose column exists in the loaded table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    fields: BTreeSet<LogicalField>,
}

impl Capabilities {
    pub fn has(&self, field: LogicalField) -> bool {
        self.fields.contains(&field)
    }

    /// Both coordinates must be present for the scatter to render.
    pub fn has_embedding(&self) -> bool {
        self.has(LogicalField::EmbeddingX) && self.has(LogicalField::EmbeddingY)
    }

    pub fn fields(&self) -> impl Iterator<Item = LogicalField> + '_ {
        self.fields.iter().copied()
    }
}

impl FromIterator<LogicalField> for Capabilities {
    fn from_iter<I: IntoIterator<Item = LogicalField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmbeddingPoint {
    pub x: f64,
    pub y: f64,
    pub cluster: Option<f64>,
}

/// Static subject attributes, repeated on every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    pub age: Option<String>,
    pub height: Option<String>,
    pub level: Option<String>,
    pub frequency: Option<String>,
}

/// One (subject, session) row of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    /// Position in the source file; only used to break ordering ties.
    pub row: usize,
    pub subject: String,
    pub session: Option<i64>,
    pub session_label: Option<String>,
    pub performance: Option<String>,
    pub performance_code: Option<f64>,
    pub declared_state: Option<String>,
    pub outcome: Option<String>,
    pub recommendation: Option<String>,
    pub embedding: Option<EmbeddingPoint>,
    pub profile: Profile,
    /// Values of the selected metric columns, parallel to `SessionTable::metrics`.
    pub metrics: Vec<Option<f64>>,
}

impl SessionRecord {
    /// Chronological order: session number ascending, records without one last.
    pub fn chronological_cmp(&self, other: &SessionRecord) -> Ordering {
        match (self.session, other.session) {
            (Some(a), Some(b)) => a.cmp(&b).then(self.row.cmp(&other.row)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.row.cmp(&other.row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricColumn {
    pub column: String,
    pub label: String,
}

/// Header plus string cells, as read from the CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Empty cells read as missing.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// A column is numeric when every non-empty cell parses as a number.
    pub fn is_numeric_column(&self, col: usize) -> bool {
        (0..self.rows.len()).all(|row| match self.cell(row, col) {
            Some(v) => v.trim().parse::<f64>().is_ok(),
            None => true,
        })
    }
}

/// The immutable in-memory session table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTable {
    records: Vec<SessionRecord>,
    metrics: Vec<MetricColumn>,
    capabilities: Capabilities,
}

impl SessionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve logical fields against the header once, then decode every row.
    pub fn from_raw(raw: &RawTable, columns: &ColumnMap) -> Self {
        let index: HashMap<LogicalField, usize> = LogicalField::ALL
            .iter()
            .filter_map(|&field| raw.column_index(columns.column(field)).map(|idx| (field, idx)))
            .collect();
        let capabilities: Capabilities = index.keys().copied().collect();

        let metric_idx = select_metric_columns(raw);
        let metrics = metric_idx
            .iter()
            .map(|&idx| MetricColumn {
                column: raw.headers[idx].clone(),
                label: metric_label(&raw.headers[idx]),
            })
            .collect();

        let text = |row: usize, field: LogicalField| -> Option<String> {
            index
                .get(&field)
                .and_then(|&col| raw.cell(row, col))
                .map(str::to_string)
        };
        let number = |row: usize, field: LogicalField| -> Option<f64> {
            index
                .get(&field)
                .and_then(|&col| raw.cell(row, col))
                .and_then(parse_number)
        };

        let records = (0..raw.rows.len())
            .map(|row| {
                let embedding = match (
                    number(row, LogicalField::EmbeddingX),
                    number(row, LogicalField::EmbeddingY),
                ) {
                    (Some(x), Some(y)) => Some(EmbeddingPoint {
                        x,
                        y,
                        cluster: number(row, LogicalField::Cluster),
                    }),
                    _ => None,
                };
                SessionRecord {
                    row,
                    subject: text(row, LogicalField::Subject).unwrap_or_default(),
                    session: index
                        .get(&LogicalField::Session)
                        .and_then(|&col| raw.cell(row, col))
                        .and_then(parse_session),
                    session_label: text(row, LogicalField::SessionLabel),
                    performance: text(row, LogicalField::Performance),
                    performance_code: number(row, LogicalField::PerformanceCode),
                    declared_state: text(row, LogicalField::DeclaredState),
                    outcome: text(row, LogicalField::Outcome),
                    recommendation: text(row, LogicalField::Recommendation),
                    embedding,
                    profile: Profile {
                        age: text(row, LogicalField::Age),
                        height: text(row, LogicalField::Height),
                        level: text(row, LogicalField::Level),
                        frequency: text(row, LogicalField::Frequency),
                    },
                    metrics: metric_idx
                        .iter()
                        .map(|&col| raw.cell(row, col).and_then(parse_number))
                        .collect(),
                }
            })
            .collect();

        Self {
            records,
            metrics,
            capabilities,
        }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn metrics(&self) -> &[MetricColumn] {
        &self.metrics
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Sorted, deduplicated subject identifiers.
    pub fn subjects(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.subject.is_empty())
            .map(|r| r.subject.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records of one subject in chronological order.
    pub fn subject_records(&self, subject: &str) -> Vec<&SessionRecord> {
        if subject.is_empty() {
            return Vec::new();
        }
        let mut out: Vec<&SessionRecord> =
            self.records.iter().filter(|r| r.subject == subject).collect();
        out.sort_by(|a, b| a.chronological_cmp(b));
        out
    }
}

/// Indices of the first `MAX_METRICS` numeric columns whose name contains a metric keyword,
/// in table column order.
pub fn select_metric_columns(raw: &RawTable) -> Vec<usize> {
    raw.headers
        .iter()
        .enumerate()
        .filter(|(_, name)| METRIC_KEYWORDS.iter().any(|k| name.contains(k)))
        .filter(|(idx, _)| raw.is_numeric_column(*idx))
        .map(|(idx, _)| idx)
        .take(MAX_METRICS)
        .collect()
}

/// Display label for a metric column: aggregation suffixes dropped, title case, 20 chars max.
pub fn metric_label(column: &str) -> String {
    let stripped = column
        .replace("_mean", "")
        .replace("_sum", "")
        .replace("_first", "")
        .replace('_', " ");
    let mut prev_alpha = false;
    let titled: String = stripped
        .chars()
        .flat_map(|c| {
            let out: Vec<char> = if !c.is_alphabetic() {
                vec![c]
            } else if prev_alpha {
                c.to_lowercase().collect()
            } else {
                c.to_uppercase().collect()
            };
            prev_alpha = c.is_alphabetic();
            out
        })
        .collect();
    titled.chars().take(20).collect()
}

/// NaN cells count as missing.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Session numbers may be exported as floats ("3.0") when the column had gaps.
pub fn parse_session(value: &str) -> Option<i64> {
    let value = value.trim();
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn metric_columns_first_five_numeric_in_column_order() {
        let table = raw(
            &[
                "player_name_clean",
                "speed_mean",
                "distance_sum",
                "zone_label_distance",
                "acceleration_max",
                "heart_rate",
                "displacement_first",
                "speed_max",
                "distance_total",
            ],
            &[
                &["Ana", "1.0", "10", "far", "0.5", "120", "3", "2.0", "100"],
                &["Leo", "2.0", "", "near", "0.7", "130", "4", "3.0", "90"],
            ],
        );
        let picked = select_metric_columns(&table);
        let names: Vec<&str> = picked.iter().map(|&i| table.headers[i].as_str()).collect();
        assert_eq!(
            names,
            vec![
                "speed_mean",
                "distance_sum",
                "acceleration_max",
                "displacement_first",
                "speed_max"
            ]
        );
        assert_eq!(select_metric_columns(&table), picked);
    }

    #[test]
    fn metric_label_strips_suffixes_and_title_cases() {
        assert_eq!(metric_label("speed_mean"), "Speed");
        assert_eq!(metric_label("distance_total_sum"), "Distance Total");
        assert_eq!(metric_label("max_acceleration_first"), "Max Acceleration");
        assert_eq!(
            metric_label("displacement_forward_lateral_mean"),
            "Displacement Forward"
        );
        assert_eq!(metric_label("speed_3d_mean"), "Speed 3D");
    }

    #[test]
    fn capabilities_reflect_present_columns_only() {
        let table = raw(
            &["player_name_clean", "partido_num", "UMAP1"],
            &[&["Ana", "1", "0.1"]],
        );
        let sessions = SessionTable::from_raw(&table, &ColumnMap::default());
        let caps = sessions.capabilities();
        assert!(caps.has(LogicalField::Subject));
        assert!(caps.has(LogicalField::Session));
        assert!(caps.has(LogicalField::EmbeddingX));
        assert!(!caps.has(LogicalField::EmbeddingY));
        assert!(!caps.has_embedding());
        assert!(sessions.records()[0].embedding.is_none());
    }

    #[test]
    fn subject_records_sorted_by_session_regardless_of_row_order() {
        let table = raw(
            &["player_name_clean", "partido_num", "nivel_rendimiento"],
            &[
                &["Ana", "3", "Medium"],
                &["Leo", "1", "High"],
                &["Ana", "1", "High"],
                &["Ana", "2.0", "Low"],
            ],
        );
        let sessions = SessionTable::from_raw(&table, &ColumnMap::default());
        let ana: Vec<Option<i64>> = sessions
            .subject_records("Ana")
            .iter()
            .map(|r| r.session)
            .collect();
        assert_eq!(ana, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(sessions.subjects(), vec!["Ana".to_string(), "Leo".to_string()]);
        assert!(sessions.subject_records("").is_empty());
    }

    #[test]
    fn empty_cells_and_nan_are_missing() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_session("4.0"), Some(4));
        assert_eq!(parse_session("4.5"), None);

        let table = raw(&["speed_mean", "notes"], &[&["", "x"], &["1.5", ""]]);
        assert!(table.is_numeric_column(0));
        assert!(!table.is_numeric_column(1));
        assert_eq!(table.cell(1, 1), None);
    }
}
