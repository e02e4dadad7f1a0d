use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ColumnMap;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Category literals the upstream export writes into the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Outcome value rendered with the success tone.
    pub accurate: String,
    /// Outcome value rendered with the warning tone.
    pub overestimated: String,
    pub high_level: String,
    pub medium_level: String,
    pub no_recommendation: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            accurate: "accurate".into(),
            overestimated: "overestimated".into(),
            high_level: "High".into(),
            medium_level: "Medium".into(),
            no_recommendation: "no recommendation".into(),
        }
    }
}

/// Axis tick pairing a numeric performance code with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub columns: ColumnMap,
    pub labels: Labels,
    pub performance_ticks: Vec<PerformanceTick>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        // Codes follow the alphabetical label encoding used upstream.
        let performance_ticks = [(0.0, "High"), (1.0, "Low"), (2.0, "Medium")]
            .into_iter()
            .map(|(value, label)| PerformanceTick {
                value,
                label: label.to_string(),
            })
            .collect();
        Self {
            columns: ColumnMap::default(),
            labels: Labels::default(),
            performance_ticks,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Read a TOML config; `None` means built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DashboardConfig::from_toml_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
            [columns]
            subject = "athlete"

            [labels]
            accurate = "Declaró correctamente"
            overestimated = "Sobreestimó"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.columns.subject, "athlete");
        assert_eq!(cfg.columns.session, "partido_num");
        assert_eq!(cfg.labels.accurate, "Declaró correctamente");
        assert_eq!(cfg.labels.no_recommendation, "no recommendation");
        assert_eq!(cfg.performance_ticks.len(), 3);
    }

    #[test]
    fn ticks_can_be_overridden() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
            [[performance_ticks]]
            value = 0
            label = "Alto"

            [[performance_ticks]]
            value = 1
            label = "Bajo"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.performance_ticks[0].label, "Alto");
        assert_eq!(cfg.performance_ticks[1].value, 1.0);
    }

    #[test]
    fn shipped_example_parses() {
        let cfg = DashboardConfig::from_toml_str(include_str!("../../dashboard.example.toml"))
            .unwrap();
        assert_eq!(cfg.labels.overestimated, "Sobreestimó");
        assert_eq!(cfg.performance_ticks[2].label, "Medio");
        assert_eq!(cfg.columns.outcome, "evaluacion");
    }

    #[test]
    fn missing_path_means_defaults_and_bad_file_errors() {
        assert_eq!(load_config(None).unwrap(), DashboardConfig::default());

        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("dashboard.toml");
        fs::write(&path, "columns = 3").expect("write");
        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = load_config(Some(tmp.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
