use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::data::query::DEFAULT_TOP_N;

/// Prefix of every environment variable read by the dashboard, e.g.
/// `SAUDI_JOBS_CSV`, `SAUDI_JOBS_TOP_N`, `SAUDI_JOBS_PREVIEW_ROWS`.
pub const ENV_PREFIX: &str = "SAUDI_JOBS";

const DEFAULT_DATASET: &str = "cleaned_dataset.csv";
const DEFAULT_PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// CSV loaded at startup.
    #[serde(rename = "csv")]
    pub dataset_path: PathBuf,
    /// Length of the top hiring companies ranking.
    pub top_n: usize,
    /// Rows shown in the filtered dataset preview.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            top_n: DEFAULT_TOP_N,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl DashboardConfig {
    /// Resolve from the process arguments and environment.
    ///
    /// The dataset path comes from the first argument, then `SAUDI_JOBS_CSV`,
    /// then `cleaned_dataset.csv` in the working directory.
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::args().nth(1), None)
    }

    /// `vars` replaces the process environment when given.
    fn resolve(arg: Option<String>, vars: Option<HashMap<String, String>>) -> Result<Self> {
        Config::builder()
            .set_default("csv", DEFAULT_DATASET)?
            .set_default("top_n", DEFAULT_TOP_N as i64)?
            .set_default("preview_rows", DEFAULT_PREVIEW_ROWS as i64)?
            .add_source(Environment::with_prefix(ENV_PREFIX).source(vars))
            .set_override_option("csv", arg)?
            .build()
            .context("reading dashboard configuration")?
            .try_deserialize()
            .with_context(|| format!("invalid {ENV_PREFIX}_* setting"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_arguments() {
        let config = DashboardConfig::resolve(None, env(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.top_n, 10);
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn argument_wins_over_environment() {
        let vars = env(&[("SAUDI_JOBS_CSV", "from_env.csv")]);
        let config = DashboardConfig::resolve(Some("from_arg.csv".into()), vars).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("from_arg.csv"));

        let vars = env(&[("SAUDI_JOBS_CSV", "from_env.csv")]);
        let config = DashboardConfig::resolve(None, vars).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("from_env.csv"));
    }

    #[test]
    fn numeric_overrides() {
        let vars = env(&[("SAUDI_JOBS_TOP_N", "3"), ("SAUDI_JOBS_PREVIEW_ROWS", "12")]);
        let config = DashboardConfig::resolve(None, vars).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.preview_rows, 12);
    }

    #[test]
    fn invalid_number_is_rejected() {
        let vars = env(&[("SAUDI_JOBS_TOP_N", "many")]);
        assert!(DashboardConfig::resolve(None, vars).is_err());
    }
}
