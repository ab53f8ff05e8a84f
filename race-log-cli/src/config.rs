//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use race_log_analyzer::ParserConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest chart the renderer can lay out axes and legend in
pub const MIN_CHART_WIDTH: u16 = 20;
pub const MIN_CHART_HEIGHT: u16 = 8;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Write one report file per input here instead of printing to stdout
    pub output_dir: Option<PathBuf>,
    /// Cap on the number of overlap detail lines in text reports
    pub max_details: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_chart_width")]
    pub width: u16,
    #[serde(default = "default_chart_height")]
    pub height: u16,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

fn default_chart_width() -> u16 {
    100
}

fn default_chart_height() -> u16 {
    30
}

impl AppConfig {
    /// Reject settings the application cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.chart.width < MIN_CHART_WIDTH || self.chart.height < MIN_CHART_HEIGHT {
            bail!(
                "Chart size {}x{} is too small (minimum {}x{})",
                self.chart.width,
                self.chart.height,
                MIN_CHART_WIDTH,
                MIN_CHART_HEIGHT
            );
        }
        if self.parser.variable_name.trim().is_empty() {
            bail!("Parser variable name must not be empty");
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
