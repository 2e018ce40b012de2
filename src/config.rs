//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salesreport.toml` files.

use crate::cli::{parse_delimiter, Args, OutputFormat};
use crate::loader::LoadOptions;
use crate::report::{ChartOptions, ReportOptions};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".salesreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input file settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Summary settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path of the sales file.
    #[serde(default = "default_input")]
    pub path: String,

    /// Field delimiter (single character, or `\t`).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_input() -> String {
    "sales_data.txt".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Chart image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Render the chart image at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Output PNG path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Canvas width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Open the image in a viewer when a display is available.
    #[serde(default = "default_true")]
    pub show: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output: default_output(),
            width: default_width(),
            height: default_height(),
            show: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_output() -> String {
    "sales_analysis.png".to_string()
}

fn default_width() -> u32 {
    1500
}

fn default_height() -> u32 {
    1000
}

/// Text summary settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Summary format printed to stdout.
    #[serde(default)]
    pub format: OutputFormat,

    /// Symbol placed before monetary amounts.
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            currency_symbol: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "$".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.salesreport.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.display().to_string();
        }
        if let Some(ref delimiter) = args.delimiter {
            self.input.delimiter = delimiter.clone();
        }

        if let Some(ref output) = args.output {
            self.chart.output = output.display().to_string();
        }
        if let Some(width) = args.width {
            self.chart.width = width;
        }
        if let Some(height) = args.height {
            self.chart.height = height;
        }

        // Flags can only switch things off
        if args.no_chart {
            self.chart.enabled = false;
        }
        if args.no_show {
            self.chart.show = false;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref currency) = args.currency {
            self.report.currency_symbol = currency.clone();
        }
    }

    /// Path of the sales file.
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(&self.input.path)
    }

    /// Loader options derived from the `[input]` section.
    pub fn load_options(&self) -> Result<LoadOptions> {
        let delimiter = parse_delimiter(&self.input.delimiter)
            .map_err(|e| anyhow!("Invalid [input].delimiter: {}", e))?;
        Ok(LoadOptions { delimiter })
    }

    /// Chart options derived from the `[chart]` section.
    pub fn chart_options(&self) -> Result<ChartOptions> {
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(anyhow!("Chart width and height must be at least 1 pixel"));
        }
        Ok(ChartOptions {
            output: PathBuf::from(&self.chart.output),
            width: self.chart.width,
            height: self.chart.height,
        })
    }

    /// Summary options derived from the `[report]` section.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            currency_symbol: self.report.currency_symbol.clone(),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
