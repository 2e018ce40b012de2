//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SalesReport - revenue summary and charts from a sales file
///
/// Reads a delimited file with columns date, region, product, units and
/// price_per_unit, prints revenue by region, product and month, and saves
/// a four-panel chart image.
///
/// Examples:
///   salesreport
///   salesreport --input q1.csv --output q1.png
///   salesreport --input sales.tsv --delimiter '\t' --format json --no-chart
///   salesreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Sales file to analyze
    ///
    /// Overrides [input].path from the config file (default: sales_data.txt).
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Chart image to write (PNG, overwritten)
    ///
    /// Overrides [chart].output from the config file (default: sales_analysis.png).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Field delimiter of the input file (single character, '\t' for tabs)
    #[arg(short, long, value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// Summary format printed to stdout (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Currency symbol used in the text summary
    #[arg(long, value_name = "SYMBOL")]
    pub currency: Option<String>,

    /// Chart canvas width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Chart canvas height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Skip rendering the chart image
    #[arg(long)]
    pub no_chart: bool,

    /// Do not open the chart in an image viewer
    #[arg(long)]
    pub no_show: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salesreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Format of the summary printed to stdout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref delimiter) = self.delimiter {
            parse_delimiter(delimiter)?;
        }

        if self.width == Some(0) || self.height == Some(0) {
            return Err("Chart width and height must be at least 1 pixel".to_string());
        }

        if let Some(ref currency) = self.currency {
            if currency.chars().any(char::is_control) {
                return Err("Currency symbol must be printable".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Turn a delimiter argument into a single byte.
///
/// Accepts one ASCII character, or the escapes `\t` and `tab`.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(c as u8),
        (Some(_), None) => Err(format!("Unsupported delimiter: {:?}", value)),
        _ => Err(format!(
            "Delimiter must be a single character, got {:?}",
            value
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            output: None,
            config: None,
            delimiter: None,
            format: None,
            currency: None,
            width: None,
            height: None,
            no_chart: false,
            no_show: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_defaults_parse() {
        let args = Args::try_parse_from(["salesreport"]).unwrap();
        assert!(args.input.is_none());
        assert!(!args.no_chart);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "salesreport",
            "--input",
            "q1.csv",
            "-o",
            "q1.png",
            "--format",
            "json",
            "--delimiter",
            ";",
            "--no-show",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("q1.csv")));
        assert_eq!(args.output, Some(PathBuf::from("q1.png")));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.delimiter.as_deref(), Some(";"));
        assert!(args.no_show);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_canvas() {
        let mut args = make_args();
        args.width = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_bad_delimiter() {
        let mut args = make_args();
        args.delimiter = Some(";;".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter("|"), Ok(b'|'));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("\"").is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
