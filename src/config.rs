use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    distance::{Comparator, DEFAULT_THRESHOLD},
    error::ConfigError,
    google,
    records::{Columns, Window},
};

/// Flag businesses whose stored address no longer matches where the map
/// provider puts them.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// CSV file with a header row
    pub input: PathBuf,

    #[arg(short, long, default_value = "validated_addresses.csv")]
    pub output: PathBuf,

    /// Rows to skip before the window starts
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Rows to process, defaults to the rest of the file
    #[arg(long)]
    pub limit: Option<usize>,

    /// Metres within which two coordinates are the same place
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = "BID")]
    pub id_column: String,

    #[arg(long, default_value = "Business Name")]
    pub name_column: String,

    #[arg(long, default_value = "Full Address")]
    pub address_column: String,

    #[arg(long, default_value = "Matched Place")]
    pub matched_column: String,

    #[arg(long, default_value = google::GEOCODE_URL)]
    pub geocode_url: String,

    #[arg(long, default_value = google::FIND_PLACE_URL)]
    pub places_url: String,

    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

/// Everything a run needs, checked before any file or network access.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub window: Window,
    pub comparator: Comparator,
    pub timeout: Duration,
    pub api_key: String,
    pub columns: Columns,
    pub geocode_url: String,
    pub places_url: String,
}

impl Config {
    /// The markdown report lives next to the output, as `<stem>.summary.md`
    /// so it can never replace the output itself.
    pub fn summary_path(&self) -> PathBuf {
        self.output.with_extension("summary.md")
    }
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let api_key = cli
            .api_key
            .filter(|x| !x.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        if !cli.threshold.is_finite() || cli.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(cli.threshold));
        }

        if cli.timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(Self {
            input: cli.input,
            output: cli.output,
            window: Window {
                offset: cli.offset,
                limit: cli.limit,
            },
            comparator: Comparator::new(cli.threshold),
            timeout: Duration::from_secs(cli.timeout),
            api_key,
            columns: Columns {
                id: cli.id_column,
                name: cli.name_column,
                address: cli.address_column,
                matched: cli.matched_column,
            },
            geocode_url: cli.geocode_url,
            places_url: cli.places_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(["address-validator"].iter().chain(args)).unwrap()
    }

    #[test]
    fn defaults() {
        let config = Config::try_from(parse(&["in.csv", "--api-key", "secret"])).unwrap();
        assert_eq!(config.input, PathBuf::from("in.csv"));
        assert_eq!(config.output, PathBuf::from("validated_addresses.csv"));
        assert_eq!(
            config.summary_path(),
            PathBuf::from("validated_addresses.summary.md")
        );
        assert_eq!(config.window.offset, 0);
        assert_eq!(config.window.limit, None);
        assert_eq!(config.comparator.threshold(), 50.0);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.columns.id, "BID");
        assert_eq!(config.columns.matched, "Matched Place");
        assert_eq!(config.geocode_url, google::GEOCODE_URL);
    }

    #[test]
    fn window_and_threshold() {
        let config = Config::try_from(parse(&[
            "in.csv",
            "--api-key",
            "secret",
            "--offset",
            "22",
            "--limit",
            "28",
            "--threshold",
            "75.5",
        ]))
        .unwrap();
        assert_eq!(config.window.offset, 22);
        assert_eq!(config.window.limit, Some(28));
        assert_eq!(config.comparator.threshold(), 75.5);
    }

    #[test]
    fn missing_api_key() {
        let mut cli = parse(&["in.csv"]);
        // API_KEY may be set in the environment running the tests
        cli.api_key = None;
        assert!(matches!(
            Config::try_from(cli),
            Err(ConfigError::MissingApiKey)
        ));

        let cli = parse(&["in.csv", "--api-key", "  "]);
        assert!(matches!(
            Config::try_from(cli),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn summary_next_to_markdown_output() {
        let config =
            Config::try_from(parse(&["in.csv", "--api-key", "secret", "-o", "report.md"])).unwrap();
        assert_eq!(config.output, PathBuf::from("report.md"));
        assert_eq!(config.summary_path(), PathBuf::from("report.summary.md"));

        let config =
            Config::try_from(parse(&["in.csv", "--api-key", "secret", "-o", "out/result"])).unwrap();
        assert_eq!(config.summary_path(), PathBuf::from("out/result.summary.md"));
    }

    #[test]
    fn zero_timeout() {
        let cli = parse(&["in.csv", "--api-key", "secret", "--timeout", "0"]);
        assert!(matches!(
            Config::try_from(cli),
            Err(ConfigError::InvalidTimeout)
        ));
    }

    #[test]
    fn invalid_threshold() {
        let cli = parse(&["in.csv", "--api-key", "secret", "--threshold=-1"]);
        assert!(matches!(
            Config::try_from(cli),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }
}
