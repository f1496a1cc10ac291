use clap::Parser;

use crate::config::DelayConfig;

#[derive(Parser, Debug)]
#[command(name = "urnfinder")]
#[command(about = "Extracts LinkedIn entity URNs from company and profile pages")]
#[command(version)]
pub struct Args {
    /// Single LinkedIn URL (company or person)
    pub url: Option<String>,

    /// Input file with URLs, one per line (blank lines and # comments skipped)
    #[arg(short, long, conflicts_with = "url")]
    pub input: Option<String>,

    /// Output file path
    #[arg(short, long, default_value = "output/results.csv")]
    pub output: String,

    /// Output format: 'csv' (default) or 'json'
    #[arg(short = 'f', long, default_value = "csv")]
    pub output_format: String,

    /// LinkedIn li_at cookie value
    #[arg(short, long)]
    pub cookie: Option<String>,

    /// File containing the li_at cookie
    #[arg(long, conflicts_with = "cookie")]
    pub cookie_file: Option<String>,

    /// Minimum inter-request delay in seconds (overrides config)
    #[arg(long)]
    pub delay_min: Option<f64>,

    /// Maximum inter-request delay in seconds (overrides config)
    #[arg(long)]
    pub delay_max: Option<f64>,

    /// Abort after N consecutive auth-wall failures (0 = keep attempting
    /// every URL, matching the reference behavior)
    #[arg(long, default_value = "0")]
    pub max_auth_failures: u32,

    /// Verbose logging (use -v for detailed, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_none() && self.input.is_none() {
            return Err("A URL or an --input file is required".to_string());
        }

        if let Some(url) = &self.url {
            if url.is_empty() {
                return Err("URL cannot be empty".to_string());
            }
        }

        if self.cookie.is_none() && self.cookie_file.is_none() {
            return Err(
                "A LinkedIn cookie is required (use --cookie or --cookie-file)".to_string(),
            );
        }

        if !["csv", "json"].contains(&self.output_format.as_str()) {
            return Err("Output format must be 'csv' or 'json'".to_string());
        }

        Ok(())
    }

    /// Effective delay range: CLI overrides applied on top of the config
    /// values. Range validity is checked by [`DelayConfig::validate`].
    pub fn delay_range(&self, config: &DelayConfig) -> DelayConfig {
        DelayConfig {
            min_secs: self.delay_min.unwrap_or(config.min_secs),
            max_secs: self.delay_max.unwrap_or(config.max_secs),
        }
    }
}
