use clap::Parser;
use engine::Currency;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    pub currency: String,
    pub log_level: String,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            username: String::new(),
            currency: "USD".to_string(),
            log_level: "info".to_string(),
            log_file: "expense_tui.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Display currency; unknown codes are a startup error.
    pub fn currency(&self) -> Result<Currency> {
        Ok(Currency::try_from(self.currency.as_str())?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "expense_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL of the REST API (e.g. http://localhost:8080).
    #[arg(long)]
    base_url: Option<String>,
    /// Prefill the login username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Display currency code (USD, EUR).
    #[arg(long)]
    currency: Option<String>,
    /// Log level for the log file (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
    /// Log file path.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("EXPENSE_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    Ok(settings)
}
