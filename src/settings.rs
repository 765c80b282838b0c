//! Application settings, layered from defaults, an optional TOML file,
//! `DAILY_INCOME_*` environment variables and command line flags.
use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;
use crate::models::category::CategoryConfig;
use crate::models::window::TimeWindow;

const DEFAULT_CONFIG_PATH: &str = "config/daily_income.toml";
const ENV_PREFIX: &str = "DAILY_INCOME";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: String,
    pub storage_key: String,
    pub log_level: String,
    pub currency_symbol: String,
    pub default_window: String,
    pub categories: CategoryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: "daily_income.db".to_string(),
            storage_key: crate::db::repository::DEFAULT_STORAGE_KEY.to_string(),
            log_level: "warn".to_string(),
            currency_symbol: "฿".to_string(),
            default_window: "month".to_string(),
            categories: CategoryConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_label(&self.default_window)
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "daily-income", about = "Track daily income and expenses")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the SQLite file transactions are stored in.
    #[arg(long)]
    pub data_path: Option<String>,
    /// Initial time window: day, month, year or all.
    #[arg(long)]
    pub window: Option<String>,
    /// Override the log filter (e.g. info, debug).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_with(Args::parse())
}

pub fn load_with(args: Args) -> Result<AppConfig> {
    load_with_env(args, Environment::with_prefix(ENV_PREFIX))
}

fn load_with_env(args: Args, environment: Environment) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings: AppConfig = Config::builder()
        .add_source(File::new(config_path, FileFormat::Toml).required(false))
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    if let Some(data_path) = args.data_path {
        settings.data_path = data_path;
    }
    if let Some(window) = args.window {
        settings.default_window = window;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}
