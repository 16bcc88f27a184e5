use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_INPUT: &str = "./wordle_tables_clean.csv";
const DEFAULT_OUTPUT: &str = "tables_with_new_data.csv";
const DEFAULT_BASE_URL: &str = "https://www.merriam-webster.com/dictionary/";
const DEFAULT_TIMEOUT_SECS: i64 = 10;
const DEFAULT_CONCURRENCY: i64 = 1;

/// Run settings, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub base_url: String,
    pub user_agent: String,
}

/// Values given on the command line; `None` leaves lower layers in effect.
#[derive(Debug, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
}

impl Settings {
    /// Defaults, then `etym_enricher.toml`, then `ETYM_*` env vars, then CLI.
    pub fn load(overrides: Overrides) -> Result<Self> {
        let builder = Config::builder()
            .set_default("input", DEFAULT_INPUT)?
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("concurrency", DEFAULT_CONCURRENCY)?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default(
                "user_agent",
                format!("etym_enricher/{}", env!("CARGO_PKG_VERSION")),
            )?
            .add_source(File::with_name("etym_enricher").required(false))
            .add_source(Environment::with_prefix("ETYM").try_parsing(true));

        Self::from_builder(builder, overrides)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        overrides: Overrides,
    ) -> Result<Self> {
        let settings: Settings = builder
            .set_override_option("input", overrides.input.map(path_value))?
            .set_override_option("output", overrides.output.map(path_value))?
            .set_override_option("timeout_secs", overrides.timeout_secs.map(|v| v as i64))?
            .set_override_option("concurrency", overrides.concurrency.map(|v| v as i64))?
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }
}

fn path_value(p: PathBuf) -> String {
    p.to_string_lossy().into_owned()
}

// ── Tests ──
