//! Command line configuration.
//!
//! Every global option can also be set through the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MSHOP_CONFIG` | - | JSON index configuration file |
//! | `MSHOP_DIALECT` | from config file | Text search dialect |
//! | `MSHOP_SITE_PATH` | 1. | Site path for `LIKE` scoping |
//! | `MSHOP_SITE_IDS` | - | Comma-separated site ids, wins over the site path |
//! | `MSHOP_LANGUAGE` | - | Language id |
//! | `MSHOP_CURRENCY` | - | Currency id |
//! | `MSHOP_LOG_LEVEL` | warn | Log level |

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use mshop_index::{Context, Dialect, IndexConfig, IndexManager, Locale};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Output format of the `attributes` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One attribute per line.
    #[default]
    Table,
    /// Pretty printed JSON object keyed by code.
    Json,
}

/// Statement produced by the `compile` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatementKind {
    /// `SELECT DISTINCT` of the matching product ids.
    #[default]
    Search,
    /// `SELECT COUNT(DISTINCT ...)`.
    Count,
    /// The compiled `WHERE`/`ORDER BY` parts and joins as JSON.
    Criteria,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the search attributes of the index manager.
    Attributes {
        /// Include attributes of the sub-managers.
        #[arg(long)]
        with_sub: bool,

        /// Hide private attributes.
        #[arg(long)]
        public: bool,

        /// Output format.
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Compile a JSON search document to SQL.
    Compile {
        /// Search document; `-` reads standard input.
        file: PathBuf,

        /// Statement to generate.
        #[arg(long, value_enum, default_value = "search")]
        statement: StatementKind,
    },

    /// Count matching products grouped by a field.
    Aggregate {
        /// Search document; `-` reads standard input.
        file: PathBuf,

        /// Field code to group by, e.g. `index.catalog.id`.
        #[arg(long)]
        key: String,
    },

    /// Print the statements removing stale index rows.
    Cleanup {
        /// Rows modified before this time are removed (`YYYY-MM-DD HH:MM:SS`).
        #[arg(long)]
        before: String,
    },
}

/// Command line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "mshop")]
#[command(about = "MShop index search compiler")]
pub struct CliConfig {
    /// JSON index configuration file.
    #[arg(long, env = "MSHOP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Text search dialect (standard, mysql, postgresql); overrides the config file.
    #[arg(long, env = "MSHOP_DIALECT", global = true)]
    pub dialect: Option<String>,

    /// Site path used to scope every query.
    #[arg(long, env = "MSHOP_SITE_PATH", default_value = "1.", global = true)]
    pub site_path: String,

    /// Comma-separated site ids; scope by id list instead of the site path.
    #[arg(long, env = "MSHOP_SITE_IDS", global = true)]
    pub site_ids: Option<String>,

    /// Language id of the request.
    #[arg(long, env = "MSHOP_LANGUAGE", global = true)]
    pub language: Option<String>,

    /// Currency id of the request.
    #[arg(long, env = "MSHOP_CURRENCY", global = true)]
    pub currency: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MSHOP_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(dialect) = &self.dialect {
            if let Err(e) = Dialect::from_str(dialect) {
                errors.push(e.to_string());
            }
        }

        if self.site_path.is_empty() && self.site_ids().is_empty() {
            errors.push("Either a site path or site ids are required".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!("Unknown log level '{}'", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Site ids from the comma-separated option.
    pub fn site_ids(&self) -> Vec<String> {
        self.site_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Index configuration from the file, with the dialect option applied.
    pub fn index_config(&self) -> anyhow::Result<IndexConfig> {
        let mut config = match &self.config {
            Some(path) => IndexConfig::load(path)?,
            None => IndexConfig::default(),
        };

        if let Some(dialect) = &self.dialect {
            config.dialect = dialect.parse()?;
        }

        Ok(config)
    }

    /// Request locale.
    pub fn locale(&self) -> Locale {
        let mut locale = Locale::new(self.site_path.clone()).with_site_ids(self.site_ids());

        if let Some(language) = &self.language {
            locale = locale.with_language(language.clone());
        }
        if let Some(currency) = &self.currency {
            locale = locale.with_currency(currency.clone());
        }

        locale
    }

    /// Creates the index manager.
    pub fn manager(&self) -> anyhow::Result<IndexManager> {
        let context = Context::new(self.locale(), self.index_config()?);
        IndexManager::new(context).context("Failed to create index manager")
    }
}
