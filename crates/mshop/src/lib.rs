//! MShop command line tool
//!
//! Inspects the search attributes of the product index and compiles JSON
//! search documents to SQL for a chosen dialect and site.
//!
//! ```text
//! mshop --dialect mysql --language de attributes --with-sub
//! mshop --site-path 1.2. compile search.json --statement count
//! mshop aggregate search.json --key index.catalog.id
//! mshop cleanup --before "2024-01-01 00:00:00"
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod commands;
pub mod config;

pub use commands::run;
pub use config::{CliConfig, Command, OutputFormat, StatementKind};

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "mshop={level},mshop_index={level},mshop_criteria={level}",
            level = level
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
