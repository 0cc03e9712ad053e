//! Command handlers.
//!
//! Handlers write their result to the given writer so they can be run
//! in-process by tests.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDateTime;
use mshop_criteria::{AttributeDescriptor, Search};
use mshop_index::{IndexManager, SearchManager};
use tracing::info;

use crate::config::{CliConfig, Command, OutputFormat, StatementKind};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Runs the configured command.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let manager = config.manager()?;

    match &config.command {
        Command::Attributes {
            with_sub,
            public,
            format,
        } => attributes(&manager, *with_sub, *public, *format, out),
        Command::Compile { file, statement } => {
            let search = read_search(file)?;
            compile(&manager, &search, *statement, out)
        }
        Command::Aggregate { file, key } => {
            let search = read_search(file)?;
            let sql = manager.aggregate_statement(&search, key)?;
            writeln!(out, "{}", sql)?;
            Ok(())
        }
        Command::Cleanup { before } => cleanup(&manager, before, out),
    }
}

/// Reads a search document from a file, or standard input for `-`.
pub fn read_search(path: &Path) -> anyhow::Result<Search> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read standard input")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid search document {}", path.display()))
}

/// Lists the search attributes.
pub fn attributes(
    manager: &IndexManager,
    with_sub: bool,
    public: bool,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let attributes = if public {
        manager.registry().describe_public(with_sub)
    } else {
        manager.search_attributes(with_sub)
    };
    info!(count = attributes.len(), with_sub, public, "Listing search attributes");

    match format {
        OutputFormat::Json => {
            let attributes: BTreeMap<&str, &AttributeDescriptor> = attributes
                .iter()
                .map(|(code, descriptor)| (code.as_str(), descriptor.as_ref()))
                .collect();
            serde_json::to_writer_pretty(&mut *out, &attributes)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            for descriptor in attributes.values() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    descriptor.code,
                    serde_json::to_value(descriptor.value_type)?
                        .as_str()
                        .unwrap_or_default(),
                    if descriptor.public { "public" } else { "private" },
                    descriptor.label
                )?;
            }
        }
    }

    Ok(())
}

/// Compiles a search to the requested statement.
pub fn compile(
    manager: &IndexManager,
    search: &Search,
    statement: StatementKind,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match statement {
        StatementKind::Search => writeln!(out, "{}", manager.search_statement(search)?)?,
        StatementKind::Count => writeln!(out, "{}", manager.count_statement(search)?)?,
        StatementKind::Criteria => {
            serde_json::to_writer_pretty(&mut *out, &manager.compile(search)?)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Prints one cleanup statement per sub-manager.
pub fn cleanup(manager: &IndexManager, before: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let before = NaiveDateTime::parse_from_str(before, DATETIME_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD HH:MM:SS", before))?;

    for sql in manager.cleanup_statements(&before) {
        writeln!(out, "{};", sql)?;
    }
    Ok(())
}
