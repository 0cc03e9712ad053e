//! Command line integration tests.
//!
//! Commands are parsed with clap and run in-process against a buffer.

use std::io::Write;

use clap::Parser;
use mshop::{CliConfig, run};

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let config = CliConfig::try_parse_from(std::iter::once("mshop").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(&config, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn search_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", json).unwrap();
    file
}

// ============================================================================
// attributes
// ============================================================================

#[test]
fn test_attributes_table() {
    let output = run_args(&["attributes"]).unwrap();

    assert!(output.contains("product.code\tstring\tpublic\tProduct code"));
    assert!(output.contains("product.id\tinteger\tprivate\tProduct ID"));
    assert!(!output.contains("index.text"));
}

#[test]
fn test_attributes_with_sub_json() {
    let output = run_args(&["--dialect", "mysql", "attributes", "--with-sub", "--format", "json"]).unwrap();

    let attributes: serde_json::Value = serde_json::from_str(&output).unwrap();
    let attributes = attributes.as_object().unwrap();
    assert!(attributes.contains_key("product.id"));
    assert!(
        attributes["index.text.relevance()"]["template"]
            .as_str()
            .unwrap()
            .contains("MATCH")
    );
    assert_eq!(attributes["index.text.relevance()"]["public"], false);
}

#[test]
fn test_attributes_public_only() {
    let output = run_args(&["attributes", "--with-sub", "--public"]).unwrap();

    assert!(output.contains("product.code\tstring\tpublic"));
    assert!(!output.contains("private"));
    assert!(!output.contains("index.text.relevance()"));
}

// ============================================================================
// compile / aggregate
// ============================================================================

#[test]
fn test_compile_count() {
    let file = search_file(r#"{"conditions": {"op": "==", "field": "product.status", "value": 1}}"#);
    let output = run_args(&[
        "--site-path",
        "1.2.",
        "compile",
        file.path().to_str().unwrap(),
        "--statement",
        "count",
    ])
    .unwrap();

    assert_eq!(
        output.trim_end(),
        r#"SELECT COUNT(DISTINCT mpro."id") AS "count" FROM "mshop_product" AS mpro WHERE mpro."siteid" LIKE '1.2.%' AND ( mpro."status" = 1 )"#
    );
}

#[test]
fn test_compile_criteria_json() {
    let file = search_file(
        r#"{
            "conditions": {"op": "=~", "field": "product.code", "value": "ab"},
            "sort": [{"direction": "-", "field": "product.code"}]
        }"#,
    );
    let output = run_args(&["compile", file.path().to_str().unwrap(), "--statement", "criteria"]).unwrap();

    let compiled: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(compiled["conditions"], r#"mpro."code" LIKE 'ab%'"#);
    assert_eq!(compiled["order_by"][0], r#"mpro."code" DESC"#);
}

#[test]
fn test_compile_relevance_requires_registered_function() {
    let file = search_file(
        r#"{"conditions": {"op": ">", "field": "index.text:relevance([\"default\"], \"de\", \"red\")", "value": 0}}"#,
    );
    let output = run_args(&["--dialect", "postgresql", "compile", file.path().to_str().unwrap()]).unwrap();
    assert!(output.contains("to_tsquery('simple', 'red:*')"));

    let file = search_file(r#"{"conditions": {"op": "==", "field": "index.stock.id", "value": 1}}"#);
    let error = run_args(&["compile", file.path().to_str().unwrap()]).unwrap_err();
    assert!(error.to_string().contains("index.stock.id"));
}

#[test]
fn test_aggregate() {
    let file = search_file("{}");
    let output = run_args(&["aggregate", file.path().to_str().unwrap(), "--key", "index.catalog.id"]).unwrap();

    assert!(output.starts_with(r#"SELECT mindca."catid" AS "key""#));
    assert!(output.contains(r#"GROUP BY mindca."catid""#));
}

#[test]
fn test_invalid_search_document() {
    let file = search_file(r#"{"conditions": {"op": "<>", "field": "product.code", "value": 1}}"#);
    assert!(run_args(&["compile", file.path().to_str().unwrap()]).is_err());
}

// ============================================================================
// cleanup
// ============================================================================

#[test]
fn test_cleanup_with_site_ids() {
    let output = run_args(&["--site-ids", "1,3", "cleanup", "--before", "2024-01-01 00:00:00"]).unwrap();

    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.contains(
        &r#"DELETE FROM "mshop_index_price" WHERE "siteid" IN ('1','3') AND "mtime" < '2024-01-01 00:00:00';"#
    ));
}

#[test]
fn test_cleanup_invalid_date() {
    let error = run_args(&["cleanup", "--before", "yesterday"]).unwrap_err();
    assert!(error.to_string().contains("Invalid date"));
}
