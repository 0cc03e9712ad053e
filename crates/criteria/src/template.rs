//! Placeholder substitution for SQL templates.
//!
//! Templates carry two kinds of markers:
//!
//! - `:site` - bound once, at registry construction, to the tenant predicate
//! - `$1`, `$2`, ... - filled per query with pre-escaped literals
//!
//! Substitution is textual. Every positional marker is located in a single
//! scan of the original template, so inserted literals are never rescanned and
//! the result does not depend on the order positions are visited in.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CriteriaError, CriteriaResult};
use crate::literal::SqlLiteral;

/// Marker replaced by the site-scope predicate.
pub const SITE_MARKER: &str = ":site";

static POSITIONAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("positional marker pattern is valid"));

/// Substitutes `$k` markers with `params[k - 1]`.
///
/// ```
/// use mshop_criteria::{SqlLiteral, template::render};
///
/// let sql = render(
///     "MATCH(col) AGAINST($1 IN BOOLEAN MODE)",
///     &[SqlLiteral::trusted("' +red*'")],
/// )
/// .unwrap();
/// assert_eq!(sql, "MATCH(col) AGAINST(' +red*' IN BOOLEAN MODE)");
/// ```
pub fn render(template: &str, params: &[SqlLiteral]) -> CriteriaResult<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut last = 0;

    for caps in POSITIONAL.captures_iter(template) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let position = digits.as_str().parse::<usize>().unwrap_or(0);
        let param = position
            .checked_sub(1)
            .and_then(|idx| params.get(idx))
            .ok_or_else(|| CriteriaError::MissingParameter {
                template: template.to_string(),
                position,
                supplied: params.len(),
            })?;

        out.push_str(&template[last..whole.start()]);
        out.push_str(param.as_str());
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// Like [`render`], but leaves every occurrence of a bound site predicate
/// untouched.
///
/// The predicate is built from site values, which may contain `$k`-like text.
/// Only the template text around it is scanned for markers.
///
/// ```
/// use mshop_criteria::{SqlLiteral, template::render_bound};
///
/// let sql = render_bound(
///     "t.siteid IN ('$1') AND x = $1",
///     Some("t.siteid IN ('$1')"),
///     &[SqlLiteral::trusted("'a'")],
/// )
/// .unwrap();
/// assert_eq!(sql, "t.siteid IN ('$1') AND x = 'a'");
/// ```
pub fn render_bound(
    template: &str,
    predicate: Option<&str>,
    params: &[SqlLiteral],
) -> CriteriaResult<String> {
    match predicate {
        Some(predicate) if !predicate.is_empty() => Ok(template
            .split(predicate)
            .map(|segment| render(segment, params))
            .collect::<CriteriaResult<Vec<_>>>()?
            .join(predicate)),
        _ => render(template, params),
    }
}

/// Returns the set of positional markers used by a template.
pub fn positions(template: &str) -> BTreeSet<usize> {
    POSITIONAL
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .collect()
}

/// Returns the highest positional marker, or `0` for plain templates.
pub fn max_position(template: &str) -> usize {
    positions(template).into_iter().next_back().unwrap_or(0)
}

/// Returns `true` if the template still contains the site marker.
pub fn has_site_marker(template: &str) -> bool {
    template.contains(SITE_MARKER)
}

/// Replaces every site marker with the given predicate.
pub fn bind_site(template: &str, predicate: &str) -> String {
    template.replace(SITE_MARKER, predicate)
}
