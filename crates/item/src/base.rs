//! Common item behaviour.
//!
//! Every item stores its values under keys of the form `<prefix><name>`, e.g.
//! `order.statuspayment`. Items can be filled from such a map and exported
//! back into one. Private values (ids of parents, site, timestamps) are only
//! read or written when explicitly requested.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::error::{ItemError, ItemResult};

/// Maximum length of type codes.
pub const CODE_MAX_LENGTH: usize = 64;

/// Format of all date/time values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Key/value representation of an item.
pub type ValueMap = Map<String, Value>;

/// Validates a type code.
pub fn check_code(code: &str) -> ItemResult<String> {
    if code.chars().count() > CODE_MAX_LENGTH {
        return Err(ItemError::InvalidCode {
            code: code.to_string(),
            max: CODE_MAX_LENGTH,
        });
    }
    Ok(code.to_string())
}

/// Parses a `YYYY-MM-DD HH:MM:SS` value.
pub fn parse_datetime(value: &str) -> ItemResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| ItemError::InvalidDate {
        value: value.to_string(),
    })
}

/// Formats a date/time value.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "1" } else { "" }.to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn optional_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(text(other)),
    }
}

pub(crate) fn int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

pub(crate) fn optional_datetime(value: &Value) -> ItemResult<Option<NaiveDateTime>> {
    match value {
        Value::Null => Ok(None),
        other => parse_datetime(&text(other)).map(Some),
    }
}

fn datetime_value(value: &Option<NaiveDateTime>) -> Value {
    value
        .as_ref()
        .map(|d| Value::String(format_datetime(d)))
        .unwrap_or(Value::Null)
}

/// State shared by all items: id, site, timestamps, editor and change flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBase {
    prefix: &'static str,
    id: Option<String>,
    site_id: Option<String>,
    ctime: Option<NaiveDateTime>,
    mtime: Option<NaiveDateTime>,
    editor: String,
    modified: bool,
}

impl ItemBase {
    /// Creates empty state for items using `prefix` for their keys.
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            id: None,
            site_id: None,
            ctime: None,
            mtime: None,
            editor: String::new(),
            modified: false,
        }
    }

    /// Key prefix, e.g. `order.`.
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Full key of a value.
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Unique id, `None` for new items.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Sets the id.
    pub fn set_id(&mut self, id: Option<String>) {
        if id != self.id {
            self.id = id;
            self.modified = true;
        }
    }

    /// Site the item belongs to.
    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    /// Sets the site.
    pub fn set_site_id(&mut self, site_id: impl Into<String>) {
        let site_id = Some(site_id.into());
        if site_id != self.site_id {
            self.site_id = site_id;
            self.modified = true;
        }
    }

    /// Creation time.
    pub fn ctime(&self) -> Option<&NaiveDateTime> {
        self.ctime.as_ref()
    }

    /// Last modification time.
    pub fn mtime(&self) -> Option<&NaiveDateTime> {
        self.mtime.as_ref()
    }

    /// Editor of the last modification.
    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Returns `true` if a setter changed a value.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Marks the item as changed.
    pub fn set_modified(&mut self) {
        self.modified = true;
    }

    pub(crate) fn reset_modified(&mut self) {
        self.modified = false;
    }

    /// Takes the common keys out of `values`.
    ///
    /// Site, timestamps and editor are applied only if `private` is set, the
    /// id only if `private` is set and `with_id` is true.
    pub(crate) fn apply(&mut self, values: &mut ValueMap, private: bool, with_id: bool) -> ItemResult<()> {
        if with_id {
            if let Some(id) = values.remove(&self.key("id")) {
                if private {
                    self.set_id(optional_text(&id));
                }
            }
        }

        if let Some(site_id) = values.remove(&self.key("siteid")) {
            if let (true, Some(site_id)) = (private, optional_text(&site_id)) {
                self.set_site_id(site_id);
            }
        }

        for (name, slot) in [("ctime", &mut self.ctime), ("mtime", &mut self.mtime)] {
            if let Some(value) = values.remove(&format!("{}{}", self.prefix, name)) {
                if private {
                    *slot = optional_datetime(&value)?;
                }
            }
        }

        if let Some(editor) = values.remove(&self.key("editor")) {
            if private {
                self.editor = text(&editor);
            }
        }

        Ok(())
    }

    /// Exports the common values.
    pub(crate) fn to_map(&self, private: bool) -> ValueMap {
        let mut map = ValueMap::new();
        map.insert(
            self.key("id"),
            self.id.clone().map(Value::String).unwrap_or(Value::Null),
        );

        if private {
            map.insert(
                self.key("siteid"),
                self.site_id.clone().map(Value::String).unwrap_or(Value::Null),
            );
            map.insert(self.key("ctime"), datetime_value(&self.ctime));
            map.insert(self.key("mtime"), datetime_value(&self.mtime));
            map.insert(self.key("editor"), Value::String(self.editor.clone()));
        }

        map
    }
}

/// Common interface of all items.
pub trait Item {
    /// Resource path, e.g. `order` or `locale/currency`.
    fn resource_type(&self) -> &'static str;

    /// Shared state.
    fn base(&self) -> &ItemBase;

    /// Shared state, mutable.
    fn base_mut(&mut self) -> &mut ItemBase;

    /// Applies all known keys of `values` and removes them from the map.
    ///
    /// Unknown keys are left in the map for the caller to inspect.
    fn apply(&mut self, values: &mut ValueMap, private: bool) -> ItemResult<()>;

    /// Exports the item; private values are included only if requested.
    fn to_map(&self, private: bool) -> ValueMap;

    /// Unique id, `None` for new items.
    fn id(&self) -> Option<&str> {
        self.base().id()
    }

    /// Returns `true` if a setter changed a value.
    fn is_modified(&self) -> bool {
        self.base().is_modified()
    }

    /// Returns `true` if the item may be used.
    fn is_available(&self) -> bool {
        true
    }

    /// Returns a single value by its full key, private values included.
    fn get(&self, key: &str) -> ItemResult<Value> {
        self.to_map(true)
            .remove(key)
            .ok_or_else(|| ItemError::UnknownProperty {
                name: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_code() {
        assert_eq!(check_code("default").unwrap(), "default");
        assert!(check_code(&"x".repeat(64)).is_ok());
        assert!(matches!(
            check_code(&"x".repeat(65)),
            Err(ItemError::InvalidCode { max: 64, .. })
        ));
    }

    #[test]
    fn test_parse_datetime() {
        let date = parse_datetime("2008-02-15 12:34:56").unwrap();
        assert_eq!(format_datetime(&date), "2008-02-15 12:34:56");
        assert!(parse_datetime("2008-02-15").is_err());
        assert!(parse_datetime("2008-13-15 12:34:56").is_err());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(int(&json!("12")), 12);
        assert_eq!(int(&json!(3.9)), 3);
        assert_eq!(int(&json!(null)), 0);
        assert_eq!(text(&json!(5)), "5");
        assert_eq!(optional_text(&json!(null)), None);
    }

    #[test]
    fn test_base_private_values() {
        let mut base = ItemBase::new("order.");
        let mut values = json!({
            "order.id": "5",
            "order.siteid": "1.",
            "order.mtime": "2020-01-01 00:00:00",
            "order.editor": "unittest",
            "order.other": 1
        })
        .as_object()
        .cloned()
        .unwrap();

        base.apply(&mut values, false, true).unwrap();
        assert_eq!(base.id(), None);
        assert!(!base.is_modified());
        assert_eq!(values.len(), 1);

        let mut values = base.to_map(true);
        values.insert("order.id".to_string(), json!("5"));
        values.insert("order.editor".to_string(), json!("unittest"));
        base.apply(&mut values, true, true).unwrap();
        assert_eq!(base.id(), Some("5"));
        assert_eq!(base.editor(), "unittest");
        assert!(base.is_modified());
    }

    #[test]
    fn test_base_rejects_invalid_timestamp() {
        let mut base = ItemBase::new("order.");
        let mut values = json!({"order.ctime": "yesterday"}).as_object().cloned().unwrap();
        assert!(matches!(
            base.apply(&mut values, true, true),
            Err(ItemError::InvalidDate { .. })
        ));
    }
}
