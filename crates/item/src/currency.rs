//! Locale currency item (`locale.currency.*`).
//!
//! The ISO currency code is the item id at the same time.

use serde_json::Value;

use crate::base::{Item, ItemBase, ValueMap, int, optional_text, text};
use crate::error::{ItemError, ItemResult};

const PREFIX: &str = "locale.currency.";

/// Validates a three-letter upper-case ISO 4217 code.
pub fn check_currency_id(value: &str) -> ItemResult<String> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(value.to_string())
    } else {
        Err(ItemError::InvalidCurrencyId {
            value: value.to_string(),
        })
    }
}

/// A currency available in the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    base: ItemBase,
    label: String,
    status: i64,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            base: ItemBase::new(PREFIX),
            label: String::new(),
            status: 1,
        }
    }
}

impl Currency {
    /// Creates a new currency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a currency from stored values; the result is unmodified.
    pub fn from_values(mut values: ValueMap) -> ItemResult<Self> {
        let mut item = Self::new();
        item.apply(&mut values, true)?;
        item.base.reset_modified();
        Ok(item)
    }

    /// Sets the id, which must be a valid currency code or `None`.
    pub fn set_id(&mut self, id: Option<&str>) -> ItemResult<&mut Self> {
        let id = id.map(check_currency_id).transpose()?;
        self.base.set_id(id);
        Ok(self)
    }

    /// ISO currency code, empty if unset.
    pub fn code(&self) -> &str {
        self.base.id().unwrap_or_default()
    }

    /// Sets the ISO currency code.
    pub fn set_code(&mut self, code: &str) -> ItemResult<&mut Self> {
        if code != self.code() {
            let code = check_currency_id(code)?;
            self.base.set_id(Some(code));
        }
        Ok(self)
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sets the label.
    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        let label = label.into();
        if label != self.label {
            self.label = label;
            self.base.set_modified();
        }
        self
    }

    /// Status; values above zero are enabled.
    pub fn status(&self) -> i64 {
        self.status
    }

    /// Sets the status.
    pub fn set_status(&mut self, status: i64) -> &mut Self {
        if status != self.status {
            self.status = status;
            self.base.set_modified();
        }
        self
    }
}

impl Item for Currency {
    fn resource_type(&self) -> &'static str {
        "locale/currency"
    }

    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn apply(&mut self, values: &mut ValueMap, private: bool) -> ItemResult<()> {
        if let Some(id) = values.remove("locale.currency.id") {
            if private {
                self.set_id(optional_text(&id).as_deref())?;
            }
        }

        self.base.apply(values, private, false)?;

        if let Some(code) = values.remove("locale.currency.code") {
            self.set_code(&text(&code))?;
        }
        if let Some(label) = values.remove("locale.currency.label") {
            self.set_label(text(&label));
        }
        if let Some(status) = values.remove("locale.currency.status") {
            self.set_status(int(&status));
        }

        Ok(())
    }

    fn to_map(&self, private: bool) -> ValueMap {
        let mut map = self.base.to_map(private);
        map.insert("locale.currency.code".to_string(), Value::from(self.code()));
        map.insert("locale.currency.label".to_string(), Value::from(self.label.as_str()));
        map.insert("locale.currency.status".to_string(), Value::from(self.status));
        map
    }

    fn is_available(&self) -> bool {
        self.status > 0
    }
}
