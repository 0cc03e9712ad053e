//! Ordered product attribute item (`order.base.product.attribute.*`).

use serde_json::Value;

use crate::base::{Item, ItemBase, ValueMap, check_code, int, optional_text, text};
use crate::error::ItemResult;

const PREFIX: &str = "order.base.product.attribute.";

/// An attribute of an ordered product, e.g. the chosen size or a gift note.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderProductAttribute {
    base: ItemBase,
    attribute_id: String,
    parent_id: Option<String>,
    attribute_type: String,
    code: String,
    name: String,
    value: Value,
    quantity: i64,
}

impl Default for OrderProductAttribute {
    fn default() -> Self {
        Self {
            base: ItemBase::new(PREFIX),
            attribute_id: String::new(),
            parent_id: None,
            attribute_type: String::new(),
            code: String::new(),
            name: String::new(),
            value: Value::String(String::new()),
            quantity: 1,
        }
    }
}

impl OrderProductAttribute {
    /// Creates an empty attribute with quantity one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an attribute from stored values; the result is unmodified.
    pub fn from_values(mut values: ValueMap) -> ItemResult<Self> {
        let mut item = Self::new();
        item.apply(&mut values, true)?;
        item.base.reset_modified();
        Ok(item)
    }

    /// Copies the values of a catalog attribute.
    ///
    /// The attribute type becomes the code and the attribute code the value.
    pub fn copy_from(
        &mut self,
        site_id: &str,
        attribute_id: &str,
        attribute_type: &str,
        code: &str,
        name: &str,
    ) -> &mut Self {
        self.base.set_site_id(site_id);
        self.set_attribute_id(attribute_id);
        self.set_name(name);
        self.set_code(attribute_type);
        self.set_value(Value::from(code));
        self.base.set_modified();
        self
    }

    /// Id of the catalog attribute, empty for free-text attributes.
    pub fn attribute_id(&self) -> &str {
        &self.attribute_id
    }

    /// Sets the catalog attribute id.
    pub fn set_attribute_id(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if id != self.attribute_id {
            self.attribute_id = id;
            self.base.set_modified();
        }
        self
    }

    /// Id of the ordered product.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Sets the ordered product id.
    pub fn set_parent_id(&mut self, id: impl Into<String>) -> &mut Self {
        let id = Some(id.into());
        if id != self.parent_id {
            self.parent_id = id;
            self.base.set_modified();
        }
        self
    }

    /// Attribute type, e.g. `variant` or `config`.
    pub fn attribute_type(&self) -> &str {
        &self.attribute_type
    }

    /// Sets the attribute type.
    pub fn set_attribute_type(&mut self, attribute_type: &str) -> ItemResult<&mut Self> {
        if attribute_type != self.attribute_type {
            self.attribute_type = check_code(attribute_type)?;
            self.base.set_modified();
        }
        Ok(self)
    }

    /// Attribute code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Sets the attribute code. Codes may be up to 255 characters long.
    pub fn set_code(&mut self, code: impl Into<String>) -> &mut Self {
        let code = code.into();
        if code != self.code {
            self.code = code;
            self.base.set_modified();
        }
        self
    }

    /// Localized name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if name != self.name {
            self.name = name;
            self.base.set_modified();
        }
        self
    }

    /// Attribute value; may be structured for custom attributes.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Sets the value.
    pub fn set_value(&mut self, value: Value) -> &mut Self {
        if value != self.value {
            self.value = value;
            self.base.set_modified();
        }
        self
    }

    /// Ordered quantity.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Sets the quantity.
    pub fn set_quantity(&mut self, quantity: i64) -> &mut Self {
        if quantity != self.quantity {
            self.quantity = quantity;
            self.base.set_modified();
        }
        self
    }
}

impl Item for OrderProductAttribute {
    fn resource_type(&self) -> &'static str {
        "order/base/product/attribute"
    }

    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn apply(&mut self, values: &mut ValueMap, private: bool) -> ItemResult<()> {
        self.base.apply(values, private, true)?;

        if let Some(id) = values.remove("order.base.product.attribute.attrid") {
            if private {
                self.set_attribute_id(text(&id));
            }
        }
        if let Some(id) = values.remove("order.base.product.attribute.parentid") {
            if let (true, Some(id)) = (private, optional_text(&id)) {
                self.set_parent_id(id);
            }
        }
        if let Some(attribute_type) = values.remove("order.base.product.attribute.type") {
            self.set_attribute_type(&text(&attribute_type))?;
        }
        if let Some(code) = values.remove("order.base.product.attribute.code") {
            self.set_code(text(&code));
        }
        if let Some(value) = values.remove("order.base.product.attribute.value") {
            self.set_value(value);
        }
        if let Some(name) = values.remove("order.base.product.attribute.name") {
            self.set_name(text(&name));
        }
        if let Some(quantity) = values.remove("order.base.product.attribute.quantity") {
            self.set_quantity(int(&quantity));
        }

        Ok(())
    }

    fn to_map(&self, private: bool) -> ValueMap {
        let mut map = self.base.to_map(private);
        map.insert(format!("{}type", PREFIX), Value::from(self.attribute_type.as_str()));
        map.insert(format!("{}code", PREFIX), Value::from(self.code.as_str()));
        map.insert(format!("{}name", PREFIX), Value::from(self.name.as_str()));
        map.insert(format!("{}value", PREFIX), self.value.clone());
        map.insert(format!("{}quantity", PREFIX), Value::from(self.quantity));

        if private {
            map.insert(format!("{}attrid", PREFIX), Value::from(self.attribute_id.as_str()));
            map.insert(
                format!("{}parentid", PREFIX),
                self.parent_id.clone().map(Value::String).unwrap_or(Value::Null),
            );
        }

        map
    }
}
