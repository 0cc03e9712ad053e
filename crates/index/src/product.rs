//! Product base attributes of the index manager.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ValueType};

/// Base table of every index search.
pub const TABLE: &str = "mshop_product";

/// Alias of the base table.
pub const ALIAS: &str = "mpro";

/// Qualified product id column.
pub const ID_COLUMN: &str = r#"mpro."id""#;

/// Qualified tenant column of the base table.
pub const SITE_COLUMN: &str = r#"mpro."siteid""#;

/// Attributes of the product table.
pub fn source() -> AttributeSource {
    AttributeSource::new("product")
        .with(
            AttributeDescriptor::new("product.id", r#"mpro."id""#, ValueType::Integer)
                .with_label("Product ID")
                .private(),
        )
        .with(
            AttributeDescriptor::new("product.code", r#"mpro."code""#, ValueType::String)
                .with_label("Product code"),
        )
        .with(
            AttributeDescriptor::new("product.type", r#"mpro."type""#, ValueType::String)
                .with_label("Product type"),
        )
        .with(
            AttributeDescriptor::new("product.status", r#"mpro."status""#, ValueType::Integer)
                .with_label("Product status"),
        )
        .with(
            AttributeDescriptor::new("product.editor", r#"mpro."editor""#, ValueType::String)
                .with_label("Product editor")
                .private(),
        )
}
