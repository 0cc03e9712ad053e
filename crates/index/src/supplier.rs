//! Supplier index sub-manager attributes.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ValueType};

/// Index table.
pub const TABLE: &str = "mshop_index_supplier";

/// Attributes of the supplier index.
pub fn source() -> AttributeSource {
    AttributeSource::new("supplier").with(
        AttributeDescriptor::new("index.supplier.id", r#"mindsu."supid""#, ValueType::String)
            .with_label("Product index supplier ID")
            .with_join(r#"LEFT JOIN "mshop_index_supplier" AS mindsu ON mindsu."prodid" = mpro."id""#)
            .private(),
    )
}
