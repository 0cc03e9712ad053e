//! Attribute index sub-manager attributes.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ValueType};

/// Index table.
pub const TABLE: &str = "mshop_index_attribute";

const JOIN: &str =
    r#"LEFT JOIN "mshop_index_attribute" AS mindat ON mindat."prodid" = mpro."id""#;

/// Attributes of the attribute index.
pub fn source() -> AttributeSource {
    AttributeSource::new("attribute")
        .with(
            AttributeDescriptor::new("index.attribute.id", r#"mindat."attrid""#, ValueType::String)
                .with_label("Product index attribute ID")
                .with_join(JOIN)
                .private(),
        )
        .with(
            AttributeDescriptor::new(
                "index.attribute.code()",
                r#":site AND mindat."listtype" = $1 AND mindat."type" = $2 AND mindat."code""#,
                ValueType::String,
            )
            .with_label("Attribute code, parameter(<list type code>,<attribute type code>)")
            .with_site_column(r#"mindat."siteid""#)
            .with_join(JOIN)
            .private(),
        )
}
