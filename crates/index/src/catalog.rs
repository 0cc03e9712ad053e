//! Catalog index sub-manager attributes.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ValueType};

/// Index table.
pub const TABLE: &str = "mshop_index_catalog";

const JOIN: &str = r#"LEFT JOIN "mshop_index_catalog" AS mindca ON mindca."prodid" = mpro."id""#;

/// Attributes of the catalog index.
pub fn source() -> AttributeSource {
    AttributeSource::new("catalog")
        .with(
            AttributeDescriptor::new("index.catalog.id", r#"mindca."catid""#, ValueType::String)
                .with_label("Product index category ID")
                .with_join(JOIN)
                .private(),
        )
        .with(
            AttributeDescriptor::new(
                "index.catalog.position()",
                r#":site AND mindca."listtype" = $1 AND mindca."catid" IN ( $2 ) AND mindca."pos""#,
                ValueType::Integer,
            )
            .with_label("Product position in category, parameter(<list type code>,<category ID>)")
            .with_site_column(r#"mindca."siteid""#)
            .with_join(JOIN)
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "sort:index.catalog.position()",
                r#"mindca."pos""#,
                ValueType::Integer,
            )
            .with_label("Sort product position in category, parameter(<list type code>,<category ID>)")
            .with_arity(2)
            .with_join(JOIN)
            .private(),
        )
}
