//! Price index sub-manager attributes.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ValueType};

/// Index table.
pub const TABLE: &str = "mshop_index_price";

const JOIN: &str = r#"LEFT JOIN "mshop_index_price" AS mindpr ON mindpr."prodid" = mpro."id""#;

/// Attributes of the price index.
pub fn source() -> AttributeSource {
    AttributeSource::new("price")
        .with(
            AttributeDescriptor::new("index.price.id", r#"mindpr."priceid""#, ValueType::String)
                .with_label("Product index price ID")
                .with_join(JOIN)
                .private(),
        )
        .with(
            AttributeDescriptor::new(
                "index.price.value()",
                r#":site AND mindpr."currencyid" = $1 AND mindpr."value""#,
                ValueType::Float,
            )
            .with_label("Search price, parameter(<currency ID>)")
            .with_site_column(r#"mindpr."siteid""#)
            .with_join(JOIN)
            .private(),
        )
        .with(
            AttributeDescriptor::new("sort:index.price.value()", r#"mindpr."value""#, ValueType::Float)
                .with_label("Sort price, parameter(<currency ID>)")
                .with_arity(1)
                .with_join(JOIN)
                .private(),
        )
}
