//! MySQL full-text search in boolean mode.
//!
//! Search terms are sanitized into `' +red* +shoes*'`: every token is
//! mandatory and prefix matched.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ParameterRewriter, ValueType};

const JOIN: &str = concat!(
    r#"LEFT JOIN "mshop_index_text" AS mindte"#,
    r#" USE INDEX ("idx_msindte_value", "idx_msindte_p_s_lt_la_ty_do_va") ON mindte."prodid" = mpro."id""#,
);

/// MySQL overrides of the text attributes.
pub fn source() -> AttributeSource {
    AttributeSource::new("mysql")
        .with(
            AttributeDescriptor::new("index.text.id", r#"mindte."textid""#, ValueType::String)
                .with_label("Product index text ID")
                .with_join(JOIN)
                .private(),
        )
        .with(
            AttributeDescriptor::new(
                "index.text.name()",
                concat!(
                    r#"( SELECT mindte_name."prodid" FROM "mshop_index_text" AS mindte_name"#,
                    r#" WHERE :site AND mpro."id" = mindte_name."prodid""#,
                    r#" AND mindte_name."type" = 'name' AND mindte_name."domain" = 'product'"#,
                    r#" AND ( mindte_name."langid" = $1 OR mindte_name."langid" IS NULL )"#,
                    r#" AND MATCH( mindte_name."value" ) AGAINST( $2 IN BOOLEAN MODE ) > 0 )"#,
                ),
                ValueType::Integer,
            )
            .with_label("Product name, parameter(<language ID>,<text>)")
            .with_site_column(r#"mindte_name."siteid""#)
            .with_rewriter(ParameterRewriter::BooleanPrefix { position: 1 })
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "index.text.relevance()",
                concat!(
                    r#":site AND mindte."listtype" IN ($1)"#,
                    r#" AND ( mindte."langid" = $2 OR mindte."langid" IS NULL )"#,
                    r#" AND MATCH( mindte."value" ) AGAINST( $3 IN BOOLEAN MODE )"#,
                ),
                ValueType::Float,
            )
            .with_label("Product texts, parameter(<list type code>,<language ID>,<search term>)")
            .with_site_column(r#"mindte."siteid""#)
            .with_join(JOIN)
            .with_rewriter(ParameterRewriter::BooleanPrefix { position: 2 })
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "sort:index.text.relevance()",
                r#"MATCH( mindte."value" ) AGAINST( $3 IN BOOLEAN MODE )"#,
                ValueType::Float,
            )
            .with_label("Product texts, parameter(<list type code>,<language ID>,<search term>)")
            .with_join(JOIN)
            .with_rewriter(ParameterRewriter::BooleanPrefix { position: 2 })
            .private(),
        )
}
