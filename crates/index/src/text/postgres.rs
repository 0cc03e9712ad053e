//! PostgreSQL full-text search with `tsquery` prefix matching.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ParameterRewriter, ValueType};

use super::standard::JOIN;

/// PostgreSQL overrides of the text attributes.
pub fn source() -> AttributeSource {
    AttributeSource::new("postgresql")
        .with(
            AttributeDescriptor::new(
                "index.text.name()",
                concat!(
                    r#"( SELECT mindte_name."prodid" FROM "mshop_index_text" AS mindte_name"#,
                    r#" WHERE :site AND mpro."id" = mindte_name."prodid""#,
                    r#" AND mindte_name."type" = 'name' AND mindte_name."domain" = 'product'"#,
                    r#" AND ( mindte_name."langid" = $1 OR mindte_name."langid" IS NULL )"#,
                    r#" AND to_tsvector('simple', mindte_name."value") @@ to_tsquery('simple', $2) )"#,
                ),
                ValueType::Integer,
            )
            .with_label("Product name, parameter(<language ID>,<text>)")
            .with_site_column(r#"mindte_name."siteid""#)
            .with_rewriter(ParameterRewriter::TsQueryPrefix { position: 1 })
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "index.text.relevance()",
                concat!(
                    r#":site AND mindte."listtype" IN ($1)"#,
                    r#" AND ( mindte."langid" = $2 OR mindte."langid" IS NULL )"#,
                    r#" AND ts_rank(to_tsvector('simple', mindte."value"), to_tsquery('simple', $3))"#,
                ),
                ValueType::Float,
            )
            .with_label("Product texts, parameter(<list type code>,<language ID>,<search term>)")
            .with_site_column(r#"mindte."siteid""#)
            .with_join(JOIN)
            .with_rewriter(ParameterRewriter::TsQueryPrefix { position: 2 })
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "sort:index.text.relevance()",
                r#"ts_rank(to_tsvector('simple', mindte."value"), to_tsquery('simple', $3))"#,
                ValueType::Float,
            )
            .with_label("Product texts, parameter(<list type code>,<language ID>,<search term>)")
            .with_join(JOIN)
            .with_rewriter(ParameterRewriter::TsQueryPrefix { position: 2 })
            .private(),
        )
}
