//! Portable text search based on `LIKE`.

use mshop_criteria::{AttributeDescriptor, AttributeSource, ParameterRewriter, ValueType};

/// Join of the text index table.
pub const JOIN: &str = r#"LEFT JOIN "mshop_index_text" AS mindte ON mindte."prodid" = mpro."id""#;

/// Base text attributes every dialect starts from.
pub fn source() -> AttributeSource {
    AttributeSource::new("standard")
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
                    r#" AND mindte_name."value" LIKE $2 )"#,
                ),
                ValueType::Integer,
            )
            .with_label("Product name, parameter(<language ID>,<text>)")
            .with_site_column(r#"mindte_name."siteid""#)
            .with_rewriter(ParameterRewriter::LikeContains { position: 1 })
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "sort:index.text.name()",
                concat!(
                    r#"( SELECT mindte_s."value" FROM "mshop_index_text" AS mindte_s"#,
                    r#" WHERE mpro."id" = mindte_s."prodid""#,
                    r#" AND mindte_s."type" = 'name' AND mindte_s."domain" = 'product'"#,
                    r#" AND ( mindte_s."langid" = $1 OR mindte_s."langid" IS NULL ) LIMIT 1 )"#,
                ),
                ValueType::String,
            )
            .with_label("Sort by product name, parameter(<language ID>)")
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "index.text.relevance()",
                concat!(
                    r#":site AND mindte."listtype" IN ($1)"#,
                    r#" AND ( mindte."langid" = $2 OR mindte."langid" IS NULL )"#,
                    r#" AND CASE WHEN mindte."value" LIKE $3 THEN 1 ELSE 0 END"#,
                ),
                ValueType::Float,
            )
            .with_label("Product texts, parameter(<list type code>,<language ID>,<search term>)")
            .with_site_column(r#"mindte."siteid""#)
            .with_join(JOIN)
            .with_rewriter(ParameterRewriter::LikeContains { position: 2 })
            .private(),
        )
        .with(
            AttributeDescriptor::new(
                "sort:index.text.relevance()",
                r#"CASE WHEN mindte."value" LIKE $3 THEN 1 ELSE 0 END"#,
                ValueType::Float,
            )
            .with_label("Product texts, parameter(<list type code>,<language ID>,<search term>)")
            .with_join(JOIN)
            .with_rewriter(ParameterRewriter::LikeContains { position: 2 })
            .private(),
        )
}
