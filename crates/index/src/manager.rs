//! Index manager and its sub-managers.
//!
//! The index manager owns the product base attributes and one sub-manager per
//! index table. Each sub-manager owns a registry built from its descriptor
//! sources; the index manager's registry attaches all of them, so every
//! `index.*` code resolves through the index manager.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use mshop_criteria::{
    AttributeDescriptor, AttributeRegistry, AttributeSource, CompiledCriteria, CriteriaCompiler,
    FieldRef, RegistryBuilder, Search, SiteScope, Slice, StringSyntax, Value,
};

use crate::config::Dialect;
use crate::context::Context;
use crate::error::{IndexError, IndexResult};
use crate::{attribute, catalog, price, product, statement, supplier, text};

/// Names of all known sub-managers.
pub const SUB_MANAGERS: [&str; 5] = ["attribute", "catalog", "price", "supplier", "text"];

/// Tenant column of the index tables.
const INDEX_SITE_COLUMN: &str = r#""siteid""#;

/// Common behaviour of managers that expose search attributes.
pub trait SearchManager: Send + Sync + fmt::Debug {
    /// Resource path, e.g. `index/text`.
    fn resource_type(&self) -> &str;

    /// The manager's attribute registry.
    fn registry(&self) -> &Arc<AttributeRegistry>;

    /// Search attributes keyed by code, optionally including sub-managers.
    fn search_attributes(&self, with_sub: bool) -> BTreeMap<String, Arc<AttributeDescriptor>> {
        self.registry().describe_all(with_sub)
    }
}

fn definition(name: &str, dialect: Dialect) -> IndexResult<(&'static str, Vec<AttributeSource>)> {
    match name {
        "attribute" => Ok((attribute::TABLE, vec![attribute::source()])),
        "catalog" => Ok((catalog::TABLE, vec![catalog::source()])),
        "price" => Ok((price::TABLE, vec![price::source()])),
        "supplier" => Ok((supplier::TABLE, vec![supplier::source()])),
        "text" => Ok((text::TABLE, text::sources(dialect))),
        _ => Err(IndexError::UnknownSubManager {
            name: name.to_string(),
        }),
    }
}

/// Manager of one index table.
pub struct SubManager {
    name: String,
    resource_type: String,
    table: &'static str,
    registry: Arc<AttributeRegistry>,
    site: SiteScope,
    syntax: StringSyntax,
}

impl SubManager {
    /// Builds the sub-manager `name` for a dialect and site scope.
    pub fn new(name: &str, dialect: Dialect, site: &SiteScope) -> IndexResult<Self> {
        let (table, sources) = definition(name, dialect)?;
        let resource_type = format!("index/{}", name);

        let registry = sources
            .into_iter()
            .fold(RegistryBuilder::new(resource_type.clone()), RegistryBuilder::source)
            .build(site)?;

        Ok(Self {
            name: name.to_string(),
            resource_type,
            table,
            registry: Arc::new(registry),
            site: site.clone(),
            syntax: dialect.string_syntax(),
        })
    }

    /// Short name, e.g. `text`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index table name.
    pub fn table(&self) -> &str {
        self.table
    }

    /// Statement deleting rows of this site not refreshed since `before`.
    pub fn cleanup_statement(&self, before: &NaiveDateTime) -> String {
        let site = self.syntax.apply(self.site.predicate(INDEX_SITE_COLUMN));
        statement::cleanup(self.table, &site, before)
    }
}

impl SearchManager for SubManager {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn registry(&self) -> &Arc<AttributeRegistry> {
        &self.registry
    }
}

impl fmt::Debug for SubManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubManager")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("attributes", &self.registry.len())
            .finish()
    }
}

/// Product index manager.
///
/// # Example
///
/// ```
/// use mshop_criteria::{CompareOp, Expr, FieldRef, Search};
/// use mshop_index::{Context, IndexConfig, IndexManager, Locale, SearchManager};
///
/// let context = Context::new(Locale::new("1."), IndexConfig::default());
/// let manager = IndexManager::new(context).unwrap();
///
/// assert!(manager.search_attributes(true).contains_key("index.text.relevance()"));
///
/// let search = manager
///     .create_search()
///     .with_conditions(Expr::compare(CompareOp::Eq, FieldRef::plain("product.code"), "CNC"));
/// let sql = manager.search_statement(&search).unwrap();
/// assert!(sql.contains(r#"mpro."code" = 'CNC'"#));
/// ```
pub struct IndexManager {
    context: Context,
    registry: Arc<AttributeRegistry>,
    subs: Vec<SubManager>,
    site: SiteScope,
}

impl IndexManager {
    /// Builds the manager and all configured sub-managers.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if the configuration does not
    /// validate, or the registry construction error of the first sub-manager
    /// whose descriptors are inconsistent.
    pub fn new(context: Context) -> IndexResult<Self> {
        let config = context.config();
        config.validate().map_err(|errors| IndexError::InvalidConfig {
            message: errors.join("; "),
        })?;

        let site = context.locale().site_scope();
        let subs = config
            .submanagers
            .iter()
            .map(|name| SubManager::new(name, config.dialect, &site))
            .collect::<IndexResult<Vec<_>>>()?;

        let registry = subs
            .iter()
            .fold(
                RegistryBuilder::new("index").source(product::source()),
                |builder, sub| builder.sub_registry(sub.name(), Arc::clone(sub.registry())),
            )
            .build(&site)?;

        tracing::debug!(
            dialect = %config.dialect,
            submanagers = subs.len(),
            attributes = registry.describe_all(true).len(),
            "Created index manager"
        );

        Ok(Self {
            context,
            registry: Arc::new(registry),
            subs,
            site,
        })
    }

    /// The context the manager was built for.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns a configured sub-manager.
    pub fn sub_manager(&self, name: &str) -> IndexResult<&SubManager> {
        self.subs
            .iter()
            .find(|sub| sub.name() == name)
            .ok_or_else(|| IndexError::UnknownSubManager {
                name: name.to_string(),
            })
    }

    /// All configured sub-managers.
    pub fn sub_managers(&self) -> &[SubManager] {
        &self.subs
    }

    /// A new search using the configured page size.
    pub fn create_search(&self) -> Search {
        Search::new().with_slice(0, self.context.config().default_slice_size)
    }

    /// Full-text relevance of the locale language, e.g. for sorting by relevance.
    pub fn text_relevance(&self, list_types: &[&str], term: &str) -> IndexResult<FieldRef> {
        let language = self.language()?;
        Ok(FieldRef::function(
            "index.text:relevance",
            vec![
                Value::from(list_types.to_vec()),
                Value::from(language),
                Value::from(term),
            ],
        ))
    }

    /// Price value in the locale currency.
    pub fn price_value(&self) -> IndexResult<FieldRef> {
        let currency = self
            .context
            .locale()
            .currency_id
            .as_deref()
            .ok_or_else(|| IndexError::MissingLocale {
                field: "currency".to_string(),
            })?;
        Ok(FieldRef::function("index.price:value", vec![Value::from(currency)]))
    }

    fn language(&self) -> IndexResult<&str> {
        self.context
            .locale()
            .language_id
            .as_deref()
            .ok_or_else(|| IndexError::MissingLocale {
                field: "language".to_string(),
            })
    }

    /// Compiles conditions and sort order against all index attributes.
    pub fn compile(&self, search: &Search) -> IndexResult<CompiledCriteria> {
        Ok(self.compiler().compile(search)?)
    }

    fn compiler(&self) -> CriteriaCompiler<'_> {
        CriteriaCompiler::new(&self.registry).with_options(self.context.config().compiler_options())
    }

    fn site_predicate(&self) -> String {
        self.context
            .config()
            .dialect
            .string_syntax()
            .apply(self.site.predicate(product::SITE_COLUMN))
    }

    fn clamp(&self, slice: Slice) -> Slice {
        let max = self.context.config().max_slice_size;
        if slice.size > max {
            tracing::warn!(requested = slice.size, max, "Slice size exceeds maximum, clamping");
            Slice {
                start: slice.start,
                size: max,
            }
        } else {
            slice
        }
    }

    /// Statement selecting the ids of matching products.
    pub fn search_statement(&self, search: &Search) -> IndexResult<String> {
        let compiled = self.compile(search)?;
        Ok(statement::search(
            &compiled,
            &self.site_predicate(),
            self.clamp(search.slice),
        ))
    }

    /// Statement counting all matching products.
    pub fn count_statement(&self, search: &Search) -> IndexResult<String> {
        let compiled = self.compile(search)?;
        Ok(statement::count(&compiled, &self.site_predicate()))
    }

    /// Statement counting matching products per value of `key`.
    ///
    /// `key` is a field reference like `index.catalog.id`.
    pub fn aggregate_statement(&self, search: &Search, key: &str) -> IndexResult<String> {
        let field = FieldRef::parse(key)?;
        let compiler = self.compiler();
        let key = compiler.compile_field(&field)?;
        let compiled = compiler.compile(&Search {
            sort: Vec::new(),
            ..search.clone()
        })?;

        Ok(statement::aggregate(
            &compiled,
            &key,
            &self.site_predicate(),
            self.clamp(search.slice),
        ))
    }

    /// Statements removing stale index rows of the site from every sub-manager.
    pub fn cleanup_statements(&self, before: &NaiveDateTime) -> Vec<String> {
        self.subs
            .iter()
            .map(|sub| sub.cleanup_statement(before))
            .collect()
    }
}

impl SearchManager for IndexManager {
    fn resource_type(&self) -> &str {
        "index"
    }

    fn registry(&self) -> &Arc<AttributeRegistry> {
        &self.registry
    }
}

impl fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexManager")
            .field("dialect", &self.context.config().dialect)
            .field("site", &self.site)
            .field("subs", &self.subs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::context::Locale;

    fn manager(dialect: Dialect) -> IndexManager {
        let locale = Locale::new("1.").with_language("de").with_currency("EUR");
        IndexManager::new(Context::new(locale, IndexConfig::for_dialect(dialect))).unwrap()
    }

    #[test]
    fn test_sub_managers() {
        let manager = manager(Dialect::Standard);
        assert_eq!(manager.sub_managers().len(), 5);
        let text = manager.sub_manager("text").unwrap();
        assert_eq!(text.resource_type(), "index/text");
        assert_eq!(text.table(), "mshop_index_text");
    }

    #[test]
    fn test_unknown_sub_manager() {
        let manager = manager(Dialect::Standard);
        assert_eq!(
            manager.sub_manager("unknown").unwrap_err(),
            IndexError::UnknownSubManager {
                name: "unknown".to_string()
            }
        );
    }

    #[test]
    fn test_search_attributes_with_and_without_sub() {
        let manager = manager(Dialect::Mysql);
        let own = manager.search_attributes(false);
        let all = manager.search_attributes(true);

        assert_eq!(own.len(), 5);
        assert!(own.contains_key("product.code"));
        assert!(!own.contains_key("index.catalog.id"));
        assert!(all.contains_key("index.catalog.position()"));
        assert!(all.contains_key("sort:index.text.relevance()"));
        assert!(all.contains_key("index.supplier.id"));
    }

    #[test]
    fn test_disabled_sub_manager() {
        let config = IndexConfig {
            submanagers: vec!["catalog".to_string()],
            ..Default::default()
        };
        let manager = IndexManager::new(Context::new(Locale::new("1."), config)).unwrap();
        assert!(manager.sub_manager("text").is_err());
        assert!(!manager.search_attributes(true).contains_key("index.text.id"));
    }

    #[test]
    fn test_invalid_config() {
        let config = IndexConfig {
            default_slice_size: 0,
            ..Default::default()
        };
        let err = IndexManager::new(Context::new(Locale::new("1."), config)).unwrap_err();
        assert!(matches!(err, IndexError::InvalidConfig { .. }));
    }

    #[test]
    fn test_locale_helpers() {
        let manager = manager(Dialect::Mysql);
        assert_eq!(
            manager.text_relevance(&["default"], "red").unwrap().to_string(),
            r#"index.text:relevance(["default"],"de","red")"#
        );
        assert_eq!(
            manager.price_value().unwrap().to_string(),
            r#"index.price:value("EUR")"#
        );

        let bare = IndexManager::new(Context::default()).unwrap();
        assert_eq!(
            bare.price_value().unwrap_err(),
            IndexError::MissingLocale {
                field: "currency".to_string()
            }
        );
    }

    #[test]
    fn test_slice_is_clamped() {
        let manager = manager(Dialect::Standard);
        let search = Search::new().with_slice(0, 1_000_000);
        let sql = manager.search_statement(&search).unwrap();
        assert!(sql.ends_with("LIMIT 10000 OFFSET 0"));
    }

    #[test]
    fn test_create_search_uses_configured_size() {
        let manager = manager(Dialect::Standard);
        assert_eq!(manager.create_search().slice.size, 100);
    }
}
