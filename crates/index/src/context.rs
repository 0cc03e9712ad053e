//! Locale and context handed to managers.
//!
//! A manager is constructed for exactly one context. The site scope derived
//! from the locale is bound into every registry the manager builds and never
//! changes afterwards.

use mshop_criteria::SiteScope;
use serde::{Deserialize, Serialize};

use crate::config::IndexConfig;

/// Locale of the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Locale {
    /// Hierarchical site path, e.g. `1.2.`.
    #[serde(default)]
    pub site_path: String,

    /// Explicit site ids; take precedence over the path when non-empty.
    #[serde(default)]
    pub site_ids: Vec<String>,

    /// ISO language id, e.g. `de`.
    #[serde(default)]
    pub language_id: Option<String>,

    /// ISO currency id, e.g. `EUR`.
    #[serde(default)]
    pub currency_id: Option<String>,
}

impl Locale {
    /// Creates a locale for a site path.
    pub fn new(site_path: impl Into<String>) -> Self {
        Self {
            site_path: site_path.into(),
            ..Default::default()
        }
    }

    /// Sets the language.
    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }

    /// Sets the currency.
    pub fn with_currency(mut self, currency_id: impl Into<String>) -> Self {
        self.currency_id = Some(currency_id.into());
        self
    }

    /// Restricts the locale to an explicit list of sites.
    pub fn with_site_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.site_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// The site scope rows must belong to.
    pub fn site_scope(&self) -> SiteScope {
        if self.site_ids.is_empty() {
            SiteScope::path(self.site_path.clone())
        } else {
            SiteScope::ids(self.site_ids.iter().cloned())
        }
    }
}

/// Everything a manager needs from its caller.
#[derive(Debug, Clone, Default)]
pub struct Context {
    locale: Locale,
    config: IndexConfig,
}

impl Context {
    /// Creates a context.
    pub fn new(locale: Locale, config: IndexConfig) -> Self {
        Self { locale, config }
    }

    /// The request locale.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The index configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }
}
