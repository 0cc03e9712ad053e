//! Search attribute registry.
//!
//! A registry is built by folding descriptor sources in priority order
//! (typically base → dialect → local override). A later source replaces a
//! code declared by an earlier one as a whole; there is no field-level merge
//! and no removal. Registries of sub-managers can be attached and are
//! consulted after the registry's own entries.
//!
//! Construction binds the `:site` marker of every descriptor in every source
//! to the tenant predicate, so dialect overrides are scoped exactly like the
//! base templates. After [`RegistryBuilder::build`] the registry is immutable
//! and can be shared freely between threads.
//!
//! # Example
//!
//! ```
//! use mshop_criteria::{
//!     AttributeDescriptor, AttributeSource, RegistryBuilder, SiteScope, ValueType,
//! };
//!
//! let base = AttributeSource::new("standard").with(AttributeDescriptor::new(
//!     "index.text.id",
//!     r#"mindte."textid""#,
//!     ValueType::String,
//! ));
//! let dialect = AttributeSource::new("mysql").with(
//!     AttributeDescriptor::new("index.text.name()", ":site AND x = $1", ValueType::Integer)
//!         .with_site_column(r#"mindte."siteid""#),
//! );
//!
//! let registry = RegistryBuilder::new("index/text")
//!     .source(base)
//!     .source(dialect)
//!     .build(&SiteScope::path("1."))
//!     .unwrap();
//!
//! assert_eq!(registry.list(true).len(), 2);
//! assert_eq!(registry.list(false).len(), 1);
//! assert_eq!(
//!     registry.resolve("index.text.name()").unwrap().template,
//!     r#"mindte."siteid" LIKE '1.%' AND x = $1"#
//! );
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::attribute::AttributeDescriptor;
use crate::error::{CriteriaError, CriteriaResult};
use crate::site::SiteScope;
use crate::template;

/// An ordered, named set of descriptors contributed by one layer.
#[derive(Debug, Clone, Default)]
pub struct AttributeSource {
    name: String,
    descriptors: Vec<AttributeDescriptor>,
}

impl AttributeSource {
    /// Creates an empty source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptors: Vec::new(),
        }
    }

    /// Adds a descriptor (builder style).
    pub fn with(mut self, descriptor: AttributeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Adds a descriptor.
    pub fn push(&mut self, descriptor: AttributeDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Returns the source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared descriptors.
    pub fn descriptors(&self) -> &[AttributeDescriptor] {
        &self.descriptors
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if the source declares nothing.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Builds an [`AttributeRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    name: String,
    sources: Vec<AttributeSource>,
    subs: Vec<(String, Arc<AttributeRegistry>)>,
}

impl RegistryBuilder {
    /// Creates a builder for a registry with the given resource name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            subs: Vec::new(),
        }
    }

    /// Appends a source. Later sources take priority over earlier ones.
    pub fn source(mut self, source: AttributeSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Attaches the registry of a sub-manager.
    pub fn sub_registry(mut self, name: impl Into<String>, registry: Arc<AttributeRegistry>) -> Self {
        self.subs.push((name.into(), registry));
        self
    }

    /// Binds the site scope, validates all descriptors and folds the sources.
    ///
    /// # Errors
    ///
    /// - [`CriteriaError::DuplicateCode`] if a source declares a code twice
    /// - [`CriteriaError::SiteScopeUnbound`] if a template uses `:site` but
    ///   declares no site column
    /// - [`CriteriaError::RewriterOutOfRange`] if a rewriter owns a position
    ///   beyond the declared arity
    pub fn build(self, site: &SiteScope) -> CriteriaResult<AttributeRegistry> {
        let mut layers = Vec::with_capacity(self.sources.len());

        for source in self.sources {
            let mut seen = HashSet::new();
            let mut bound = Vec::with_capacity(source.descriptors.len());

            for descriptor in source.descriptors {
                if !seen.insert(descriptor.code.clone()) {
                    return Err(CriteriaError::DuplicateCode {
                        code: descriptor.code,
                        source_name: source.name,
                    });
                }
                bound.push(Arc::new(bind_and_validate(descriptor, site)?));
            }

            layers.push(bound);
        }

        let mut order: Vec<String> = Vec::new();
        let mut by_code: HashMap<String, Arc<AttributeDescriptor>> = HashMap::new();

        for layer in &layers {
            for descriptor in layer {
                if !by_code.contains_key(&descriptor.code) {
                    order.push(descriptor.code.clone());
                }
                by_code.insert(descriptor.code.clone(), Arc::clone(descriptor));
            }
        }

        let merged: Vec<Arc<AttributeDescriptor>> = order
            .iter()
            .filter_map(|code| by_code.get(code).cloned())
            .collect();

        let local = layers.pop().unwrap_or_default();

        let mut all: HashMap<String, Arc<AttributeDescriptor>> = HashMap::new();
        for (_, sub) in &self.subs {
            for (code, descriptor) in &sub.all {
                all.insert(code.clone(), Arc::clone(descriptor));
            }
        }
        for (code, descriptor) in &by_code {
            all.insert(code.clone(), Arc::clone(descriptor));
        }

        tracing::debug!(
            registry = %self.name,
            local = local.len(),
            own = merged.len(),
            total = all.len(),
            "Built search attribute registry"
        );

        Ok(AttributeRegistry {
            name: self.name,
            local,
            merged,
            by_code,
            all,
            subs: self.subs,
        })
    }
}

fn bind_and_validate(
    mut descriptor: AttributeDescriptor,
    site: &SiteScope,
) -> CriteriaResult<AttributeDescriptor> {
    if template::has_site_marker(&descriptor.template) {
        let column = descriptor
            .site_column
            .as_deref()
            .ok_or_else(|| CriteriaError::SiteScopeUnbound {
                code: descriptor.code.clone(),
            })?;
        let predicate = site.predicate(column);
        descriptor.template = template::bind_site(&descriptor.template, &predicate);
        descriptor.site_predicate = Some(predicate);
    }

    if let Some(rewriter) = &descriptor.rewriter {
        if rewriter.position() >= descriptor.arity {
            return Err(CriteriaError::RewriterOutOfRange {
                code: descriptor.code.clone(),
                position: rewriter.position(),
                arity: descriptor.arity,
            });
        }
    }

    Ok(descriptor)
}

/// Immutable registry of search attributes for one manager.
pub struct AttributeRegistry {
    name: String,
    /// Descriptors of the highest-priority source, in declaration order.
    local: Vec<Arc<AttributeDescriptor>>,
    /// Own descriptors after folding all sources, in first-declared order.
    merged: Vec<Arc<AttributeDescriptor>>,
    /// Own descriptors by code.
    by_code: HashMap<String, Arc<AttributeDescriptor>>,
    /// Own and sub-registry descriptors by code, own entries winning.
    all: HashMap<String, Arc<AttributeDescriptor>>,
    subs: Vec<(String, Arc<AttributeRegistry>)>,
}

impl AttributeRegistry {
    /// Returns the resource name of the registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of own descriptors (without sub-registries).
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    /// Returns true if the registry declares nothing itself.
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Resolves a code, consulting sub-registries after the own entries.
    pub fn resolve(&self, code: &str) -> CriteriaResult<&AttributeDescriptor> {
        self.all
            .get(code)
            .map(Arc::as_ref)
            .ok_or_else(|| CriteriaError::UnknownField {
                code: code.to_string(),
            })
    }

    /// Returns true if `code` resolves.
    pub fn contains(&self, code: &str) -> bool {
        self.all.contains_key(code)
    }

    /// Lists own descriptors.
    ///
    /// With `include_inherited` the folded set of all sources is returned,
    /// otherwise only what the highest-priority source declares.
    pub fn list(&self, include_inherited: bool) -> Vec<&AttributeDescriptor> {
        let list = if include_inherited {
            &self.merged
        } else {
            &self.local
        };
        list.iter().map(Arc::as_ref).collect()
    }

    /// Returns all attributes keyed by code.
    ///
    /// With `include_sub` the attributes of sub-registries (recursively) are
    /// included; own entries win on collision.
    pub fn describe_all(&self, include_sub: bool) -> BTreeMap<String, Arc<AttributeDescriptor>> {
        let source = if include_sub { &self.all } else { &self.by_code };
        source
            .iter()
            .map(|(code, descriptor)| (code.clone(), Arc::clone(descriptor)))
            .collect()
    }

    /// Like [`describe_all`](Self::describe_all) but only public attributes.
    pub fn describe_public(&self, include_sub: bool) -> BTreeMap<String, Arc<AttributeDescriptor>> {
        let mut all = self.describe_all(include_sub);
        all.retain(|_, descriptor| descriptor.public);
        all
    }

    /// Returns an attached sub-registry.
    pub fn sub(&self, name: &str) -> Option<&Arc<AttributeRegistry>> {
        self.subs.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Names of the attached sub-registries, in attachment order.
    pub fn sub_names(&self) -> Vec<&str> {
        self.subs.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl std::fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("name", &self.name)
            .field("own", &self.merged.len())
            .field("total", &self.all.len())
            .field("subs", &self.sub_names())
            .finish()
    }
}
