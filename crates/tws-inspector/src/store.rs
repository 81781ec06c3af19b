use std::collections::BTreeMap;
use std::sync::Arc;

use tws_templates::TemplateMetadata;
use tws_templates::TemplateName;

use crate::error::StoreError;

/// Identifier -> template names implementing it, highest precedence first.
pub type InheritanceChains = BTreeMap<String, Vec<TemplateName>>;

/// Read-only view onto compiled template metadata.
///
/// Implementations own the cache lifecycle (populate on compile, clear on
/// rebuild). The inspector only reads, so a stale or freshly reset store
/// shows up as [`StoreError::NotCompiled`] / [`StoreError::UnknownIdentifier`].
pub trait MetadataStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::NotCompiled`] if `template` has no cached metadata.
    fn metadata(&self, template: &TemplateName) -> Result<Arc<TemplateMetadata>, StoreError>;

    /// Snapshot of all known inheritance chains.
    fn inheritance_chains(&self) -> InheritanceChains;

    /// Highest precedence template for a logical identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownIdentifier`] if no template implements
    /// `identifier`.
    fn first(&self, identifier: &str) -> Result<TemplateName, StoreError> {
        self.inheritance_chains()
            .remove(identifier)
            .and_then(|chain| chain.into_iter().next())
            .ok_or_else(|| StoreError::UnknownIdentifier(identifier.to_string()))
    }
}

impl<T: MetadataStore + ?Sized> MetadataStore for &T {
    fn metadata(&self, template: &TemplateName) -> Result<Arc<TemplateMetadata>, StoreError> {
        (**self).metadata(template)
    }

    fn inheritance_chains(&self) -> InheritanceChains {
        (**self).inheritance_chains()
    }

    fn first(&self, identifier: &str) -> Result<TemplateName, StoreError> {
        (**self).first(identifier)
    }
}

impl<T: MetadataStore + ?Sized> MetadataStore for Arc<T> {
    fn metadata(&self, template: &TemplateName) -> Result<Arc<TemplateMetadata>, StoreError> {
        (**self).metadata(template)
    }

    fn inheritance_chains(&self) -> InheritanceChains {
        (**self).inheritance_chains()
    }

    fn first(&self, identifier: &str) -> Result<TemplateName, StoreError> {
        (**self).first(identifier)
    }
}
